//! Batch pairing of scans with their landmark files.
//!
//! A leaf directory holds at most one scan (`*_T1.img`) and one marker
//! (`*_T1_dnk.img`). Discovery walks the whole tree before anything is
//! processed, so an ambiguous leaf aborts the run up front.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Layout;
use crate::error::{DeneckError, Result};

/// File name suffix of a scan.
pub const SCAN_SUFFIX: &str = "_T1.img";
/// File name suffix of a landmark marker.
pub const MARKER_SUFFIX: &str = "_T1_dnk.img";

/// Scan and marker found together in one leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    /// Leaf directory
    pub dir: PathBuf,
    /// Scan file
    pub scan: PathBuf,
    /// Marker file
    pub marker: PathBuf,
}

/// Leaf skipped because it lacks its scan, its marker, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFiles {
    /// Leaf directory
    pub dir: PathBuf,
    /// Whether a scan was present
    pub has_scan: bool,
    /// Whether a marker was present
    pub has_marker: bool,
}

impl MissingFiles {
    /// Error form of this record.
    pub fn to_error(&self) -> DeneckError {
        DeneckError::MissingFile {
            dir: self.dir.clone(),
        }
    }
}

/// Outcome of walking a batch tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Complete pairs, in traversal order
    pub pairs: Vec<Pairing>,
    /// Incomplete leaves, in traversal order
    pub skipped: Vec<MissingFiles>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Scan,
    Marker,
}

fn classify(name: &str) -> Option<Role> {
    // marker suffix first: it is the more specific of the two
    if name.ends_with(MARKER_SUFFIX) {
        Some(Role::Marker)
    } else if name.ends_with(SCAN_SUFFIX) {
        Some(Role::Scan)
    } else {
        None
    }
}

/// Immediate subdirectories of `dir`, sorted by path.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source| DeneckError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            dirs.push(path);
        } else {
            debug!(path = %path.display(), "skipped non-directory");
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Leaf directories of a batch tree.
pub fn leaf_directories(root: &Path, layout: Layout) -> Result<Vec<PathBuf>> {
    match layout {
        Layout::Flat => subdirectories(root),
        Layout::Nested => {
            let mut leaves = Vec::new();
            for subject in subdirectories(root)? {
                leaves.extend(subdirectories(&subject)?);
            }
            Ok(leaves)
        }
    }
}

/// Inspect one leaf.
///
/// Returns `Ok(Ok(pair))` for a complete leaf, `Ok(Err(missing))` for an
/// incomplete one, and `Err` when a role is claimed by more than one file.
pub fn scan_leaf(dir: &Path) -> Result<std::result::Result<Pairing, MissingFiles>> {
    let io_err = |source| DeneckError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => debug!(?name, dir = %dir.display(), "skipped non-UTF-8 file name"),
        }
    }
    names.sort();

    let mut scan: Option<PathBuf> = None;
    let mut marker: Option<PathBuf> = None;
    for name in names {
        let (slot, suffix) = match classify(&name) {
            Some(Role::Scan) => (&mut scan, SCAN_SUFFIX),
            Some(Role::Marker) => (&mut marker, MARKER_SUFFIX),
            None => continue,
        };
        if slot.is_some() {
            return Err(DeneckError::DuplicateFile {
                dir: dir.to_path_buf(),
                suffix,
            });
        }
        *slot = Some(dir.join(name));
    }

    Ok(match (scan, marker) {
        (Some(scan), Some(marker)) => Ok(Pairing {
            dir: dir.to_path_buf(),
            scan,
            marker,
        }),
        (scan, marker) => Err(MissingFiles {
            dir: dir.to_path_buf(),
            has_scan: scan.is_some(),
            has_marker: marker.is_some(),
        }),
    })
}

/// Pair every scan with its marker under `root`.
///
/// Fails fast with [`DeneckError::DuplicateFile`] on the first ambiguous leaf.
pub fn discover_pairs(root: &Path, layout: Layout) -> Result<Discovery> {
    let mut discovery = Discovery::default();
    for leaf in leaf_directories(root, layout)? {
        match scan_leaf(&leaf)? {
            Ok(pair) => discovery.pairs.push(pair),
            Err(missing) => discovery.skipped.push(missing),
        }
    }
    debug!(
        pairs = discovery.pairs.len(),
        skipped = discovery.skipped.len(),
        "batch tree scanned"
    );
    Ok(discovery)
}
