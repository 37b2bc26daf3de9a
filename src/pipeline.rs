//! Per-pair denecking and the batch driver.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::batch::{discover_pairs, Pairing};
use crate::config::{DeneckConfig, Layout};
use crate::cutoff::summarize_landmarks;
use crate::error::{DeneckError, Result};
use crate::io::{load_volume, save_masked};
use crate::mask::apply_mask;
use crate::naming::derive_output_path;

/// Result of denecking one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairReport {
    /// Axial slice below which voxels were zeroed
    pub cutoff: usize,
    /// Written file
    pub output: PathBuf,
}

/// Pair that failed during a batch run.
#[derive(Debug)]
pub struct PairFailure {
    /// The pair being processed
    pub pair: Pairing,
    /// What went wrong
    pub error: DeneckError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Pairs written successfully
    pub processed: Vec<(Pairing, PairReport)>,
    /// Leaves skipped for missing files
    pub skipped: Vec<PathBuf>,
    /// Pairs that failed
    pub failed: Vec<PairFailure>,
}

impl BatchReport {
    /// Whether every discovered pair was written.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deneck `scan` using the landmark in `marker`.
///
/// Writes to `output` when given, otherwise to the `_withoutNeck` name
/// derived from the scan.
pub fn process_pair(
    scan_path: &Path,
    marker_path: &Path,
    output: Option<&Path>,
    config: &DeneckConfig,
) -> Result<PairReport> {
    info!("Loading {}...", marker_path.display());
    let marker = load_volume(marker_path)?;

    info!("Loading {}...", scan_path.display());
    let scan = load_volume(scan_path)?;

    if marker.dims() != scan.dims() {
        warn!(
            marker = ?marker.dims(),
            scan = ?scan.dims(),
            "marker and scan shapes differ"
        );
    }

    let landmarks = summarize_landmarks(&marker)?;
    let cutoff = landmarks.cutoff();
    info!(
        voxels = landmarks.count,
        span = landmarks.axial_span(),
        "cutoff: {cutoff}"
    );

    let masked = apply_mask(&scan, cutoff, config.bit_width, config.rounding)?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => derive_output_path(scan_path, config.stem_rule)?,
    };
    info!("Saving denecked as {}...", output.display());
    save_masked(&masked, &output)?;

    Ok(PairReport { cutoff, output })
}

/// Deneck every pair found under `root`.
///
/// Discovery errors ([`DeneckError::DuplicateFile`] and unreadable
/// directories, [`DeneckError::Io`]) abort before anything is written. Every
/// error raised while processing a single pair is collected in
/// [`BatchReport::failed`] and the run continues.
pub fn run_batch(root: &Path, layout: Layout, config: &DeneckConfig) -> Result<BatchReport> {
    let discovery = discover_pairs(root, layout)?;
    let mut report = BatchReport::default();

    for missing in discovery.skipped {
        warn!("{}", missing.to_error());
        report.skipped.push(missing.dir);
    }

    for pair in discovery.pairs {
        info!("Applying to: {}", pair.dir.display());
        let output = config.output_name.as_ref().map(|name| pair.dir.join(name));

        match process_pair(&pair.scan, &pair.marker, output.as_deref(), config) {
            Ok(done) => report.processed.push((pair, done)),
            Err(err) => {
                error!("{}: {err}", pair.dir.display());
                report.failed.push(PairFailure { pair, error: err });
            }
        }
    }

    info!(
        processed = report.processed.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Done!"
    );
    Ok(report)
}
