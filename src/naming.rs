//! Output file naming: `<stem>_withoutNeck.<ext>` next to the scan.

use std::path::{Path, PathBuf};

use crate::config::StemRule;
use crate::error::{DeneckError, Result};

/// Inserted between stem and extension.
pub const OUTPUT_SUFFIX: &str = "_withoutNeck";

const COMPOUND_EXTENSIONS: [&str; 3] = [".nii.gz", ".hdr.gz", ".img.gz"];

/// Split a file name into `(stem, extension)` without the separating dot.
pub fn split_file_name(name: &str, rule: StemRule) -> Option<(&str, &str)> {
    let split = match rule {
        StemRule::FirstDot => name.split_once('.'),
        StemRule::LastDot => {
            let lower = name.to_ascii_lowercase();
            match COMPOUND_EXTENSIONS.iter().find(|ext| lower.ends_with(**ext)) {
                Some(ext) => {
                    let at = name.len() - ext.len();
                    Some((&name[..at], &name[at + 1..]))
                }
                None => name.rsplit_once('.'),
            }
        }
    };
    split.filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
}

/// Output path for a denecked scan, in the scan's own directory.
pub fn derive_output_path(scan: &Path, rule: StemRule) -> Result<PathBuf> {
    let invalid = || DeneckError::InvalidFileName(scan.to_path_buf());
    let name = scan.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let (stem, ext) = split_file_name(name, rule).ok_or_else(invalid)?;
    Ok(scan.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{ext}")))
}

/// Companion header path for an `.img` data file.
pub fn header_for_image(image: &Path) -> Option<PathBuf> {
    let name = image.file_name()?.to_str()?;
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".img.gz") {
        Some(image.with_file_name(format!("{}.hdr.gz", &name[..name.len() - 7])))
    } else if lower.ends_with(".img") {
        Some(image.with_extension("hdr"))
    } else {
        None
    }
}
