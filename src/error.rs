//! Error taxonomy shared by the estimator, masker, pairer and I/O layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while denecking a volume or discovering batch pairs.
#[derive(Error, Debug)]
pub enum DeneckError {
    /// The marker volume contains no voxel equal to exactly 1.
    #[error("marker volume contains no landmark voxel (value == 1)")]
    EmptyLandmark,

    /// Bit width outside the supported set, as given by the caller.
    #[error("invalid bit width {0:?}, options are 8 or 16")]
    InvalidBitWidth(String),

    /// Requested cutoff lies past the axial extent of the scan.
    #[error("cutoff {cutoff} out of range for axial depth {depth}")]
    CutoffOutOfRange {
        /// Requested cutoff slice
        cutoff: usize,
        /// Axial extent of the scan
        depth: usize,
    },

    /// More than one file with the same role in a leaf directory.
    #[error("more than one file ending with {suffix} in {}; rename or remove so only one remains", dir.display())]
    DuplicateFile {
        /// Offending leaf directory
        dir: PathBuf,
        /// Suffix that matched twice
        suffix: &'static str,
    },

    /// A leaf directory is missing its scan or its marker.
    #[error("missing files in {}", dir.display())]
    MissingFile {
        /// Incomplete leaf directory
        dir: PathBuf,
    },

    /// Volume is not a single 3D image.
    #[error("expected a 3D volume in {}, got shape {shape:?}", path.display())]
    NotThreeDimensional {
        /// File the volume came from
        path: PathBuf,
        /// Shape as decoded
        shape: Vec<usize>,
    },

    /// Output name cannot be derived from the scan name.
    #[error("cannot derive an output name from {}", .0.display())]
    InvalidFileName(PathBuf),

    /// Header is plain Analyze 7.5, which the codec does not decode.
    #[error("{} is an Analyze 7.5 header without NIfTI-1 magic; convert it to NIfTI-1 first", path.display())]
    AnalyzeHeader {
        /// Header file
        path: PathBuf,
    },

    /// Codec failure while reading or writing a volume.
    #[error("nifti error on {}: {source}", path.display())]
    Nifti {
        /// File being read or written
        path: PathBuf,
        /// Underlying codec error
        #[source]
        source: nifti::error::NiftiError,
    },

    /// Filesystem failure while walking a batch tree.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// Path being listed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, DeneckError>;
