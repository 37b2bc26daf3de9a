//! # deneck: neck removal for brain volumes
//!
//! Zeroes every axial slice of a scan below a landmark "dot" drawn in a
//! companion marker volume.
//!
//! ## Pipeline
//!
//! 1. **Cutoff estimation**: mean axial index of the voxels equal to 1,
//!    rounded half to even
//! 2. **Masking**: cast to `i8`/`i16`, zero slices `z < cutoff`, keep the affine
//! 3. **Batch pairing**: find `*_T1.img` / `*_T1_dnk.img` pairs per leaf
//!    directory of a subject tree
//!
//! ## Usage Example
//!
//! ```ignore
//! use deneck::{process_pair, DeneckConfig, BitWidth};
//!
//! let config = DeneckConfig::with_bit_width(BitWidth::Sixteen);
//! let report = process_pair(scan, marker, None, &config)?;
//! println!("cutoff {} -> {}", report.cutoff, report.output.display());
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod batch;      // Scan/marker discovery
pub mod cli;        // Shared binary plumbing
pub mod config;     // Run parameters
pub mod cutoff;     // Landmark to cutoff
pub mod error;      // Error taxonomy
pub mod io;         // NIfTI read/write
pub mod mask;       // Axial masking
pub mod naming;     // Output file names
pub mod pipeline;   // Per-pair and batch drivers
pub mod volume;     // Volume model

// Re-exports for convenience
pub use batch::{discover_pairs, Discovery, MissingFiles, Pairing, MARKER_SUFFIX, SCAN_SUFFIX};
pub use config::{BitWidth, DeneckConfig, Layout, Rounding, StemRule};
pub use cutoff::{estimate_cutoff, summarize_landmarks, LandmarkSummary};
pub use error::{DeneckError, Result};
pub use io::{load_volume, save_masked};
pub use mask::{apply_mask, MaskedVolume, Sample};
pub use naming::{derive_output_path, OUTPUT_SUFFIX};
pub use pipeline::{process_pair, run_batch, BatchReport, PairFailure, PairReport};
pub use volume::{Affine, Volume, AXIAL_AXIS};
