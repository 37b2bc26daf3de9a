//! Cutoff estimation from a landmark ("dot") volume.
//!
//! Landmark voxels are those equal to exactly 1. The cutoff is the mean of
//! their axial indices rounded half to even. The landmark is assumed to be a
//! single cluster; no outlier rejection is done.

use tracing::debug;

use crate::error::{DeneckError, Result};
use crate::volume::Volume;

const LANDMARK_VALUE: f64 = 1.0;

/// Axial statistics of the landmark voxels in a marker volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkSummary {
    /// Number of voxels equal to 1
    pub count: usize,
    /// Mean axial index
    pub mean_axial: f64,
    /// Lowest axial index
    pub min_axial: usize,
    /// Highest axial index
    pub max_axial: usize,
}

impl LandmarkSummary {
    /// Mean axial index rounded half to even.
    pub fn cutoff(&self) -> usize {
        self.mean_axial.round_ties_even() as usize
    }

    /// Axial spread covered by the landmark voxels.
    pub fn axial_span(&self) -> usize {
        self.max_axial - self.min_axial
    }
}

/// Collect axial statistics over every voxel equal to 1.
///
/// Fails with [`DeneckError::EmptyLandmark`] when no such voxel exists.
pub fn summarize_landmarks<T>(marker: &Volume<T>) -> Result<LandmarkSummary>
where
    T: Copy + Into<f64>,
{
    let mut count = 0usize;
    let mut sum = 0.0f64;
    let mut min_axial = usize::MAX;
    let mut max_axial = 0usize;

    for ((_, _, z), &value) in marker.data().indexed_iter() {
        let value: f64 = value.into();
        if value == LANDMARK_VALUE {
            count += 1;
            sum += z as f64;
            min_axial = min_axial.min(z);
            max_axial = max_axial.max(z);
        }
    }

    if count == 0 {
        return Err(DeneckError::EmptyLandmark);
    }

    let summary = LandmarkSummary {
        count,
        mean_axial: sum / count as f64,
        min_axial,
        max_axial,
    };
    debug!(?summary, "landmark voxels collected");
    Ok(summary)
}

/// Axial slice index below which the scan is zeroed.
pub fn estimate_cutoff<T>(marker: &Volume<T>) -> Result<usize>
where
    T: Copy + Into<f64>,
{
    summarize_landmarks(marker).map(|summary| summary.cutoff())
}
