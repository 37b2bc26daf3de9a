//! Volume masking
//!
//! Casts a scan to the requested signed width and zeroes every axial slice
//! strictly below the cutoff. Shape, affine and reference header are carried
//! over unchanged.

use ndarray::{s, Array3};
use tracing::debug;

use crate::config::{BitWidth, Rounding};
use crate::error::{DeneckError, Result};
use crate::volume::{Affine, Volume};

/// Signed integer sample type the masker can emit.
pub trait Sample: Copy + Default + PartialEq + Into<f64> + std::fmt::Debug {
    /// Width tag for this sample type.
    const WIDTH: BitWidth;

    /// Convert an intensity after rounding.
    ///
    /// Out-of-range values saturate and NaN becomes 0.
    fn from_intensity(value: f64, rounding: Rounding) -> Self;
}

impl Sample for i8 {
    const WIDTH: BitWidth = BitWidth::Eight;

    fn from_intensity(value: f64, rounding: Rounding) -> Self {
        rounding.apply(value) as i8
    }
}

impl Sample for i16 {
    const WIDTH: BitWidth = BitWidth::Sixteen;

    fn from_intensity(value: f64, rounding: Rounding) -> Self {
        rounding.apply(value) as i16
    }
}

/// Denecked volume at its declared output width.
#[derive(Debug, Clone)]
pub enum MaskedVolume {
    /// 8-bit output
    Int8(Volume<i8>),
    /// 16-bit output
    Int16(Volume<i16>),
}

impl MaskedVolume {
    /// Declared output width.
    pub fn bit_width(&self) -> BitWidth {
        match self {
            MaskedVolume::Int8(_) => BitWidth::Eight,
            MaskedVolume::Int16(_) => BitWidth::Sixteen,
        }
    }

    /// `(nx, ny, nz)`
    pub fn dims(&self) -> (usize, usize, usize) {
        match self {
            MaskedVolume::Int8(v) => v.dims(),
            MaskedVolume::Int16(v) => v.dims(),
        }
    }

    /// Voxel-to-world transform.
    pub fn affine(&self) -> &Affine {
        match self {
            MaskedVolume::Int8(v) => v.affine(),
            MaskedVolume::Int16(v) => v.affine(),
        }
    }

    /// Samples widened to `f64`.
    pub fn to_f64(&self) -> Volume<f64> {
        match self {
            MaskedVolume::Int8(v) => v.map(|&s| s.into()),
            MaskedVolume::Int16(v) => v.map(|&s| s.into()),
        }
    }
}

/// Cast `scan` to `bit_width` and zero every slice with axial index below `cutoff`.
///
/// `cutoff` may equal the axial depth (everything zeroed); anything larger
/// fails with [`DeneckError::CutoffOutOfRange`].
pub fn apply_mask<T>(
    scan: &Volume<T>,
    cutoff: usize,
    bit_width: BitWidth,
    rounding: Rounding,
) -> Result<MaskedVolume>
where
    T: Copy + Into<f64>,
{
    let masked = match bit_width {
        BitWidth::Eight => MaskedVolume::Int8(mask_as::<T, i8>(scan, cutoff, rounding)?),
        BitWidth::Sixteen => MaskedVolume::Int16(mask_as::<T, i16>(scan, cutoff, rounding)?),
    };
    Ok(masked)
}

/// Typed form of [`apply_mask`].
pub fn mask_as<T, S>(scan: &Volume<T>, cutoff: usize, rounding: Rounding) -> Result<Volume<S>>
where
    T: Copy + Into<f64>,
    S: Sample,
{
    let depth = scan.depth();
    if cutoff > depth {
        return Err(DeneckError::CutoffOutOfRange { cutoff, depth });
    }

    let mut out = scan.map(|&v| S::from_intensity(v.into(), rounding));
    zero_below(out.data_mut(), cutoff);
    debug!(cutoff, depth, width = %S::WIDTH, "masked axial slices");
    Ok(out)
}

fn zero_below<S: Sample>(data: &mut Array3<S>, cutoff: usize) {
    data.slice_mut(s![.., .., ..cutoff]).fill(S::default());
}
