//! Run configuration
//!
//! Everything the pipeline needs is carried in [`DeneckConfig`] and passed
//! explicitly; the binaries build it from their parsed arguments.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::DeneckError;

/// Signed sample width of the denecked output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitWidth {
    /// `i8` samples
    #[default]
    Eight,
    /// `i16` samples
    Sixteen,
}

impl BitWidth {
    /// Number of bits per sample.
    pub fn bits(self) -> u32 {
        match self {
            BitWidth::Eight => 8,
            BitWidth::Sixteen => 16,
        }
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = DeneckError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(BitWidth::Eight),
            16 => Ok(BitWidth::Sixteen),
            other => Err(DeneckError::InvalidBitWidth(other.to_string())),
        }
    }
}

impl FromStr for BitWidth {
    type Err = DeneckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bits: u32 = trimmed
            .parse()
            .map_err(|_| DeneckError::InvalidBitWidth(trimmed.to_string()))?;
        BitWidth::try_from(bits)
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// How fractional intensities become integers.
///
/// Both modes saturate at the target type's range and map NaN to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Drop the fractional part (toward zero).
    #[default]
    Truncate,
    /// Round half to even before casting.
    Nearest,
}

impl Rounding {
    /// Apply the rounding rule without casting.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Truncate => value.trunc(),
            Rounding::Nearest => value.round_ties_even(),
        }
    }
}

/// How the `_withoutNeck` name splits the scan file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StemRule {
    /// Stem ends at the first `.` of the file name.
    #[default]
    FirstDot,
    /// Stem ends at the last extension (`.nii.gz` counts as one).
    LastDot,
}

/// Directory depth of a batch tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `root/leaf/files`
    Flat,
    /// `root/subject/leaf/files`
    Nested,
}

/// Parameters shared by single-pair and batch runs.
#[derive(Debug, Clone, Default)]
pub struct DeneckConfig {
    /// Output sample width
    pub bit_width: BitWidth,

    /// Float-to-integer rule for intensities
    pub rounding: Rounding,

    /// Stem rule for derived output names
    pub stem_rule: StemRule,

    /// Output file name written inside each leaf in batch mode.
    /// `None` derives `<stem>_withoutNeck.<ext>` from the scan.
    pub output_name: Option<PathBuf>,
}

impl DeneckConfig {
    /// Configuration with the given width and defaults elsewhere.
    pub fn with_bit_width(bit_width: BitWidth) -> Self {
        Self {
            bit_width,
            ..Self::default()
        }
    }
}
