//! Argument and logging plumbing shared by the `dnk` and `multi-dnk` binaries.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::config::{BitWidth, DeneckConfig, Rounding, StemRule};

/// Install the stdout subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Parse `8` or `16`.
pub fn parse_bit_width(s: &str) -> Result<BitWidth, String> {
    s.parse::<BitWidth>().map_err(|e| e.to_string())
}

/// `--rounding` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoundingArg {
    /// Drop the fractional part
    Truncate,
    /// Round half to even
    Nearest,
}

impl From<RoundingArg> for Rounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Truncate => Rounding::Truncate,
            RoundingArg::Nearest => Rounding::Nearest,
        }
    }
}

/// `--stem` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StemArg {
    /// Stem ends at the first dot of the file name
    FirstDot,
    /// Stem ends at the final extension
    LastDot,
}

impl From<StemArg> for StemRule {
    fn from(arg: StemArg) -> Self {
        match arg {
            StemArg::FirstDot => StemRule::FirstDot,
            StemArg::LastDot => StemRule::LastDot,
        }
    }
}

/// Options common to every entry point.
#[derive(Args, Debug, Clone)]
pub struct MaskArgs {
    /// Output file. In folder mode, the file name written inside each session
    /// folder. Defaults to `<stem>_withoutNeck.<ext>` next to the scan.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Output sample width (8 or 16).
    #[arg(short = 'b', long = "bit", default_value = "8", value_parser = parse_bit_width)]
    pub bit_width: BitWidth,

    /// Float-to-integer rule for intensities.
    #[arg(long, value_enum, default_value_t = RoundingArg::Truncate)]
    pub rounding: RoundingArg,

    /// How the derived output name splits the scan file name.
    #[arg(long, value_enum, default_value_t = StemArg::FirstDot)]
    pub stem: StemArg,
}

impl MaskArgs {
    /// Configuration for a batch run.
    pub fn to_config(&self) -> DeneckConfig {
        DeneckConfig {
            bit_width: self.bit_width,
            rounding: self.rounding.into(),
            stem_rule: self.stem.into(),
            output_name: self.output.clone(),
        }
    }
}
