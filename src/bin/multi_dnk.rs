use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use deneck::cli::{init_tracing, MaskArgs};
use deneck::{run_batch, Layout};
use tracing::error;

/// Deneck every session of every subject under a root folder.
///
/// Expects `<path>/<subject>/<session>/` folders, each holding one file
/// ending in `_T1.img` and one ending in `_T1_dnk.img`.
#[derive(Parser, Debug)]
#[command(
    name = "multi-dnk",
    about = "Zeros all voxels below the dot for all compatible session folders",
    after_help = "Example:\n\n  multi-dnk JADNI -b 16\n"
)]
struct Cli {
    /// Root folder containing subject folders.
    path: PathBuf,

    #[command(flatten)]
    mask: MaskArgs,
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.mask.to_config();
    let report = run_batch(&cli.path, Layout::Nested, &config)
        .with_context(|| format!("batch run over {} aborted", cli.path.display()))?;

    for failure in &report.failed {
        error!("failed: {}: {}", failure.pair.scan.display(), failure.error);
    }
    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
