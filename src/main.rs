use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use deneck::cli::{init_tracing, MaskArgs};
use deneck::{process_pair, run_batch, BatchReport, Layout};
use tracing::{error, info};

const USAGE_HINT: &str =
    "Example 1:\n\n  dnk -t JADNI0013/JADNI0013_01/JADNI0013_01_T1.img \\\n      -d JADNI0013/JADNI0013_01/JADNI0013_01_T1_dnk.img -b 16\n\nExample 2:\n\n  dnk -f JADNI0013\n";

#[derive(Parser, Debug)]
#[command(
    name = "dnk",
    about = "Zeros all voxels in the scan below the dot provided in the marker",
    after_help = USAGE_HINT
)]
struct Cli {
    /// Scan with the full head (e.g. `*_T1.img`).
    #[arg(short = 't', long = "image1", requires = "marker")]
    scan: Option<PathBuf>,

    /// Marker with the single landmark dot (e.g. `*_T1_dnk.img`).
    #[arg(short = 'd', long = "image2", requires = "scan")]
    marker: Option<PathBuf>,

    /// Folder whose subfolders each hold a `_T1.img` and a `_T1_dnk.img`.
    #[arg(short = 'f', long, conflicts_with_all = ["scan", "marker"])]
    folder: Option<PathBuf>,

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

    match (cli.scan, cli.marker, cli.folder) {
        (Some(scan), Some(marker), None) => {
            let report = process_pair(&scan, &marker, cli.mask.output.as_deref(), &config)
                .with_context(|| format!("failed to deneck {}", scan.display()))?;
            info!("Done! cutoff {} written to {}", report.cutoff, report.output.display());
            Ok(ExitCode::SUCCESS)
        }
        (None, None, Some(folder)) => {
            let report = run_batch(&folder, Layout::Flat, &config)
                .with_context(|| format!("batch run over {} aborted", folder.display()))?;
            Ok(batch_exit(&report))
        }
        _ => bail!(
            "missing input: give either the scan (-t) and marker (-d), or a folder (-f)"
        ),
    }
}

fn batch_exit(report: &BatchReport) -> ExitCode {
    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        for failure in &report.failed {
            error!("failed: {}: {}", failure.pair.scan.display(), failure.error);
        }
        ExitCode::FAILURE
    }
}
