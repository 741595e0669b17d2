use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use mam::{print_report, SgTapeDevice};

/// Read the identification and usage counters stored in an LTO
/// cartridge's Medium Auxiliary Memory.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// sg node of the tape drive, e.g. /dev/sg1
    #[arg(short = 'f', long = "file", value_name = "DEVICE")]
    device: PathBuf,

    /// Log per-command diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let device = SgTapeDevice::open(args.device.as_path())
        .with_context(|| format!("unable to open {}", args.device.display()))?
        .verbose(args.verbose);

    let stdout = std::io::stdout();
    print_report(&device, &mut stdout.lock())?;
    Ok(())
}
