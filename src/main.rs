use anyhow::{Context, Result};
use bindertrack::{ProcessTable, display};
use clap::Parser;
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bindertrack")]
#[command(about = "Annotate binder transaction logs with process names from a ps snapshot")]
#[command(version)]
struct Cli {
    /// Captured binder transaction log
    #[arg(value_name = "TRANSACTION_LOG")]
    transaction_log: PathBuf,

    /// Process snapshot taken alongside the log (`ps -t -P -x` output)
    #[arg(value_name = "PS_SNAPSHOT")]
    ps_snapshot: PathBuf,
}

fn main() -> Result<()> {
    env_logger::builder()
        .parse_env(env_logger::Env::new().filter_or("BINDERTRACK_LOG", "info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    annotate_files(&cli.transaction_log, &cli.ps_snapshot)
}

/// Resolve the log at `log_path` against the snapshot at `snapshot_path`
/// and print the annotated table to stdout.
fn annotate_files(log_path: &Path, snapshot_path: &Path) -> Result<()> {
    let log = fs::read_to_string(log_path)
        .with_context(|| format!("Failed to read transaction log {}", log_path.display()))?;
    let table = ProcessTable::load(snapshot_path)?;
    debug!("annotating {}", log_path.display());

    let stdout = io::stdout();
    display::annotate_log(&log, &table, stdout.lock())
}
