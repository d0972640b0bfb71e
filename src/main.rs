mod chart;
mod ingest;
mod metrics;
mod record;

use clap::Parser;
use std::path::{Path, PathBuf};

/// Render training/evaluation metric charts from a log whose lines embed
/// JSON snapshots (one record per line): up to four PNG line charts over
/// epochs, written next to the current working directory.
#[derive(Parser, Debug)]
#[command(name = "trainlog-charts", version, about)]
struct Cli {
    /// Log file to read (one embedded JSON record per line)
    #[arg(value_name = "LOG_FILE", default_value = "logs_e36.txt")]
    log_file: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .init();

    // Missing input is the one fatal condition: abort before any output.
    if !cli.log_file.exists() {
        eprintln!("error: {} not found", cli.log_file.display());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli.log_file, Path::new(".")) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// The whole pipeline: scan, sort, select columns, render each non-empty
/// group. Charts land in `out_dir`, named `<input_filename><suffix>`.
fn run(log_file: &Path, out_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records = ingest::scan_log(log_file)?;
    let table = record::RecordTable::from_records(records);
    tracing::info!(rows = table.len(), "loaded log records");

    let input_name = log_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| log_file.display().to_string());

    for group in metrics::GROUPS {
        let columns = metrics::present_columns(&table, group.candidates);
        if columns.is_empty() {
            tracing::debug!(stage = group.stage, "no columns present, skipping chart");
            continue;
        }
        let out = out_dir.join(format!("{input_name}{}", group.suffix));
        chart::render_chart(&table, &columns, group.stage, &out)?;
    }

    println!("All charts generated.");
    Ok(())
}
