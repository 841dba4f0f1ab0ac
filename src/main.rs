//! ienreader - command line front end for the IEN parsers
//!
//! Parses IEN section reports and connection status logs and prints the
//! normalized records, either as plain comma-joined lines or as JSON.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use ienreader::batch::{self, BatchEntry, BatchSummary};
use ienreader::parsers::{Report, StatusLog, StatusRecord};
use ienreader::settings::Settings;

#[derive(Parser)]
#[command(name = "ienreader", version, about = "Normalize IEN reports and status logs")]
struct Cli {
    /// Log at debug level (otherwise RUST_LOG, or info)
    #[arg(long, global = true)]
    debug: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse IEN section report files
    Report {
        /// Print JSON instead of comma-joined records
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Parse IEN connection status logs
    Status {
        /// Print JSON instead of comma-joined records
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Write the default settings file
    InitConfig,
}

#[derive(Serialize)]
struct JsonEntry<'a, T> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let failed = match cli.command {
        Command::InitConfig => {
            let path = match cli.config {
                Some(path) => {
                    Settings::default().save_to(&path)?;
                    path
                }
                None => Settings::default().save()?,
            };
            println!("Wrote default settings to {}", path.display());
            0
        }
        Command::Report { json, files } => {
            let entries = batch::parse_reports(&files);
            print_entries(&entries, json, print_report)?
        }
        Command::Status { json, files } => {
            let settings = match &cli.config {
                Some(path) => Settings::load_from(path)?,
                None => Settings::load(),
            };
            let log = StatusLog::new(settings.organizations);
            let entries = batch::parse_status_logs(&log, &files);
            print_entries(&entries, json, |records| print_status(records))?
        }
    };

    if failed > 0 {
        anyhow::bail!("{} input file(s) failed to parse", failed);
    }
    Ok(())
}

/// Print every entry of a batch, returning the number of failed files
fn print_entries<T: Serialize>(
    entries: &[BatchEntry<T>],
    json: bool,
    print: impl Fn(&T),
) -> anyhow::Result<usize> {
    if json {
        let out: Vec<JsonEntry<'_, T>> = entries
            .iter()
            .map(|entry| JsonEntry {
                path: &entry.path,
                records: entry.result.as_ref().ok(),
                error: entry.result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for entry in entries {
            match &entry.result {
                Ok(records) => {
                    if entries.len() > 1 {
                        println!("# {}", entry.path.display());
                    }
                    print(records);
                }
                Err(e) => eprintln!("{}: {}", entry.path.display(), e),
            }
        }
    }

    Ok(BatchSummary::of(entries).failed)
}

fn print_report(report: &Report) {
    for (section, records) in report.sections() {
        if records.is_empty() {
            continue;
        }
        println!("{}", section);
        for record in records {
            println!("{}", record);
        }
        println!();
    }
}

fn print_status(records: &[StatusRecord]) {
    for record in records {
        println!("{}", record);
    }
}
