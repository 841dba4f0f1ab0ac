//! Parallel parsing of many IEN files.
//!
//! Every file is its own unit of work: it gets a fresh parse, its own file
//! handle, and its own result. One file failing never affects the others.

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::parsers::types::{ParseError, Parseable};
use crate::parsers::{ReportParser, StatusLog};

/// Result of parsing one file in a batch
#[derive(Debug)]
pub struct BatchEntry<T> {
    pub path: PathBuf,
    pub result: Result<T, ParseError>,
}

impl<T> BatchEntry<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-batch totals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub files: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of<T>(entries: &[BatchEntry<T>]) -> Self {
        let succeeded = entries.iter().filter(|e| e.is_ok()).count();
        Self {
            files: entries.len(),
            succeeded,
            failed: entries.len() - succeeded,
        }
    }
}

/// Parse every path with the given parser, preserving input order
pub fn parse_all<P, T>(parser: &P, paths: &[PathBuf]) -> Vec<BatchEntry<T>>
where
    P: Parseable<Output = T> + Sync,
    T: Send,
{
    let entries: Vec<BatchEntry<T>> = paths
        .par_iter()
        .map(|path| BatchEntry {
            path: path.clone(),
            result: parser.parse_file(path),
        })
        .collect();

    let summary = BatchSummary::of(&entries);
    tracing::info!(
        "Batch parsed {} files: {} ok, {} failed",
        summary.files,
        summary.succeeded,
        summary.failed
    );
    entries
}

/// Parse many section reports in parallel
pub fn parse_reports<P: AsRef<Path>>(paths: &[P]) -> Vec<BatchEntry<crate::parsers::Report>> {
    parse_all(&ReportParser, &to_owned_paths(paths))
}

/// Parse many status logs in parallel with a shared organization table
pub fn parse_status_logs<P: AsRef<Path>>(
    log: &StatusLog,
    paths: &[P],
) -> Vec<BatchEntry<Vec<crate::parsers::StatusRecord>>> {
    parse_all(log, &to_owned_paths(paths))
}

fn to_owned_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    paths.iter().map(|p| p.as_ref().to_path_buf()).collect()
}
