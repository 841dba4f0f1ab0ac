//! IEN connection status log parser
//!
//! The status log opens with a two-line header block, followed by one
//! comma-separated line per feed request:
//!
//! ```text
//! date,time,_,request_time,_,process_time,organization,status,detector_count
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use super::types::{split_fields, NumberedLines, ParseError, Parseable, RecordError};

const HEADER_LINES: usize = 2;

const DATE: usize = 0;
const TIME: usize = 1;
const REQUEST_TIME: usize = 3;
const PROCESS_TIME: usize = 5;
const ORGANIZATION: usize = 6;
const STATUS: usize = 7;
const DETECTOR_COUNT: usize = 8;

/// One normalized status log line
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusRecord {
    pub date: String,
    pub time: String,
    pub organization: String,
    pub request_time: f64,
    pub process_time: f64,
    pub status: i32,
    pub detector_count: i32,
}

impl StatusRecord {
    /// Comma-joined form: date, time, org, request, process, status, detectors
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug formatting keeps a fractional digit on whole numbers (1.0, not 1).
        // That matches the feed tooling only within 1e-3..1e7; above it Debug
        // writes 10000000.0 where the tooling wrote 1.0E7.
        write!(
            f,
            "{},{},{},{:?},{:?},{},{}",
            self.date,
            self.time,
            self.organization,
            self.request_time,
            self.process_time,
            self.status,
            self.detector_count
        )
    }
}

/// Maps raw organization tokens to organization names
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgTable {
    /// Exact raw token to organization name
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,
    /// Name used when no alias matches
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([("Arcadia 5:1".to_string(), "Arcadia".to_string())])
}

fn default_fallback() -> String {
    "LACO".to_string()
}

impl Default for OrgTable {
    fn default() -> Self {
        Self {
            aliases: default_aliases(),
            fallback: default_fallback(),
        }
    }
}

impl OrgTable {
    pub fn resolve(&self, token: &str) -> &str {
        self.aliases.get(token).unwrap_or(&self.fallback)
    }
}

/// IEN status log parser
#[derive(Clone, Debug, Default)]
pub struct StatusLog {
    orgs: OrgTable,
}

impl StatusLog {
    pub fn new(orgs: OrgTable) -> Self {
        Self { orgs }
    }

    /// Normalize one data line of the status log
    pub fn parse_line(&self, line: &str) -> Result<StatusRecord, RecordError> {
        let fields = split_fields(line);
        if fields.len() <= DETECTOR_COUNT {
            return Err(RecordError::TooFewFields {
                found: fields.len(),
                required: DETECTOR_COUNT + 1,
            });
        }

        Ok(StatusRecord {
            date: fields[DATE].to_string(),
            time: fields[TIME].to_string(),
            organization: self.orgs.resolve(fields[ORGANIZATION]).to_string(),
            request_time: parse_number(&fields, REQUEST_TIME)?,
            process_time: parse_number(&fields, PROCESS_TIME)?,
            status: parse_number(&fields, STATUS)?,
            detector_count: parse_number(&fields, DETECTOR_COUNT)?,
        })
    }
}

fn parse_number<T: FromStr>(fields: &[&str], index: usize) -> Result<T, RecordError> {
    fields[index]
        .trim()
        .parse()
        .map_err(|_| RecordError::Number {
            field: index,
            value: fields[index].to_string(),
        })
}

impl Parseable for StatusLog {
    type Output = Vec<StatusRecord>;

    fn parse_reader<R: BufRead>(&self, reader: R) -> Result<Vec<StatusRecord>, ParseError> {
        let mut lines = NumberedLines::new(reader);
        let mut records = Vec::new();

        for _ in 0..HEADER_LINES {
            if lines.next_line()?.is_none() {
                return Ok(records);
            }
        }

        while let Some(line) = lines.next_line()? {
            if line.is_empty() {
                continue;
            }
            let record = self.parse_line(&line).map_err(|source| {
                tracing::warn!(
                    "Aborting status log parse at line {}: {}",
                    lines.number,
                    source
                );
                ParseError::Record {
                    section: None,
                    line: lines.number,
                    source,
                }
            })?;
            records.push(record);
        }

        tracing::info!("Parsed {} status records", records.len());
        Ok(records)
    }
}

/// Parse an IEN status log from disk using the default organization table
pub fn parse_status_log(path: impl AsRef<Path>) -> Result<Vec<StatusRecord>, ParseError> {
    StatusLog::default().parse_file(path)
}
