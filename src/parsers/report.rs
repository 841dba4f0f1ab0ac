//! IEN section report parser
//!
//! A report is a plain-text file holding up to six named sections. Each
//! section starts with a line whose first comma-separated field is the section
//! name, followed by a column-title line and then data lines up to the next
//! empty line (or end of file). Lines outside a section are ignored.

use regex::Regex;
use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

use super::reconstruct::reconstruct;
use super::types::{
    split_fields, strip_spaces, Layout, NumberedLines, ParseError, Parseable, RecordError,
    Report, Section, Timestamp,
};

/// Bracketed signal phase, e.g. `[2]`
static PHASE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?<phase>[^\[\]]+)\]").expect("Failed to compile phase regex")
});

/// IEN section report parser
pub struct ReportParser;

impl Parseable for ReportParser {
    type Output = Report;

    fn parse_reader<R: BufRead>(&self, reader: R) -> Result<Report, ParseError> {
        let mut lines = NumberedLines::new(reader);
        let mut report = Report::default();

        while let Some(line) = lines.next_line()? {
            let header = line.split(',').next().unwrap_or_default();
            let Some(section) = Section::from_header(header) else {
                continue;
            };
            tracing::debug!("Found section {:?} at line {}", section.name(), lines.number);

            // Column titles
            if lines.next_line()?.is_none() {
                break;
            }

            while let Some(line) = lines.next_line()? {
                if line.is_empty() {
                    break;
                }
                let record = normalize_record(section, &line).map_err(|source| {
                    tracing::warn!(
                        "Aborting report parse at line {} ({}): {}",
                        lines.number,
                        section,
                        source
                    );
                    ParseError::Record {
                        section: Some(section),
                        line: lines.number,
                        source,
                    }
                })?;
                report.records_mut(section).push(record);
            }
        }

        for (section, records) in report.sections() {
            tracing::debug!("{}: {} records", section, records.len());
        }
        tracing::info!("Parsed {} report records", report.total_records());

        Ok(report)
    }
}

/// Parse an IEN section report from disk
pub fn parse_report(path: impl AsRef<Path>) -> Result<Report, ParseError> {
    ReportParser.parse_file(path)
}

/// Normalize one data line of the given section
pub fn normalize_record(section: Section, line: &str) -> Result<String, RecordError> {
    match section.layout() {
        Layout::Described { default_len, kind } => reconstruct(line, default_len, kind),
        Layout::Phase { field_count } => normalize_phase_record(line, field_count),
    }
}

/// Fixed-width phase record: ids, date-time, optional passthrough fields, phase last
fn normalize_phase_record(line: &str, field_count: usize) -> Result<String, RecordError> {
    let fields = split_fields(line);
    if fields.len() != field_count {
        return Err(RecordError::FieldCount {
            found: fields.len(),
            expected: field_count,
        });
    }

    let timestamp = Timestamp::split(fields[2])?;
    let phase = extract_phase(&strip_spaces(fields[field_count - 1]))?;

    let mut out = vec![
        strip_spaces(fields[0]),
        strip_spaces(fields[1]),
        timestamp.combined,
        timestamp.date,
        timestamp.time,
    ];
    out.extend(fields[3..field_count - 1].iter().map(|f| strip_spaces(f)));
    out.push(phase);

    Ok(out.join(","))
}

/// Pull the bare value out of a bracketed phase token
pub fn extract_phase(token: &str) -> Result<String, RecordError> {
    PHASE_TOKEN
        .captures(token)
        .map(|caps| caps["phase"].to_string())
        .ok_or_else(|| RecordError::Phase(token.to_string()))
}
