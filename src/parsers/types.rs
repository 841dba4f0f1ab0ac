use serde::Serialize;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// Sections recognized in an IEN report, in output order
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
)]
pub enum Section {
    #[strum(serialize = "Device Inventory list")]
    DeviceInventory,
    #[strum(serialize = "Device Data")]
    DeviceData,
    #[strum(serialize = "Intersection Signal Inventory list")]
    SignalInventory,
    #[strum(serialize = "Intersection Signal Data")]
    SignalData,
    #[strum(serialize = "Intersection Signal Planned Phases")]
    PlannedPhases,
    #[strum(serialize = "Intersection Signal Last Cycle Phases")]
    LastCyclePhases,
}

/// How the records of a section are laid out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Records carry a free-text description that may span extra fields
    Described { default_len: usize, kind: RecordKind },
    /// Records carry a bracketed phase token in the last field
    Phase { field_count: usize },
}

impl Section {
    /// Match a header field against the known section names
    pub fn from_header(field: &str) -> Option<Self> {
        field.parse().ok()
    }

    /// Literal section name as it appears in report headers
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn layout(&self) -> Layout {
        match self {
            Section::DeviceInventory => Layout::Described {
                default_len: 11,
                kind: RecordKind::DeviceInventory,
            },
            Section::DeviceData => Layout::Described {
                default_len: 10,
                kind: RecordKind::Plain,
            },
            Section::SignalInventory => Layout::Described {
                default_len: 9,
                kind: RecordKind::SignalInventory,
            },
            Section::SignalData => Layout::Described {
                default_len: 10,
                kind: RecordKind::Plain,
            },
            Section::PlannedPhases => Layout::Phase { field_count: 4 },
            Section::LastCyclePhases => Layout::Phase { field_count: 5 },
        }
    }

    /// Number of comma-separated fields in a normalized record of this section
    pub fn output_width(&self) -> usize {
        match self.layout() {
            // id0, id1, combined, date, time, [location,] description, tail
            Layout::Described { default_len, kind } => {
                let tail = default_len - kind.description_start() - 1;
                let location = usize::from(kind == RecordKind::SignalInventory);
                6 + location + tail
            }
            Layout::Phase { field_count } => field_count + 2,
        }
    }
}

/// Normalization mode of the field reconstructor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    DeviceInventory,
    SignalInventory,
    Plain,
}

impl RecordKind {
    /// Index of the first raw field of the description
    pub fn description_start(&self) -> usize {
        match self {
            RecordKind::SignalInventory => 4,
            RecordKind::DeviceInventory | RecordKind::Plain => 3,
        }
    }
}

/// Normalized records of one report file, one list per section
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub device_inventory: Vec<String>,
    pub device_data: Vec<String>,
    pub signal_inventory: Vec<String>,
    pub signal_data: Vec<String>,
    pub planned_phases: Vec<String>,
    pub last_cycle_phases: Vec<String>,
}

impl Report {
    pub fn records(&self, section: Section) -> &[String] {
        match section {
            Section::DeviceInventory => &self.device_inventory,
            Section::DeviceData => &self.device_data,
            Section::SignalInventory => &self.signal_inventory,
            Section::SignalData => &self.signal_data,
            Section::PlannedPhases => &self.planned_phases,
            Section::LastCyclePhases => &self.last_cycle_phases,
        }
    }

    pub(crate) fn records_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::DeviceInventory => &mut self.device_inventory,
            Section::DeviceData => &mut self.device_data,
            Section::SignalInventory => &mut self.signal_inventory,
            Section::SignalData => &mut self.signal_data,
            Section::PlannedPhases => &mut self.planned_phases,
            Section::LastCyclePhases => &mut self.last_cycle_phases,
        }
    }

    /// Sections paired with their records, in output order
    pub fn sections(&self) -> impl Iterator<Item = (Section, &[String])> {
        use strum::IntoEnumIterator;
        Section::iter().map(move |section| (section, self.records(section)))
    }

    /// Consume the report into its six lists, in output order
    pub fn into_lists(self) -> [Vec<String>; Section::COUNT] {
        [
            self.device_inventory,
            self.device_data,
            self.signal_inventory,
            self.signal_data,
            self.planned_phases,
            self.last_cycle_phases,
        ]
    }

    pub fn total_records(&self) -> usize {
        self.sections().map(|(_, records)| records.len()).sum()
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Why a single line could not be normalized
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The description spans more extra fields than can be reconstructed
    #[error("Unexpected field count {found}, expected {min} to {max}")]
    UnexpectedFieldCount { found: usize, min: usize, max: usize },

    /// A fixed-width record has the wrong number of fields
    #[error("Wrong field count {found}, expected {expected}")]
    FieldCount { found: usize, expected: usize },

    /// A line is too short to hold the fields a parser reads
    #[error("Too few fields: found {found}, need at least {required}")]
    TooFewFields { found: usize, required: usize },

    #[error("Malformed date-time token {0:?}")]
    DateTime(String),

    #[error("Missing bracketed phase in {0:?}")]
    Phase(String),

    #[error("Field {field} is not a valid number: {value:?}")]
    Number { field: usize, value: String },
}

/// Closed set of failure kinds a caller can branch on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    FileNotFound,
    Io,
    MalformedRecord,
    UnexpectedFieldCount,
    NumberFormat,
}

/// Errors that end a parse call
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Can not find the file: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} line {line}: {source}", .section.map_or("status log", |s| s.name()))]
    Record {
        section: Option<Section>,
        line: usize,
        #[source]
        source: RecordError,
    },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::FileNotFound(_) => ErrorKind::FileNotFound,
            ParseError::Io(_) => ErrorKind::Io,
            ParseError::Record { source, .. } => match source {
                RecordError::UnexpectedFieldCount { .. } => ErrorKind::UnexpectedFieldCount,
                RecordError::Number { .. } => ErrorKind::NumberFormat,
                RecordError::FieldCount { .. }
                | RecordError::TooFewFields { .. }
                | RecordError::DateTime(_)
                | RecordError::Phase(_) => ErrorKind::MalformedRecord,
            },
        }
    }
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for line-oriented IEN file parsers
pub trait Parseable {
    type Output;

    fn parse_reader<R: BufRead>(&self, reader: R) -> Result<Self::Output, ParseError>;

    fn parse(&self, contents: &str) -> Result<Self::Output, ParseError> {
        self.parse_reader(contents.as_bytes())
    }

    /// Parse a file on disk, failing with `FileNotFound` if it is absent
    fn parse_file(&self, path: impl AsRef<Path>) -> Result<Self::Output, ParseError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("Can not find the file: {:?}", path);
            return Err(ParseError::FileNotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }
}

// ============================================================================
// Field Helpers
// ============================================================================

/// Split a line on commas, dropping trailing empty fields like the feed's tooling does
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(',').collect();
    while fields.len() > 1 && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

pub(crate) fn strip_spaces(field: &str) -> String {
    field.replace(' ', "")
}

/// Date-time field broken into its output forms
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Timestamp {
    pub combined: String,
    pub date: String,
    pub time: String,
}

impl Timestamp {
    /// Split a `" <date> <time>"` token; both components must be present
    pub fn split(field: &str) -> Result<Self, RecordError> {
        let parts: Vec<&str> = field.split(' ').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [date, time] => Ok(Self {
                combined: field.replace(' ', "/"),
                date: date.to_string(),
                time: time.to_string(),
            }),
            _ => Err(RecordError::DateTime(field.to_string())),
        }
    }
}

/// Line reader that tracks the 1-based number of the last line read
///
/// Bytes that are not valid UTF-8 decode to U+FFFD instead of failing the
/// read, so a stray Latin-1 street name only affects its own field.
pub(crate) struct NumberedLines<R> {
    reader: R,
    buf: Vec<u8>,
    pub number: usize,
}

impl<R: BufRead> NumberedLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            number: 0,
        }
    }

    pub fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        self.number += 1;
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
