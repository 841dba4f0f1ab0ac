pub mod reconstruct;
pub mod report;
pub mod status;
pub mod types;

pub use reconstruct::reconstruct;
pub use report::{parse_report, ReportParser};
pub use status::{parse_status_log, OrgTable, StatusLog, StatusRecord};
pub use types::{ErrorKind, ParseError, Parseable, RecordError, RecordKind, Report, Section};
