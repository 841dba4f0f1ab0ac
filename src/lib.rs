//! ienreader - Parser and normalizer for IEN traffic-signal and detector reports
//!
//! This library turns the multi-section IEN report files and the IEN
//! connection status logs into flat, comma-joined records ready for storage.
//!
//! ## Module Structure
//!
//! - [`parsers`] - IEN file parsers
//!   - `report` - Section report parser (six named sections)
//!   - `reconstruct` - Description field reconstruction
//!   - `status` - Connection status log parser
//!   - `types` - Sections, reports, errors and the `Parseable` trait
//! - [`batch`] - Parallel parsing of many files
//! - [`settings`] - User settings persistence

pub mod batch;
pub mod parsers;
pub mod settings;
