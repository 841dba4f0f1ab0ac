//! Field reconstruction for description-bearing IEN records
//!
//! Description columns are free text and the feed does not quote them, so a
//! description containing commas arrives split across up to three raw fields.
//! The reconstructor works out how many extra fields a line carries by
//! comparing its width with the section's default width, glues the pieces back
//! together with `&`, and re-emits the record in its canonical shape:
//!
//! ```text
//! id0,id1,combined-date-time,date,time,[location,]description,tail...
//! ```

use super::types::{split_fields, strip_spaces, RecordError, RecordKind, Timestamp};

/// Most extra raw fields a split description can produce
pub const MAX_EXTRA_FIELDS: usize = 2;

/// Token emitted for a field that held a single blank
pub const MISSING_VALUE: &str = "NA";

/// Joins the pieces of a description that was split on commas
const DESCRIPTION_JOINER: &str = "&";

/// Separators folded into the joiner, applied in order
const DESCRIPTION_SEPARATORS: [&str; 4] = [" / ", "/", " @ ", "@"];

/// Rebuild one raw data line into a normalized record
pub fn reconstruct(
    line: &str,
    default_len: usize,
    kind: RecordKind,
) -> Result<String, RecordError> {
    let fields = split_fields(line);
    let start = kind.description_start();
    // The description must fit inside the default width
    if default_len <= start {
        return Err(RecordError::TooFewFields {
            found: fields.len(),
            required: start + 1,
        });
    }

    let max = default_len + MAX_EXTRA_FIELDS;
    if fields.len() < default_len || fields.len() > max {
        return Err(RecordError::UnexpectedFieldCount {
            found: fields.len(),
            min: default_len,
            max,
        });
    }

    let timestamp = Timestamp::split(fields[2])?;
    let extra = fields.len() - default_len;
    let end = start + extra + 1;
    let description = normalize_description(&fields[start..end].join(DESCRIPTION_JOINER), kind);

    let mut out = vec![
        strip_spaces(fields[0]),
        strip_spaces(fields[1]),
        timestamp.combined,
        timestamp.date,
        timestamp.time,
    ];
    if kind == RecordKind::SignalInventory {
        out.push(fields[3].replace(' ', "/"));
    }
    out.push(description);
    out.extend(fields[end..].iter().map(|field| normalize_tail(field)));

    Ok(out.join(","))
}

fn normalize_description(raw: &str, kind: RecordKind) -> String {
    match kind {
        RecordKind::DeviceInventory => fold_separators(raw).replace(' ', "/"),
        RecordKind::SignalInventory => strip_spaces(&fold_separators(raw)),
        RecordKind::Plain => strip_spaces(raw),
    }
}

fn fold_separators(raw: &str) -> String {
    DESCRIPTION_SEPARATORS
        .iter()
        .fold(raw.to_string(), |acc, sep| acc.replace(sep, DESCRIPTION_JOINER))
}

/// Normalize a field that follows the description
pub(crate) fn normalize_tail(field: &str) -> String {
    if field == " " {
        MISSING_VALUE.to_string()
    } else {
        strip_spaces(field)
    }
}
