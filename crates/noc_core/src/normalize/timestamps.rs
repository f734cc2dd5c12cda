use time::format_description::well_known::Rfc3339;
use time::{format_description, Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::domain::NOT_RECORDED;

/// Outcome of reading one timestamp field of an incident record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// Blank, absent, or the "-" sentinel.
    Missing,
    Parsed(PrimitiveDateTime),
    /// Something was entered but it is not a timestamp we accept. The raw text is kept.
    Unparseable(String),
}

impl ParsedTimestamp {
    pub fn value(&self) -> Option<PrimitiveDateTime> {
        match self {
            ParsedTimestamp::Parsed(dt) => Some(*dt),
            _ => None,
        }
    }
}

// Deterministic allowlist only (no fuzzy parsing). Browser `datetime-local` inputs produce the
// minute-precision form; exports and hand edits produce the others.
const NAIVE_FORMATS: [&str; 6] = [
    "[year]-[month]-[day]T[hour]:[minute]",
    "[year]-[month]-[day]T[hour]:[minute]:[second]",
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
    "[year]-[month]-[day] [hour]:[minute]",
    "[year]-[month]-[day] [hour]:[minute]:[second]",
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]",
];

const DATE_FORMAT: &str = "[year]-[month]-[day]";
const DISPLAY_FORMAT: &str = "[year]-[month]-[day]T[hour]:[minute]";

fn parse_naive(raw: &str, fmt: &str) -> Option<PrimitiveDateTime> {
    let items = format_description::parse(fmt).ok()?;
    PrimitiveDateTime::parse(raw, &items).ok()
}

/// Read a naive local timestamp.
///
/// Contract:
/// - `None`, blank input and `"-"` are [`ParsedTimestamp::Missing`].
/// - Allowlisted naive forms are taken as-is.
/// - RFC3339 input is converted to its UTC wall-clock time; offsets are not otherwise modelled.
/// - Anything else is [`ParsedTimestamp::Unparseable`].
pub fn parse_timestamp(raw: Option<&str>) -> ParsedTimestamp {
    let Some(raw) = raw else {
        return ParsedTimestamp::Missing;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NOT_RECORDED {
        return ParsedTimestamp::Missing;
    }

    for fmt in NAIVE_FORMATS {
        if let Some(dt) = parse_naive(trimmed, fmt) {
            return ParsedTimestamp::Parsed(dt);
        }
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        let utc = dt.to_offset(UtcOffset::UTC);
        return ParsedTimestamp::Parsed(PrimitiveDateTime::new(utc.date(), utc.time()));
    }

    ParsedTimestamp::Unparseable(trimmed.to_string())
}

/// Parse a calendar date (`YYYY-MM-DD`), as used for report window bounds.
pub fn parse_date(raw: &str) -> Option<Date> {
    let items = format_description::parse(DATE_FORMAT).ok()?;
    Date::parse(raw.trim(), &items).ok()
}

/// Parse either a full timestamp or a bare date (taken as midnight).
pub fn parse_instant(raw: &str) -> Option<PrimitiveDateTime> {
    if let Some(dt) = parse_timestamp(Some(raw)).value() {
        return Some(dt);
    }
    parse_date(raw).map(|d| d.midnight())
}

/// Minute-precision rendering matching the incident log's input format.
pub fn format_timestamp(dt: PrimitiveDateTime) -> String {
    format_description::parse(DISPLAY_FORMAT)
        .ok()
        .and_then(|items| dt.format(&items).ok())
        .unwrap_or_else(|| dt.to_string())
}
