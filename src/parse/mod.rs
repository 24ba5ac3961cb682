//! Module converting framed reading lines into validated domain readings.

use chrono::NaiveDateTime;

use crate::domain::{MeterReading, MeterValue, ParsedReading};
use crate::input::{FrameErrors, ReadingLine};


/// Formats tried for the regional (UK day/month/year) interpretation.
const UK_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];

/// Locale-invariant fallbacks, tried only when no UK format matches.
const INVARIANT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Why a raw line could not become a `ParsedReading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    /// The framing edge already flagged the row; nothing was parsed.
    #[error("upstream framing error: {0}")]
    Frame(FrameErrors),

    /// No account id on the line.
    #[error("missing account id")]
    MissingAccountId,

    /// Timestamp text empty, matching no known format, or carrying trailing
    /// components beyond what any format expects.
    #[error("unparseable reading timestamp")]
    Timestamp,

    /// Value text rejected by the five-digit codec.
    #[error("reading value is not exactly five digits")]
    Value,
}

/// Parses one framed line into a reading, or classifies why it cannot be one.
/// Pure: no I/O, no logging; every line yields exactly one of the two outcomes.
pub fn try_parse(line: &ReadingLine) -> Result<ParsedReading, ParseFailure> {
    if !line.frame_errors.is_empty() {
        return Err(ParseFailure::Frame(line.frame_errors));
    }

    let Some(account_id) = line.account_id else {
        return Err(ParseFailure::MissingAccountId);
    };

    let timestamp = parse_timestamp(&line.timestamp_text).ok_or(ParseFailure::Timestamp)?;
    let value = MeterValue::parse(&line.value_text).ok_or(ParseFailure::Value)?;

    Ok(ParsedReading::new(
        line.row_id,
        MeterReading::new(account_id, timestamp, value),
    ))
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    // `parse_from_str` rejects trailing input, so an over-long timestamp like
    // "22/04/2019 09:25:26:26:26" fails every format instead of truncating.
    UK_FORMATS
        .iter()
        .chain(INVARIANT_FORMATS)
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}
