use chrono::NaiveDateTime;

use crate::domain::AccountId;

/// The numeric value shown on a meter dial, in [0, 99999].
///
/// The only way to obtain one is decoding its textual form: exactly five ASCII
/// decimal digits, no sign, no decimal or thousands separator. Leading zeros
/// are valid in the text but not preserved on the integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MeterValue(u32);

impl MeterValue {
    /// Decodes the strict five-digit textual format, e.g. `"01002"` -> 1002.
    /// Returns `None` for any other shape; there are no partial results.
    pub fn parse(text: &str) -> Option<Self> {
        if text.len() == 5 && text.bytes().all(|b| b.is_ascii_digit()) {
            // Five ASCII digits always fit in a u32.
            text.parse::<u32>().ok().map(Self)
        } else {
            None
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// A single observation of a meter: which account, when, and the shown value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeterReading {
    account_id: AccountId,
    timestamp: NaiveDateTime,
    value: MeterValue,
}

impl MeterReading {
    pub fn new(account_id: AccountId, timestamp: NaiveDateTime, value: MeterValue) -> Self {
        Self {
            account_id,
            timestamp,
            value,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn value(&self) -> MeterValue {
        self.value
    }
}

/// A reading that survived parsing, still tagged with the row it came from so
/// diagnostics can point back into the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedReading {
    row_id: u64,
    reading: MeterReading,
}

impl ParsedReading {
    pub(crate) fn new(row_id: u64, reading: MeterReading) -> Self {
        Self { row_id, reading }
    }

    pub fn row_id(&self) -> u64 {
        self.row_id
    }

    pub fn reading(&self) -> &MeterReading {
        &self.reading
    }
}
