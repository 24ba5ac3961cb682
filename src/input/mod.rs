//! Module defining the framing edge: turns raw CSV rows into tagged
//! `ReadingLine`s for the pipeline, and loads account seed files.

use std::fmt;
use std::io::Read;

use serde::Deserialize;

use crate::domain::{Account, AccountId};


/// Bitset of problems detected while framing a row, before any parsing runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameErrors(u8);

impl FrameErrors {
    pub const NONE: Self = Self(0);
    /// The row had fewer columns than the reading layout requires.
    pub const INCOMPLETE_DATA: Self = Self(1);
    /// The account-id column was present but not a number.
    pub const INVALID_ACCOUNT_ID: Self = Self(1 << 1);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for FrameErrors {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for FrameErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut sep = "";
        if self.contains(Self::INCOMPLETE_DATA) {
            write!(f, "{sep}incomplete data")?;
            sep = ", ";
        }
        if self.contains(Self::INVALID_ACCOUNT_ID) {
            write!(f, "{sep}invalid account id")?;
        }
        Ok(())
    }
}

/// One raw row of a reading upload, as produced by the framing edge.
/// Immutable once framed; the parser consumes it exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingLine {
    /// 1-based position of the row in the upload, for diagnostics.
    pub row_id: u64,
    pub account_id: Option<AccountId>,
    pub timestamp_text: String,
    pub value_text: String,
    pub frame_errors: FrameErrors,
}

/// Frames CSV rows into `ReadingLine`s. Expected columns (header row first):
/// `AccountId,MeterReadingDateTime,MeterReadValue`.
///
/// Framing never drops a row: a row the CSV layer cannot decode still occupies
/// a position in the upload, so it is emitted carrying a framing error and
/// ends up in the failure count downstream.
pub fn read_lines(reader: impl Read) -> impl Iterator<Item = ReadingLine> {
    let csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    csv_reader
        .into_records()
        .enumerate()
        .map(|(idx, result)| {
            let row_id = idx as u64 + 1;
            match result {
                Ok(record) => frame_record(row_id, &record),
                Err(_) => incomplete_line(row_id),
            }
        })
}

fn frame_record(row_id: u64, record: &csv::StringRecord) -> ReadingLine {
    if record.len() < 3 {
        return incomplete_line(row_id);
    }

    let (account_id, frame_errors) = match record[0].parse::<u32>() {
        Ok(id) => (Some(AccountId::new(id)), FrameErrors::NONE),
        Err(_) => (None, FrameErrors::INVALID_ACCOUNT_ID),
    };

    ReadingLine {
        row_id,
        account_id,
        timestamp_text: record[1].to_string(),
        value_text: record[2].to_string(),
        frame_errors,
    }
}

fn incomplete_line(row_id: u64) -> ReadingLine {
    ReadingLine {
        row_id,
        account_id: None,
        timestamp_text: String::new(),
        value_text: String::new(),
        frame_errors: FrameErrors::INCOMPLETE_DATA,
    }
}

/// Seed record for pre-populating the account store, one per CSV row.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct AccountSeed {
    #[serde(rename = "AccountId")]
    pub account_id: u32,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
}

impl From<AccountSeed> for Account {
    fn from(seed: AccountSeed) -> Self {
        Account::named(AccountId::new(seed.account_id), seed.first_name, seed.last_name)
    }
}

/// Reads an account seed file with headers `AccountId,FirstName,LastName`.
pub fn read_accounts(reader: impl Read) -> Result<Vec<AccountSeed>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize::<AccountSeed>()
        .collect()
}
