//! Shared helpers for building lines, stores, and runs.

use chrono::{NaiveDate, NaiveDateTime};
use meter_ingest_rs::{
    Account, AccountId, CancelToken, Error, FrameErrors, IngestOptions, InMemoryAccountStore,
    ReadingLine, RunTotals, ValidationChain, ingest_lines,
};

/// A well-formed reading line for the given account.
pub fn line(row_id: u64, account_id: u32, timestamp: &str, value: &str) -> ReadingLine {
    ReadingLine {
        row_id,
        account_id: Some(AccountId::new(account_id)),
        timestamp_text: timestamp.to_string(),
        value_text: value.to_string(),
        frame_errors: FrameErrors::NONE,
    }
}

pub fn timestamp(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 4, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// A store holding empty accounts with the given ids.
pub fn store_with_accounts(ids: impl IntoIterator<Item = u32>) -> InMemoryAccountStore {
    let mut store = InMemoryAccountStore::new();
    for id in ids {
        store.insert_account(Account::new(AccountId::new(id)));
    }
    store
}

/// Runs the pipeline with the standard chain and no cancellation, collecting
/// every reported error.
pub fn run_with_options(
    lines: Vec<ReadingLine>,
    store: &mut InMemoryAccountStore,
    options: IngestOptions,
) -> (RunTotals, Vec<Error>) {
    let mut errors = Vec::new();
    let totals = ingest_lines(
        lines,
        store,
        &ValidationChain::standard(),
        options,
        &CancelToken::new(),
        |e| errors.push(e),
    );
    (totals, errors)
}
