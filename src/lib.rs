mod chunk;
mod domain;
mod engine;
mod error;
mod input;
mod parse;
mod store;
mod telemetry;
mod validate;

pub use domain::{Account, AccountId, MeterReading, MeterValue, ParsedReading};
pub use engine::{CancelToken, IngestOptions, RunTotals, try_add_reading};
pub use error::Error;
pub use input::{AccountSeed, FrameErrors, ReadingLine, read_accounts, read_lines};
pub use parse::{ParseFailure, try_parse};
pub use store::{AccountStore, InMemoryAccountStore};
pub use telemetry::setup_logging;
pub use validate::{MostRecentValidator, ReadingValidator, ValidationChain, Verdict};

/// Ingests a CSV meter-reading upload against `store` and returns the run
/// totals once the whole input is drained.
///
/// This is the convenience entry point: CSV framing, the standard validation
/// chain (most-recent-wins), default tunables, and no cancellation. Use
/// [`ingest_lines`] to control any of those.
///
/// # Error handling
///
/// A malformed or rejected row never aborts the run. Every row-level failure
/// (and any storage failure, which fails its whole batch) is reported to the
/// caller-supplied `on_error` callback, counted, and processing continues,
/// so `successes + failures` always equals the number of input rows.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
/// use meter_ingest_rs::{InMemoryAccountStore, ingest, read_accounts};
///
/// let seeds = read_accounts(File::open("accounts.csv").unwrap()).unwrap();
/// let mut store = InMemoryAccountStore::seeded(seeds);
///
/// let readings = File::open("readings.csv").unwrap();
/// let totals = ingest(readings, &mut store, |e| eprintln!("rejected: {e}"));
/// println!("{totals}");
/// ```
pub fn ingest<S: AccountStore>(
    reader: impl std::io::Read + Send,
    store: &mut S,
    on_error: impl FnMut(Error) + Send,
) -> RunTotals {
    ingest_lines(
        input::read_lines(reader),
        store,
        &ValidationChain::standard(),
        IngestOptions::default(),
        &CancelToken::new(),
        on_error,
    )
}

/// Ingests an already-framed sequence of reading lines.
///
/// Runs the two-stage pipeline: a spawned thread parses lines and groups them
/// into batches, the calling thread resolves accounts, validates, and
/// persists, with a bounded queue between the two providing backpressure.
/// After cancellation the returned totals cover only fully processed lines
/// and are a lower bound.
pub fn ingest_lines<S, L>(
    lines: L,
    store: &mut S,
    chain: &ValidationChain,
    options: IngestOptions,
    cancel: &CancelToken,
    on_error: impl FnMut(Error) + Send,
) -> RunTotals
where
    S: AccountStore,
    L: IntoIterator<Item = ReadingLine>,
    L::IntoIter: Send,
{
    engine::run_pipeline(lines, store, chain, options, cancel, on_error)
}
