//! Module for the core of the crate: run aggregates, cancellation, the
//! single-reading path, and the two-stage batch pipeline.

mod cache;
mod orchestration;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

pub(crate) use orchestration::run_pipeline;

use crate::error::Error;
use crate::input::ReadingLine;
use crate::parse;
use crate::store::AccountStore;
use crate::validate::{ValidationChain, Verdict};

/// Aggregate outcome of one ingestion run. The two counts sum to the number
/// of input lines, unless the run was cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub successes: u64,
    pub failures: u64,
}

impl fmt::Display for RunTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} succeeded, {} failed", self.successes, self.failures)
    }
}

/// Tunables for the batch pipeline.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Readings per batch handed from the parse stage to the validate stage.
    pub chunk_size: usize,
    /// Upper bound on account ids per bulk fetch; kept under the storage
    /// collaborator's parameter-count ceiling.
    pub fetch_limit: usize,
    /// Batches allowed in flight between the two stages.
    pub queue_depth: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            fetch_limit: 2000,
            queue_depth: 8,
        }
    }
}

/// Cooperative cancellation flag shared by both pipeline stages. Cheap to
/// clone; all clones observe the same signal.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parses, validates, and persists a single reading outside the batch
/// pipeline, resolving its account with a single lookup.
///
/// Returns `Ok(false)` for every line-scoped rejection (framing, parse,
/// unknown account, validation); `Err` only when the store itself fails.
pub fn try_add_reading<S: AccountStore>(
    line: &ReadingLine,
    store: &mut S,
    chain: &ValidationChain,
) -> Result<bool, Error> {
    debug!(account_id = ?line.account_id, row_id = line.row_id, "processing meter reading");

    let parsed = match parse::try_parse(line) {
        Ok(parsed) => parsed,
        Err(cause) => {
            warn!(row_id = line.row_id, %cause, "failed to parse meter reading");
            return Ok(false);
        }
    };
    let reading = *parsed.reading();

    let Some(account) = store.get_by_id(reading.account_id()).map_err(Error::Store)? else {
        warn!(
            account_id = %reading.account_id(),
            row_id = parsed.row_id(),
            "account not found for reading"
        );
        return Ok(false);
    };

    if let Verdict::Invalid { reason } = chain.check(&reading, &account) {
        warn!(row_id = parsed.row_id(), %reason, "validation failed for reading");
        return Ok(false);
    }

    store.add_reading(&reading).map_err(Error::Store)?;
    debug!(
        row_id = parsed.row_id(),
        account_id = %reading.account_id(),
        "accepted meter reading"
    );
    Ok(true)
}
