//! Two-stage pipeline connected by a bounded hand-off queue: one thread
//! parses and batches, the calling thread resolves, validates, and persists.

use std::sync::mpsc::{SyncSender, sync_channel};
use std::thread;

use tracing::{debug, warn};

use crate::chunk::chunks;
use crate::domain::ParsedReading;
use crate::engine::cache::AccountCache;
use crate::engine::{CancelToken, IngestOptions, RunTotals};
use crate::error::{Error, parse_error, validation_error};
use crate::input::ReadingLine;
use crate::store::AccountStore;
use crate::parse;
use crate::validate::{ValidationChain, Verdict};

/// Streams `lines` through the two stages and aggregates the run totals.
///
/// Stage A runs on a spawned thread: parse each line, group survivors into
/// batches of `chunk_size`, and push them into a queue holding at most
/// `queue_depth` batches — a full queue blocks the producer instead of
/// buffering the upload in memory. Stage B stays on the calling thread and is
/// the only code touching the account cache and the store. Row-level failures
/// go to `on_error` (from a dedicated callback thread, as both stages produce
/// them) and are tallied; they never abort the run.
pub(crate) fn run_pipeline<S, L>(
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
    let lines = lines.into_iter();

    thread::scope(|s| {
        let (batch_tx, batch_rx) = sync_channel::<Vec<ParsedReading>>(options.queue_depth);
        let (error_tx, error_rx) = sync_channel::<Error>(options.chunk_size);

        let callback_handle = s.spawn(move || {
            let mut on_error = on_error;
            for err in error_rx {
                on_error(err);
            }
        });

        let parser_error_tx = error_tx.clone();
        let parser_handle =
            s.spawn(move || parse_stage(lines, batch_tx, parser_error_tx, options, cancel));

        let mut cache = AccountCache::new(options.fetch_limit);
        let mut successes = 0u64;
        let mut failures = 0u64;

        for batch in batch_rx {
            if cancel.is_cancelled() {
                // Dropping the receiver (end of loop) unblocks the producer.
                break;
            }
            match process_batch(&batch, store, chain, &mut cache, &error_tx) {
                Ok((batch_successes, batch_failures)) => {
                    successes += batch_successes;
                    failures += batch_failures;
                }
                Err(err) => {
                    // Collaborator failure partway through the batch: rollback
                    // is the store's job, the whole batch counts as failed here,
                    // and the run moves on to the next batch.
                    warn!(batch_len = batch.len(), %err, "storage failure; batch rolled back");
                    failures += batch.len() as u64;
                    let _ = error_tx.send(Error::Store(err));
                }
            }
        }
        drop(error_tx);

        let parse_failures = parser_handle.join().expect("parse stage does not panic");
        callback_handle
            .join()
            .expect("error callback does not panic");

        RunTotals {
            successes,
            failures: failures + parse_failures,
        }
    })
}

/// Stage A: single pass over the input, one `ParsedReading` or one counted
/// failure per line, survivors batched and handed off. Returns the number of
/// lines that failed to parse.
fn parse_stage(
    lines: impl Iterator<Item = ReadingLine>,
    batch_tx: SyncSender<Vec<ParsedReading>>,
    error_tx: SyncSender<Error>,
    options: IngestOptions,
    cancel: &CancelToken,
) -> u64 {
    let mut parse_failures = 0u64;

    let parsed = lines
        .take_while(|_| !cancel.is_cancelled())
        .filter_map(|line| match parse::try_parse(&line) {
            Ok(parsed) => Some(parsed),
            Err(cause) => {
                warn!(row_id = line.row_id, %cause, "failed to parse meter reading");
                parse_failures += 1;
                let _ = error_tx.send(parse_error(line.row_id, cause));
                None
            }
        });

    for batch in chunks(parsed, options.chunk_size) {
        debug!(count = batch.len(), "sending batch for validation");
        if batch_tx.send(batch).is_err() {
            // Consumer hung up (cancellation); nothing left to flush to.
            break;
        }
    }

    parse_failures
}

/// Stage B inner loop for one batch: resolve unseen accounts in bulk, then
/// validate and persist each reading. Returns per-batch (successes, failures);
/// a store error aborts the batch.
fn process_batch<S: AccountStore>(
    batch: &[ParsedReading],
    store: &mut S,
    chain: &ValidationChain,
    cache: &mut AccountCache,
    error_tx: &SyncSender<Error>,
) -> anyhow::Result<(u64, u64)> {
    cache.resolve(store, batch.iter().map(|r| r.reading().account_id()))?;

    let mut successes = 0u64;
    let mut failures = 0u64;

    for parsed in batch {
        let reading = parsed.reading();

        let Some(account) = cache.get_mut(reading.account_id()) else {
            warn!(
                account_id = %reading.account_id(),
                row_id = parsed.row_id(),
                "account not found for reading"
            );
            failures += 1;
            let _ = error_tx.send(Error::AccountNotFound {
                row_id: parsed.row_id(),
                account_id: reading.account_id(),
            });
            continue;
        };

        if let Verdict::Invalid { reason } = chain.check(reading, account) {
            warn!(row_id = parsed.row_id(), %reason, "validation failed for reading");
            failures += 1;
            let _ = error_tx.send(validation_error(
                parsed.row_id(),
                reading.account_id(),
                reason,
            ));
            continue;
        }

        store.add_reading(reading)?;
        account.advance_current(*reading);
        debug!(
            row_id = parsed.row_id(),
            account_id = %reading.account_id(),
            "accepted meter reading"
        );
        successes += 1;
    }

    Ok((successes, failures))
}
