//! Module defining the errors which are exposed to the users of the crate

use crate::domain::AccountId;
use crate::parse::ParseFailure;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Row that never became a reading: framing, account id, timestamp, or value.
    #[error("parse failure on row {row_id}: {cause}")]
    Parse { row_id: u64, cause: ParseFailure },

    /// Reading referenced an account the store does not know.
    #[error("account {account_id} not found for reading on row {row_id}")]
    AccountNotFound { row_id: u64, account_id: AccountId },

    /// Reading rejected by a validation rule.
    #[error("validation failed for reading on row {row_id} (account {account_id}): {reason}")]
    Validation {
        row_id: u64,
        account_id: AccountId,
        reason: String,
    },

    /// The storage collaborator failed. Scoped to a whole batch, not one row:
    /// the orchestrator counts the affected batch as failures and moves on.
    #[error("storage failure: {0}")]
    Store(#[source] anyhow::Error),
}

pub(crate) fn parse_error(row_id: u64, cause: ParseFailure) -> Error {
    Error::Parse { row_id, cause }
}

pub(crate) fn validation_error(
    row_id: u64,
    account_id: AccountId,
    reason: impl Into<String>,
) -> Error {
    Error::Validation {
        row_id,
        account_id,
        reason: reason.into(),
    }
}
