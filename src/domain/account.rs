use std::fmt;

use crate::domain::MeterReading;

/// Id identifying the account a meter reading belongs to.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct AccountId(u32);

impl AccountId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl From<AccountId> for u32 {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The slice of an account the ingestion pipeline works with: identity plus the
/// most recent accepted reading. The full reading history stays in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    account_id: AccountId,
    first_name: Option<String>,
    last_name: Option<String>,
    current_reading: Option<MeterReading>,
}

impl Account {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            first_name: None,
            last_name: None,
            current_reading: None,
        }
    }

    pub fn named(
        account_id: AccountId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            current_reading: None,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// The most recent accepted reading, used as the monotonicity baseline for
    /// future submissions.
    pub fn current_reading(&self) -> Option<&MeterReading> {
        self.current_reading.as_ref()
    }

    /// Moves the current-reading pointer forward to `reading`. The pointer
    /// never regresses within a run: the most-recent-wins rule must have
    /// accepted `reading` before this is called.
    pub fn advance_current(&mut self, reading: MeterReading) {
        debug_assert!(
            self.current_reading
                .is_none_or(|current| current.timestamp() < reading.timestamp()),
            "current-reading pointer must never regress"
        );
        self.current_reading = Some(reading);
    }
}
