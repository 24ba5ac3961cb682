//! Module for the persistence boundary: account lookup and reading writes.
//!
//! The pipeline only ever talks to [`AccountStore`]; transactions, SQL, and
//! pooling belong to whatever sits behind it. [`InMemoryAccountStore`] backs
//! the binary and the tests.

use std::collections::HashMap;

use anyhow::Result;

use crate::domain::{Account, AccountId, MeterReading};
use crate::input::AccountSeed;

/// Storage collaborator consumed by the ingestion pipeline.
pub trait AccountStore {
    /// Bulk lookup. Ids with no matching account are simply absent from the
    /// result; that is not an error at this boundary. Callers keep the id
    /// count per call under the store's parameter ceiling.
    fn get_by_ids(&mut self, ids: &[AccountId]) -> Result<Vec<Account>>;

    /// Single-account lookup, used outside the batch path.
    fn get_by_id(&mut self, id: AccountId) -> Result<Option<Account>>;

    /// Records an accepted reading and advances the stored account's
    /// current-reading pointer. Durable commit happens at an outer
    /// unit-of-work boundary, not here.
    fn add_reading(&mut self, reading: &MeterReading) -> Result<()>;
}

/// In-memory account store: a seedable account map plus per-account history.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: HashMap<AccountId, Account>,
    readings: HashMap<AccountId, Vec<MeterReading>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated from seed records.
    pub fn seeded(seeds: impl IntoIterator<Item = AccountSeed>) -> Self {
        let mut store = Self::new();
        for seed in seeds {
            store.insert_account(seed.into());
        }
        store
    }

    pub fn insert_account(&mut self, account: Account) {
        self.accounts.insert(account.account_id(), account);
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Accepted readings for one account, in acceptance order.
    pub fn readings(&self, id: AccountId) -> &[MeterReading] {
        self.readings.get(&id).map_or(&[], Vec::as_slice)
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get_by_ids(&mut self, ids: &[AccountId]) -> Result<Vec<Account>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.accounts.get(id).cloned())
            .collect())
    }

    fn get_by_id(&mut self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.accounts.get(&id).cloned())
    }

    fn add_reading(&mut self, reading: &MeterReading) -> Result<()> {
        self.readings
            .entry(reading.account_id())
            .or_default()
            .push(*reading);
        if let Some(account) = self.accounts.get_mut(&reading.account_id()) {
            account.advance_current(*reading);
        }
        Ok(())
    }
}
