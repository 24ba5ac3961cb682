//! Run-scoped account cache feeding the validation stage.

use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::chunk::chunks;
use crate::domain::{Account, AccountId};
use crate::store::AccountStore;

/// Memoizes resolved accounts for the life of one ingestion run.
///
/// Each id goes upstream at most once per run, even when the store has no
/// matching account: ids that came back empty are remembered as requested and
/// simply stay absent from the cache.
pub(crate) struct AccountCache {
    accounts: HashMap<AccountId, Account>,
    requested: HashSet<AccountId>,
    fetch_limit: usize,
}

impl AccountCache {
    pub(crate) fn new(fetch_limit: usize) -> Self {
        Self {
            accounts: HashMap::new(),
            requested: HashSet::new(),
            fetch_limit,
        }
    }

    /// Bulk-resolves the ids in `ids` that have not been requested this run,
    /// splitting the upstream call to stay under the store's id-count ceiling.
    /// On failure no id from the failed call is marked requested, so a later
    /// batch may retry it.
    pub(crate) fn resolve<S: AccountStore>(
        &mut self,
        store: &mut S,
        ids: impl IntoIterator<Item = AccountId>,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        let fresh: Vec<AccountId> = ids
            .into_iter()
            .filter(|id| !self.requested.contains(id) && seen.insert(*id))
            .collect();

        for id_chunk in chunks(fresh.into_iter(), self.fetch_limit) {
            let accounts = store.get_by_ids(&id_chunk)?;
            self.requested.extend(id_chunk);
            for account in accounts {
                self.accounts.insert(account.account_id(), account);
            }
        }
        Ok(())
    }

    /// Cache-only lookup; never triggers I/O.
    pub(crate) fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }
}
