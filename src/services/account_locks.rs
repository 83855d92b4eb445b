use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per account so balance-changing trades on the same account
/// run one at a time. Different accounts never contend.
///
/// Entries are never evicted: the map holds one entry for every account that
/// has traded since startup.
#[derive(Clone, Default)]
pub struct AccountLocks {
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `account_id`; released when the guard drops.
    pub async fn lock(&self, account_id: i64) -> OwnedMutexGuard<()> {
        // clone the Arc out so the map shard is not held across the await
        let mutex = self
            .locks
            .entry(account_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.len()
    }
}
