//! Process-wide, per-address coordination state (spec §4.2, §5 "Shared
//! state"): the FIFO queue, `stop_flag`, and `running` flag Loop A, Loop B,
//! and the rollback engine all touch for a given contract address.
//!
//! Represented as one owned map protected by a lock, with a per-address
//! lock nested inside (design note §9 "Global mutable state").

use accord_types::{AccountId, TxHash};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct AddressState {
    pub queue: VecDeque<TxHash>,
    /// Raised by the rollback engine to stop Loop B from popping new work
    /// for this address while a cascade is in flight (spec §4.6 step 1, I4).
    pub stop_flag: bool,
    /// Set by Loop B while a dispatcher task is driving this address's
    /// transaction (spec §4.2 Loop B, §5 "running flag").
    pub running: bool,
}

/// The process-wide map of per-address coordination state.
#[derive(Clone, Default)]
pub struct AddressRegistry {
    inner: Arc<Mutex<HashMap<AccountId, Arc<Mutex<AddressState>>>>>,
}

impl AddressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the per-address state, creating it on first sight (spec §4.2
    /// Loop A: "both created on first sight").
    pub async fn entry(&self, address: AccountId) -> Arc<Mutex<AddressState>> {
        let mut map = self.inner.lock().await;
        map.entry(address)
            .or_insert_with(|| Arc::new(Mutex::new(AddressState::default())))
            .clone()
    }

    /// All addresses currently known to the registry.
    pub async fn addresses(&self) -> Vec<AccountId> {
        self.inner.lock().await.keys().copied().collect()
    }
}
