//! Per-task handles and transient working state for one transaction's pass
//! through the state machine (spec §4.7).
//!
//! `TransactionContext` is never shared across tasks: one dispatcher task
//! (or one appeal/finalization step) owns it for the duration of a single
//! drive, mirroring the teacher's `TxContext<'a>` in shape while carrying
//! the transient fields spec §4.7 names explicitly on top.

use crate::config::EngineConfigHandle;
use crate::registry::AddressRegistry;
use accord_api::{EventBus, NodeExecutor, TransactionStore, ValidatorRegistry};
use accord_types::{Receipt, Validator};
use std::sync::Arc;

/// Handles to the engine's external collaborators, cheaply cloned and
/// shared by every `TransactionContext` in the process.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn TransactionStore>,
    pub executor: Arc<dyn NodeExecutor>,
    pub events: Arc<dyn EventBus>,
    pub validators: Arc<dyn ValidatorRegistry>,
    pub config: EngineConfigHandle,
    pub addresses: AddressRegistry,
}

/// The transient, per-drive working state a handler needs beyond the
/// persisted `Transaction` fields (spec §4.7: `involved_validators`,
/// `remaining_validators`, `consensus_data`, `votes`, `num_validators`,
/// `rotation_count`). None of this is written back to the store directly;
/// handlers fold it into `Transaction`/`ConsensusHistory` fields before
/// persisting.
#[derive(Default)]
pub struct ConsensusWorkingState {
    /// The full involved set for the current round: leader first, then
    /// validators, as established by the Pending handler.
    pub involved_validators: Vec<Validator>,
    /// Validators still to execute in the current Committing round (those
    /// not yet assigned a receipt).
    pub remaining_validators: Vec<Validator>,
    /// Receipts collected so far in the current round, in validator-index
    /// order (spec §4.1 Committing "deterministic order").
    pub votes: Vec<Receipt>,
    /// Size of the involved set at round entry, used for the majority
    /// threshold (spec §4.1 Revealing).
    pub num_validators: usize,
    /// Leader-rotation attempts made so far for this drive; bounded by
    /// `config_rotation_rounds`. Never persisted (SPEC_FULL.md §3).
    pub rotation_count: u32,
}

/// One dispatcher task's (or appeal/finalization step's) context.
pub struct TransactionContext {
    pub collaborators: Collaborators,
    pub working: ConsensusWorkingState,
    /// Seed for this drive's VRF draws; derived once per task so repeated
    /// draws within the same drive remain distinguishable but reproducible
    /// given the same seed.
    pub seed: u64,
}

impl TransactionContext {
    pub fn new(collaborators: Collaborators, seed: u64) -> Self {
        Self {
            collaborators,
            working: ConsensusWorkingState::default(),
            seed,
        }
    }

    /// Derives a fresh sub-seed for the next VRF draw within this drive, so
    /// successive draws (rotation, then appeal growth) don't collide.
    pub fn next_seed(&mut self) -> u64 {
        self.seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.seed
    }
}
