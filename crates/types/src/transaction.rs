//! The central `Transaction` entity (spec §3).

use crate::history::ConsensusHistory;
use crate::ids::{AccountId, TxHash};
use crate::receipt::Receipt;
use serde::{Deserialize, Serialize};

/// The state machine's status values (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Activated,
    Proposing,
    Committing,
    Revealing,
    Accepted,
    Undetermined,
    LeaderTimeout,
    Finalized,
    Canceled,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The transaction's kind and kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// A native token transfer; skips consensus entirely (spec I6).
    Transfer { amount: u128 },
    /// Deploys a new contract; `code` is opaque bytecode/source.
    DeployContract { code: Vec<u8> },
    /// Invokes an existing contract; `payload` is an opaque call descriptor.
    CallContract { payload: Vec<u8> },
}

impl TransactionKind {
    pub fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer { .. })
    }
}

/// A snapshot of a contract's code and state, captured on first entry to
/// `Accepted` and used to restore state after a successful validator appeal
/// (spec §3 `contract_snapshot`, §4.4, P5).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub code: Vec<u8>,
    pub state: Vec<u8>,
}

/// The central transaction entity (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: TxHash,
    pub from_address: Option<AccountId>,
    pub to_address: Option<AccountId>,
    pub kind: TransactionKind,
    /// Skips validator involvement entirely; only the leader executes.
    pub leader_only: bool,
    /// `R` in spec §4.1 Revealing: bound on leader-rotation attempts.
    pub config_rotation_rounds: u32,
    pub status: TransactionStatus,
    /// Monotonic per-`to_address` ordering key (spec I1).
    pub created_at: u64,

    pub leader_receipt: Option<Receipt>,
    pub validator_receipts: Vec<Receipt>,

    pub appealed: bool,
    pub appeal_undetermined: bool,
    pub appeal_failed: u32,
    pub timestamp_appeal: Option<u64>,
    pub appeal_processing_time: u64,

    pub timestamp_awaiting_finalization: Option<u64>,

    pub consensus_history: ConsensusHistory,
    pub contract_snapshot: Option<ContractSnapshot>,

    /// Back-reference for sub-transactions spawned by a contract call.
    pub triggered_by: Option<TxHash>,
}

impl Transaction {
    /// Constructs a transaction freshly submitted in `Pending`.
    pub fn new_pending(
        hash: TxHash,
        from_address: Option<AccountId>,
        to_address: Option<AccountId>,
        kind: TransactionKind,
        created_at: u64,
    ) -> Self {
        Self {
            hash,
            from_address,
            to_address,
            kind,
            leader_only: false,
            config_rotation_rounds: crate::config::DEFAULT_ROTATION_ROUNDS,
            status: TransactionStatus::Pending,
            created_at,
            leader_receipt: None,
            validator_receipts: Vec::new(),
            appealed: false,
            appeal_undetermined: false,
            appeal_failed: 0,
            timestamp_appeal: None,
            appeal_processing_time: 0,
            timestamp_awaiting_finalization: None,
            consensus_history: ConsensusHistory::default(),
            contract_snapshot: None,
            triggered_by: None,
        }
    }

    pub fn is_pending_phase_terminal(&self) -> bool {
        matches!(
            self.status,
            TransactionStatus::Accepted | TransactionStatus::Undetermined
        )
    }
}
