//! The receipt produced by the (out-of-scope) node executor for one
//! leader/validator execution. See spec §3, §6.

use crate::ids::AccountId;
use serde::{Deserialize, Serialize};

/// The vote a single node cast after executing a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Agree,
    Disagree,
    /// The executor's per-call deadline expired. Counted as `Disagree` for
    /// majority purposes but recorded distinctly in history (spec §4.1
    /// "Error-path rules").
    Timeout,
}

/// Whether the node's local execution of the contract call succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionResult {
    Success,
    Error,
}

/// The role a node executed a transaction under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    Leader,
    Validator,
}

/// The point in the transaction's lifecycle at which a sub-transaction
/// should be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerPoint {
    Accepted,
    Finalized,
}

/// A sub-transaction emitted by a contract call's execution, to be inserted
/// in `Pending` with `triggered_by` set to the parent's hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTransactionRequest {
    pub on: TriggerPoint,
    pub from_address: Option<AccountId>,
    pub to_address: Option<AccountId>,
    pub kind: crate::transaction::TransactionKind,
}

/// Identifies which node produced a receipt, echoed back by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub address: AccountId,
}

/// The full result of one node's execution of one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub vote: Vote,
    pub node_config: NodeConfig,
    pub execution_result: ExecutionResult,
    /// Opaque delta to apply to the contract's state; absent/ignored when
    /// `execution_result` is `Error` (spec §4.1 "Error-path rules").
    pub contract_state_delta: Option<Vec<u8>>,
    pub pending_sub_transactions: Vec<SubTransactionRequest>,
    /// Equivalence-principle outputs; opaque, carried through untouched.
    pub eq_outputs: Vec<u8>,
}

impl Receipt {
    pub fn address(&self) -> AccountId {
        self.node_config.address
    }
}
