//! The node executor's contract with the consensus engine (spec §1 "Node
//! executor", §6 "Executor interface"). The executor itself — running one
//! transaction on one LLM-configured validator — is out of scope.

use accord_types::{ContractSnapshot, ExecutionMode, Receipt, Transaction, Validator};
use async_trait::async_trait;

/// Runs one transaction on one validator node and returns its receipt.
///
/// Implementations are expected to apply their own internal timeout, but
/// the consensus engine additionally wraps every call with the
/// `node_execution_timeout_secs` deadline from `EngineConfig` and
/// synthesizes a `Vote::Timeout` receipt if that expires first (spec §5
/// "Node execution has a per-call deadline").
#[async_trait]
pub trait NodeExecutor: Send + Sync {
    async fn execute(
        &self,
        transaction: &Transaction,
        mode: ExecutionMode,
        contract_snapshot: &ContractSnapshot,
        leader_receipt: Option<&Receipt>,
        validator: &Validator,
    ) -> Receipt;
}
