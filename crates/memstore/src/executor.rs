//! A scripted `NodeExecutor`: returns a queued vote per validator address
//! (falling back to a default), so state-machine and scheduler tests don't
//! need a real LLM sidecar. Grounded on the teacher's `ioi-test-utils`
//! scripted-response convention.

use accord_api::NodeExecutor;
use accord_types::{
    AccountId, ContractSnapshot, ExecutionMode, ExecutionResult, NodeConfig, Receipt, Transaction,
    Validator, Vote,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub struct ScriptedExecutor {
    scripted: Mutex<HashMap<AccountId, VecDeque<Vote>>>,
    default_vote: Mutex<Vote>,
    executions: Mutex<Vec<(AccountId, ExecutionMode)>>,
}

impl ScriptedExecutor {
    pub fn new(default_vote: Vote) -> Self {
        Self {
            scripted: Mutex::new(HashMap::new()),
            default_vote: Mutex::new(default_vote),
            executions: Mutex::new(Vec::new()),
        }
    }

    /// Queues votes for `address`, consumed in order, one per execution.
    pub fn script(&self, address: AccountId, votes: impl IntoIterator<Item = Vote>) {
        self.scripted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(address)
            .or_default()
            .extend(votes);
    }

    pub fn set_default_vote(&self, vote: Vote) {
        *self.default_vote.lock().unwrap_or_else(|e| e.into_inner()) = vote;
    }

    pub fn execution_count(&self) -> usize {
        self.executions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn executions(&self) -> Vec<(AccountId, ExecutionMode)> {
        self.executions.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl NodeExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        _transaction: &Transaction,
        mode: ExecutionMode,
        _contract_snapshot: &ContractSnapshot,
        _leader_receipt: Option<&Receipt>,
        validator: &Validator,
    ) -> Receipt {
        self.executions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((validator.address, mode));

        let vote = {
            let mut scripted = self.scripted.lock().unwrap_or_else(|e| e.into_inner());
            scripted
                .get_mut(&validator.address)
                .and_then(|q| q.pop_front())
                .unwrap_or_else(|| *self.default_vote.lock().unwrap_or_else(|e| e.into_inner()))
        };

        Receipt {
            vote,
            node_config: NodeConfig {
                address: validator.address,
            },
            execution_result: ExecutionResult::Success,
            contract_state_delta: Some(b"ok".to_vec()),
            pending_sub_transactions: Vec::new(),
            eq_outputs: Vec::new(),
        }
    }
}
