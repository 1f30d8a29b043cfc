//! The `Committing` handler (spec §4.1 "Committing", §5 "concurrency
//! ceiling of 8").

use super::{transition, StepOutcome};
use crate::context::TransactionContext;
use accord_types::{
    ConsensusError, ExecutionMode, ExecutionResult, NodeConfig, Receipt, Transaction,
    TransactionStatus, Vote,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

pub async fn handle(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<StepOutcome, ConsensusError> {
    let config = ctx.collaborators.config.get().await;
    let snapshot = match &tx.contract_snapshot {
        Some(s) => s.clone(),
        None => match tx.to_address {
            Some(addr) => ctx
                .collaborators
                .store
                .get_accepted_contract(addr)
                .await?
                .unwrap_or_default(),
            None => Default::default(),
        },
    };
    let leader_receipt = tx.leader_receipt.clone();

    let semaphore = Arc::new(Semaphore::new(config.max_committing_concurrency.max(1)));
    let timeout = Duration::from_secs(config.node_execution_timeout_secs);

    let validators = std::mem::take(&mut ctx.working.remaining_validators);
    let mut handles = Vec::with_capacity(validators.len());

    for validator in validators.into_iter() {
        let semaphore = semaphore.clone();
        let executor = ctx.collaborators.executor.clone();
        let tx_clone = tx.clone();
        let snapshot = snapshot.clone();
        let leader_receipt = leader_receipt.clone();
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let address = validator.address;
            let outcome = tokio::time::timeout(
                timeout,
                executor.execute(
                    &tx_clone,
                    ExecutionMode::Validator,
                    &snapshot,
                    leader_receipt.as_ref(),
                    &validator,
                ),
            )
            .await;
            outcome.unwrap_or_else(|_elapsed| timeout_receipt(address))
        }));
    }

    // Collect in spawn order (validator index), per spec §4.1 "deterministic
    // order" / §5 "merged deterministically (by validator index)".
    let mut receipts = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(receipt) => receipts.push(receipt),
            Err(join_err) => {
                tracing::error!(target: "consensus", tx = %tx.hash, error = %join_err, "validator task panicked");
            }
        }
    }

    tx.validator_receipts = receipts.clone();
    ctx.working.votes.extend(receipts);

    transition(ctx, tx, TransactionStatus::Revealing).await?;
    Ok(StepOutcome::Continue)
}

fn timeout_receipt(address: accord_types::AccountId) -> Receipt {
    Receipt {
        vote: Vote::Timeout,
        node_config: NodeConfig { address },
        execution_result: ExecutionResult::Error,
        contract_state_delta: None,
        pending_sub_transactions: Vec::new(),
        eq_outputs: Vec::new(),
    }
}
