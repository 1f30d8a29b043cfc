//! The Finalization Processor (spec §4.5).

use crate::context::TransactionContext;
use crate::util;
use accord_types::{
    ConsensusError, EngineConfig, ExecutionResult, RoundLabel, RoundRecord, Transaction,
    TransactionStatus, TriggerPoint,
};

/// `can_finalize(i)` from spec §4.5, parameterized over the predecessor
/// (`i == 0` when `predecessor` is `None`).
pub fn can_finalize(
    tx: &Transaction,
    predecessor: Option<&Transaction>,
    now: u64,
    config: &EngineConfig,
) -> bool {
    let window_elapsed = tx.leader_only || {
        let awaiting = tx.timestamp_awaiting_finalization.unwrap_or(now);
        now.saturating_sub(awaiting)
            .saturating_sub(tx.appeal_processing_time)
            > config.finality_window_secs
    };
    if !window_elapsed {
        return false;
    }
    match predecessor {
        None => true,
        Some(p) => p.status == TransactionStatus::Finalized,
    }
}

/// Finalizes `tx`: promotes its accepted contract state to finalized (if it
/// was `Accepted` and the leader's execution succeeded), emits
/// `on=finalized` sub-transactions, then sets status `Finalized`.
pub async fn handle(ctx: &mut TransactionContext, tx: &mut Transaction) -> Result<(), ConsensusError> {
    if tx.status == TransactionStatus::Accepted {
        promote_contract(ctx, tx).await?;
    }

    let now = util::now_secs();
    let mut round = RoundRecord::new(RoundLabel::Finalized, now);
    round.status_changes.push(TransactionStatus::Finalized);
    tx.consensus_history.push(round);

    crate::statemachine::transition(ctx, tx, TransactionStatus::Finalized).await
}

async fn promote_contract(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<(), ConsensusError> {
    let Some(leader_receipt) = tx.leader_receipt.clone() else {
        return Ok(());
    };
    if leader_receipt.execution_result != ExecutionResult::Success {
        return Ok(());
    }
    let Some(address) = tx.to_address else {
        return Ok(());
    };

    let accepted = ctx
        .collaborators
        .store
        .get_accepted_contract(address)
        .await?
        .unwrap_or_default();
    ctx.collaborators
        .store
        .set_finalized_contract(address, accepted)
        .await?;

    for sub in leader_receipt
        .pending_sub_transactions
        .iter()
        .filter(|s| s.on == TriggerPoint::Finalized)
    {
        let mut sub_tx = Transaction::new_pending(
            util::derive_sub_hash(tx.hash, sub),
            sub.from_address,
            sub.to_address,
            sub.kind.clone(),
            util::now_secs(),
        );
        sub_tx.triggered_by = Some(tx.hash);
        ctx.collaborators.store.save(&sub_tx).await?;
    }

    Ok(())
}
