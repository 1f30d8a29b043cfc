//! The `Accepted` handler (spec §4.1 "Accepted").

use super::{transition, StepOutcome};
use crate::context::TransactionContext;
use crate::util;
use accord_types::{
    ConsensusError, Event, EventLevel, ExecutionResult, RoundLabel, RoundRecord, Transaction,
    TransactionStatus, TriggerPoint,
};

pub async fn handle(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<StepOutcome, ConsensusError> {
    let now = util::now_secs();

    enum Arrival {
        LeaderAppealSuccess,
        ValidatorAppealFailed,
        Fresh,
    }
    let arrival = if tx.appeal_undetermined {
        Arrival::LeaderAppealSuccess
    } else if tx.appealed {
        Arrival::ValidatorAppealFailed
    } else {
        Arrival::Fresh
    };

    let label = match arrival {
        Arrival::LeaderAppealSuccess => {
            tx.appeal_undetermined = false;
            tx.appeal_processing_time = 0;
            RoundLabel::LeaderAppealSuccessful
        }
        Arrival::ValidatorAppealFailed => {
            tx.appealed = false;
            if let Some(requested_at) = tx.timestamp_appeal {
                tx.appeal_processing_time += now.saturating_sub(requested_at);
            }
            RoundLabel::ValidatorAppealFailed
        }
        Arrival::Fresh => {
            if tx.timestamp_awaiting_finalization.is_none() {
                tx.timestamp_awaiting_finalization = Some(now);
            }
            RoundLabel::Accepted
        }
    };

    let mut round = RoundRecord::new(label, now);
    round.leader_receipt = tx.leader_receipt.clone();
    round.validator_receipts = tx.validator_receipts.clone();
    round.status_changes.push(TransactionStatus::Accepted);
    tx.consensus_history.push(round);

    transition(ctx, tx, TransactionStatus::Accepted).await?;

    if matches!(arrival, Arrival::Fresh) {
        apply_accepted_effects(ctx, tx).await?;
    }

    if matches!(arrival, Arrival::LeaderAppealSuccess) {
        return Ok(StepOutcome::LeaderAppealSuccess);
    }

    Ok(StepOutcome::Terminal)
}

async fn apply_accepted_effects(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<(), ConsensusError> {
    let Some(address) = tx.to_address else {
        return Ok(());
    };

    if tx.contract_snapshot.is_none() {
        let previous = ctx
            .collaborators
            .store
            .get_accepted_contract(address)
            .await?
            .unwrap_or_default();
        tx.contract_snapshot = Some(previous);
        ctx.collaborators.store.save(tx).await?;
    }

    let Some(leader_receipt) = tx.leader_receipt.clone() else {
        return Ok(());
    };
    if leader_receipt.execution_result != ExecutionResult::Success {
        return Ok(());
    }

    let previous = tx.contract_snapshot.clone().unwrap_or_default();
    let updated = util::apply_delta(
        tx,
        &previous,
        leader_receipt.contract_state_delta.as_deref(),
    );
    ctx.collaborators
        .store
        .set_accepted_contract(address, updated)
        .await?;

    for sub in leader_receipt
        .pending_sub_transactions
        .iter()
        .filter(|s| s.on == TriggerPoint::Accepted)
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

    ctx.collaborators
        .events
        .emit(Event::ConsensusEvent {
            level: EventLevel::Success,
            scope: tx.hash,
            message: "transaction accepted".to_string(),
        })
        .await;

    Ok(())
}
