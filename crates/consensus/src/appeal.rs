//! The Appeal Processor (spec §4.4): re-executes an `Accepted` transaction
//! under a larger validator set (Validator Appeal), or re-enters the state
//! machine with a fresh leader for an `Undetermined` transaction (Leader
//! Appeal).

use crate::context::TransactionContext;
use crate::rollback;
use crate::statemachine::{self, StepOutcome};
use crate::{util, vrf};
use accord_types::{ConsensusError, Event, EventLevel, Transaction, TransactionStatus};

/// Drives the Validator Appeal flow for an `Accepted` transaction with
/// `appealed == true`.
pub async fn run_validator_appeal(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<(), ConsensusError> {
    let pool = ctx.collaborators.validators.all_validators().await?;

    let previous_addresses: Vec<_> = tx.validator_receipts.iter().map(|r| r.address()).collect();
    let previous = util::resolve_validators(&pool, &previous_addresses);

    let mut used = tx
        .consensus_history
        .used_leader_addresses(tx.leader_receipt.as_ref());
    if let Some(leader) = &tx.leader_receipt {
        used.insert(leader.address());
    }
    used.extend(util::as_address_set(&previous));

    let seed = ctx.next_seed();
    let Some(extra) = vrf::get_extra_validators(&previous, &pool, &used, tx.appeal_failed, seed)
    else {
        tx.appealed = false;
        if let Some(requested_at) = tx.timestamp_appeal {
            tx.appeal_processing_time += util::now_secs().saturating_sub(requested_at);
        }
        ctx.collaborators.store.save(tx).await?;
        ctx.collaborators
            .events
            .emit(Event::ConsensusEvent {
                level: EventLevel::Error,
                scope: tx.hash,
                message: "appeal capacity exhausted".to_string(),
            })
            .await;
        tracing::warn!(target: "consensus", tx = %tx.hash, "validator appeal capacity exhausted");
        return Ok(());
    };

    ctx.working.num_validators = extra.validators.len() + 1;
    ctx.working.remaining_validators = extra.validators;
    ctx.working.votes = tx.leader_receipt.iter().cloned().collect();
    ctx.working.rotation_count = 0;

    statemachine::transition(ctx, tx, TransactionStatus::Committing).await?;
    let outcome = statemachine::drive(ctx, tx).await?;

    if outcome == StepOutcome::ValidatorAppealSuccess {
        let restored = tx.contract_snapshot.clone().unwrap_or_default();
        if let Some(address) = tx.to_address {
            ctx.collaborators
                .store
                .set_accepted_contract(address, restored)
                .await?;
        }
        tx.contract_snapshot = None;
        statemachine::transition(ctx, tx, TransactionStatus::Pending).await?;
        rollback::run(ctx, tx).await?;
    }

    Ok(())
}

/// Drives the Leader Appeal flow for an `Undetermined` transaction with
/// `appealed == true`.
pub async fn run_leader_appeal(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<(), ConsensusError> {
    let pool = ctx.collaborators.validators.all_validators().await?;
    let previous_count = tx.validator_receipts.len();
    let used_leaders = tx
        .consensus_history
        .used_leader_addresses(tx.leader_receipt.as_ref());

    if previous_count + used_leaders.len() >= pool.len() {
        tx.appealed = false;
        if let Some(requested_at) = tx.timestamp_appeal {
            tx.appeal_processing_time += util::now_secs().saturating_sub(requested_at);
        }
        ctx.collaborators.store.save(tx).await?;
        tracing::warn!(target: "consensus", tx = %tx.hash, "leader appeal has no capacity");
        return Ok(());
    }

    tx.appealed = false;
    tx.appeal_undetermined = true;
    ctx.working.rotation_count = 0;
    statemachine::transition(ctx, tx, TransactionStatus::Pending).await?;
    let outcome = statemachine::drive(ctx, tx).await?;

    if outcome == StepOutcome::LeaderAppealSuccess {
        rollback::run(ctx, tx).await?;
    }

    Ok(())
}
