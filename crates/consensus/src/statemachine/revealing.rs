//! The `Revealing` handler (spec §4.1 "Revealing"): the branch point that
//! decides acceptance, rotation, or an appeal's success/failure.

use super::{transition, StepOutcome};
use crate::context::TransactionContext;
use crate::{util, vrf};
use accord_types::{
    ConsensusError, RoundLabel, RoundRecord, Transaction, TransactionStatus, Vote,
};

pub async fn handle(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<StepOutcome, ConsensusError> {
    let agrees = ctx
        .working
        .votes
        .iter()
        .filter(|r| r.vote == Vote::Agree)
        .count();
    let majority_agrees = agrees * 2 > ctx.working.num_validators;

    if tx.appealed {
        return handle_appeal_case(ctx, tx, majority_agrees).await;
    }

    if majority_agrees {
        transition(ctx, tx, TransactionStatus::Accepted).await?;
        return Ok(StepOutcome::Continue);
    }

    if ctx.working.rotation_count >= tx.config_rotation_rounds {
        transition(ctx, tx, TransactionStatus::Undetermined).await?;
        return Ok(StepOutcome::Continue);
    }

    rotate_leader(ctx, tx).await?;
    Ok(StepOutcome::Continue)
}

async fn rotate_leader(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<(), ConsensusError> {
    let pool = ctx.collaborators.validators.all_validators().await?;
    let mut used = tx
        .consensus_history
        .used_leader_addresses(tx.leader_receipt.as_ref());
    if let Some(leader) = &tx.leader_receipt {
        used.insert(leader.address());
    }

    let current: Vec<_> = tx.validator_receipts.iter().map(|r| r.address()).collect();
    let mut current_validators = util::resolve_validators(&pool, &current);

    let seed = ctx.next_seed();
    let drew = vrf::add_one_for_rotation(&mut current_validators, &pool, &used, seed);

    if drew.is_none() {
        tracing::warn!(target: "consensus", tx = %tx.hash, "no replacement validator available for rotation");
    }

    ctx.working.rotation_count += 1;
    ctx.working.num_validators = current_validators.len();
    ctx.working.involved_validators = current_validators;

    let label = if tx.appeal_undetermined {
        RoundLabel::LeaderRotationAppeal
    } else {
        RoundLabel::LeaderRotation
    };
    let mut round = RoundRecord::new(label, util::now_secs());
    round.leader_receipt = tx.leader_receipt.clone();
    round.validator_receipts = tx.validator_receipts.clone();
    round.status_changes.push(TransactionStatus::Proposing);
    tx.consensus_history.push(round);

    transition(ctx, tx, TransactionStatus::Proposing).await
}

async fn handle_appeal_case(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
    majority_agrees: bool,
) -> Result<StepOutcome, ConsensusError> {
    if majority_agrees {
        // Appeal failed: the enlarged validator set confirmed the original
        // outcome.
        tx.appeal_failed += 1;
        transition(ctx, tx, TransactionStatus::Accepted).await?;
        return Ok(StepOutcome::Continue);
    }

    // Appeal succeeded.
    tx.appeal_failed = 0;
    tx.timestamp_appeal = None;
    let mut round = RoundRecord::new(RoundLabel::ValidatorAppealSuccessful, util::now_secs());
    round.leader_receipt = tx.leader_receipt.clone();
    round.validator_receipts = tx.validator_receipts.clone();
    tx.consensus_history.push(round);

    Ok(StepOutcome::ValidatorAppealSuccess)
}
