//! The `Pending` handler (spec §4.1 "Pending").

use super::{transition, StepOutcome};
use crate::context::TransactionContext;
use crate::{util, vrf};
use accord_types::{
    ConsensusError, Event, EventLevel, Transaction, TransactionKind, TransactionStatus,
};

pub async fn handle(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<StepOutcome, ConsensusError> {
    // Re-read: the transaction may have been mutated since it was queued
    // (e.g. a concurrent appeal flag flip).
    if let Some(latest) = ctx.collaborators.store.get(tx.hash).await? {
        *tx = latest;
    }

    if let TransactionKind::Transfer { amount } = tx.kind {
        return handle_transfer(ctx, tx, amount).await;
    }

    let pool = ctx.collaborators.validators.all_validators().await?;

    let involved = if tx.appealed {
        tx.appealed = false;
        util::resolve_validators(
            &pool,
            &tx.validator_receipts
                .iter()
                .map(|r| r.address())
                .collect::<Vec<_>>(),
        )
    } else if tx.appeal_undetermined {
        let previous = util::resolve_validators(
            &pool,
            &tx.validator_receipts
                .iter()
                .map(|r| r.address())
                .collect::<Vec<_>>(),
        );
        let mut used = tx.consensus_history.used_leader_addresses(tx.leader_receipt.as_ref());
        if let Some(leader) = &tx.leader_receipt {
            used.insert(leader.address());
        }
        let seed = ctx.next_seed();
        match vrf::get_extra_validators(&previous, &pool, &used, 0, seed) {
            Some(extra) => extra.validators,
            None => {
                emit_no_validators(ctx, tx).await;
                return Ok(StepOutcome::Halted);
            }
        }
    } else if let Some(leader) = tx.leader_receipt.clone() {
        // Rolled-back transaction: reuse the prior round's full set,
        // leader included.
        let mut addresses = vec![leader.address()];
        addresses.extend(tx.validator_receipts.iter().map(|r| r.address()));
        util::resolve_validators(&pool, &addresses)
    } else {
        let seed = ctx.next_seed();
        vrf::weighted_sample(&pool, accord_types::config::DEFAULT_VALIDATORS_COUNT, seed)
    };

    if involved.is_empty() {
        emit_no_validators(ctx, tx).await;
        return Ok(StepOutcome::Halted);
    }

    ctx.working.num_validators = involved.len();
    ctx.working.involved_validators = involved;

    transition(ctx, tx, TransactionStatus::Proposing).await?;
    Ok(StepOutcome::Continue)
}

async fn handle_transfer(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
    amount: u128,
) -> Result<StepOutcome, ConsensusError> {
    let store = &ctx.collaborators.store;
    let next_status = match tx.from_address {
        Some(from) => {
            let balance = store.get_balance(from).await?;
            if balance < amount {
                TransactionStatus::Undetermined
            } else {
                store.set_balance(from, balance - amount).await?;
                if let Some(to) = tx.to_address {
                    let credited = store.get_balance(to).await?;
                    store.set_balance(to, credited + amount).await?;
                }
                TransactionStatus::Finalized
            }
        }
        // Mint: no debit, straight credit.
        None => {
            if let Some(to) = tx.to_address {
                let credited = store.get_balance(to).await?;
                store.set_balance(to, credited + amount).await?;
            }
            TransactionStatus::Finalized
        }
    };

    let terminal = matches!(
        next_status,
        TransactionStatus::Finalized | TransactionStatus::Undetermined
    );
    transition(ctx, tx, next_status).await?;
    Ok(if terminal {
        StepOutcome::Terminal
    } else {
        StepOutcome::Continue
    })
}

async fn emit_no_validators(ctx: &TransactionContext, tx: &Transaction) {
    tracing::warn!(target: "consensus", tx = %tx.hash, "no validators available, halting");
    ctx.collaborators
        .events
        .emit(Event::ConsensusEvent {
            level: EventLevel::Error,
            scope: tx.hash,
            message: "no validators available for transaction".to_string(),
        })
        .await;
}

