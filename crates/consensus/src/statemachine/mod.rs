//! The transaction state machine (spec §4.1): a pure function of (current
//! status, transaction fields, chain snapshot, receipts just obtained),
//! dispatched by status rather than through polymorphic handler classes
//! (design note §9 "Status dispatch").

mod accepted;
mod committing;
mod pending;
mod proposing;
mod revealing;
mod undetermined;

use crate::context::TransactionContext;
use accord_types::{ConsensusError, Event, Transaction, TransactionStatus};

/// What a single `step` call decided. A sum type over status plus the two
/// named terminal sentinels spec §4.1/§4.4 call `leader_appeal_success` /
/// `validator_appeal_success` (design note §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Transitioned; the dispatcher should call `step` again.
    Continue,
    /// Reached `Accepted` or `Undetermined` — terminal for the pending
    /// phase (spec §2 "terminal for the pending phase").
    Terminal,
    /// The involved validator set was empty; status is unchanged and the
    /// drive must stop without progress (spec §4.1 Pending).
    Halted,
    /// Revealing (appeal case) concluded with the appeal succeeding;
    /// caller must trigger rollback once the tx is persisted (spec §4.1
    /// Revealing, §4.6).
    ValidatorAppealSuccess,
    /// Accepted was reached via a leader-appeal re-execution; caller must
    /// trigger rollback once the tx is persisted (spec §4.1 Accepted,
    /// §4.4 Leader Appeal, §4.6).
    LeaderAppealSuccess,
}

/// Dispatches one status's handler, mutating `tx` and persisting it before
/// returning, per spec §4.1 ("each transition must be persisted before the
/// next runs").
pub async fn step(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<StepOutcome, ConsensusError> {
    match tx.status {
        TransactionStatus::Pending => pending::handle(ctx, tx).await,
        TransactionStatus::Proposing => proposing::handle(ctx, tx).await,
        TransactionStatus::Committing => committing::handle(ctx, tx).await,
        TransactionStatus::Revealing => revealing::handle(ctx, tx).await,
        TransactionStatus::Accepted => accepted::handle(ctx, tx).await,
        TransactionStatus::Undetermined => undetermined::handle(ctx, tx).await,
        // Activated is a crawler marker only observed between Loop A and
        // Loop B picking the transaction up; by the time `step` runs on a
        // dispatcher task the first real handler is Pending's re-read.
        TransactionStatus::Activated => pending::handle(ctx, tx).await,
        other => Err(ConsensusError::Config(format!(
            "no state-machine handler for status {other}"
        ))),
    }
}

/// Drives a transaction through the state machine until it reaches a
/// terminal outcome for the pending phase, is halted, or an appeal
/// resolution signal fires (spec §4.2 Loop B: "drive it... until the
/// machine yields `None`").
pub async fn drive(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<StepOutcome, ConsensusError> {
    loop {
        let outcome = step(ctx, tx).await?;
        match outcome {
            StepOutcome::Continue => continue,
            terminal => return Ok(terminal),
        }
    }
}

/// Applies a status transition, persists it, and emits the status-update
/// event — shared by every handler so no transition is ever left
/// unpersisted (spec §4.1: "each transition must be persisted before the
/// next runs").
pub(crate) async fn transition(
    ctx: &TransactionContext,
    tx: &mut Transaction,
    next: TransactionStatus,
) -> Result<(), ConsensusError> {
    let from = tx.status;
    tx.status = next;
    ctx.collaborators.store.save(tx).await?;
    ctx.collaborators
        .events
        .emit(Event::TransactionStatusUpdated {
            hash: tx.hash,
            from,
            to: next,
        })
        .await;
    tracing::debug!(target: "consensus", tx = %tx.hash, ?from, to = ?next, "transaction status updated");
    Ok(())
}
