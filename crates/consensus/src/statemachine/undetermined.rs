//! The `Undetermined` handler (spec §4.1 "Undetermined").

use super::{transition, StepOutcome};
use crate::context::TransactionContext;
use crate::util;
use accord_types::{ConsensusError, RoundLabel, RoundRecord, Transaction, TransactionStatus};

pub async fn handle(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<StepOutcome, ConsensusError> {
    let now = util::now_secs();

    let label = if tx.appeal_undetermined {
        if let Some(requested_at) = tx.timestamp_appeal {
            tx.appeal_processing_time += now.saturating_sub(requested_at);
        }
        tx.appeal_undetermined = false;
        RoundLabel::LeaderAppealFailed
    } else {
        if tx.timestamp_awaiting_finalization.is_none() {
            tx.timestamp_awaiting_finalization = Some(now);
        }
        RoundLabel::Undetermined
    };

    if tx.contract_snapshot.is_none() {
        if let Some(address) = tx.to_address {
            let previous = ctx
                .collaborators
                .store
                .get_accepted_contract(address)
                .await?
                .unwrap_or_default();
            tx.contract_snapshot = Some(previous);
        }
    }

    let mut round = RoundRecord::new(label, now);
    round.leader_receipt = tx.leader_receipt.clone();
    round.validator_receipts = tx.validator_receipts.clone();
    round.status_changes.push(TransactionStatus::Undetermined);
    tx.consensus_history.push(round);

    transition(ctx, tx, TransactionStatus::Undetermined).await?;
    Ok(StepOutcome::Terminal)
}
