//! The `Proposing` handler (spec §4.1 "Proposing").

use super::{transition, StepOutcome};
use crate::context::TransactionContext;
use accord_types::{ConsensusError, ExecutionMode, Transaction, TransactionStatus};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub async fn handle(
    ctx: &mut TransactionContext,
    tx: &mut Transaction,
) -> Result<StepOutcome, ConsensusError> {
    let mut involved = std::mem::take(&mut ctx.working.involved_validators);
    let mut rng = ChaCha8Rng::seed_from_u64(ctx.next_seed());
    involved.shuffle(&mut rng);

    let leader = involved.remove(0);
    let remaining = if tx.leader_only { Vec::new() } else { involved };

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

    let receipt = ctx
        .collaborators
        .executor
        .execute(tx, ExecutionMode::Leader, &snapshot, None, &leader)
        .await;

    tx.leader_receipt = Some(receipt.clone());
    ctx.working.votes.push(receipt);
    ctx.working.remaining_validators = remaining;

    transition(ctx, tx, TransactionStatus::Committing).await?;
    Ok(StepOutcome::Continue)
}
