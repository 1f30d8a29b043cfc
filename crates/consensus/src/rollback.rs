//! The Rollback Engine (spec §4.6): reverts newer transactions on an
//! address to `Pending` after a successful appeal invalidated them.

use crate::context::TransactionContext;
use accord_types::{ConsensusError, Transaction, TransactionStatus};
use std::time::Duration;

/// Bounded wait for `running[address]` to clear (design note §9 "Rollback
/// busy-wait": bounded instead of an unbounded poll loop).
const MAX_WAIT_ATTEMPTS: u32 = 30;
const WAIT_INTERVAL: Duration = Duration::from_millis(200);

/// Runs the five-step rollback cascade for every transaction on `tx`'s
/// address newer than `tx` itself.
pub async fn run(ctx: &mut TransactionContext, tx: &Transaction) -> Result<(), ConsensusError> {
    let Some(address) = tx.to_address else {
        return Ok(());
    };
    let state = ctx.collaborators.addresses.entry(address).await;

    // 1. Raise stop_flag[address].
    {
        let mut guard = state.lock().await;
        guard.stop_flag = true;
    }

    // 2. Bounded wait until running[address] becomes false.
    let mut waited = 0;
    loop {
        let running = state.lock().await.running;
        if !running {
            break;
        }
        if waited >= MAX_WAIT_ATTEMPTS {
            tracing::warn!(target: "consensus", address = %address, "rollback proceeding after bounded wait for dispatcher to quiesce");
            break;
        }
        waited += 1;
        tokio::time::sleep(WAIT_INTERVAL).await;
    }

    // 3. Replace the per-address queue with an empty one.
    {
        let mut guard = state.lock().await;
        guard.queue.clear();
    }

    // 4. Reset every newer transaction on the address to Pending.
    let newer = ctx
        .collaborators
        .store
        .newer_than(address, tx.created_at)
        .await?;
    for mut stale in newer {
        if stale.hash == tx.hash {
            continue;
        }
        stale.status = TransactionStatus::Pending;
        stale.contract_snapshot = None;
        ctx.collaborators.store.save(&stale).await?;
        tracing::info!(target: "consensus", tx = %stale.hash, "rolled back to pending");
    }

    // 5. Lower stop_flag[address].
    {
        let mut guard = state.lock().await;
        guard.stop_flag = false;
    }

    Ok(())
}
