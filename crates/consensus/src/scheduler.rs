//! The three cooperating scheduler loops (spec §4.2): the Crawler (A), the
//! Dispatcher (B), and the Appeal Window (C). Grounded on the teacher's
//! `time::interval` + `tokio::select!` + `watch::Receiver<bool>`
//! orchestration loops.

use crate::appeal;
use crate::context::{Collaborators, TransactionContext};
use crate::finalize;
use crate::statemachine;
use crate::util;
use accord_types::{ConsensusError, Transaction, TransactionStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns the shared collaborators and spawns the three loops.
#[derive(Clone)]
pub struct Engine {
    collaborators: Collaborators,
}

impl Engine {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Spawns Loop A, Loop B, and Loop C as independent tasks, all watching
    /// the same shutdown signal (SPEC_FULL.md §4.2 addendum).
    pub fn spawn(&self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        vec![
            tokio::spawn(run_crawler(self.collaborators.clone(), shutdown.clone())),
            tokio::spawn(run_dispatcher(self.collaborators.clone(), shutdown.clone())),
            tokio::spawn(run_appeal_window(self.collaborators.clone(), shutdown)),
        ]
    }
}

async fn poll_interval(collaborators: &Collaborators) -> tokio::time::Interval {
    let secs = collaborators.config.get().await.poll_interval_secs.max(1);
    tokio::time::interval(std::time::Duration::from_secs(secs))
}

/// Loop A — scans `Pending`, enqueues per-address, and advances the status
/// to `Activated` so it isn't re-enqueued next tick (spec §4.2 Loop A).
async fn run_crawler(collaborators: Collaborators, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = poll_interval(&collaborators).await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = crawl_once(&collaborators).await {
                    tracing::error!(target: "consensus", error = %err, "crawler tick failed");
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!(target: "consensus", "crawler stopping");
                    return;
                }
            }
        }
    }
}

async fn crawl_once(collaborators: &Collaborators) -> Result<(), ConsensusError> {
    let pending = collaborators.store.pending_ordered().await?;
    for mut tx in pending {
        let Some(address) = tx.to_address else {
            continue;
        };
        let state = collaborators.addresses.entry(address).await;
        let mut guard = state.lock().await;
        if guard.stop_flag {
            continue;
        }
        guard.queue.push_back(tx.hash);
        drop(guard);

        tx.status = TransactionStatus::Activated;
        collaborators.store.save(&tx).await?;
    }
    Ok(())
}

/// Loop B — pops one queued transaction per idle address and drives it
/// through the state machine on its own task (spec §4.2 Loop B).
async fn run_dispatcher(collaborators: Collaborators, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = poll_interval(&collaborators).await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                dispatch_once(&collaborators).await;
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!(target: "consensus", "dispatcher stopping");
                    return;
                }
            }
        }
    }
}

async fn dispatch_once(collaborators: &Collaborators) {
    for address in collaborators.addresses.addresses().await {
        let state = collaborators.addresses.entry(address).await;
        let hash = {
            let mut guard = state.lock().await;
            if guard.stop_flag || guard.running {
                continue;
            }
            let Some(hash) = guard.queue.pop_front() else {
                continue;
            };
            guard.running = true;
            hash
        };

        let collaborators = collaborators.clone();
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(err) = drive_one(&collaborators, hash).await {
                tracing::error!(target: "consensus", tx = %hash, error = %err, "dispatcher drive failed");
            }
            state.lock().await.running = false;
        });
    }
}

async fn drive_one(collaborators: &Collaborators, hash: accord_types::TxHash) -> Result<(), ConsensusError> {
    let Some(mut tx) = collaborators.store.get(hash).await? else {
        return Ok(());
    };
    let seed = util::seed_from_hash(hash);
    let mut ctx = TransactionContext::new(collaborators.clone(), seed);
    statemachine::drive(&mut ctx, &mut tx).await?;
    collaborators.store.commit().await?;
    Ok(())
}

/// Loop C — walks each address's Accepted/Undetermined run and finalizes or
/// processes an appeal (spec §4.2 Loop C).
async fn run_appeal_window(collaborators: Collaborators, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = poll_interval(&collaborators).await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = appeal_window_once(&collaborators).await {
                    tracing::error!(target: "consensus", error = %err, "appeal window tick failed");
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!(target: "consensus", "appeal window stopping");
                    return;
                }
            }
        }
    }
}

async fn appeal_window_once(collaborators: &Collaborators) -> Result<(), ConsensusError> {
    for address in collaborators.addresses.addresses().await {
        let mut run = collaborators.store.accepted_or_undetermined(address).await?;
        run.sort_by_key(|t| t.created_at);

        for i in 0..run.len() {
            let predecessor = if i == 0 { None } else { Some(run[i - 1].clone()) };
            process_one(collaborators, &mut run[i], predecessor.as_ref()).await?;
        }
    }
    Ok(())
}

async fn process_one(
    collaborators: &Collaborators,
    tx: &mut Transaction,
    predecessor: Option<&Transaction>,
) -> Result<(), ConsensusError> {
    let config = collaborators.config.get().await;
    let now = util::now_secs();
    let seed = util::seed_from_hash(tx.hash);
    let mut ctx = TransactionContext::new(collaborators.clone(), seed);

    if !tx.appealed && finalize::can_finalize(tx, predecessor, now, &config) {
        finalize::handle(&mut ctx, tx).await?;
    } else if tx.appealed && tx.status == TransactionStatus::Undetermined {
        appeal::run_leader_appeal(&mut ctx, tx).await?;
    } else if tx.appealed {
        appeal::run_validator_appeal(&mut ctx, tx).await?;
    }

    Ok(())
}
