//! End-to-end scenario 5 from spec §8: a leader appeal re-enters the
//! state machine with a fresh leader after a transaction goes Undetermined.

mod support;

use accord_consensus::context::TransactionContext;
use accord_consensus::{appeal, statemachine};
use accord_types::{
    AccountId, EngineConfig, Transaction, TransactionKind, TransactionStatus, TxHash, Vote,
};

#[tokio::test]
async fn leader_appeal_on_undetermined_reruns_pending() {
    let harness = support::harness(support::pool(30), EngineConfig::default());
    harness.executor.set_default_vote(Vote::Disagree);

    let to = AccountId::from_label("contract-leader-appeal");
    let mut tx = Transaction::new_pending(
        TxHash::from_label("tx-leader-appeal"),
        None,
        Some(to),
        TransactionKind::CallContract { payload: vec![2] },
        1,
    );
    tx.config_rotation_rounds = 4;
    harness.store.insert_sync(tx.clone());

    let mut ctx = TransactionContext::new(harness.collaborators.clone(), 17);
    let outcome = statemachine::drive(&mut ctx, &mut tx).await.unwrap();
    assert_eq!(outcome, statemachine::StepOutcome::Terminal);
    assert_eq!(tx.status, TransactionStatus::Undetermined);

    // Now everyone agrees; the leader appeal should flip the outcome.
    harness.executor.set_default_vote(Vote::Agree);
    tx.appealed = true;

    appeal::run_leader_appeal(&mut ctx, &mut tx).await.unwrap();

    assert_eq!(tx.status, TransactionStatus::Accepted);
    assert!(!tx.appeal_undetermined);
    assert!(!tx.appealed);
    // A successful leader appeal resets the accumulated processing time
    // rather than folding it into the new acceptance.
    assert_eq!(tx.appeal_processing_time, 0);
}

#[tokio::test]
async fn leader_appeal_without_capacity_is_a_no_op() {
    // A pool exactly as large as the initial draw leaves no room for a
    // fresh leader once that leader and the remaining validators are
    // excluded.
    let harness = support::harness(support::pool(5), EngineConfig::default());
    harness.executor.set_default_vote(Vote::Disagree);

    let to = AccountId::from_label("contract-leader-appeal-2");
    let mut tx = Transaction::new_pending(
        TxHash::from_label("tx-leader-appeal-2"),
        None,
        Some(to),
        TransactionKind::CallContract { payload: vec![3] },
        1,
    );
    tx.config_rotation_rounds = 0;
    harness.store.insert_sync(tx.clone());

    let mut ctx = TransactionContext::new(harness.collaborators.clone(), 23);
    let outcome = statemachine::drive(&mut ctx, &mut tx).await.unwrap();
    assert_eq!(tx.status, TransactionStatus::Undetermined);
    let _ = outcome;

    tx.appealed = true;
    appeal::run_leader_appeal(&mut ctx, &mut tx).await.unwrap();

    // Still undetermined: no capacity, so the appeal is dropped.
    assert_eq!(tx.status, TransactionStatus::Undetermined);
    assert!(!tx.appealed);
    assert!(!tx.appeal_undetermined);
}
