//! End-to-end scenarios 3 and 4 from spec §8: a validator appeal that
//! flips the outcome and triggers rollback, and one that fails repeatedly.

mod support;

use accord_api::TransactionStore;
use accord_consensus::context::TransactionContext;
use accord_consensus::{appeal, statemachine};
use accord_types::{
    AccountId, EngineConfig, Transaction, TransactionKind, TransactionStatus, TxHash, Vote,
};

fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

async fn accept_fresh_transaction(
    harness: &support::Harness,
    pool_size: usize,
    seed: u64,
) -> (TransactionContext, Transaction) {
    let to = AccountId::from_label("contract-appeal");
    let mut tx = Transaction::new_pending(
        TxHash::from_label(&format!("tx-appeal-{seed}")),
        None,
        Some(to),
        TransactionKind::CallContract { payload: vec![1] },
        1,
    );
    harness.store.insert_sync(tx.clone());
    let _ = pool_size;

    let mut ctx = TransactionContext::new(harness.collaborators.clone(), seed);
    let outcome = statemachine::drive(&mut ctx, &mut tx).await.unwrap();
    assert_eq!(outcome, statemachine::StepOutcome::Terminal);
    assert_eq!(tx.status, TransactionStatus::Accepted);
    (ctx, tx)
}

#[tokio::test]
async fn validator_appeal_success_rolls_back_contract() {
    let harness = support::harness(support::pool(12), EngineConfig::default());
    let (mut ctx, mut tx) = accept_fresh_transaction(&harness, 12, 3).await;
    let address = tx.to_address.unwrap();

    let accepted_before = harness
        .store
        .get_accepted_contract(address)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted_before.state, b"ok".to_vec());

    // The enlarged panel disagrees, flipping the outcome.
    harness.executor.set_default_vote(Vote::Disagree);
    tx.appealed = true;
    tx.timestamp_appeal = Some(now());

    appeal::run_validator_appeal(&mut ctx, &mut tx).await.unwrap();

    assert_eq!(tx.status, TransactionStatus::Pending);
    assert_eq!(tx.appeal_failed, 0);
    assert!(tx.timestamp_appeal.is_none());
    assert!(tx.contract_snapshot.is_none());

    let accepted_after = harness
        .store
        .get_accepted_contract(address)
        .await
        .unwrap()
        .unwrap_or_default();
    assert_eq!(accepted_after.state, Vec::<u8>::new());
}

#[tokio::test]
async fn validator_appeal_fails_three_times() {
    let harness = support::harness(support::pool(60), EngineConfig::default());
    let (mut ctx, mut tx) = accept_fresh_transaction(&harness, 60, 5).await;
    let finalization_deadline = tx.timestamp_awaiting_finalization;
    assert!(finalization_deadline.is_some());

    for expected_failures in 1..=3u32 {
        tx.appealed = true;
        tx.timestamp_appeal = Some(now());
        appeal::run_validator_appeal(&mut ctx, &mut tx).await.unwrap();

        assert_eq!(tx.status, TransactionStatus::Accepted);
        assert_eq!(tx.appeal_failed, expected_failures);
        assert!(!tx.appealed);
        // A failed appeal deliberately leaves the appeal window timestamp in
        // place rather than resetting it.
        assert!(tx.timestamp_appeal.is_some());
    }

    // A fresh acceptance's finalization clock is never reset by a failed
    // appeal, only the processing time it's discounted against grows.
    assert_eq!(tx.timestamp_awaiting_finalization, finalization_deadline);
    assert!(tx.appeal_processing_time > 0);
}
