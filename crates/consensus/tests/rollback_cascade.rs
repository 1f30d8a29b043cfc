//! End-to-end scenario 6 from spec §8: a successful validator appeal on an
//! earlier transaction rolls back a later transaction on the same address.

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

#[tokio::test]
async fn successful_appeal_rolls_back_later_transaction() {
    let harness = support::harness(support::pool(12), EngineConfig::default());
    let to = AccountId::from_label("contract-rollback");

    let mut t1 = Transaction::new_pending(
        TxHash::from_label("tx-rollback-1"),
        None,
        Some(to),
        TransactionKind::CallContract { payload: vec![1] },
        1,
    );
    harness.store.insert_sync(t1.clone());
    let mut ctx1 = TransactionContext::new(harness.collaborators.clone(), 31);
    statemachine::drive(&mut ctx1, &mut t1).await.unwrap();
    assert_eq!(t1.status, TransactionStatus::Accepted);

    let mut t2 = Transaction::new_pending(
        TxHash::from_label("tx-rollback-2"),
        None,
        Some(to),
        TransactionKind::CallContract { payload: vec![2] },
        2,
    );
    harness.store.insert_sync(t2.clone());
    let mut ctx2 = TransactionContext::new(harness.collaborators.clone(), 37);
    statemachine::drive(&mut ctx2, &mut t2).await.unwrap();
    assert_eq!(t2.status, TransactionStatus::Accepted);

    // T1's validator appeal flips the outcome, invalidating T2's view of
    // the contract state.
    harness.executor.set_default_vote(Vote::Disagree);
    t1.appealed = true;
    t1.timestamp_appeal = Some(now());
    appeal::run_validator_appeal(&mut ctx1, &mut t1).await.unwrap();

    assert_eq!(t1.status, TransactionStatus::Pending);

    let t2_after = harness.store.get(t2.hash).await.unwrap().unwrap();
    assert_eq!(t2_after.status, TransactionStatus::Pending);
    assert!(t2_after.contract_snapshot.is_none());

    let reverted_contract = harness
        .store
        .get_accepted_contract(to)
        .await
        .unwrap()
        .unwrap_or_default();
    assert_eq!(reverted_contract.state, Vec::<u8>::new());
}
