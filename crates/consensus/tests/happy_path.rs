//! End-to-end scenario 1 from spec §8: one transaction, five validators all
//! agree.

mod support;

use accord_consensus::context::TransactionContext;
use accord_consensus::statemachine::{self, StepOutcome};
use accord_types::{AccountId, EngineConfig, Transaction, TransactionKind, TransactionStatus, TxHash};

#[tokio::test]
async fn five_validators_all_agree_reaches_accepted() {
    let harness = support::harness(support::pool(5), EngineConfig::default());
    let to = AccountId::from_label("contract-1");

    let mut tx = Transaction::new_pending(
        TxHash::from_label("tx-1"),
        None,
        Some(to),
        TransactionKind::CallContract {
            payload: vec![1, 2, 3],
        },
        1,
    );
    harness.store.insert_sync(tx.clone());

    let mut ctx = TransactionContext::new(harness.collaborators.clone(), 7);
    let outcome = statemachine::drive(&mut ctx, &mut tx).await.unwrap();

    assert_eq!(outcome, StepOutcome::Terminal);
    assert_eq!(tx.status, TransactionStatus::Accepted);
    // 1 leader + 4 validators.
    assert_eq!(harness.executor.execution_count(), 5);
}

#[tokio::test]
async fn transfer_skips_consensus_and_finalizes() {
    let harness = support::harness(support::pool(5), EngineConfig::default());
    let from = AccountId::from_label("alice");
    let to = AccountId::from_label("bob");
    harness.store.set_balance_sync(from, 100);

    let mut tx = Transaction::new_pending(
        TxHash::from_label("tx-transfer"),
        Some(from),
        Some(to),
        TransactionKind::Transfer { amount: 40 },
        1,
    );
    harness.store.insert_sync(tx.clone());

    let mut ctx = TransactionContext::new(harness.collaborators.clone(), 1);
    let outcome = statemachine::drive(&mut ctx, &mut tx).await.unwrap();

    assert_eq!(outcome, StepOutcome::Terminal);
    assert_eq!(tx.status, TransactionStatus::Finalized);
    assert_eq!(harness.executor.execution_count(), 0);
}

#[tokio::test]
async fn transfer_with_insufficient_balance_is_undetermined() {
    let harness = support::harness(support::pool(5), EngineConfig::default());
    let from = AccountId::from_label("alice");
    let to = AccountId::from_label("bob");
    harness.store.set_balance_sync(from, 5);

    let mut tx = Transaction::new_pending(
        TxHash::from_label("tx-transfer-2"),
        Some(from),
        Some(to),
        TransactionKind::Transfer { amount: 40 },
        1,
    );
    harness.store.insert_sync(tx.clone());

    let mut ctx = TransactionContext::new(harness.collaborators.clone(), 1);
    let outcome = statemachine::drive(&mut ctx, &mut tx).await.unwrap();

    assert_eq!(outcome, StepOutcome::Terminal);
    assert_eq!(tx.status, TransactionStatus::Undetermined);
}
