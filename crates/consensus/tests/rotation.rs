//! End-to-end scenario 2 from spec §8: every validator disagrees, forcing
//! leader rotation until `config_rotation_rounds` is exhausted.

mod support;

use accord_consensus::context::TransactionContext;
use accord_consensus::statemachine::{self, StepOutcome};
use accord_types::{
    AccountId, EngineConfig, Transaction, TransactionKind, TransactionStatus, TxHash, Vote,
};

#[tokio::test]
async fn all_disagree_rotates_until_undetermined() {
    // A generous pool keeps every rotation's exclusion set (current
    // validators plus every previously-used leader) well short of
    // exhausting the candidate pool, so all three rotations succeed.
    let harness = support::harness(support::pool(20), EngineConfig::default());
    harness.executor.set_default_vote(Vote::Disagree);

    let to = AccountId::from_label("contract-2");
    let mut tx = Transaction::new_pending(
        TxHash::from_label("tx-rotation"),
        None,
        Some(to),
        TransactionKind::CallContract { payload: vec![9] },
        1,
    );
    tx.config_rotation_rounds = 3;
    harness.store.insert_sync(tx.clone());

    let mut ctx = TransactionContext::new(harness.collaborators.clone(), 11);
    let outcome = statemachine::drive(&mut ctx, &mut tx).await.unwrap();

    assert_eq!(outcome, StepOutcome::Terminal);
    assert_eq!(tx.status, TransactionStatus::Undetermined);
    assert_eq!(
        tx.consensus_history
            .rounds
            .iter()
            .filter(|r| matches!(
                r.label,
                accord_types::RoundLabel::LeaderRotation | accord_types::RoundLabel::LeaderRotationAppeal
            ))
            .count(),
        3
    );
    // 4 rounds (initial + 3 rotations) * (1 leader + 4 validators) = 20.
    assert_eq!(harness.executor.execution_count(), 20);
}
