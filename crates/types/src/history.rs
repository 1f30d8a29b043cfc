//! Append-only consensus history (spec §3 `consensus_history`, invariant I5).

use crate::receipt::Receipt;
use crate::transaction::TransactionStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The label attached to one completed round (execution, rotation, or
/// appeal), exactly as named in spec §4.1/§4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundLabel {
    Accepted,
    Undetermined,
    LeaderRotation,
    LeaderRotationAppeal,
    ValidatorAppealSuccessful,
    ValidatorAppealFailed,
    LeaderAppealSuccessful,
    LeaderAppealFailed,
    Finalized,
}

impl fmt::Display for RoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accepted => "Accepted",
            Self::Undetermined => "Undetermined",
            Self::LeaderRotation => "Leader Rotation",
            Self::LeaderRotationAppeal => "Leader Rotation Appeal",
            Self::ValidatorAppealSuccessful => "Validator Appeal Successful",
            Self::ValidatorAppealFailed => "Validator Appeal Failed",
            Self::LeaderAppealSuccessful => "Leader Appeal Successful",
            Self::LeaderAppealFailed => "Leader Appeal Failed",
            Self::Finalized => "Finalized",
        };
        f.write_str(s)
    }
}

/// One completed round of consensus, or one status-reaching event, appended
/// to a transaction's `consensus_history`.
///
/// `status_changes` is append-only and may legitimately contain more than
/// one entry per round (see SPEC_FULL.md §9, the `current_status_changes`
/// open question) — consumers must not assume exactly one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub label: RoundLabel,
    pub leader_receipt: Option<Receipt>,
    pub validator_receipts: Vec<Receipt>,
    pub status_changes: Vec<TransactionStatus>,
    pub recorded_at: u64,
}

impl RoundRecord {
    pub fn new(label: RoundLabel, recorded_at: u64) -> Self {
        Self {
            label,
            leader_receipt: None,
            validator_receipts: Vec::new(),
            status_changes: Vec::new(),
            recorded_at,
        }
    }
}

/// Append-only log of rounds for one transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsensusHistory {
    pub rounds: Vec<RoundRecord>,
}

impl ConsensusHistory {
    pub fn push(&mut self, round: RoundRecord) {
        self.rounds.push(round);
    }

    pub fn last_label(&self) -> Option<RoundLabel> {
        self.rounds.last().map(|r| r.label)
    }

    /// Reconstructs the set of previously-used leader addresses from
    /// `leader_result.node_config.address` across all rounds, plus an
    /// optional current leader receipt — spec §4.3 "Used leaders".
    pub fn used_leader_addresses(
        &self,
        current_leader_receipt: Option<&Receipt>,
    ) -> std::collections::BTreeSet<crate::ids::AccountId> {
        let mut set: std::collections::BTreeSet<_> = self
            .rounds
            .iter()
            .filter_map(|r| r.leader_receipt.as_ref())
            .map(|r| r.address())
            .collect();
        if let Some(r) = current_leader_receipt {
            set.insert(r.address());
        }
        set
    }
}
