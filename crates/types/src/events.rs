//! Events produced onto the (out-of-scope) event bus — spec §6 "Event bus".

use crate::ids::TxHash;
use crate::transaction::TransactionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Success,
    Error,
}

/// The named events the engine emits, as listed in spec §6.
#[derive(Debug, Clone)]
pub enum Event {
    TransactionStatusUpdated {
        hash: TxHash,
        from: TransactionStatus,
        to: TransactionStatus,
    },
    ConsensusEvent {
        level: EventLevel,
        scope: TxHash,
        message: String,
    },
    TransactionAppealUpdated {
        hash: TxHash,
        appealed: bool,
    },
}
