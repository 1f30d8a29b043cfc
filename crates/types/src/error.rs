//! Error types for the consensus engine, grouped by domain.

use crate::ids::AccountId;
use thiserror::Error;

/// Assigns a stable, machine-readable string code to an error variant, for
/// structured logging and metrics correlation.
pub trait ErrorCode {
    fn code(&self) -> &'static str;
}

/// Errors surfaced by a `TransactionStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transaction not found: {0:?}")]
    NotFound(crate::ids::TxHash),
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "STORE_NOT_FOUND",
            Self::Backend(_) => "STORE_BACKEND_ERROR",
            Self::Serialization(_) => "STORE_SERIALIZATION_ERROR",
        }
    }
}

/// Errors related to driving the consensus state machine for one transaction.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// No validators were available to form the involved set (§4.1 Pending).
    #[error("no validators available for transaction")]
    NoValidators,
    /// §4.4/§4.3: the appeal formula could not draw enough fresh validators.
    #[error("appeal capacity exhausted: {0}")]
    AppealCapacityExhausted(String),
    /// §9 open question: appeal requested on a transaction whose status does
    /// not admit one.
    #[error("transaction {hash:?} is not in an appealable status: {status}")]
    NotAppealable {
        hash: crate::ids::TxHash,
        status: String,
    },
    /// Propagated from the store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// A config/data invariant was violated badly enough to halt processing
    /// of this transaction (it stays in its current status).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ErrorCode for ConsensusError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoValidators => "CONSENSUS_NO_VALIDATORS",
            Self::AppealCapacityExhausted(_) => "CONSENSUS_APPEAL_CAPACITY_EXHAUSTED",
            Self::NotAppealable { .. } => "CONSENSUS_NOT_APPEALABLE",
            Self::Store(_) => "CONSENSUS_STORE_ERROR",
            Self::Config(_) => "CONSENSUS_CONFIG_ERROR",
        }
    }
}

/// Errors related to a single Transfer transaction.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("insufficient funds in account {0:?}")]
    InsufficientFunds(AccountId),
}

impl ErrorCode for TransferError {
    fn code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds(_) => "TRANSFER_INSUFFICIENT_FUNDS",
        }
    }
}
