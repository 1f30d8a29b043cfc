#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented
    )
)]
//! Core data structures and error types for the Accord consensus engine.
//!
//! This crate has minimal dependencies to remain stable: it defines the
//! transaction entity, its lifecycle status, receipts, validators, consensus
//! history, configuration, and error enums. It has no knowledge of storage,
//! scheduling, or execution — those live in `accord-api`/`accord-consensus`.

pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod ids;
pub mod receipt;
pub mod transaction;
pub mod validator;

pub use config::EngineConfig;
pub use error::{ConsensusError, ErrorCode, StoreError, TransferError};
pub use events::{Event, EventLevel};
pub use history::{ConsensusHistory, RoundLabel, RoundRecord};
pub use ids::{AccountId, TxHash};
pub use receipt::{
    ExecutionMode, ExecutionResult, NodeConfig, Receipt, SubTransactionRequest, TriggerPoint, Vote,
};
pub use transaction::{ContractSnapshot, Transaction, TransactionKind, TransactionStatus};
pub use validator::Validator;
