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
//! Dyn-safe trait boundaries to the consensus engine's external
//! collaborators: the storage layer, the node executor, and the event bus.
//! All three are explicitly out of scope per spec §1 — this crate exists so
//! `accord-consensus` can be written against stable interfaces instead of
//! concrete implementations.

pub mod events;
pub mod executor;
pub mod store;

pub use events::EventBus;
pub use executor::NodeExecutor;
pub use store::{TransactionStore, ValidatorRegistry};
