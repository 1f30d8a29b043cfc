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
//! In-memory reference implementations of `TransactionStore`,
//! `NodeExecutor`, and `EventBus`, for the consensus engine's own test
//! suite and for embedders without a production store.

pub mod bus;
pub mod executor;
pub mod store;

pub use bus::TracingEventBus;
pub use executor::ScriptedExecutor;
pub use store::MemStore;
