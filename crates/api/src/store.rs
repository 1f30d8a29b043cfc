//! The storage layer's contract with the consensus engine (spec §4.7, §6
//! "Store interface"). The storage layer itself — its transactional
//! key/value engine, its journal, its persistence format — is out of scope
//! (spec §1); this crate only pins down the shape consensus code needs.

use accord_types::{AccountId, ContractSnapshot, StoreError, Transaction, TxHash};
use async_trait::async_trait;

/// A transactional store of transactions, balances, and contract state.
///
/// Every method is expected to be atomic at the call scope (spec §4.7
/// "the transactional boundary `commit()`"); `commit` exists as an explicit
/// boundary marker for implementations that batch writes within one
/// dispatcher task (e.g. across an appeal's multi-step flow).
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn get(&self, hash: TxHash) -> Result<Option<Transaction>, StoreError>;

    /// Upserts a transaction. Every state-machine transition calls this
    /// before the next handler runs (spec §4.1: "each transition must be
    /// persisted before the next runs").
    async fn save(&self, tx: &Transaction) -> Result<(), StoreError>;

    /// All transactions in `Pending`, ordered by `created_at` (Loop A).
    async fn pending_ordered(&self) -> Result<Vec<Transaction>, StoreError>;

    /// All transactions on `address` in `Accepted` or `Undetermined`,
    /// ordered by `created_at` (Loop C).
    async fn accepted_or_undetermined(
        &self,
        address: AccountId,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// All transactions on `address` with `created_at > after`, in any
    /// status (used by the rollback engine, spec §4.6 step 4).
    async fn newer_than(
        &self,
        address: AccountId,
        after: u64,
    ) -> Result<Vec<Transaction>, StoreError>;

    async fn get_balance(&self, address: AccountId) -> Result<u128, StoreError>;
    async fn set_balance(&self, address: AccountId, balance: u128) -> Result<(), StoreError>;

    async fn get_accepted_contract(
        &self,
        address: AccountId,
    ) -> Result<Option<ContractSnapshot>, StoreError>;
    async fn set_accepted_contract(
        &self,
        address: AccountId,
        snapshot: ContractSnapshot,
    ) -> Result<(), StoreError>;

    async fn get_finalized_contract(
        &self,
        address: AccountId,
    ) -> Result<Option<ContractSnapshot>, StoreError>;
    async fn set_finalized_contract(
        &self,
        address: AccountId,
        snapshot: ContractSnapshot,
    ) -> Result<(), StoreError>;

    /// Commits the writes made by the current task. A no-op for stores that
    /// commit per-call; meaningful for a batching implementation.
    async fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// The (out-of-scope) validator registry: the set of validators currently
/// eligible for selection. Stake and membership management live elsewhere.
#[async_trait]
pub trait ValidatorRegistry: Send + Sync {
    async fn all_validators(&self) -> Result<Vec<accord_types::Validator>, StoreError>;
}
