//! An in-memory `TransactionStore` + `ValidatorRegistry`, grounded on the
//! teacher's test-harness state store convention: synchronous interior
//! mutability behind a `Mutex`, with no actual persistence.

use accord_api::{TransactionStore, ValidatorRegistry};
use accord_types::{AccountId, ContractSnapshot, StoreError, Transaction, TransactionStatus, TxHash, Validator};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemStore {
    transactions: Mutex<HashMap<TxHash, Transaction>>,
    balances: Mutex<HashMap<AccountId, u128>>,
    accepted_contracts: Mutex<HashMap<AccountId, ContractSnapshot>>,
    finalized_contracts: Mutex<HashMap<AccountId, ContractSnapshot>>,
    validators: Mutex<Vec<Validator>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validators(validators: Vec<Validator>) -> Self {
        let store = Self::new();
        *store.validators.lock().unwrap_or_else(|e| e.into_inner()) = validators;
        store
    }

    pub fn set_balance_sync(&self, address: AccountId, balance: u128) {
        self.balances
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(address, balance);
    }

    pub fn insert_sync(&self, tx: Transaction) {
        self.transactions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(tx.hash, tx);
    }

    pub fn get_sync(&self, hash: TxHash) -> Option<Transaction> {
        self.transactions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&hash)
            .cloned()
    }
}

#[async_trait]
impl TransactionStore for MemStore {
    async fn get(&self, hash: TxHash) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .transactions
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .get(&hash)
            .cloned())
    }

    async fn save(&self, tx: &Transaction) -> Result<(), StoreError> {
        self.transactions
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(tx.hash, tx.clone());
        Ok(())
    }

    async fn pending_ordered(&self) -> Result<Vec<Transaction>, StoreError> {
        let mut txs: Vec<Transaction> = self
            .transactions
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .values()
            .filter(|t| t.status == TransactionStatus::Pending)
            .cloned()
            .collect();
        txs.sort_by_key(|t| t.created_at);
        Ok(txs)
    }

    async fn accepted_or_undetermined(
        &self,
        address: AccountId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut txs: Vec<Transaction> = self
            .transactions
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .values()
            .filter(|t| {
                t.to_address == Some(address)
                    && matches!(
                        t.status,
                        TransactionStatus::Accepted | TransactionStatus::Undetermined
                    )
            })
            .cloned()
            .collect();
        txs.sort_by_key(|t| t.created_at);
        Ok(txs)
    }

    async fn newer_than(
        &self,
        address: AccountId,
        after: u64,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut txs: Vec<Transaction> = self
            .transactions
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .values()
            .filter(|t| t.to_address == Some(address) && t.created_at > after)
            .cloned()
            .collect();
        txs.sort_by_key(|t| t.created_at);
        Ok(txs)
    }

    async fn get_balance(&self, address: AccountId) -> Result<u128, StoreError> {
        Ok(self
            .balances
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .get(&address)
            .copied()
            .unwrap_or(0))
    }

    async fn set_balance(&self, address: AccountId, balance: u128) -> Result<(), StoreError> {
        self.balances
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(address, balance);
        Ok(())
    }

    async fn get_accepted_contract(
        &self,
        address: AccountId,
    ) -> Result<Option<ContractSnapshot>, StoreError> {
        Ok(self
            .accepted_contracts
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .get(&address)
            .cloned())
    }

    async fn set_accepted_contract(
        &self,
        address: AccountId,
        snapshot: ContractSnapshot,
    ) -> Result<(), StoreError> {
        self.accepted_contracts
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(address, snapshot);
        Ok(())
    }

    async fn get_finalized_contract(
        &self,
        address: AccountId,
    ) -> Result<Option<ContractSnapshot>, StoreError> {
        Ok(self
            .finalized_contracts
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .get(&address)
            .cloned())
    }

    async fn set_finalized_contract(
        &self,
        address: AccountId,
        snapshot: ContractSnapshot,
    ) -> Result<(), StoreError> {
        self.finalized_contracts
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(address, snapshot);
        Ok(())
    }
}

#[async_trait]
impl ValidatorRegistry for MemStore {
    async fn all_validators(&self) -> Result<Vec<Validator>, StoreError> {
        Ok(self
            .validators
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .clone())
    }
}
