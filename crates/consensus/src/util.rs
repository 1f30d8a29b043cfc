//! Small helpers shared across the state machine, appeal, and finalization
//! modules.

use accord_types::{
    AccountId, ContractSnapshot, SubTransactionRequest, Transaction, TransactionKind, TxHash,
    Validator,
};
use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Resolves a set of addresses back to full `Validator` records from the
/// current registry pool, preserving `addresses`' order. Addresses no
/// longer present in the pool (e.g. deregistered) are silently dropped.
pub fn resolve_validators(pool: &[Validator], addresses: &[AccountId]) -> Vec<Validator> {
    addresses
        .iter()
        .filter_map(|addr| pool.iter().find(|v| v.address == *addr).cloned())
        .collect()
}

pub fn as_address_set(validators: &[Validator]) -> BTreeSet<AccountId> {
    validators.iter().map(|v| v.address).collect()
}

/// Current wall-clock time in whole seconds since the epoch. The engine
/// never reasons about sub-second timing, so this is a thin
/// single-point-of-truth for handlers and tests that need `now()`.
/// Applies a leader receipt's opaque state delta on top of `previous`,
/// carrying the code forward unless the transaction itself deploys new
/// code (spec §3 `contract_snapshot`, §4.1 Accepted "register or update the
/// contract state").
pub fn apply_delta(
    tx: &Transaction,
    previous: &ContractSnapshot,
    delta: Option<&[u8]>,
) -> ContractSnapshot {
    let code = match &tx.kind {
        TransactionKind::DeployContract { code } => code.clone(),
        _ => previous.code.clone(),
    };
    let state = delta.map(|d| d.to_vec()).unwrap_or_else(|| previous.state.clone());
    ContractSnapshot { code, state }
}

/// Derives a stable hash for a sub-transaction spawned by a contract call,
/// so the same receipt replayed twice (e.g. after a rollback re-execution)
/// produces the same child transaction identity.
pub fn derive_sub_hash(parent: TxHash, sub: &SubTransactionRequest) -> TxHash {
    let mut hasher = DefaultHasher::new();
    parent.0.hash(&mut hasher);
    sub.from_address.map(|a| a.0).hash(&mut hasher);
    sub.to_address.map(|a| a.0).hash(&mut hasher);
    match &sub.kind {
        TransactionKind::Transfer { amount } => {
            0u8.hash(&mut hasher);
            amount.hash(&mut hasher);
        }
        TransactionKind::DeployContract { code } => {
            1u8.hash(&mut hasher);
            code.hash(&mut hasher);
        }
        TransactionKind::CallContract { payload } => {
            2u8.hash(&mut hasher);
            payload.hash(&mut hasher);
        }
    }
    let digest = hasher.finish().to_le_bytes();
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&digest);
    bytes[8..16].copy_from_slice(&parent.0[..8]);
    TxHash::from_bytes(bytes)
}

/// Derives a VRF seed from a transaction hash so that replaying the same
/// transaction (e.g. in a test harness) produces the same draw sequence.
pub fn seed_from_hash(hash: TxHash) -> u64 {
    u64::from_le_bytes(hash.0[..8].try_into().unwrap_or([0; 8]))
}

pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
