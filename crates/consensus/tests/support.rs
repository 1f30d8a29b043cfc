//! Shared test harness: builds a `Collaborators` bundle wired to
//! `accord-memstore`'s in-memory implementations.
#![allow(dead_code)]

use accord_consensus::{AddressRegistry, Collaborators, EngineConfigHandle};
use accord_memstore::{MemStore, ScriptedExecutor, TracingEventBus};
use accord_types::{AccountId, EngineConfig, Validator};
use std::sync::Arc;

pub fn validator(label: &str, stake: u128) -> Validator {
    Validator {
        address: AccountId::from_label(label),
        stake,
        llm_config: String::new(),
    }
}

pub fn pool(n: usize) -> Vec<Validator> {
    (0..n).map(|i| validator(&format!("v{i}"), 10)).collect()
}

pub struct Harness {
    pub store: Arc<MemStore>,
    pub executor: Arc<ScriptedExecutor>,
    pub events: Arc<TracingEventBus>,
    pub collaborators: Collaborators,
}

pub fn harness(validators: Vec<Validator>, config: EngineConfig) -> Harness {
    let store = Arc::new(MemStore::with_validators(validators));
    let executor = Arc::new(ScriptedExecutor::new(accord_types::Vote::Agree));
    let events = Arc::new(TracingEventBus::new());
    let collaborators = Collaborators {
        store: store.clone(),
        executor: executor.clone(),
        events: events.clone(),
        validators: store.clone(),
        config: EngineConfigHandle::new(config),
        addresses: AddressRegistry::new(),
    };
    Harness {
        store,
        executor,
        events,
        collaborators,
    }
}
