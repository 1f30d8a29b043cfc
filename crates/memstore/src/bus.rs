//! A `tracing`-backed `EventBus`: logs every event at an appropriate level
//! instead of forwarding it to a real message bus (out of scope).

use accord_api::EventBus;
use accord_types::{Event, EventLevel};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Default)]
pub struct TracingEventBus {
    recorded: Mutex<Vec<Event>>,
}

impl TracingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Event> {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl EventBus for TracingEventBus {
    async fn emit(&self, event: Event) {
        match &event {
            Event::TransactionStatusUpdated { hash, from, to } => {
                tracing::info!(target: "consensus::events", tx = %hash, ?from, ?to, "status updated");
            }
            Event::ConsensusEvent {
                level,
                scope,
                message,
            } => match level {
                EventLevel::Info => tracing::info!(target: "consensus::events", tx = %scope, "{message}"),
                EventLevel::Success => tracing::info!(target: "consensus::events", tx = %scope, "{message}"),
                EventLevel::Error => tracing::error!(target: "consensus::events", tx = %scope, "{message}"),
            },
            Event::TransactionAppealUpdated { hash, appealed } => {
                tracing::info!(target: "consensus::events", tx = %hash, appealed, "appeal flag updated");
            }
        }
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}
