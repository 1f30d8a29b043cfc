//! The (out-of-scope) event bus's contract with the consensus engine
//! (spec §6 "Event bus").

use accord_types::Event;
use async_trait::async_trait;

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn emit(&self, event: Event);
}
