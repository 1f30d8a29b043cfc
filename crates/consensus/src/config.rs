//! The in-process stand-in for the admin RPC surface spec §6 marks out of
//! scope: a shared, mutable handle onto `EngineConfig` that the scheduler
//! loops read every tick and that an embedding application can update
//! without restarting the engine.

use accord_types::EngineConfig;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct EngineConfigHandle(Arc<RwLock<EngineConfig>>);

impl EngineConfigHandle {
    pub fn new(config: EngineConfig) -> Self {
        Self(Arc::new(RwLock::new(config)))
    }

    pub async fn get(&self) -> EngineConfig {
        self.0.read().await.clone()
    }

    pub async fn set_finality_window_secs(&self, secs: u64) {
        self.0.write().await.finality_window_secs = secs;
    }

    pub async fn set_poll_interval_secs(&self, secs: u64) {
        self.0.write().await.poll_interval_secs = secs;
    }
}

impl Default for EngineConfigHandle {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
