//! Process-wide, admin-mutable engine configuration (spec §6 "Admin surface").

use serde::{Deserialize, Serialize};

/// Default number of validators drawn for a fresh (non-appeal, non-rollback)
/// transaction. See spec §4.3.
pub const DEFAULT_VALIDATORS_COUNT: usize = 5;

/// Default number of leader-rotation attempts before a transaction is
/// declared Undetermined. See spec §4.1 Revealing.
pub const DEFAULT_ROTATION_ROUNDS: u32 = 3;

/// Default bound on concurrent validator executions within one Committing
/// round. See spec §5.
pub const DEFAULT_COMMITTING_CONCURRENCY: usize = 8;

/// Tunable engine configuration, loadable from a TOML file and mutable at
/// runtime through [`crate::config::EngineConfig::finality_window_secs`] /
/// `poll_interval_secs` style admin calls (the in-process stand-in for the
/// admin RPC surface spec.md marks out of scope).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How often the Crawler/Dispatcher/Appeal-Window loops tick.
    pub poll_interval_secs: u64,
    /// Seconds a transaction must sit in Accepted/Undetermined before it is
    /// eligible for finalization (minus appeal processing time).
    pub finality_window_secs: u64,
    /// Default validator-set size for a fresh transaction.
    pub default_validator_count: usize,
    /// Bound on concurrent validator node executions per Committing round.
    pub max_committing_concurrency: usize,
    /// Per-call deadline for a single node execution.
    pub node_execution_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            finality_window_secs: 15,
            default_validator_count: DEFAULT_VALIDATORS_COUNT,
            max_committing_concurrency: DEFAULT_COMMITTING_CONCURRENCY,
            node_execution_timeout_secs: 300,
        }
    }
}

impl EngineConfig {
    /// Parses configuration from a TOML document, falling back to defaults
    /// for any field left unspecified.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        #[derive(Deserialize, Default)]
        struct Partial {
            poll_interval_secs: Option<u64>,
            finality_window_secs: Option<u64>,
            default_validator_count: Option<usize>,
            max_committing_concurrency: Option<usize>,
            node_execution_timeout_secs: Option<u64>,
        }
        let partial: Partial = toml::from_str(s)?;
        let defaults = Self::default();
        Ok(Self {
            poll_interval_secs: partial.poll_interval_secs.unwrap_or(defaults.poll_interval_secs),
            finality_window_secs: partial
                .finality_window_secs
                .unwrap_or(defaults.finality_window_secs),
            default_validator_count: partial
                .default_validator_count
                .unwrap_or(defaults.default_validator_count),
            max_committing_concurrency: partial
                .max_committing_concurrency
                .unwrap_or(defaults.max_committing_concurrency),
            node_execution_timeout_secs: partial
                .node_execution_timeout_secs
                .unwrap_or(defaults.node_execution_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_roundtrip_through_empty_toml() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.poll_interval_secs, 5);
        assert_eq!(cfg.finality_window_secs, 15);
    }

    #[test]
    fn partial_overrides_apply() {
        let cfg = EngineConfig::from_toml_str("finality_window_secs = 42\n").unwrap();
        assert_eq!(cfg.finality_window_secs, 42);
        assert_eq!(cfg.poll_interval_secs, 5);
    }
}
