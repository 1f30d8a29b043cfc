//! The validator registry's view of a single validator (consumed, not owned
//! by this crate — spec §3 "Validator (consumed, not owned)").

use crate::ids::AccountId;
use serde::{Deserialize, Serialize};

/// A validator candidate eligible for stake-weighted selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub address: AccountId,
    /// Must be positive; zero/negative stake candidates are rejected by the
    /// caller before reaching the VRF (see `accord_consensus::vrf`).
    pub stake: u128,
    /// Opaque LLM sidecar configuration (model, provider, params). The
    /// engine never interprets this; it is out of scope per spec §1.
    pub llm_config: String,
}
