//! Configuration I/O (YAML loading)
//!
//! Defines the versioned YAML schema. Conversion to and from
//! `PropagationConfig` lives in propagation_config.rs.

use super::propagation_config::PropagationConfig;
use serde::{Deserialize, Serialize};

/// Versions this crate can read
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
///
/// ```yaml
/// version: 1
/// propagation:
///   enable_cache: true
///   max_blocks: 5000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1). Optional only so a missing field
    /// can be reported precisely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default)]
    pub propagation: PropagationConfig,
}
