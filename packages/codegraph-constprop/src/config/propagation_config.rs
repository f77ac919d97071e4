//! Constant propagation configuration

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigFileV1, SUPPORTED_VERSIONS};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAX_BLOCKS_LIMIT: usize = 1_000_000;

/// Constant propagation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropagationConfig {
    /// Memoize one analysis per function
    pub enable_cache: bool,

    /// Compact value histories after the walk. Lookups answer the same
    /// either way; disabling keeps raw entries in dumps.
    pub squash_history: bool,

    /// Reject functions with more blocks than this (0 = unlimited, else 1..=1000000)
    pub max_blocks: usize,

    /// Invalidate what a single-block self-loop mutates on entry to it
    pub invalidate_self_loops: bool,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            enable_cache: true,
            squash_history: true,
            max_blocks: 0,
            invalidate_self_loops: true,
        }
    }
}

impl PropagationConfig {
    /// `true` if a function of `blocks` blocks may be analyzed
    pub fn admits(&self, blocks: usize) -> bool {
        self.max_blocks == 0 || blocks <= self.max_blocks
    }

    /// Load from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse from YAML text and validate
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        file.propagation.validate()?;
        Ok(file.propagation)
    }

    /// Export as versioned YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            propagation: self.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl Validatable for PropagationConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_blocks > MAX_BLOCKS_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_blocks",
                self.max_blocks,
                1,
                MAX_BLOCKS_LIMIT,
                "Use 0 to disable the limit",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PropagationConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.enable_cache);
        assert!(config.squash_history);
        assert!(config.invalidate_self_loops);
    }

    #[test]
    fn test_block_limit() {
        let unlimited = PropagationConfig::default();
        assert!(unlimited.admits(10_000_000));

        let limited = PropagationConfig {
            max_blocks: 10,
            ..PropagationConfig::default()
        };
        assert!(limited.admits(10));
        assert!(!limited.admits(11));
    }

    #[test]
    fn test_range_validation() {
        let config = PropagationConfig {
            max_blocks: MAX_BLOCKS_LIMIT + 1,
            ..PropagationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_blocks"));
    }
}
