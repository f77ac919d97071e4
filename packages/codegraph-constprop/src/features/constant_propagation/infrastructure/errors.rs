/*
 * Constant Propagation Error Types
 *
 * The analysis itself never fails: uncertainty is reported as Unresolved or
 * "no opinion". These errors only cover collaborator problems:
 * - CFG source does not know the function
 * - CFG is structurally broken
 * - CFG exceeds the configured block limit
 */

use thiserror::Error;

use crate::config::ConfigError;
use crate::shared::models::CfgError;

/// Constant propagation error type
#[derive(Debug, Error)]
pub enum PropagationError {
    /// CFG source has no body for this function
    #[error("Unknown function: '{function_id}'")]
    UnknownFunction { function_id: String },

    /// CFG failed structural validation
    #[error("Invalid CFG for '{function_id}': {source}")]
    InvalidCfg {
        function_id: String,
        #[source]
        source: CfgError,
    },

    /// CFG is larger than the configured limit
    #[error("Function '{function_id}' has {blocks} blocks, limit is {limit}")]
    BlockLimitExceeded {
        function_id: String,
        blocks: usize,
        limit: usize,
    },

    /// CFG source failed for a reason of its own
    #[error("CFG source failed for '{function_id}': {message}")]
    Source { function_id: String, message: String },

    /// JSON export failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PropagationError {
    pub fn unknown_function(function_id: impl Into<String>) -> Self {
        Self::UnknownFunction {
            function_id: function_id.into(),
        }
    }
}

/// Result type for constant propagation operations
pub type AnalysisResult<T> = Result<T, PropagationError>;
