//! Error types for codegraph-constprop
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::constant_propagation::PropagationError;
use crate::shared::models::ParseLocationError;

/// Main error type for codegraph-constprop operations
#[derive(Debug, Error)]
pub enum ConstPropError {
    /// Propagation error
    #[error("Propagation error: {0}")]
    Propagation(#[from] PropagationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Location parse error
    #[error("Location error: {0}")]
    Location(#[from] ParseLocationError),
}

/// Result type alias for codegraph-constprop operations
pub type Result<T> = std::result::Result<T, ConstPropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: ConstPropError = PropagationError::unknown_function("main").into();
        assert_eq!(err.to_string(), "Propagation error: Unknown function: 'main'");

        let err: ConstPropError = ConfigError::MissingVersion.into();
        assert!(matches!(err, ConstPropError::Config(_)));

        let err: ConstPropError = "x".parse::<crate::shared::models::SourceLocation>()
            .unwrap_err()
            .into();
        assert!(matches!(err, ConstPropError::Location(_)));
    }
}
