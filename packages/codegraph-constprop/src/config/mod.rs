//! Configuration system
//!
//! One validated struct, loadable from a versioned YAML file.
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_constprop::config::PropagationConfig;
//!
//! let config = PropagationConfig::from_yaml("constprop.yaml")?;
//! ```

pub mod error;
pub mod io;
pub mod propagation_config;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigFileV1;
pub use propagation_config::PropagationConfig;
pub use validation::Validatable;
