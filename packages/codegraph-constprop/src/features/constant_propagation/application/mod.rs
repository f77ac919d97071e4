//! Constant propagation application layer

mod propagation_cache;

pub use propagation_cache::{IntegerPropagator, PropagationCache, StringPropagator};
