//! Port definitions for constant propagation

mod cfg_source;
mod value_kind;

pub use cfg_source::CfgSource;
pub use value_kind::ValueKind;
