use serde::Serialize;
use std::fmt::Debug;

use crate::shared::models::{CompoundOp, Expression, ValueType};

/// Capabilities the engine needs for one kind of tracked value
///
/// The traversal, merge and history logic is shared; an implementation only
/// says which variables it cares about and how to fold expressions.
pub trait ValueKind {
    type Value: Clone + Ord + Debug + Serialize;

    /// Short name used in logs
    fn kind_name(&self) -> &'static str;

    /// Does this kind track variables declared with `ty`?
    fn is_tracked_type(&self, ty: ValueType) -> bool;

    /// Fold `expr` to a compile-time constant of this kind
    fn try_evaluate_constant(&self, expr: &Expression) -> Option<Self::Value>;

    /// Result of `current op= rhs`, if it is still a constant
    fn fold_compound(
        &self,
        op: CompoundOp,
        current: &Self::Value,
        rhs: &Self::Value,
    ) -> Option<Self::Value> {
        let _ = (op, current, rhs);
        None
    }

    /// Text shown between quotes in dumps
    fn format_value(&self, value: &Self::Value) -> String;
}
