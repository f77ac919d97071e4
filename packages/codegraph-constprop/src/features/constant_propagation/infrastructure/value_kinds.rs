//! Tracked value kinds: integers and C strings

use super::constant_folder::ConstantFolder;
use crate::features::constant_propagation::ports::ValueKind;
use crate::shared::models::{CompoundOp, Expression, ValueType};

/// Integral variables, folded as `i64`
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerKind {
    folder: ConstantFolder,
}

impl IntegerKind {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValueKind for IntegerKind {
    type Value = i64;

    fn kind_name(&self) -> &'static str {
        "integer"
    }

    fn is_tracked_type(&self, ty: ValueType) -> bool {
        ty == ValueType::Integer
    }

    fn try_evaluate_constant(&self, expr: &Expression) -> Option<i64> {
        self.folder.fold_int(expr)
    }

    fn fold_compound(&self, op: CompoundOp, current: &i64, rhs: &i64) -> Option<i64> {
        self.folder.apply_binary(op.binary_op(), *current, *rhs)
    }

    fn format_value(&self, value: &i64) -> String {
        value.to_string()
    }
}

/// `char *` variables pointing at string literals
///
/// Compound assignment on a pointer is pointer arithmetic, never a constant
/// string, so the default `fold_compound` applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringKind {
    folder: ConstantFolder,
}

impl StringKind {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValueKind for StringKind {
    type Value = String;

    fn kind_name(&self) -> &'static str {
        "string"
    }

    fn is_tracked_type(&self, ty: ValueType) -> bool {
        ty == ValueType::CharPointer
    }

    fn try_evaluate_constant(&self, expr: &Expression) -> Option<String> {
        self.folder.fold_str(expr)
    }

    fn format_value(&self, value: &String) -> String {
        value.clone()
    }
}
