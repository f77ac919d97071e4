//! Compile-time constant folding over the statement IR
//!
//! Folds what a C compiler would accept in a constant expression: literals,
//! arithmetic, comparisons, logical operators (with short-circuit) and the
//! conditional operator. Variable reads never fold; their values are the
//! engine's business, not the folder's. Overflow, division by zero and
//! out-of-range shifts are not constants.

use crate::shared::models::{BinaryOp, Expression, UnaryOp};

#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantFolder;

impl ConstantFolder {
    pub fn new() -> Self {
        Self
    }

    pub fn fold_int(&self, expr: &Expression) -> Option<i64> {
        match expr {
            Expression::IntLiteral(value) => Some(*value),
            Expression::Unary(op, operand) => {
                let value = self.fold_int(operand)?;
                match op {
                    UnaryOp::Neg => value.checked_neg(),
                    UnaryOp::Not => Some((value == 0) as i64),
                    UnaryOp::BitNot => Some(!value),
                }
            }
            Expression::Binary(BinaryOp::And, lhs, rhs) => {
                if self.fold_int(lhs)? == 0 {
                    return Some(0);
                }
                Some((self.fold_int(rhs)? != 0) as i64)
            }
            Expression::Binary(BinaryOp::Or, lhs, rhs) => {
                if self.fold_int(lhs)? != 0 {
                    return Some(1);
                }
                Some((self.fold_int(rhs)? != 0) as i64)
            }
            Expression::Binary(op, lhs, rhs) => {
                let lhs = self.fold_int(lhs)?;
                let rhs = self.fold_int(rhs)?;
                self.apply_binary(*op, lhs, rhs)
            }
            Expression::Conditional(cond, then, otherwise) => {
                if self.fold_int(cond)? != 0 {
                    self.fold_int(then)
                } else {
                    self.fold_int(otherwise)
                }
            }
            Expression::StringLiteral(_)
            | Expression::Variable(_)
            | Expression::AddressOf(_)
            | Expression::Call(..)
            | Expression::Opaque => None,
        }
    }

    pub fn fold_str(&self, expr: &Expression) -> Option<String> {
        match expr {
            Expression::StringLiteral(value) => Some(value.clone()),
            Expression::Conditional(cond, then, otherwise) => {
                if self.fold_int(cond)? != 0 {
                    self.fold_str(then)
                } else {
                    self.fold_str(otherwise)
                }
            }
            _ => None,
        }
    }

    /// `lhs op rhs` on 64-bit integers, `None` when the result is not a
    /// well-defined constant
    pub fn apply_binary(&self, op: BinaryOp, lhs: i64, rhs: i64) -> Option<i64> {
        match op {
            BinaryOp::Add => lhs.checked_add(rhs),
            BinaryOp::Sub => lhs.checked_sub(rhs),
            BinaryOp::Mul => lhs.checked_mul(rhs),
            BinaryOp::Div => lhs.checked_div(rhs),
            BinaryOp::Rem => lhs.checked_rem(rhs),
            BinaryOp::Shl => lhs.checked_shl(u32::try_from(rhs).ok()?),
            BinaryOp::Shr => lhs.checked_shr(u32::try_from(rhs).ok()?),
            BinaryOp::BitAnd => Some(lhs & rhs),
            BinaryOp::BitOr => Some(lhs | rhs),
            BinaryOp::BitXor => Some(lhs ^ rhs),
            BinaryOp::Lt => Some((lhs < rhs) as i64),
            BinaryOp::Le => Some((lhs <= rhs) as i64),
            BinaryOp::Gt => Some((lhs > rhs) as i64),
            BinaryOp::Ge => Some((lhs >= rhs) as i64),
            BinaryOp::Eq => Some((lhs == rhs) as i64),
            BinaryOp::Ne => Some((lhs != rhs) as i64),
            BinaryOp::And => Some((lhs != 0 && rhs != 0) as i64),
            BinaryOp::Or => Some((lhs != 0 || rhs != 0) as i64),
        }
    }
}
