//! Shared models

mod cfg;
mod location;
mod statement;

pub use cfg::{BasicBlock, BlockId, CfgBuilder, CfgError, ControlFlowGraph};
pub use location::{ParseLocationError, SourceLocation};
pub use statement::{
    BinaryOp, CallArgument, CompoundOp, Expression, Statement, UnaryOp, ValueType, VariableRef,
};
