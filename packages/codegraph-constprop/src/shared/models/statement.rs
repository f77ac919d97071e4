//! Statement IR handed over by the CFG builder
//!
//! The builder classifies every statement of a basic block into one of the
//! forms below. Only the shapes that can change a variable's value are
//! distinguished; everything else is `Statement::Other`.

use serde::{Deserialize, Serialize};

use super::SourceLocation;

/// Declared type of a variable, as far as the engine cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Any integral type (`int`, `long`, `unsigned`, enums, ...)
    Integer,
    /// Pointer to char, i.e. a C string
    CharPointer,
    /// Everything else
    Other,
}

/// Named reference to a variable together with its declared type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableRef {
    pub name: String,
    pub ty: ValueType,
}

impl VariableRef {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Integer)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::CharPointer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

/// Operator of a compound assignment (`+=`, `<<=`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
}

impl CompoundOp {
    /// Binary operator the compound assignment applies
    pub fn binary_op(self) -> BinaryOp {
        match self {
            CompoundOp::Add => BinaryOp::Add,
            CompoundOp::Sub => BinaryOp::Sub,
            CompoundOp::Mul => BinaryOp::Mul,
            CompoundOp::Div => BinaryOp::Div,
            CompoundOp::Rem => BinaryOp::Rem,
            CompoundOp::Shl => BinaryOp::Shl,
            CompoundOp::Shr => BinaryOp::Shr,
            CompoundOp::BitAnd => BinaryOp::BitAnd,
            CompoundOp::BitOr => BinaryOp::BitOr,
            CompoundOp::BitXor => BinaryOp::BitXor,
        }
    }
}

/// Expression tree, reduced to what constant folding needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    IntLiteral(i64),
    StringLiteral(String),
    /// Read of a variable
    Variable(VariableRef),
    /// `&var`
    AddressOf(VariableRef),
    Unary(UnaryOp, Box<Expression>),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
    /// `cond ? then : else`
    Conditional(Box<Expression>, Box<Expression>, Box<Expression>),
    Call(String, Vec<Expression>),
    /// Anything the builder could not describe
    Opaque,
}

impl Expression {
    pub fn int(value: i64) -> Self {
        Expression::IntLiteral(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::StringLiteral(value.into())
    }

    pub fn var(variable: VariableRef) -> Self {
        Expression::Variable(variable)
    }

    pub fn address_of(variable: VariableRef) -> Self {
        Expression::AddressOf(variable)
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Expression::Unary(op, Box::new(operand))
    }

    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Self {
        Expression::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn conditional(cond: Expression, then: Expression, otherwise: Expression) -> Self {
        Expression::Conditional(Box::new(cond), Box::new(then), Box::new(otherwise))
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Call(callee.into(), args)
    }

    /// Variables whose address reaches a call somewhere inside this
    /// expression, e.g. `v` in `x = bar(&v) + 1`
    pub fn escaping_variables(&self) -> Vec<&VariableRef> {
        let mut out = Vec::new();
        self.collect_escaping(false, &mut out);
        out
    }

    fn collect_escaping<'e>(&'e self, in_call: bool, out: &mut Vec<&'e VariableRef>) {
        match self {
            Expression::AddressOf(variable) if in_call => out.push(variable),
            Expression::Unary(_, operand) => operand.collect_escaping(in_call, out),
            Expression::Binary(_, lhs, rhs) => {
                lhs.collect_escaping(in_call, out);
                rhs.collect_escaping(in_call, out);
            }
            Expression::Conditional(cond, then, otherwise) => {
                cond.collect_escaping(in_call, out);
                then.collect_escaping(in_call, out);
                otherwise.collect_escaping(in_call, out);
            }
            Expression::Call(_, args) => {
                for arg in args {
                    arg.collect_escaping(true, out);
                }
            }
            _ => {}
        }
    }
}

/// Argument of a call statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallArgument {
    pub value: Expression,
    /// Where the argument expression starts
    pub location: SourceLocation,
    /// Bound to a non-const reference parameter
    #[serde(default)]
    pub by_reference: bool,
}

impl CallArgument {
    pub fn new(value: Expression, location: SourceLocation) -> Self {
        Self {
            value,
            location,
            by_reference: false,
        }
    }

    pub fn by_reference(value: Expression, location: SourceLocation) -> Self {
        Self {
            value,
            location,
            by_reference: true,
        }
    }

    /// Variables the callee may write through this argument: `&v`, `v`
    /// bound to a mutable reference, and any `&v` handed to a call nested
    /// inside the argument expression.
    pub fn mutated_variables(&self) -> Vec<&VariableRef> {
        let mut out = Vec::new();
        match &self.value {
            Expression::Variable(variable) if self.by_reference => out.push(variable),
            value => value.collect_escaping(true, &mut out),
        }
        out
    }
}

/// Classified statement of a basic block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// `T var;` or `T var = init;`
    Declaration {
        variable: VariableRef,
        initializer: Option<Expression>,
        location: SourceLocation,
    },
    /// `var = value;`
    Assignment {
        target: VariableRef,
        value: Expression,
        location: SourceLocation,
    },
    /// `var op= value;`
    CompoundAssignment {
        target: VariableRef,
        op: CompoundOp,
        value: Expression,
        location: SourceLocation,
    },
    /// `callee(args...);`
    Call {
        callee: String,
        arguments: Vec<CallArgument>,
        location: SourceLocation,
        end_location: SourceLocation,
    },
    Other { location: SourceLocation },
}

impl Statement {
    /// Where the statement starts
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::Declaration { location, .. }
            | Statement::Assignment { location, .. }
            | Statement::CompoundAssignment { location, .. }
            | Statement::Call { location, .. }
            | Statement::Other { location } => *location,
        }
    }
}
