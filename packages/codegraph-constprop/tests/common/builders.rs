//! Statement builders
//!
//! Locations follow one convention: a statement starts at column 1 of its
//! line, and the n-th call argument sits at column `5 + 4 * n`.

use codegraph_constprop::shared::models::{
    CallArgument, CompoundOp, Expression, SourceLocation, Statement, VariableRef,
};

pub fn loc(line: u32, column: u32) -> SourceLocation {
    SourceLocation::new(line, column)
}

/// Location of the `index`-th argument of a call on `line`
pub fn arg_location(line: u32, index: usize) -> SourceLocation {
    loc(line, 5 + 4 * index as u32)
}

pub fn int(name: &str) -> VariableRef {
    VariableRef::integer(name)
}

pub fn string(name: &str) -> VariableRef {
    VariableRef::string(name)
}

pub fn declare_int(name: &str, value: i64, line: u32) -> Statement {
    Statement::Declaration {
        variable: int(name),
        initializer: Some(Expression::int(value)),
        location: loc(line, 5),
    }
}

pub fn declare_str(name: &str, value: &str, line: u32) -> Statement {
    Statement::Declaration {
        variable: string(name),
        initializer: Some(Expression::string(value)),
        location: loc(line, 7),
    }
}

pub fn assign(target: VariableRef, value: Expression, line: u32) -> Statement {
    Statement::Assignment {
        target,
        value,
        location: loc(line, 1),
    }
}

pub fn assign_int(name: &str, value: i64, line: u32) -> Statement {
    assign(int(name), Expression::int(value), line)
}

/// `name = rand();`
pub fn assign_unknown(name: &str, line: u32) -> Statement {
    assign(int(name), Expression::call("rand", vec![]), line)
}

pub fn compound(name: &str, op: CompoundOp, value: i64, line: u32) -> Statement {
    Statement::CompoundAssignment {
        target: int(name),
        op,
        value: Expression::int(value),
        location: loc(line, 1),
    }
}

/// `callee(args...)` on `line`, arguments laid out by `arg_location`
pub fn call(callee: &str, args: Vec<Expression>, line: u32) -> Statement {
    let end = arg_location(line, args.len());
    let arguments = args
        .into_iter()
        .enumerate()
        .map(|(i, value)| CallArgument::new(value, arg_location(line, i)))
        .collect();
    Statement::Call {
        callee: callee.to_string(),
        arguments,
        location: loc(line, 1),
        end_location: end,
    }
}

/// `callee(a, b, ...)` reading each variable
pub fn use_vars(callee: &str, vars: &[VariableRef], line: u32) -> Statement {
    call(
        callee,
        vars.iter().cloned().map(Expression::var).collect(),
        line,
    )
}

/// `callee(&v)`
pub fn pass_pointer(callee: &str, var: VariableRef, line: u32) -> Statement {
    call(callee, vec![Expression::address_of(var)], line)
}

/// Statement the engine does not care about (conditions, `else`, ...)
pub fn marker(line: u32) -> Statement {
    Statement::Other {
        location: loc(line, 1),
    }
}
