//! Canonical functions used across the integration tests

use codegraph_constprop::shared::models::{
    CfgBuilder, CompoundOp, ControlFlowGraph, Expression, Statement,
};
use codegraph_constprop::InMemoryCfgSource;

use super::builders::*;

/// `int v1 = 0; v1 = 1; foo(v1);`
pub fn straight_line() -> ControlFlowGraph {
    let mut b = CfgBuilder::new("straight_line");
    b.add_block(vec![
        declare_int("v1", 0, 1),
        assign_int("v1", 1, 2),
        use_vars("foo", &[int("v1")], 3),
    ]);
    b.build()
}

/// `int v1 = 0; bar(&v1); foo(v1);`
pub fn pointer_mutation() -> ControlFlowGraph {
    let mut b = CfgBuilder::new("pointer_mutation");
    b.add_block(vec![
        declare_int("v1", 0, 1),
        pass_pointer("bar", int("v1"), 2),
        use_vars("foo", &[int("v1")], 3),
    ]);
    b.build()
}

/// ```text
/// 1  int v2 = 2;
/// 2  int k = 7;
/// 3  if (c) {
/// 4    v2 = 5;
/// 5    v3 = 6;
///    } else {}
/// 7  use(v2, v3, k);
/// ```
pub fn if_else() -> ControlFlowGraph {
    let mut b = CfgBuilder::new("if_else");
    let head = b.add_block(vec![declare_int("v2", 2, 1), declare_int("k", 7, 2), marker(3)]);
    let then = b.add_block(vec![assign_int("v2", 5, 4), assign_int("v3", 6, 5)]);
    let otherwise = b.add_block(vec![]);
    let join = b.add_block(vec![use_vars("use", &[int("v2"), int("v3"), int("k")], 7)]);
    b.add_edge(head, then)
        .add_edge(head, otherwise)
        .add_edge(then, join)
        .add_edge(otherwise, join);
    b.build()
}

/// ```text
/// 1  int v1 = 0;
/// 2  int i = 0;
/// 3  for (; i < n; ) {
/// 4    v1 = 1;
/// 5    i += 1;
///    }
/// 7  foo(v1);
/// ```
pub fn for_loop() -> ControlFlowGraph {
    let mut b = CfgBuilder::new("for_loop");
    let init = b.add_block(vec![declare_int("v1", 0, 1), declare_int("i", 0, 2)]);
    let header = b.add_block(vec![marker(3)]);
    let body = b.add_block(vec![
        assign_int("v1", 1, 4),
        compound("i", CompoundOp::Add, 1, 5),
    ]);
    let exit = b.add_block(vec![use_vars("foo", &[int("v1")], 7)]);
    b.add_edge(init, header)
        .add_edge(header, body)
        .add_edge(body, header)
        .add_edge(header, exit);
    b.build()
}

/// ```text
/// 1  int i = 0;
/// 2  int n = 10;
/// 3  for (; i < n; i += 1) {
/// 4    foo(i, n);
///    }
/// 6  done(i);
/// ```
///
/// The increment block (3:20) comes before the body (4:1) in source order.
pub fn counting_loop() -> ControlFlowGraph {
    let mut b = CfgBuilder::new("counting_loop");
    let init = b.add_block(vec![declare_int("i", 0, 1), declare_int("n", 10, 2)]);
    let header = b.add_block(vec![Statement::Other { location: loc(3, 12) }]);
    let body = b.add_block(vec![use_vars("foo", &[int("i"), int("n")], 4)]);
    let increment = b.add_block(vec![Statement::CompoundAssignment {
        target: int("i"),
        op: CompoundOp::Add,
        value: Expression::int(1),
        location: loc(3, 20),
    }]);
    let exit = b.add_block(vec![use_vars("done", &[int("i")], 6)]);
    b.add_edge(init, header)
        .add_edge(header, body)
        .add_edge(body, increment)
        .add_edge(increment, header)
        .add_edge(header, exit);
    b.build()
}

/// ```text
/// 1  int v1 = 0;
/// 2  int r = bar(&v1);
/// 3  foo(v1, r);
/// ```
pub fn nested_pointer() -> ControlFlowGraph {
    let mut b = CfgBuilder::new("nested_pointer");
    b.add_block(vec![
        declare_int("v1", 0, 1),
        Statement::Declaration {
            variable: int("r"),
            initializer: Some(Expression::call("bar", vec![Expression::address_of(int("v1"))])),
            location: loc(2, 5),
        },
        use_vars("foo", &[int("v1"), int("r")], 3),
    ]);
    b.build()
}

/// ```text
/// 1  char *s = "a";
/// 2  char *t = "x";
/// 3  if (c) {
/// 4    s = "b";
/// 5    t = "x";
///    }
/// 7  puts(s, t);
/// ```
pub fn string_branches() -> ControlFlowGraph {
    let mut b = CfgBuilder::new("string_branches");
    let head = b.add_block(vec![declare_str("s", "a", 1), declare_str("t", "x", 2), marker(3)]);
    let then = b.add_block(vec![
        assign(string("s"), Expression::string("b"), 4),
        assign(string("t"), Expression::string("x"), 5),
    ]);
    let join = b.add_block(vec![use_vars("puts", &[string("s"), string("t")], 7)]);
    b.add_edge(head, then).add_edge(head, join).add_edge(then, join);
    b.build()
}

/// Every fixture above, keyed by function id
pub fn fixture_source() -> InMemoryCfgSource {
    InMemoryCfgSource::new()
        .with(straight_line())
        .with(pointer_mutation())
        .with(if_else())
        .with(for_loop())
        .with(string_branches())
        .with(counting_loop())
        .with(nested_pointer())
}
