//! Per-block statement visitor
//!
//! One dispatch over the statement forms, used in two modes:
//! - `run`: enter with the starting state, record history, return the
//!   ending state;
//! - `scan`: report which tracked variables the block assigns, for the
//!   loop mutation pre-pass. Nothing is recorded.
//!
//! The visitor never looks at other blocks. Merging predecessor states is
//! the walker's job.

use crate::features::constant_propagation::domain::{BlockState, PropagationResult, Provenance};
use crate::features::constant_propagation::ports::ValueKind;
use crate::shared::models::{BasicBlock, Expression, SourceLocation, Statement, VariableRef};

use super::value_history::ValueHistory;

/// What a statement did to one variable
struct Update<'s, V> {
    name: &'s str,
    value: PropagationResult<V>,
    location: SourceLocation,
    /// Declarations initialize; everything else overwrites a live value
    is_declaration: bool,
}

pub struct BlockDataflowPass<'k, K: ValueKind> {
    kind: &'k K,
}

impl<'k, K: ValueKind> BlockDataflowPass<'k, K> {
    pub fn new(kind: &'k K) -> Self {
        Self { kind }
    }

    /// Walk `block` from `start`, recording into `history`
    ///
    /// Every variable of the starting state first gets a `ControlFlowMerge`
    /// entry at the first statement, so lookups inside the block see what
    /// flowed in. A block without statements records nothing.
    pub fn run(
        &self,
        block: &BasicBlock,
        start: BlockState<K::Value>,
        history: &mut ValueHistory<K::Value>,
    ) -> BlockState<K::Value> {
        let mut state = start;

        if let Some(first) = block.statements.first() {
            let at = first.location();
            for (name, value) in &state {
                history.record(name, value.clone(), at, Provenance::ControlFlowMerge);
            }
        }

        for statement in &block.statements {
            let mut updates = Vec::new();
            self.dispatch(statement, &state, |update| updates.push(update));
            for update in updates {
                history.record(
                    update.name,
                    update.value.clone(),
                    update.location,
                    Provenance::ChangedByCode,
                );
                state.insert(update.name.to_string(), update.value);
            }
        }

        state
    }

    /// Report every tracked variable the block assigns, compound-assigns or
    /// hands out by pointer / mutable reference
    pub fn scan(&self, block: &BasicBlock, mut on_mutation: impl FnMut(&str)) {
        let empty = BlockState::new();
        for statement in &block.statements {
            self.dispatch(statement, &empty, |update| {
                if !update.is_declaration {
                    on_mutation(update.name);
                }
            });
        }
    }

    fn dispatch<'s>(
        &self,
        statement: &'s Statement,
        state: &BlockState<K::Value>,
        mut emit: impl FnMut(Update<'s, K::Value>),
    ) {
        match statement {
            Statement::Declaration {
                variable,
                initializer,
                location,
            } => {
                let Some(init) = initializer else {
                    return;
                };
                self.escapes(init, Some(variable), *location, &mut emit);
                if !self.kind.is_tracked_type(variable.ty) {
                    return;
                }
                if let Some(value) = self.kind.try_evaluate_constant(init) {
                    emit(Update {
                        name: &variable.name,
                        value: PropagationResult::Resolved(value),
                        location: *location,
                        is_declaration: true,
                    });
                }
            }
            Statement::Assignment {
                target,
                value,
                location,
            } => {
                self.escapes(value, Some(target), *location, &mut emit);
                if self.kind.is_tracked_type(target.ty) {
                    emit(Update {
                        name: &target.name,
                        value: self.kind.try_evaluate_constant(value).into(),
                        location: *location,
                        is_declaration: false,
                    });
                }
            }
            Statement::CompoundAssignment {
                target,
                op,
                value,
                location,
            } => {
                self.escapes(value, Some(target), *location, &mut emit);
                if !self.kind.is_tracked_type(target.ty) {
                    return;
                }
                let folded = match state.get(&target.name) {
                    Some(PropagationResult::Resolved(current)) => self
                        .kind
                        .try_evaluate_constant(value)
                        .and_then(|rhs| self.kind.fold_compound(*op, current, &rhs)),
                    _ => None,
                };
                emit(Update {
                    name: &target.name,
                    value: folded.into(),
                    location: *location,
                    is_declaration: false,
                });
            }
            Statement::Call {
                arguments,
                end_location,
                ..
            } => {
                let mutated = arguments.iter().flat_map(|arg| arg.mutated_variables());
                for variable in mutated {
                    if self.kind.is_tracked_type(variable.ty) {
                        emit(Update {
                            name: &variable.name,
                            value: PropagationResult::Unresolved,
                            location: *end_location,
                            is_declaration: false,
                        });
                    }
                }
            }
            Statement::Other { .. } => {}
        }
    }

    /// Tracked variables whose address reaches a call inside `value`
    ///
    /// The statement's own target is skipped: its update at the same
    /// location is the one that holds afterwards.
    fn escapes<'s>(
        &self,
        value: &'s Expression,
        target: Option<&VariableRef>,
        location: SourceLocation,
        emit: &mut impl FnMut(Update<'s, K::Value>),
    ) {
        for variable in value.escaping_variables() {
            if !self.kind.is_tracked_type(variable.ty)
                || target.is_some_and(|target| target.name == variable.name)
            {
                continue;
            }
            emit(Update {
                name: &variable.name,
                value: PropagationResult::Unresolved,
                location,
                is_declaration: false,
            });
        }
    }
}
