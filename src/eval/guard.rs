//! Recognise the `#if !defined(NAME)` shape used as a header guard.
//!
//! This mirrors the `mi_ind_cmacro` bookkeeping the reference
//! implementation threads through `_cpp_parse_expr`/`parse_defined`: if
//! the whole controlling expression reduces to exactly one negation
//! applied to a single `defined` query, `NAME` is a candidate controlling
//! macro a caller can use the way `#ifndef` is used, to skip re-reading
//! the rest of the file on a later `#include` of the same header.

use crate::eval::parser::ParseState;
use crate::token::OpKind;

/// The name of a macro whose absence controls an entire `#if` expression.
pub type ControllingMacro = String;

pub(crate) fn from_parse_state(state: &ParseState) -> Option<ControllingMacro> {
    if state.operator_count == 1 && state.only_op == Some(OpKind::LNot) {
        state.defined_name.clone()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_is_not_a_guard() {
        assert_eq!(from_parse_state(&ParseState::new()), None);
    }

    #[test]
    fn single_negated_defined_is_a_guard() {
        let mut state = ParseState::new();
        state.operator_count = 1;
        state.only_op = Some(OpKind::LNot);
        state.defined_name = Some("FOO_H".to_string());
        assert_eq!(from_parse_state(&state), Some("FOO_H".to_string()));
    }

    #[test]
    fn extra_operators_invalidate_the_guard() {
        let mut state = ParseState::new();
        state.operator_count = 2;
        state.only_op = None;
        state.defined_name = Some("FOO_H".to_string());
        assert_eq!(from_parse_state(&state), None);
    }
}
