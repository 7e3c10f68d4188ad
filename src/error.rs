//! Aggregate error type and the truth-or-error outcome of evaluating an
//! expression.

use crate::bigint::DivisionByZero;
use crate::charconst::CharConstError;
use crate::numlex::NumLexError;

/// Everything that can stop expression evaluation cold, aggregated from
/// the leaf error types of the modules that can fail.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EvalError {
    /// A malformed numeric literal.
    #[display(fmt = "{}", _0)]
    NumLex(NumLexError),
    /// A malformed character constant.
    #[display(fmt = "{}", _0)]
    CharConst(CharConstError),
    /// Division or modulo by zero.
    #[display(fmt = "{}", _0)]
    DivisionByZero(DivisionByZero),
    /// A token appeared where the grammar did not allow it.
    #[display(fmt = "{}", _0)]
    Syntax(String),
    /// An operator-stack depth limit was exceeded (pathological input).
    #[display(fmt = "expression nested too deeply")]
    StackOverflow,
}

impl std::error::Error for EvalError {}

impl From<NumLexError> for EvalError {
    fn from(e: NumLexError) -> Self {
        EvalError::NumLex(e)
    }
}

impl From<CharConstError> for EvalError {
    fn from(e: CharConstError) -> Self {
        EvalError::CharConst(e)
    }
}

impl From<DivisionByZero> for EvalError {
    fn from(e: DivisionByZero) -> Self {
        EvalError::DivisionByZero(e)
    }
}

/// The result of evaluating a `#if`/`#elif` controlling expression.
///
/// A bare `bool` cannot distinguish "the expression is false" from
/// "the expression could not be evaluated", which the reference
/// implementation conflates by always returning `0` on error. This crate
/// keeps the distinction in the type and lets callers decide how to
/// collapse it (see [`EvalOutcome::is_true`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    /// The expression evaluated to a nonzero value.
    True,
    /// The expression evaluated to zero.
    False,
    /// Evaluation was aborted by a hard error.
    Error(EvalError),
}

impl EvalOutcome {
    /// Collapse to the reference implementation's convention: only
    /// `True` is truthy, both `False` and `Error` preprocess as not-taken.
    pub fn is_true(&self) -> bool {
        matches!(self, EvalOutcome::True)
    }

    /// The error that aborted evaluation, if any.
    pub fn error(&self) -> Option<&EvalError> {
        match self {
            EvalOutcome::Error(e) => Some(e),
            _ => None,
        }
    }
}
