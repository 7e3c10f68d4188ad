//! Constant-expression evaluation: the public entry point and its
//! supporting submodules.

pub mod guard;
pub mod ops;
pub mod parser;
pub mod token_eval;

pub use guard::ControllingMacro;

use crate::assertion::AssertionTable;
use crate::config::EvalConfig;
use crate::diagnostics::DiagnosticSink;
use crate::error::EvalOutcome;
use crate::macros::MacroTable;
use crate::token::TokenSource;
use token_eval::TokenEvalContext;

/// Evaluate a `#if`/`#elif` controlling expression read from `source`.
///
/// Returns the truth-or-error [`EvalOutcome`] together with the
/// controlling macro name, if the expression was exactly `!defined(NAME)`.
pub fn evaluate(
    source: &mut dyn TokenSource,
    macros: &MacroTable,
    assertions: &AssertionTable,
    config: &EvalConfig,
    sink: &mut dyn DiagnosticSink,
) -> (EvalOutcome, Option<ControllingMacro>) {
    let mut state = parser::ParseState::new();
    let mut tctx = TokenEvalContext {
        macros,
        assertions,
        config,
        sink,
    };
    let result = parser::parse(source, &mut tctx, &mut state, false);
    let controlling = guard::from_parse_state(&state);

    let outcome = match result {
        Ok(value) if value.is_zero() => EvalOutcome::False,
        Ok(_) => EvalOutcome::True,
        Err(e) => EvalOutcome::Error(e),
    };
    (outcome, controlling)
}
