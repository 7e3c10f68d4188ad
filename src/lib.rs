//! Evaluate C/C++ preprocessor constant expressions: the kind of thing a
//! `#if` or `#elif` directive's controlling expression is made of.
//!
//! This crate is a standalone port of the arithmetic and grammar that
//! decide whether a `#if` branch is taken, without being a preprocessor
//! itself. Callers supply tokens (see [`token::TokenSource`]), a macro
//! table (see [`macros::MacroTable`]) and an assertion table
//! (see [`assertion::AssertionTable`]); this crate does the lexing of
//! numeric and character literals, operator-precedence parsing, and
//! fixed-precision arithmetic, and hands back an [`error::EvalOutcome`].
//!
//! ```
//! use cpp_cexpr::prelude::*;
//!
//! let macros = MacroTable::new();
//! let assertions = AssertionTable::new();
//! let config = EvalConfig::new();
//! let mut sink = NullSink;
//! let mut tokens = VecTokenSource::new(vec![
//!     Token::with_text(OpKind::Number, "1"),
//!     Token::punct(OpKind::Add),
//!     Token::with_text(OpKind::Number, "1"),
//! ]);
//!
//! let (outcome, _controlling_macro) =
//!     evaluate(&mut tokens, &macros, &assertions, &config, &mut sink);
//! assert!(outcome.is_true());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assertion;
pub mod bigint;
pub mod charconst;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod eval;
pub mod macros;
pub mod numlex;
pub mod token;

pub use error::{EvalError, EvalOutcome};
pub use eval::{evaluate, ControllingMacro};

/// Re-exports of the names most callers need, so `use cpp_cexpr::prelude::*`
/// is enough to drive [`evaluate`].
pub mod prelude {
    pub use crate::assertion::AssertionTable;
    pub use crate::bigint::BigInt;
    pub use crate::config::EvalConfig;
    pub use crate::diagnostics::{CollectingSink, DiagnosticSink, NullSink, Severity, TracingSink};
    pub use crate::error::{EvalError, EvalOutcome};
    pub use crate::eval::evaluate;
    pub use crate::macros::MacroTable;
    pub use crate::token::{OpKind, Token, TokenSource, VecTokenSource};
}
