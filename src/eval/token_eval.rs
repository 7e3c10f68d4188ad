//! Turn a value-producing [`Token`] into a [`BigInt`], the evaluator's
//! equivalent of the reference implementation's `eval_token`.

use crate::assertion::AssertionTable;
use crate::bigint::BigInt;
use crate::charconst::interpret_charconst;
use crate::config::EvalConfig;
use crate::diagnostics::{DiagnosticSink, Severity};
use crate::error::EvalError;
use crate::macros::MacroTable;
use crate::numlex::interpret_number;
use crate::token::{OpKind, Token};

/// Everything `eval_token` needs beyond the token itself: the macro table
/// (for bare identifiers and `defined`), the assertion table, config, and
/// a diagnostic sink.
pub struct TokenEvalContext<'a> {
    pub macros: &'a MacroTable,
    pub assertions: &'a AssertionTable,
    pub config: &'a EvalConfig,
    pub sink: &'a mut dyn DiagnosticSink,
}

/// Evaluate one value-producing token to a [`BigInt`].
///
/// `defined_name`, when `Some`, means this `Name` token is the operand of
/// a `defined` operator and should not trigger the "not defined" warning
/// that a bare identifier would.
pub fn eval_token(token: &Token, ctx: &mut TokenEvalContext<'_>) -> Result<BigInt, EvalError> {
    match token.kind {
        OpKind::Number => Ok(interpret_number(
            &token.text,
            ctx.config.precision(),
            ctx.config.pedantic,
            ctx.config.c99,
            ctx.config.traditional,
            token.from_sys_macro,
            ctx.sink,
        )?),
        OpKind::CharConst => Ok(interpret_charconst(
            &token.text,
            false,
            false,
            ctx.config.precision(),
            ctx.sink,
        )?),
        OpKind::WCharConst => Ok(interpret_charconst(
            &token.text,
            true,
            true,
            ctx.config.precision(),
            ctx.sink,
        )?),
        OpKind::Name => {
            if ctx.config.cplusplus && (token.text == "true" || token.text == "false") {
                if ctx.config.pedantic && !ctx.macros.is_defined("__bool_true_false_are_defined") {
                    ctx.sink.emit(
                        Severity::PedWarn,
                        format!("ISO C++ forbids use of '{}' in preprocessor expression", token.text),
                    );
                }
                return Ok(BigInt::from_u64((token.text == "true") as u64, false));
            }
            if ctx.config.warn_undef && !ctx.macros.is_defined(&token.text) {
                ctx.sink.emit(
                    Severity::Warning,
                    format!("\"{}\" is not defined, evaluates to 0", token.text),
                );
            }
            Ok(BigInt::from_u64(0, false))
        }
        OpKind::Assertion => Ok(BigInt::from_u64(
            ctx.assertions.test(&token.text) as u64,
            false,
        )),
        other => Err(EvalError::Syntax(format!(
            "token {:?} cannot produce a value",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;

    fn ctx<'a>(
        macros: &'a MacroTable,
        assertions: &'a AssertionTable,
        config: &'a EvalConfig,
        sink: &'a mut CollectingSink,
    ) -> TokenEvalContext<'a> {
        TokenEvalContext {
            macros,
            assertions,
            config,
            sink,
        }
    }

    #[test]
    fn number_token() {
        let macros = MacroTable::new();
        let assertions = AssertionTable::new();
        let config = EvalConfig::new();
        let mut sink = CollectingSink::default();
        let tok = Token::with_text(OpKind::Number, "42");
        let v = eval_token(&tok, &mut ctx(&macros, &assertions, &config, &mut sink)).unwrap();
        assert_eq!(v.low, 42);
    }

    #[test]
    fn undefined_name_is_zero_and_warns() {
        let macros = MacroTable::new();
        let assertions = AssertionTable::new();
        let config = EvalConfig::new().with_warn_undef(true);
        let mut sink = CollectingSink::default();
        let tok = Token::with_text(OpKind::Name, "FOO");
        let v = eval_token(&tok, &mut ctx(&macros, &assertions, &config, &mut sink)).unwrap();
        assert_eq!(v.low, 0);
        assert!(!sink.diagnostics.is_empty());
    }

    #[test]
    fn sys_macro_flag_suppresses_traditional_warning() {
        let macros = MacroTable::new();
        let assertions = AssertionTable::new();
        let config = EvalConfig::new().with_traditional(true);
        let mut sink = CollectingSink::default();
        let tok = Token::with_text(OpKind::Number, "1u").from_system_macro();
        eval_token(&tok, &mut ctx(&macros, &assertions, &config, &mut sink)).unwrap();
        assert!(sink.diagnostics.is_empty());

        let mut sink2 = CollectingSink::default();
        let tok2 = Token::with_text(OpKind::Number, "1u");
        eval_token(&tok2, &mut ctx(&macros, &assertions, &config, &mut sink2)).unwrap();
        assert!(!sink2.diagnostics.is_empty());
    }

    #[test]
    fn cplusplus_bool_literals() {
        let macros = MacroTable::new();
        let assertions = AssertionTable::new();
        let config = EvalConfig::new().with_cplusplus(true);
        let mut sink = CollectingSink::default();
        let tok = Token::with_text(OpKind::Name, "true");
        let v = eval_token(&tok, &mut ctx(&macros, &assertions, &config, &mut sink)).unwrap();
        assert_eq!(v.low, 1);
    }

    #[test]
    fn cplusplus_bool_literal_pedwarns_unless_macro_defined() {
        let macros = MacroTable::new();
        let assertions = AssertionTable::new();
        let config = EvalConfig::new().with_cplusplus(true).with_pedantic(true);
        let mut sink = CollectingSink::default();
        let tok = Token::with_text(OpKind::Name, "false");
        let v = eval_token(&tok, &mut ctx(&macros, &assertions, &config, &mut sink)).unwrap();
        assert_eq!(v.low, 0);
        assert!(!sink.diagnostics.is_empty());

        let mut macros2 = MacroTable::new();
        macros2.define_object("__bool_true_false_are_defined", false);
        let mut sink2 = CollectingSink::default();
        let v2 = eval_token(&tok, &mut ctx(&macros2, &assertions, &config, &mut sink2)).unwrap();
        assert_eq!(v2.low, 0);
        assert!(sink2.diagnostics.is_empty());
    }
}
