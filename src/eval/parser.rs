//! Precedence-climbing evaluator for `#if`/`#elif` expressions.
//!
//! Structurally this plays the role of `cppexp.c`'s `_cpp_parse_expr`/
//! `reduce` shift-reduce loop, but is expressed as ordinary recursive
//! descent over binding power rather than an explicit growable operator
//! stack — the `TokenSource` trait already gives a one-token lookahead,
//! and Rust's own call stack is the operator stack. `skip_eval` is
//! threaded as an explicit parameter instead of a context-wide counter,
//! so that short-circuited operands (the untaken arm of `&&`, `||`, or
//! `?:`) are still fully parsed for syntax but never reach `eval/ops.rs`,
//! matching the reference's rule that a division by zero in a
//! short-circuited branch is never diagnosed.

use crate::bigint::BigInt;
use crate::error::EvalError;
use crate::eval::ops;
use crate::eval::token_eval::{self, TokenEvalContext};
use crate::token::{OpKind, TokenSource};

/// Bookkeeping carried across one full parse, used afterwards by
/// `eval::guard` to recognise the `!defined(NAME)` shape.
pub(crate) struct ParseState {
    pub(crate) operator_count: u32,
    pub(crate) only_op: Option<OpKind>,
    pub(crate) defined_name: Option<String>,
    /// Mirrors the reference's `prevent_expansion` depth, incremented across
    /// a `defined` operand. This crate's `TokenSource` never itself expands
    /// macros, so the depth is always unchanged by the time the operand is
    /// read back and the "may not be portable" diagnostic never fires — the
    /// counter is kept anyway so the bookkeeping matches a token source that
    /// does expand macros.
    prevent_expansion: u32,
}

impl ParseState {
    pub(crate) fn new() -> Self {
        ParseState {
            operator_count: 0,
            only_op: None,
            defined_name: None,
            prevent_expansion: 0,
        }
    }

    fn record_operator(&mut self, op: Option<OpKind>) {
        self.operator_count += 1;
        self.only_op = if self.operator_count == 1 { op } else { None };
    }
}

const UNARY_BP: u8 = 14;
const QUERY_BP: u8 = 2;

/// Bound on parenthesis/unary-operator nesting. This crate recurses on
/// Rust's own call stack instead of the reference's growable `op_stack`
/// (see the module doc comment), so a depth limit here is what stands in
/// for that stack's `2*old + 20` growth policy: a malformed-but-absurdly
/// deep expression returns [`EvalError::StackOverflow`] instead of
/// overflowing the native stack.
const MAX_NESTING_DEPTH: u32 = 256;

fn binary_precedence(op: OpKind) -> Option<u8> {
    use OpKind::*;
    Some(match op {
        Comma => 1,
        LOr => 3,
        LAnd => 4,
        BOr => 5,
        BXor => 6,
        BAnd => 7,
        MinOp | MaxOp => 8,
        Eq | NotEq => 9,
        Less | Greater | LessEq | GreaterEq => 10,
        Lshift | Rshift => 11,
        Add | Sub => 12,
        Mul | Div | Mod => 13,
        _ => return None,
    })
}

/// Parse and evaluate a complete expression from `source`, erroring if
/// anything but end-of-input remains afterwards.
pub(crate) fn parse(
    source: &mut dyn TokenSource,
    tctx: &mut TokenEvalContext<'_>,
    state: &mut ParseState,
    skip: bool,
) -> Result<BigInt, EvalError> {
    let result = parse_bp(source, tctx, state, skip, 0, 0)?;
    match source.peek_kind() {
        OpKind::Eof => Ok(result),
        OpKind::CloseParen => Err(EvalError::Syntax("missing '(' in expression".into())),
        _ => Err(EvalError::Syntax(
            "missing binary operator before token".into(),
        )),
    }
}

fn parse_bp(
    source: &mut dyn TokenSource,
    tctx: &mut TokenEvalContext<'_>,
    state: &mut ParseState,
    skip: bool,
    min_bp: u8,
    depth: u32,
) -> Result<BigInt, EvalError> {
    let mut lhs = parse_unary(source, tctx, state, skip, depth)?;

    loop {
        let op = source.peek_kind();
        if op == OpKind::Eof || op == OpKind::CloseParen || op == OpKind::Colon {
            break;
        }

        if op == OpKind::Query {
            if min_bp > QUERY_BP {
                break;
            }
            source.next_token();
            state.record_operator(None);
            let cond_true = !lhs.is_zero();
            let then_val = parse_bp(source, tctx, state, skip || !cond_true, 0, depth)?;
            expect(source, OpKind::Colon)?;
            let else_val = parse_bp(source, tctx, state, skip || cond_true, QUERY_BP, depth)?;
            lhs = if skip {
                BigInt::zero(lhs.unsignedp)
            } else if cond_true {
                then_val
            } else {
                else_val
            };
            continue;
        }

        let Some(bp) = binary_precedence(op) else {
            break;
        };
        if bp < min_bp {
            break;
        }
        source.next_token();
        state.record_operator(Some(op));

        let rhs_skip = skip
            || (op == OpKind::LAnd && lhs.is_zero())
            || (op == OpKind::LOr && !lhs.is_zero());
        let rhs = parse_bp(source, tctx, state, rhs_skip, bp + 1, depth)?;

        lhs = if skip {
            BigInt::zero(lhs.unsignedp || rhs.unsignedp)
        } else {
            ops::apply_binary(
                op,
                lhs,
                rhs,
                tctx.config.precision(),
                tctx.config.pedantic,
                tctx.config.c99,
                tctx.sink,
            )?
        };
    }

    Ok(lhs)
}

fn parse_unary(
    source: &mut dyn TokenSource,
    tctx: &mut TokenEvalContext<'_>,
    state: &mut ParseState,
    skip: bool,
    depth: u32,
) -> Result<BigInt, EvalError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(EvalError::StackOverflow);
    }
    let depth = depth + 1;

    let mut tok = source.next_token();
    if tok.kind == OpKind::Add {
        tok.kind = OpKind::UPlus;
    } else if tok.kind == OpKind::Sub {
        tok.kind = OpKind::UMinus;
    }
    match tok.kind {
        OpKind::UPlus | OpKind::UMinus | OpKind::LNot | OpKind::BNot => {
            state.record_operator(Some(tok.kind));
            let operand = parse_bp(source, tctx, state, skip, UNARY_BP, depth)?;
            if skip {
                Ok(BigInt::zero(operand.unsignedp))
            } else {
                ops::apply_unary(
                    tok.kind,
                    operand,
                    tctx.config.precision(),
                    tctx.config.pedantic,
                    tctx.sink,
                )
            }
        }
        OpKind::OpenParen => {
            let value = parse_bp(source, tctx, state, skip, 0, depth)?;
            if source.peek_kind() == OpKind::Eof {
                return Err(EvalError::Syntax("missing ')' in expression".into()));
            }
            expect(source, OpKind::CloseParen)?;
            Ok(value)
        }
        OpKind::Defined => {
            let depth_before = state.prevent_expansion;
            state.prevent_expansion += 1;
            let name = parse_defined_operand(source)?;
            state.prevent_expansion -= 1;
            let defined = tctx.macros.is_defined(&name);
            if state.prevent_expansion == depth_before {
                state.defined_name = Some(name);
            } else {
                tctx.sink.emit(
                    crate::diagnostics::Severity::Warning,
                    "this use of \"defined\" may not be portable".into(),
                );
            }
            if skip {
                Ok(BigInt::zero(false))
            } else {
                Ok(BigInt::from_u64(defined as u64, false))
            }
        }
        OpKind::Eof => Err(EvalError::Syntax("expression expected".into())),
        _ if !tok.kind.is_value_start() => Err(EvalError::Syntax(format!(
            "token {:?} is not valid in preprocessor expressions",
            tok.kind
        ))),
        _ => {
            if skip {
                let mut hush = crate::diagnostics::NullSink;
                let mut silent = TokenEvalContext {
                    macros: tctx.macros,
                    assertions: tctx.assertions,
                    config: tctx.config,
                    sink: &mut hush,
                };
                Ok(token_eval::eval_token(&tok, &mut silent).unwrap_or(BigInt::zero(false)))
            } else {
                token_eval::eval_token(&tok, tctx)
            }
        }
    }
}

fn parse_defined_operand(source: &mut dyn TokenSource) -> Result<String, EvalError> {
    let tok = source.next_token();
    if tok.kind == OpKind::OpenParen {
        let name_tok = source.next_token();
        if name_tok.kind != OpKind::Name {
            return Err(EvalError::Syntax(
                "operator \"defined\" requires an identifier".into(),
            ));
        }
        let close = source.next_token();
        if close.kind != OpKind::CloseParen {
            return Err(EvalError::Syntax("missing ')' after \"defined\"".into()));
        }
        Ok(name_tok.text)
    } else if tok.kind == OpKind::Name {
        Ok(tok.text)
    } else {
        Err(EvalError::Syntax(
            "operator \"defined\" requires an identifier".into(),
        ))
    }
}

fn expect(source: &mut dyn TokenSource, kind: OpKind) -> Result<(), EvalError> {
    let tok = source.next_token();
    if tok.kind == kind {
        Ok(())
    } else {
        Err(EvalError::Syntax(format!(
            "expected {:?}, found {:?}",
            kind, tok.kind
        )))
    }
}
