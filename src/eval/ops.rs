//! Operator dispatch: map an [`OpKind`] and its already-evaluated operands
//! onto a [`BigInt`] result, including the shift/divide/comma bookkeeping
//! that sits above pure arithmetic in `cppexp.c`'s `reduce`.

use crate::bigint::BigInt;
use crate::diagnostics::{DiagnosticSink, Severity};
use crate::error::EvalError;
use crate::token::OpKind;

/// Extract a shift count from `rhs`, flipping the shift direction if the
/// count is negative rather than treating it as undefined behaviour (see
/// `DESIGN.md`'s Open Question decisions).
///
/// Returns `(count, flip)`: `flip` is true when the caller should apply
/// the opposite shift direction.
fn shift_count(rhs: BigInt, precision: u32) -> (u64, bool) {
    if rhs.unsignedp || rhs.is_positive(precision) {
        (rhs.low, false)
    } else {
        let mag = rhs.negate(precision);
        (mag.low, true)
    }
}

/// Apply a binary operator. `lhs`/`rhs` have already been evaluated and
/// trimmed to `precision`. Returns the hard error for division/modulo by
/// zero (see `DESIGN.md`'s redesign note: this crate treats that as an
/// aborting error rather than continuing with `lhs` unchanged).
pub fn apply_binary(
    op: OpKind,
    lhs: BigInt,
    rhs: BigInt,
    precision: u32,
    pedantic: bool,
    c99: bool,
    sink: &mut dyn DiagnosticSink,
) -> Result<BigInt, EvalError> {
    use std::cmp::Ordering;

    let result = match op {
        OpKind::Add => lhs.add(rhs, precision),
        OpKind::Sub => lhs.sub(rhs, precision),
        OpKind::Mul => lhs.mul(rhs, precision),
        OpKind::Div => lhs.div(rhs, precision)?,
        OpKind::Mod => lhs.rem(rhs, precision)?,
        OpKind::Lshift => {
            let (n, flip) = shift_count(rhs, precision);
            if flip {
                lhs.shr(n, precision)
            } else {
                lhs.shl(n, precision)
            }
        }
        OpKind::Rshift => {
            let (n, flip) = shift_count(rhs, precision);
            if flip {
                lhs.shl(n, precision)
            } else {
                lhs.shr(n, precision)
            }
        }
        OpKind::Less => lhs.inequality(rhs, Ordering::Less, false, precision),
        OpKind::Greater => lhs.inequality(rhs, Ordering::Greater, false, precision),
        OpKind::LessEq => lhs.inequality(rhs, Ordering::Less, true, precision),
        OpKind::GreaterEq => lhs.inequality(rhs, Ordering::Greater, true, precision),
        OpKind::Eq => lhs.eq_op(rhs),
        OpKind::NotEq => lhs.ne_op(rhs),
        OpKind::MinOp => lhs.min(rhs, precision),
        OpKind::MaxOp => lhs.max(rhs, precision),
        OpKind::BAnd => lhs.bitand(rhs),
        OpKind::BXor => lhs.bitxor(rhs),
        OpKind::BOr => lhs.bitor(rhs),
        OpKind::LAnd => {
            BigInt::from_u64((!lhs.is_zero() && !rhs.is_zero()) as u64, false)
        }
        OpKind::LOr => BigInt::from_u64((!lhs.is_zero() || !rhs.is_zero()) as u64, false),
        OpKind::Comma => {
            if pedantic && !c99 {
                sink.emit(
                    Severity::PedWarn,
                    "comma operator in operand of #if".into(),
                );
            }
            rhs
        }
        other => {
            return Err(EvalError::Syntax(format!(
                "{:?} is not a binary operator",
                other
            )))
        }
    };

    if result.overflow && pedantic {
        sink.emit(
            Severity::PedWarn,
            "integer overflow in preprocessor expression".into(),
        );
    }
    Ok(result)
}

/// Apply a unary operator.
pub fn apply_unary(
    op: OpKind,
    operand: BigInt,
    precision: u32,
    pedantic: bool,
    sink: &mut dyn DiagnosticSink,
) -> Result<BigInt, EvalError> {
    let result = match op {
        OpKind::UPlus => operand,
        OpKind::UMinus => operand.negate(precision),
        OpKind::LNot => operand.logical_not(),
        OpKind::BNot => operand.not(precision),
        other => {
            return Err(EvalError::Syntax(format!(
                "{:?} is not a unary operator",
                other
            )))
        }
    };

    if result.overflow && pedantic {
        sink.emit(
            Severity::PedWarn,
            "integer overflow in preprocessor expression".into(),
        );
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;

    fn signed(n: i64) -> BigInt {
        BigInt::from_u64(n as u64, false)
    }

    #[test]
    fn add_dispatch() {
        let r = apply_binary(OpKind::Add, signed(2), signed(3), 64, false, true, &mut NullSink).unwrap();
        assert_eq!(r.low, 5);
    }

    #[test]
    fn div_by_zero_is_hard_error() {
        let r = apply_binary(OpKind::Div, signed(1), signed(0), 64, false, true, &mut NullSink);
        assert!(matches!(r, Err(EvalError::DivisionByZero(_))));
    }

    #[test]
    fn negative_shift_count_flips_direction() {
        let lhs = signed(1);
        let rhs = signed(-3);
        let left = apply_binary(OpKind::Lshift, lhs, rhs, 64, false, true, &mut NullSink).unwrap();
        let right_equiv = apply_binary(OpKind::Rshift, lhs, signed(3), 64, false, true, &mut NullSink).unwrap();
        assert_eq!(left.low, right_equiv.low);
    }

    #[test]
    fn logical_and_short_circuits_on_value() {
        let r = apply_binary(OpKind::LAnd, signed(1), signed(0), 64, false, true, &mut NullSink).unwrap();
        assert_eq!(r.low, 0);
    }

    #[test]
    fn comma_pedwarns_and_keeps_rhs() {
        let mut sink = crate::diagnostics::CollectingSink::default();
        let r = apply_binary(OpKind::Comma, signed(1), signed(2), 64, true, false, &mut sink).unwrap();
        assert_eq!(r.low, 2);
        assert!(!sink.diagnostics.is_empty());
    }

    #[test]
    fn unary_minus_and_not() {
        assert_eq!(
            apply_unary(OpKind::UMinus, signed(5), 64, false, &mut NullSink)
                .unwrap()
                .low as i64,
            -5
        );
        assert_eq!(
            apply_unary(OpKind::LNot, signed(0), 64, false, &mut NullSink)
                .unwrap()
                .low,
            1
        );
    }

    #[test]
    fn unary_overflow_pedwarns() {
        let mut sink = crate::diagnostics::CollectingSink::default();
        let min = BigInt {
            high: 0,
            low: 1u64 << 63,
            unsignedp: false,
            overflow: false,
        };
        let r = apply_unary(OpKind::UMinus, min, 64, true, &mut sink).unwrap();
        assert!(r.overflow);
        assert!(!sink.diagnostics.is_empty());
    }
}
