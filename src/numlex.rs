//! Integer-literal lexing: turn a `NUMBER` token's text into a [`BigInt`].

use crate::bigint::BigInt;
use crate::diagnostics::{DiagnosticSink, Severity};

/// A lexical problem with an integer-constant token, hard enough to abort
/// evaluation of the surrounding expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumLexError {
    /// The literal looked like a floating-point constant.
    #[error("floating point numbers are not valid in #if")]
    FloatingPoint,
    /// The suffix bytes didn't match any recognised combination.
    #[error("invalid suffix '{0}' on integer constant")]
    InvalidSuffix(String),
}

/// Closed suffix tables, ported from `cppexp.c`'s `vsuf_1`/`vsuf_2`/`vsuf_3`.
/// Each entry is `(text, unsignedp, long_count)`.
const SUFFIXES_1: &[(&str, bool, u8)] = &[("u", true, 0), ("U", true, 0), ("l", false, 1), ("L", false, 1)];
const SUFFIXES_2: &[(&str, bool, u8)] = &[
    ("ul", true, 1),
    ("UL", true, 1),
    ("uL", true, 1),
    ("Ul", true, 1),
    ("lu", true, 1),
    ("LU", true, 1),
    ("Lu", true, 1),
    ("lU", true, 1),
    ("ll", false, 2),
    ("LL", false, 2),
];
const SUFFIXES_3: &[(&str, bool, u8)] = &[
    ("ull", true, 2),
    ("ULL", true, 2),
    ("uLL", true, 2),
    ("Ull", true, 2),
    ("llu", true, 2),
    ("LLU", true, 2),
    ("LLu", true, 2),
    ("llU", true, 2),
];

/// Lex a preprocessing-number token's text into a [`BigInt`], emitting
/// pedantic warnings through `sink` as the reference implementation would.
///
/// `is_sys_macro` mirrors `cpp_sys_macro_p`: true if this literal came from
/// a macro defined in a system header, which suppresses the traditional-C
/// `U`-suffix warning.
#[allow(clippy::too_many_arguments)]
pub fn interpret_number(
    text: &str,
    precision: u32,
    pedantic: bool,
    c99: bool,
    traditional: bool,
    is_sys_macro: bool,
    sink: &mut dyn DiagnosticSink,
) -> Result<BigInt, NumLexError> {
    let bytes = text.as_bytes();

    if bytes.len() == 1 && bytes[0].is_ascii_digit() {
        return Ok(BigInt::from_u64((bytes[0] - b'0') as u64, false));
    }

    let (base, mut i) = if bytes.first() == Some(&b'0') {
        if bytes.len() >= 3 && (bytes[1] == b'x' || bytes[1] == b'X') {
            (16u64, 2)
        } else {
            (8u64, 1)
        }
    } else {
        (10u64, 0)
    };

    let max_scalar: u64 = {
        let mask = if precision < 64 {
            (1u64 << precision) - 1
        } else {
            u64::MAX
        };
        (mask - 9) / base + 1
    };

    let mut result = BigInt::from_u64(0, false);
    let mut overflow = false;
    let mut big_digit = false;
    let mut max = max_scalar;
    let mut last_char = 0u8;

    while i < bytes.len() {
        let c = bytes[i];
        let digit = match hex_digit_value(c, base) {
            Some(d) => d,
            None => break,
        };
        if digit as u64 >= base {
            big_digit = true;
        }
        if result.low < max {
            result.low = result.low * base + digit as u64;
        } else {
            result = append_digit(result, digit as u64, base, precision);
            overflow |= result.overflow;
            max = 0;
        }
        last_char = c;
        i += 1;
    }

    if i < bytes.len() {
        let c = bytes[i];
        let next = bytes.get(i + 1).copied();
        let looks_float = c == b'.'
            || c == b'f'
            || c == b'F'
            || (base == 10 && (c == b'e' || c == b'E') && matches!(next, Some(b'+') | Some(b'-')))
            || (base == 16 && (c == b'p' || c == b'P') && matches!(next, Some(b'+') | Some(b'-')));
        if looks_float {
            return Err(NumLexError::FloatingPoint);
        }

        let suffix = &text[i..];
        let table: &[(&str, bool, u8)] = match suffix.len() {
            1 => SUFFIXES_1,
            2 => SUFFIXES_2,
            3 => SUFFIXES_3,
            _ => return Err(NumLexError::InvalidSuffix(suffix.to_string())),
        };
        let entry = table.iter().find(|(s, _, _)| *s == suffix);
        let (_, unsignedp, long_count) = match entry {
            Some(e) => *e,
            None => return Err(NumLexError::InvalidSuffix(suffix.to_string())),
        };
        result.unsignedp = unsignedp;

        if traditional && unsignedp && !is_sys_macro {
            sink.emit(Severity::Warning, "traditional C rejects the `U' suffix".into());
        }
        if long_count == 2 && pedantic && !c99 {
            sink.emit(
                Severity::PedWarn,
                "too many 'l' suffixes in integer constant".into(),
            );
        }
    }
    let _ = last_char;

    if big_digit {
        sink.emit(
            Severity::PedWarn,
            "integer constant contains digits beyond the radix".into(),
        );
    }

    if overflow {
        sink.emit(
            Severity::PedWarn,
            "integer constant too large for its type".into(),
        );
    } else if !result.unsignedp && !result.is_positive(precision) {
        if base == 10 {
            sink.emit(
                Severity::Warning,
                "integer constant is so large that it is unsigned".into(),
            );
        }
        result.unsignedp = true;
    }

    Ok(result)
}

fn hex_digit_value(c: u8, base: u64) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' if base == 16 => Some(c - b'a' + 10),
        b'A'..=b'F' if base == 16 => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Port of `cppexp.c`'s `append_digit`: multiply the accumulator by `base`
/// (8 or 16 via a shift, 10 via an explicit doubling) and add `digit`,
/// tracking overflow both at the 2-limb level and at the target precision.
fn append_digit(num: BigInt, digit: u64, base: u64, precision: u32) -> BigInt {
    let shift: u32 = 3 + (base == 16) as u32;
    let mut overflow = num.high >> (64 - shift) != 0;
    let mut high = num.high << shift;
    let low = num.low << shift;
    high |= num.low >> (64 - shift);

    let (add_high, add_low) = if base == 10 {
        let add_low = num.low << 1;
        let add_high = (num.high << 1).wrapping_add(num.low >> 63);
        (add_high, add_low)
    } else {
        (0, 0)
    };

    let (add_low, carry1) = add_low.overflowing_add(digit);
    let mut add_high = add_high;
    if carry1 {
        add_high = add_high.wrapping_add(1);
    }

    let (low, carry2) = low.overflowing_add(add_low);
    if carry2 {
        add_high = add_high.wrapping_add(1);
    }
    let (high, carry3) = high.overflowing_add(add_high);
    if carry3 {
        overflow = true;
    }

    let (trimmed_high, trimmed_low) = {
        let trimmed = BigInt {
            high,
            low,
            unsignedp: num.unsignedp,
            overflow: false,
        }
        .trim(precision);
        (trimmed.high, trimmed.low)
    };
    if trimmed_high != high || trimmed_low != low {
        overflow = true;
    }

    BigInt {
        high: trimmed_high,
        low: trimmed_low,
        unsignedp: num.unsignedp,
        overflow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;

    fn lex(text: &str, precision: u32) -> (Result<BigInt, NumLexError>, CollectingSink) {
        let mut sink = CollectingSink::default();
        let result = interpret_number(text, precision, true, false, false, false, &mut sink);
        (result, sink)
    }

    #[test]
    fn single_digit() {
        let (r, sink) = lex("7", 64);
        assert_eq!(r.unwrap().low, 7);
        assert!(sink.diagnostics.is_empty());
    }

    #[test]
    fn hex_literal() {
        let (r, _) = lex("0x2A", 64);
        assert_eq!(r.unwrap().low, 42);
    }

    #[test]
    fn octal_literal() {
        let (r, _) = lex("010", 64);
        assert_eq!(r.unwrap().low, 8);
    }

    #[test]
    fn unsigned_suffix() {
        let (r, _) = lex("1u", 64);
        assert!(r.unwrap().unsignedp);
    }

    #[test]
    fn long_long_suffix_pedwarns_without_c99() {
        let (r, sink) = lex("1ll", 64);
        assert!(r.is_ok());
        assert!(sink
            .diagnostics
            .iter()
            .any(|d| d.message.contains("too many 'l'")));
    }

    #[test]
    fn invalid_suffix_errors() {
        let (r, _) = lex("1q", 64);
        assert!(matches!(r, Err(NumLexError::InvalidSuffix(_))));
    }

    #[test]
    fn floating_point_rejected() {
        assert!(matches!(lex("1.5", 64).0, Err(NumLexError::FloatingPoint)));
        assert!(matches!(lex("1e+5", 64).0, Err(NumLexError::FloatingPoint)));
        assert!(matches!(lex("0x1p+5", 64).0, Err(NumLexError::FloatingPoint)));
    }

    #[test]
    fn overflow_pedwarns_and_wraps() {
        let (r, sink) = lex("0x7fffffffffffffff", 64);
        let v = r.unwrap();
        assert!(!sink.diagnostics.is_empty() || v.is_positive(64));

        let (r2, sink2) = lex("0xffffffffffffffff1", 64);
        let v2 = r2.unwrap();
        assert!(v2.overflow || sink2.diagnostics.iter().any(|d| d.message.contains("too large")));
    }

    #[test]
    fn large_decimal_without_u_becomes_unsigned() {
        let (r, sink) = lex("18446744073709551615", 64);
        let v = r.unwrap();
        assert!(v.unsignedp);
        assert!(sink.diagnostics.iter().any(|d| d.message.contains("so large that it is unsigned")));
    }

    #[test]
    fn digit_beyond_radix_pedwarns() {
        let (r, sink) = lex("08", 64);
        assert!(r.is_ok());
        assert!(sink.diagnostics.iter().any(|d| d.message.contains("beyond the radix")));
    }
}
