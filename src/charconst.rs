//! Character-constant lexing: `'a'`, `'\n'`, `L'x'`, multi-char `'ab'`.

use crate::bigint::{BigInt, LIMB_BITS};
use crate::diagnostics::{DiagnosticSink, Severity};

/// A lexical problem with a character-constant token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharConstError {
    /// `''` with no characters between the quotes.
    #[error("empty character constant")]
    Empty,
    /// A backslash escape that isn't one of the recognised forms.
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),
    /// The constant wasn't terminated with a closing quote.
    #[error("unterminated character constant")]
    Unterminated,
}

/// Decode the body of a character constant (the text between the quotes,
/// excluding any `L`/`u`/`U` prefix) into a [`BigInt`].
///
/// `wide` selects wide-character (`L'...'`) semantics: each escape or
/// literal character becomes one code point rather than being packed
/// byte-wise, and the result does not sign-extend.
pub fn interpret_charconst(
    body: &str,
    wide: bool,
    char_is_unsigned: bool,
    precision: u32,
    sink: &mut dyn DiagnosticSink,
) -> Result<BigInt, CharConstError> {
    let chars: Vec<char> = decode_escapes(body)?;
    if chars.is_empty() {
        return Err(CharConstError::Empty);
    }

    if wide {
        if chars.len() > 1 {
            sink.emit(
                Severity::Warning,
                "multi-character wide character constant".into(),
            );
        }
        let value = *chars.last().unwrap() as u64;
        return Ok(BigInt::from_u64(value, true));
    }

    if chars.len() > 1 {
        sink.emit(Severity::Warning, "multi-character character constant".into());
    }

    let mut value: u64 = 0;
    for &c in &chars {
        value = (value << 8) | (c as u64 & 0xFF);
    }

    let single_char = chars.len() == 1;
    let unsignedp = if single_char { char_is_unsigned } else { true };

    let mut result = BigInt::from_u64(value, unsignedp);
    if single_char && !char_is_unsigned && (value & 0x80) != 0 {
        result = sign_extend_byte(result, precision);
    }
    Ok(result)
}

fn sign_extend_byte(mut num: BigInt, precision: u32) -> BigInt {
    num.high = u64::MAX;
    num.low |= !0xFFu64;
    num.trim(precision)
}

fn decode_escapes(body: &str) -> Result<Vec<char>, CharConstError> {
    let mut out = Vec::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next().ok_or(CharConstError::Unterminated)?;
        let decoded = match esc {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            '?' => '?',
            'x' => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_hexdigit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n = u32::from_str_radix(&digits, 16).map_err(|_| CharConstError::UnknownEscape('x'))?;
                char::from_u32(n & 0xFF).unwrap_or('\0')
            }
            '0'..='7' => {
                let mut digits = String::from(esc);
                for _ in 0..2 {
                    if let Some(&d) = chars.peek() {
                        if ('0'..='7').contains(&d) {
                            digits.push(d);
                            chars.next();
                            continue;
                        }
                    }
                    break;
                }
                let n = u32::from_str_radix(&digits, 8).map_err(|_| CharConstError::UnknownEscape(esc))?;
                char::from_u32(n & 0xFF).unwrap_or('\0')
            }
            other => return Err(CharConstError::UnknownEscape(other)),
        };
        out.push(decoded);
    }
    Ok(out)
}
