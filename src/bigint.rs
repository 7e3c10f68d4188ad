//! Fixed-precision two's-complement arithmetic over a two-limb integer.
//!
//! [`BigInt`] is the value type the rest of this crate computes with: a
//! `2 * LIMB_BITS`-bit two's-complement integer, physically stored as two
//! [`u64`] limbs, carrying a `signedness` flag and a sticky `overflow` flag
//! set by the operation that most recently produced the value. Every
//! producer re-establishes the invariant that bits above the target
//! `precision` are zero (see [`BigInt::trim`]).
//!
//! The arithmetic here intentionally matches what a C compiler evaluating
//! an `intmax_t`/`uintmax_t` expression at a given `precision` would
//! produce, including a couple of faithfully-preserved quirks in the
//! overflow bookkeeping (see `DESIGN.md`).

use core::cmp::Ordering;

/// Width, in bits, of a single limb.
pub const LIMB_BITS: u32 = 64;

/// `rhs == 0` in a division or remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("division by zero")]
pub struct DivisionByZero;

/// A `2 * LIMB_BITS`-bit two's-complement integer with a signedness flag
/// and a sticky overflow flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigInt {
    /// Upper limb.
    pub high: u64,
    /// Lower limb.
    pub low: u64,
    /// True if this value's type is unsigned.
    pub unsignedp: bool,
    /// True if the operation that produced this value overflowed the
    /// target precision (signed) or could not represent the result
    /// (unsigned, where applicable).
    pub overflow: bool,
}

impl BigInt {
    /// The zero value of the given signedness.
    pub fn zero(unsignedp: bool) -> Self {
        BigInt {
            high: 0,
            low: 0,
            unsignedp,
            overflow: false,
        }
    }

    /// Construct from a plain `u64`, signed unless `unsignedp` is set.
    pub fn from_u64(value: u64, unsignedp: bool) -> Self {
        BigInt {
            high: 0,
            low: value,
            unsignedp,
            overflow: false,
        }
    }

    /// True iff both limbs are zero.
    pub fn is_zero(&self) -> bool {
        (self.low | self.high) == 0
    }

    /// True iff `self` and `other` have identical limb patterns (signedness
    /// and overflow are not compared).
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.high == other.high && self.low == other.low
    }

    /// Zero all bits above bit position `precision - 1`.
    pub fn trim(mut self, precision: u32) -> Self {
        let (high, low) = trim_limbs(self.high, self.low, precision);
        self.high = high;
        self.low = low;
        self
    }

    /// True iff, interpreted as a signed `precision`-bit integer, `self` is
    /// non-negative. Meaningless (but harmless) for unsigned values.
    pub fn is_positive(&self, precision: u32) -> bool {
        if precision > LIMB_BITS {
            let p = precision - LIMB_BITS;
            (self.high & (1u64 << (p - 1))) == 0
        } else {
            (self.low & (1u64 << (precision - 1))) == 0
        }
    }

    /// Two's-complement negation. Sets `overflow` iff `self` is the most
    /// negative representable value (negating it is not representable).
    pub fn negate(self, precision: u32) -> Self {
        let orig = self;
        let mut high = !self.high;
        let mut low = !self.low;
        let (new_low, carried) = low.overflowing_add(1);
        low = new_low;
        if carried {
            high = high.wrapping_add(1);
        }
        let (high, low) = trim_limbs(high, low, precision);
        let mut result = BigInt {
            high,
            low,
            unsignedp: self.unsignedp,
            overflow: false,
        };
        result.overflow = !result.unsignedp && result.bits_eq(&orig) && !result.is_zero();
        result
    }

    /// Bitwise complement (`~self`), trimmed. Never overflows.
    pub fn not(self, precision: u32) -> Self {
        let high = !self.high;
        let low = !self.low;
        let mut result = BigInt {
            high,
            low,
            unsignedp: self.unsignedp,
            overflow: false,
        }
        .trim(precision);
        result.overflow = false;
        result
    }

    /// Logical negation (`!self`): `1` if zero, else `0`. Always a signed
    /// 0/1 result.
    pub fn logical_not(self) -> Self {
        BigInt {
            high: 0,
            low: self.is_zero() as u64,
            unsignedp: false,
            overflow: false,
        }
    }

    /// `self + rhs`.
    pub fn add(self, rhs: Self, precision: u32) -> Self {
        let (low, carry) = self.low.overflowing_add(rhs.low);
        let mut high = self.high.wrapping_add(rhs.high);
        if carry {
            high = high.wrapping_add(1);
        }
        let (high, low) = trim_limbs(high, low, precision);
        let unsignedp = self.unsignedp || rhs.unsignedp;
        let mut result = BigInt {
            high,
            low,
            unsignedp,
            overflow: false,
        };
        if !unsignedp {
            let lhsp = self.is_positive(precision);
            result.overflow = lhsp == rhs.is_positive(precision) && lhsp != result.is_positive(precision);
        }
        result
    }

    /// `self - rhs`.
    pub fn sub(self, rhs: Self, precision: u32) -> Self {
        self.add(rhs.negate(precision), precision)
    }

    /// `self * rhs`. See `DESIGN.md` for the deliberately-preserved
    /// effective parenthesisation of the signed overflow condition.
    pub fn mul(self, rhs: Self, precision: u32) -> Self {
        let unsignedp = self.unsignedp || rhs.unsignedp;
        let mut negate = false;
        let mut lhs = self;
        let mut rhs = rhs;
        if !unsignedp {
            if !lhs.is_positive(precision) {
                negate = !negate;
                lhs = lhs.negate(precision);
            }
            if !rhs.is_positive(precision) {
                negate = !negate;
                rhs = rhs.negate(precision);
            }
        }

        let mut overflow = lhs.high != 0 && rhs.high != 0;

        let (mut result_high, result_low) = mul_wide(lhs.low, rhs.low);

        let (cross1_high, cross1_low) = mul_wide(lhs.high, rhs.low);
        result_high = result_high.wrapping_add(cross1_low);
        if cross1_high != 0 {
            overflow = true;
        }

        let (cross2_high, cross2_low) = mul_wide(lhs.low, rhs.high);
        result_high = result_high.wrapping_add(cross2_low);
        if cross2_high != 0 {
            overflow = true;
        }

        let (trimmed_high, trimmed_low) = trim_limbs(result_high, result_low, precision);
        if trimmed_high != result_high || trimmed_low != result_low {
            overflow = true;
        }

        let mut result = BigInt {
            high: trimmed_high,
            low: trimmed_low,
            unsignedp: false,
            overflow: false,
        };
        if negate {
            result = result.negate(precision);
        }

        if unsignedp {
            result.overflow = false;
        } else {
            let positive = result.is_positive(precision);
            let zero = result.is_zero();
            result.overflow = overflow || (positive != !negate && !zero);
        }
        result.unsignedp = unsignedp;
        result
    }

    /// `self / rhs`. `Err(DivisionByZero)` if `rhs` is zero.
    pub fn div(self, rhs: Self, precision: u32) -> Result<Self, DivisionByZero> {
        self.div_rem(rhs, precision).map(|(q, _)| q)
    }

    /// `self % rhs`, taking the sign of `self`. `Err(DivisionByZero)` if
    /// `rhs` is zero.
    pub fn rem(self, rhs: Self, precision: u32) -> Result<Self, DivisionByZero> {
        self.div_rem(rhs, precision).map(|(_, r)| r)
    }

    /// Naive bitwise restoring division, returning `(quotient, remainder)`.
    fn div_rem(self, rhs: Self, precision: u32) -> Result<(Self, Self), DivisionByZero> {
        let unsignedp = self.unsignedp || rhs.unsignedp;
        let mut negate = false;
        let mut lhs_neg = false;
        let mut lhs = self;
        let mut rhs = rhs;
        if !unsignedp {
            if !lhs.is_positive(precision) {
                negate = !negate;
                lhs_neg = true;
                lhs = lhs.negate(precision);
            }
            if !rhs.is_positive(precision) {
                negate = !negate;
                rhs = rhs.negate(precision);
            }
        }

        let top_bit = match highest_set_bit(rhs.high, rhs.low) {
            Some(i) => i,
            None => return Err(DivisionByZero),
        };
        rhs.unsignedp = true;
        lhs.unsignedp = true;

        let mut shift = precision - top_bit - 1;
        let mut sub = shl_limbs(rhs.high, rhs.low, shift as u64, precision);

        let mut quot_high = 0u64;
        let mut quot_low = 0u64;
        loop {
            if unsigned_ge(lhs.high, lhs.low, sub.0, sub.1) {
                lhs = lhs.sub(
                    BigInt {
                        high: sub.0,
                        low: sub.1,
                        unsignedp: true,
                        overflow: false,
                    },
                    precision,
                );
                if shift >= LIMB_BITS {
                    quot_high |= 1u64 << (shift - LIMB_BITS);
                } else {
                    quot_low |= 1u64 << shift;
                }
            }
            if shift == 0 {
                break;
            }
            shift -= 1;
            let new_low = (sub.1 >> 1) | (sub.0 << (LIMB_BITS - 1));
            let new_high = sub.0 >> 1;
            sub = (new_high, new_low);
        }

        let mut quotient = BigInt {
            high: quot_high,
            low: quot_low,
            unsignedp,
            overflow: false,
        };
        if unsignedp {
            quotient.overflow = false;
        } else {
            if negate {
                quotient = quotient.negate(precision);
            }
            quotient.overflow = quotient.is_positive(precision) != !negate;
        }

        lhs.unsignedp = unsignedp;
        lhs.overflow = false;
        if lhs_neg {
            lhs = lhs.negate(precision);
        }

        Ok((quotient, lhs))
    }

    /// Logical/arithmetic left shift by `n` bits (sign of the operand is
    /// irrelevant to the shift itself; only the overflow check differs).
    pub fn shl(self, n: u64, precision: u32) -> Self {
        if n >= precision as u64 {
            return BigInt {
                high: 0,
                low: 0,
                unsignedp: self.unsignedp,
                overflow: !self.unsignedp && !self.is_zero(),
            };
        }
        let (high, low) = shl_limbs(self.high, self.low, n, precision);
        let mut result = BigInt {
            high,
            low,
            unsignedp: self.unsignedp,
            overflow: false,
        };
        if result.unsignedp {
            result.overflow = false;
        } else {
            let roundtrip = result.shr(n, precision);
            result.overflow = !roundtrip.bits_eq(&self);
        }
        result
    }

    /// Right shift by `n` bits: arithmetic (sign-extending) if signed,
    /// logical otherwise.
    pub fn shr(self, n: u64, precision: u32) -> Self {
        let sign_mask: u64 = if self.unsignedp || self.is_positive(precision) {
            0
        } else {
            u64::MAX
        };

        let (high, low) = if n >= precision as u64 {
            (sign_mask, sign_mask)
        } else {
            let mut high = self.high;
            let mut low = self.low;
            if precision < LIMB_BITS {
                high = sign_mask;
                low |= sign_mask << precision;
            } else if precision < 2 * LIMB_BITS {
                high |= sign_mask << (precision - LIMB_BITS);
            }

            let mut n = n;
            if n >= LIMB_BITS as u64 {
                n -= LIMB_BITS as u64;
                low = high;
                high = sign_mask;
            }
            if n > 0 {
                low = (low >> n) | (high << (LIMB_BITS as u64 - n));
                high = (high >> n) | (sign_mask << (LIMB_BITS as u64 - n));
            }
            (high, low)
        };

        let (high, low) = trim_limbs(high, low, precision);
        BigInt {
            high,
            low,
            unsignedp: self.unsignedp,
            overflow: false,
        }
    }

    /// Bitwise AND. Result is unsigned iff either operand is.
    pub fn bitand(self, rhs: Self) -> Self {
        BigInt {
            high: self.high & rhs.high,
            low: self.low & rhs.low,
            unsignedp: self.unsignedp || rhs.unsignedp,
            overflow: false,
        }
    }

    /// Bitwise OR. Result is unsigned iff either operand is.
    pub fn bitor(self, rhs: Self) -> Self {
        BigInt {
            high: self.high | rhs.high,
            low: self.low | rhs.low,
            unsignedp: self.unsignedp || rhs.unsignedp,
            overflow: false,
        }
    }

    /// Bitwise XOR. Result is unsigned iff either operand is.
    pub fn bitxor(self, rhs: Self) -> Self {
        BigInt {
            high: self.high ^ rhs.high,
            low: self.low ^ rhs.low,
            unsignedp: self.unsignedp || rhs.unsignedp,
            overflow: false,
        }
    }

    /// `self == rhs`, as a signed 0/1 `BigInt`.
    pub fn eq_op(self, rhs: Self) -> Self {
        BigInt {
            high: 0,
            low: self.bits_eq(&rhs) as u64,
            unsignedp: false,
            overflow: false,
        }
    }

    /// `self != rhs`, as a signed 0/1 `BigInt`.
    pub fn ne_op(self, rhs: Self) -> Self {
        BigInt {
            high: 0,
            low: !self.bits_eq(&rhs) as u64,
            unsignedp: false,
            overflow: false,
        }
    }

    /// `self >= rhs`, comparing unsigned if either operand is unsigned,
    /// otherwise comparing as signed `precision`-bit integers.
    pub fn greater_eq(&self, rhs: &Self, precision: u32) -> bool {
        greater_eq(self, rhs, precision)
    }

    /// One of `<`, `>`, `<=`, `>=`, as a signed 0/1 `BigInt`.
    pub fn inequality(self, rhs: Self, op: Ordering, or_equal: bool, precision: u32) -> Self {
        let gte = self.greater_eq(&rhs, precision);
        let low = match (op, or_equal) {
            (Ordering::Greater, false) => gte && !self.bits_eq(&rhs),
            (Ordering::Greater, true) => gte,
            (Ordering::Less, false) => !gte,
            (Ordering::Less, true) => !gte || self.bits_eq(&rhs),
            (Ordering::Equal, _) => unreachable!("inequality() is only for < > <= >="),
        };
        BigInt {
            high: 0,
            low: low as u64,
            unsignedp: false,
            overflow: false,
        }
    }

    /// GCC `<?` extension: the smaller of `self` and `rhs`.
    pub fn min(self, rhs: Self, precision: u32) -> Self {
        let unsignedp = self.unsignedp || rhs.unsignedp;
        let mut result = if self.greater_eq(&rhs, precision) {
            rhs
        } else {
            self
        };
        result.unsignedp = unsignedp;
        result.overflow = false;
        result
    }

    /// GCC `>?` extension: the larger of `self` and `rhs`.
    pub fn max(self, rhs: Self, precision: u32) -> Self {
        let unsignedp = self.unsignedp || rhs.unsignedp;
        let mut result = if self.greater_eq(&rhs, precision) {
            self
        } else {
            rhs
        };
        result.unsignedp = unsignedp;
        result.overflow = false;
        result
    }
}

fn trim_limbs(mut high: u64, mut low: u64, precision: u32) -> (u64, u64) {
    if precision > LIMB_BITS {
        let p = precision - LIMB_BITS;
        if p < LIMB_BITS {
            high &= (1u64 << p) - 1;
        }
    } else {
        if precision < LIMB_BITS {
            low &= (1u64 << precision) - 1;
        }
        high = 0;
    }
    (high, low)
}

fn shl_limbs(mut high: u64, mut low: u64, n: u64, precision: u32) -> (u64, u64) {
    let mut n = n;
    if n >= LIMB_BITS as u64 {
        n -= LIMB_BITS as u64;
        high = low;
        low = 0;
    }
    if n > 0 {
        high = (high << n) | (low >> (LIMB_BITS as u64 - n));
        low <<= n;
    }
    trim_limbs(high, low, precision)
}

/// Full 128-bit product of two `u64`s, returned as `(high, low)`.
fn mul_wide(a: u64, b: u64) -> (u64, u64) {
    let product = (a as u128) * (b as u128);
    ((product >> 64) as u64, product as u64)
}

fn highest_set_bit(high: u64, low: u64) -> Option<u32> {
    if high != 0 {
        Some(LIMB_BITS + (LIMB_BITS - 1 - high.leading_zeros()))
    } else if low != 0 {
        Some(LIMB_BITS - 1 - low.leading_zeros())
    } else {
        None
    }
}

fn unsigned_ge(a_high: u64, a_low: u64, b_high: u64, b_low: u64) -> bool {
    a_high > b_high || (a_high == b_high && a_low >= b_low)
}

fn greater_eq(lhs: &BigInt, rhs: &BigInt, precision: u32) -> bool {
    let mut unsignedp = lhs.unsignedp || rhs.unsignedp;
    if !unsignedp {
        unsignedp = lhs.is_positive(precision);
        if unsignedp != rhs.is_positive(precision) {
            return unsignedp;
        }
    }
    unsigned_ge(lhs.high, lhs.low, rhs.high, rhs.low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const P64: u32 = 64;
    const P32: u32 = 32;

    fn signed(v: i64) -> BigInt {
        BigInt {
            high: 0,
            low: v as u64,
            unsignedp: false,
            overflow: false,
        }
        .trim(P64)
    }

    fn unsigned(v: u64) -> BigInt {
        BigInt::from_u64(v, true)
    }

    #[test]
    fn negate_round_trip() {
        for v in [1i64, -1, 42, -42, i64::MAX, i64::MIN + 1] {
            let x = signed(v);
            let back = x.negate(P64).negate(P64);
            assert!(back.bits_eq(&x), "failed for {v}");
        }
    }

    #[test]
    fn negate_min_overflows() {
        let min = signed(i64::MIN);
        let negated = min.negate(P64);
        assert!(negated.overflow);
        assert!(negated.bits_eq(&min));
    }

    #[test_case(1, 2 => 3; "1 + 2")]
    #[test_case(-1, -1 => -2; "-1 + -1")]
    fn add_matches_native(a: i64, b: i64) -> i64 {
        signed(a).add(signed(b), P64).low as i64
    }

    #[test]
    fn add_signed_overflow() {
        let result = signed(i64::MAX).add(signed(1), P64);
        assert!(result.overflow);
        assert_eq!(result.low as i64, i64::MIN);
    }

    #[test]
    fn add_unsigned_wraps_without_overflow_flag() {
        let max_u = unsigned(u64::MAX);
        let result = max_u.add(unsigned(1), P64);
        assert!(!result.overflow);
        assert_eq!(result.low, 0);
    }

    #[test]
    fn mul_matches_native() {
        let result = signed(6).mul(signed(7), P64);
        assert_eq!(result.low as i64, 42);
        assert!(!result.overflow);
    }

    #[test]
    fn mul_min_by_minus_one_overflows() {
        let result = signed(i64::MIN).mul(signed(-1), P64);
        assert!(result.overflow);
        assert_eq!(result.low as i64, i64::MIN);
    }

    #[test]
    fn div_by_zero_errs() {
        assert!(signed(5).div(signed(0), P64).is_err());
        assert!(signed(5).rem(signed(0), P64).is_err());
    }

    #[test]
    fn div_matches_native() {
        assert_eq!(signed(7).div(signed(2), P64).unwrap().low as i64, 3);
        assert_eq!(signed(-7).div(signed(2), P64).unwrap().low as i64, -3);
        assert_eq!(signed(7).rem(signed(2), P64).unwrap().low as i64, 1);
        assert_eq!(signed(-7).rem(signed(2), P64).unwrap().low as i64, -1);
    }

    #[test]
    fn unsigned_compare() {
        let minus_one = unsigned(0).sub(unsigned(1), P64);
        assert!(minus_one.greater_eq(&unsigned(0), P64));
    }

    #[test]
    fn shift_left_then_logical_right_round_trips_when_top_bits_clear() {
        let x = unsigned(0x1234);
        let shifted = x.shl(10, P64);
        let back = shifted.shr(10, P64);
        assert!(back.bits_eq(&x));
    }

    #[test]
    fn arithmetic_right_shift_preserves_sign() {
        let x = signed(-8);
        let shifted = x.shr(1, P64);
        assert_eq!(shifted.low as i64, -4);
    }

    #[test]
    fn left_shift_by_precision_overflows_when_signed_and_nonzero() {
        let one = signed(1);
        let shifted = one.shl(P64 as u64, P64);
        assert!(shifted.overflow);
        assert!(shifted.is_zero());
    }

    #[test]
    fn left_shift_at_32_bit_precision() {
        let one = BigInt::from_u64(1, false).trim(P32);
        let shifted = one.shl(31, P32);
        assert!(shifted.overflow);
    }

    #[test]
    fn min_max() {
        let a = signed(3);
        let b = signed(7);
        assert_eq!(a.min(b, P64).low as i64, 3);
        assert_eq!(a.max(b, P64).low as i64, 7);
    }
}
