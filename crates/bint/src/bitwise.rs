//! Bitwise, shift, and logical operations for BigInt.
//!
//! Bitwise operators act on the infinite two's-complement form of the value:
//! a negative `x` behaves as if its bits were `!(|x| - 1)` extended with
//! ones forever. Right shift is arithmetic (rounds toward negative
//! infinity), left shift multiplies by a power of two.

use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, ShlAssign, Shr,
    ShrAssign,
};

use bint_types::BintError;

use crate::bigint::{BigInt, Limb, LIMB_BITS};
use crate::ops::{add_mag, forward_assign_op, forward_owned_binop, shl_mag, shr_mag};

/// Largest left shift accepted by [`BigInt::checked_shl`], in bits.
pub const MAX_SHIFT: u64 = u32::MAX as u64;

/// Two's-complement negation of a fixed-width limb vector, in place.
fn twos_negate(limbs: &mut [Limb]) {
    let mut carry = true;
    for limb in limbs.iter_mut() {
        let (v, c) = (!*limb).overflowing_add(carry as Limb);
        *limb = v;
        carry = c;
    }
}

/// Two's-complement view of `x`, sign-extended to `len` limbs.
fn to_twos(x: &BigInt, len: usize) -> Vec<Limb> {
    let mut limbs = vec![0; len];
    limbs[..x.num_limbs()].copy_from_slice(x.limbs());
    if x.is_negative() {
        twos_negate(&mut limbs);
    }
    limbs
}

/// Read a sign-extended two's-complement limb vector back into a BigInt.
fn from_twos(mut limbs: Vec<Limb>) -> BigInt {
    let negative = limbs.last().is_some_and(|&top| top >> (LIMB_BITS - 1) == 1);
    if negative {
        twos_negate(&mut limbs);
    }
    BigInt::from_parts(limbs, negative)
}

/// Apply `op` limb by limb to the two's-complement forms of `a` and `b`.
///
/// One extra limb keeps the sign-extension limb intact in both operands,
/// so the top limb of the result is pure sign.
fn bitwise(a: &BigInt, b: &BigInt, op: impl Fn(Limb, Limb) -> Limb) -> BigInt {
    let len = a.num_limbs().max(b.num_limbs()) + 1;
    let x = to_twos(a, len);
    let y = to_twos(b, len);
    from_twos(x.iter().zip(&y).map(|(&p, &q)| op(p, q)).collect())
}

impl BigInt {
    /// Shift left by `bits`: `self * 2^bits`.
    pub(crate) fn shl_bits(&self, bits: usize) -> BigInt {
        BigInt::from_parts(shl_mag(self.limbs(), bits), self.is_negative())
    }

    /// Arithmetic shift right by `bits`: `floor(self / 2^bits)`.
    pub(crate) fn shr_bits(&self, bits: usize) -> BigInt {
        let shifted = shr_mag(self.limbs(), bits);
        if !self.is_negative() {
            return BigInt::from_limbs(shifted);
        }
        // Negative: round the magnitude up when any set bit falls off
        let lost = (0..bits.min(self.bit_len())).any(|i| self.get_bit(i));
        let magnitude = if lost {
            add_mag(&shifted, &[1])
        } else {
            shifted
        };
        BigInt::from_parts(magnitude, true)
    }

    /// Left shift by a signed amount.
    ///
    /// Negative amounts, and amounts above [`MAX_SHIFT`], are rejected.
    pub fn checked_shl(&self, amount: i64) -> Result<BigInt, BintError> {
        if amount < 0 || amount as u64 > MAX_SHIFT {
            tracing::warn!(op = "shl", amount, "invalid shift amount");
            return Err(BintError::InvalidShiftAmount(amount));
        }
        Ok(self.shl_bits(amount as usize))
    }

    /// Arithmetic right shift by a signed amount. Negative amounts are rejected.
    pub fn checked_shr(&self, amount: i64) -> Result<BigInt, BintError> {
        if amount < 0 {
            tracing::warn!(op = "shr", amount, "invalid shift amount");
            return Err(BintError::InvalidShiftAmount(amount));
        }
        let bits = usize::try_from(amount).unwrap_or(usize::MAX);
        Ok(self.shr_bits(bits))
    }

    /// Logical AND over truthiness (nonzero is true).
    ///
    /// This is a plain method, not an operator: `other` is always fully
    /// evaluated by the caller before the call, so there is no
    /// short-circuiting.
    pub fn logical_and(&self, other: &BigInt) -> bool {
        let lhs = !self.is_zero();
        let rhs = !other.is_zero();
        lhs && rhs
    }

    /// Logical OR over truthiness. Both operands are always evaluated.
    pub fn logical_or(&self, other: &BigInt) -> bool {
        let lhs = !self.is_zero();
        let rhs = !other.is_zero();
        lhs || rhs
    }

    /// Logical NOT: true exactly when the value is zero.
    pub fn logical_not(&self) -> bool {
        self.is_zero()
    }
}

impl BitAnd<&BigInt> for &BigInt {
    type Output = BigInt;

    fn bitand(self, rhs: &BigInt) -> BigInt {
        bitwise(self, rhs, |a, b| a & b)
    }
}

impl BitOr<&BigInt> for &BigInt {
    type Output = BigInt;

    fn bitor(self, rhs: &BigInt) -> BigInt {
        bitwise(self, rhs, |a, b| a | b)
    }
}

impl BitXor<&BigInt> for &BigInt {
    type Output = BigInt;

    fn bitxor(self, rhs: &BigInt) -> BigInt {
        bitwise(self, rhs, |a, b| a ^ b)
    }
}

forward_owned_binop!(BitAnd, bitand, BigInt);
forward_owned_binop!(BitOr, bitor, BigInt);
forward_owned_binop!(BitXor, bitxor, BigInt);

forward_assign_op!(BitAndAssign, bitand_assign, &);
forward_assign_op!(BitOrAssign, bitor_assign, |);
forward_assign_op!(BitXorAssign, bitxor_assign, ^);

/// One's complement: `!x == -x - 1`.
impl Not for &BigInt {
    type Output = BigInt;

    fn not(self) -> BigInt {
        -(self + &BigInt::one())
    }
}

impl Not for BigInt {
    type Output = BigInt;

    fn not(self) -> BigInt {
        !&self
    }
}

macro_rules! impl_shift {
    ($($t:ty),*) => {$(
        impl Shl<$t> for &BigInt {
            type Output = BigInt;

            fn shl(self, bits: $t) -> BigInt {
                self.shl_bits(bits as usize)
            }
        }

        impl Shl<$t> for BigInt {
            type Output = BigInt;

            fn shl(self, bits: $t) -> BigInt {
                self.shl_bits(bits as usize)
            }
        }

        impl Shr<$t> for &BigInt {
            type Output = BigInt;

            fn shr(self, bits: $t) -> BigInt {
                self.shr_bits(bits as usize)
            }
        }

        impl Shr<$t> for BigInt {
            type Output = BigInt;

            fn shr(self, bits: $t) -> BigInt {
                self.shr_bits(bits as usize)
            }
        }

        impl ShlAssign<$t> for BigInt {
            fn shl_assign(&mut self, bits: $t) {
                *self = self.shl_bits(bits as usize);
            }
        }

        impl ShrAssign<$t> for BigInt {
            fn shr_assign(&mut self, bits: $t) {
                *self = self.shr_bits(bits as usize);
            }
        }
    )*};
}

impl_shift!(u8, u16, u32);

#[cfg(test)]
mod tests {
    use super::*;

    fn b(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn test_and_or_xor_positive() {
        assert_eq!(b(6) & b(3), b(2));
        assert_eq!(b(6) | b(3), b(7));
        assert_eq!(b(6) ^ b(3), b(5));
    }

    #[test]
    fn test_bitwise_negative_operands() {
        assert_eq!(b(-1) & b(-1), b(-1));
        assert_eq!(b(-1) | b(0), b(-1));
        assert_eq!(b(-6) & b(3), b(2));
        assert_eq!(b(-6) | b(3), b(-5));
        assert_eq!(b(-6) ^ b(3), b(-7));
        assert_eq!(b(-6) & b(-3), b(-8));
        assert_eq!(b(-6) | b(-3), b(-1));
        assert_eq!(b(-6) ^ b(-3), b(7));
    }

    #[test]
    fn test_bitwise_matches_native_i64() {
        let values = [0i64, 1, -1, 7, -8, 255, -256, i64::MAX, i64::MIN, 0x5555, -0x5555];
        for &x in &values {
            for &y in &values {
                assert_eq!(b(x) & b(y), b(x & y), "{x} & {y}");
                assert_eq!(b(x) | b(y), b(x | y), "{x} | {y}");
                assert_eq!(b(x) ^ b(y), b(x ^ y), "{x} ^ {y}");
            }
            assert_eq!(!b(x), b(!x), "!{x}");
        }
    }

    #[test]
    fn test_bitwise_multi_limb_negative() {
        // -(2^64) & (2^64 + 1) == 2^64
        let neg = -(BigInt::one() << 64u32);
        let pos = (BigInt::one() << 64u32) + 1;
        assert_eq!(&neg & &pos, BigInt::one() << 64u32);
        assert_eq!(&neg | &pos, neg.clone() + 1);
    }

    #[test]
    fn test_not() {
        assert_eq!(!b(0), b(-1));
        assert_eq!(!b(-1), b(0));
        assert_eq!(!b(5), b(-6));
        let big = BigInt::one() << 200u32;
        assert_eq!(!!big.clone(), big);
    }

    #[test]
    fn test_shifts() {
        assert_eq!(b(1) << 3u32, b(8));
        assert_eq!(b(-3) << 2u8, b(-12));
        assert_eq!(b(17) >> 2u32, b(4));
        assert_eq!(b(-1) >> 1u32, b(-1));
        assert_eq!(b(-5) >> 1u32, b(-3));
        assert_eq!(b(-4) >> 1u32, b(-2));
        assert_eq!(b(-4) >> 300u32, b(-1));
        assert_eq!(b(4) >> 300u32, b(0));
        assert_eq!((BigInt::one() << 130u32).bit_len(), 131);
    }

    #[test]
    fn test_shr_matches_native_i64() {
        for x in [-1000i64, -129, -64, -1, 0, 1, 63, 1000, i64::MIN, i64::MAX] {
            for s in 0u32..70 {
                let expected = if s >= 64 { x >> 63 } else { x >> s };
                assert_eq!(b(x) >> s, b(expected), "{x} >> {s}");
            }
        }
    }

    #[test]
    fn test_shift_assign() {
        let mut x = b(3);
        x <<= 65u32;
        assert_eq!(x.limbs(), &[0, 6]);
        x >>= 64u32;
        assert_eq!(x, b(6));
    }

    #[test]
    fn test_checked_shifts() {
        assert_eq!(b(5).checked_shl(2).unwrap(), b(20));
        assert_eq!(b(-20).checked_shr(2).unwrap(), b(-5));
        assert!(matches!(
            b(5).checked_shl(-1),
            Err(BintError::InvalidShiftAmount(-1))
        ));
        assert!(matches!(
            b(5).checked_shr(-3),
            Err(BintError::InvalidShiftAmount(-3))
        ));
        assert!(b(5).checked_shl(i64::MAX).is_err());
        assert_eq!(b(-5).checked_shr(i64::MAX).unwrap(), b(-1));
    }

    #[test]
    fn test_logical_ops() {
        assert!(b(3).logical_and(&b(-2)));
        assert!(!b(3).logical_and(&b(0)));
        assert!(b(0).logical_or(&b(9)));
        assert!(!b(0).logical_or(&b(0)));
        assert!(b(0).logical_not());
        assert!(!b(-1).logical_not());
    }

    #[test]
    fn test_logical_ops_evaluate_both_operands() {
        let mut evaluated = 0;
        let mut operand = |v: i64| {
            evaluated += 1;
            b(v)
        };
        let lhs = operand(0);
        assert!(!lhs.logical_and(&operand(1)));
        assert_eq!(evaluated, 2);
    }

    #[test]
    fn test_bitwise_assign() {
        let mut x = b(0b1100);
        x &= b(0b1010);
        assert_eq!(x, b(0b1000));
        x |= &b(0b0001);
        assert_eq!(x, b(0b1001));
        x ^= b(-1);
        assert_eq!(x, b(!0b1001));
    }
}
