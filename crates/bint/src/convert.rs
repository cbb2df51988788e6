//! Conversions between BigInt and native integers, and mixed comparisons.

use std::cmp::Ordering;

use bint_types::BintError;

use crate::bigint::{BigInt, Limb};

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInt {
            fn from(value: $t) -> Self {
                BigInt::from_u64(value as u64)
            }
        }
    )*};
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInt {
            fn from(value: $t) -> Self {
                BigInt::from_parts(vec![value.unsigned_abs() as u64], value < 0)
            }
        }
    )*};
}

impl_from_unsigned!(u8, u16, u32, u64, usize);
impl_from_signed!(i8, i16, i32, i64, isize);

impl From<u128> for BigInt {
    fn from(value: u128) -> Self {
        BigInt::from_limbs(vec![value as Limb, (value >> 64) as Limb])
    }
}

impl From<i128> for BigInt {
    fn from(value: i128) -> Self {
        let magnitude = value.unsigned_abs();
        BigInt::from_parts(
            vec![magnitude as Limb, (magnitude >> 64) as Limb],
            value < 0,
        )
    }
}

impl BigInt {
    /// Low-order signed machine word of the value. Lossy and silent.
    ///
    /// Values that fit in an `i64` convert exactly. Larger values keep only
    /// the low 63 bits of the magnitude with the sign applied, the way a
    /// "get low signed word" primitive behaves; no error is reported. Use
    /// `i64::try_from(&big)` for a checked conversion.
    pub fn low_i64(&self) -> i64 {
        let low = self.limbs()[0];
        if self.is_negative() {
            -1 - (low.wrapping_sub(1) & i64::MAX as u64) as i64
        } else {
            (low & i64::MAX as u64) as i64
        }
    }

    /// [`low_i64`](Self::low_i64) further truncated to 32 bits. Lossy and silent.
    pub fn low_i32(&self) -> i32 {
        self.low_i64() as i32
    }

    /// Magnitude as a u128 if it has at most two limbs.
    fn magnitude_u128(&self) -> Option<u128> {
        match *self.limbs() {
            [lo] => Some(lo as u128),
            [lo, hi] => Some(((hi as u128) << 64) | lo as u128),
            _ => None,
        }
    }

    /// Compare against text in the accepted literal grammar.
    pub fn cmp_str(&self, text: &str) -> Result<Ordering, BintError> {
        let other = BigInt::parse(text)?;
        Ok(self.cmp(&other))
    }
}

impl TryFrom<&BigInt> for u128 {
    type Error = BintError;

    fn try_from(value: &BigInt) -> Result<Self, Self::Error> {
        match value.magnitude_u128() {
            Some(m) if !value.is_negative() => Ok(m),
            _ => Err(BintError::OutOfRange { target: "u128" }),
        }
    }
}

impl TryFrom<&BigInt> for i128 {
    type Error = BintError;

    fn try_from(value: &BigInt) -> Result<Self, Self::Error> {
        let out_of_range = BintError::OutOfRange { target: "i128" };
        let m = value.magnitude_u128().ok_or(out_of_range)?;
        if value.is_negative() {
            if m > i128::MIN.unsigned_abs() {
                return Err(BintError::OutOfRange { target: "i128" });
            }
            Ok((m as i128).wrapping_neg())
        } else {
            i128::try_from(m).map_err(|_| BintError::OutOfRange { target: "i128" })
        }
    }
}

impl TryFrom<&BigInt> for u64 {
    type Error = BintError;

    fn try_from(value: &BigInt) -> Result<Self, Self::Error> {
        let wide = u128::try_from(value).map_err(|_| BintError::OutOfRange { target: "u64" })?;
        u64::try_from(wide).map_err(|_| BintError::OutOfRange { target: "u64" })
    }
}

impl TryFrom<&BigInt> for i64 {
    type Error = BintError;

    fn try_from(value: &BigInt) -> Result<Self, Self::Error> {
        let wide = i128::try_from(value).map_err(|_| BintError::OutOfRange { target: "i64" })?;
        i64::try_from(wide).map_err(|_| BintError::OutOfRange { target: "i64" })
    }
}

/// Mixed comparisons promote the native value and compare as BigInt.
macro_rules! impl_native_cmp {
    ($($t:ty),*) => {$(
        impl PartialEq<$t> for BigInt {
            fn eq(&self, other: &$t) -> bool {
                *self == BigInt::from(*other)
            }
        }

        impl PartialOrd<$t> for BigInt {
            fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                Some(self.cmp(&BigInt::from(*other)))
            }
        }
    )*};
}

impl_native_cmp!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Text that does not parse as a literal is never equal to a BigInt.
/// Use [`BigInt::cmp_str`] to see the parse error.
impl PartialEq<str> for BigInt {
    fn eq(&self, other: &str) -> bool {
        BigInt::parse(other).is_ok_and(|v| v == *self)
    }
}

impl PartialEq<&str> for BigInt {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

/// Unparseable text is unordered with respect to every BigInt.
impl PartialOrd<str> for BigInt {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        self.cmp_str(other).ok()
    }
}

impl PartialOrd<&str> for BigInt {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        self.cmp_str(other).ok()
    }
}
