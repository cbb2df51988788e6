//! Big integer type and basic accessors.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ops::cmp_mag;

/// Limb type for the magnitude (64-bit on every platform).
pub type Limb = u64;
/// Double-width type for multiplication and division intermediates.
pub type DoubleLimb = u128;

/// Bits per limb.
pub const LIMB_BITS: usize = 64;

/// An arbitrary-precision signed integer.
///
/// Stored as sign and magnitude: the magnitude is a little-endian vector of
/// `u64` limbs with no most-significant zero limbs, and zero is the single
/// limb `[0]` with a non-negative sign. Every value handed out by this crate
/// is in that canonical form, so structural and numeric equality coincide.
///
/// Limbs are zeroized on drop.
#[derive(Clone)]
pub struct BigInt {
    /// Little-endian limbs (limbs[0] is the least significant).
    limbs: Vec<Limb>,
    /// True if the number is negative. Never set for zero.
    negative: bool,
}

impl BigInt {
    /// Create a zero-valued BigInt.
    pub fn zero() -> Self {
        Self {
            limbs: vec![0],
            negative: false,
        }
    }

    /// Create a BigInt equal to one.
    pub fn one() -> Self {
        Self::from_u64(1)
    }

    /// Create a BigInt from a `u64` value.
    pub fn from_u64(value: u64) -> Self {
        Self {
            limbs: vec![value],
            negative: false,
        }
    }

    /// Create a non-negative BigInt from little-endian limbs.
    pub fn from_limbs(limbs: Vec<Limb>) -> Self {
        Self::from_parts(limbs, false)
    }

    /// Build a value from a raw magnitude and sign, restoring canonical form.
    pub(crate) fn from_parts(limbs: Vec<Limb>, negative: bool) -> Self {
        let mut n = Self { limbs, negative };
        n.normalize();
        n
    }

    /// Create a non-negative BigInt from big-endian bytes.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::zero();
        }

        let num_limbs = bytes.len().div_ceil(8);
        let mut limbs = vec![0u64; num_limbs];

        for (i, &byte) in bytes.iter().rev().enumerate() {
            limbs[i / 8] |= (byte as u64) << ((i % 8) * 8);
        }

        Self::from_limbs(limbs)
    }

    /// Export the magnitude as big-endian bytes. The sign is not encoded.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let bits = self.bit_len();
        if bits == 0 {
            return vec![0];
        }

        let num_bytes = bits.div_ceil(8);
        let mut bytes = vec![0u8; num_bytes];
        for (i, byte) in bytes.iter_mut().rev().enumerate() {
            *byte = (self.limbs[i / 8] >> ((i % 8) * 8)) as u8;
        }
        bytes
    }

    /// Number of significant bits in the magnitude.
    pub fn bit_len(&self) -> usize {
        let top = self.limbs.len() - 1;
        top * LIMB_BITS + (LIMB_BITS - self.limbs[top].leading_zeros() as usize)
    }

    /// Number of limbs in the magnitude.
    pub fn num_limbs(&self) -> usize {
        self.limbs.len()
    }

    /// The magnitude limbs, least significant first.
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Return true if this number is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.len() == 1 && self.limbs[0] == 0
    }

    /// Return true if this number is exactly one.
    pub fn is_one(&self) -> bool {
        !self.negative && self.limbs.len() == 1 && self.limbs[0] == 1
    }

    /// Return true if this number is below zero.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Return true if this number is above zero.
    pub fn is_positive(&self) -> bool {
        !self.negative && !self.is_zero()
    }

    /// Return true if the magnitude is even. Zero is even.
    pub fn is_even(&self) -> bool {
        self.limbs[0] & 1 == 0
    }

    /// Return true if the magnitude is odd.
    pub fn is_odd(&self) -> bool {
        self.limbs[0] & 1 == 1
    }

    /// -1, 0 or 1 according to the sign.
    pub fn signum(&self) -> i32 {
        if self.negative {
            -1
        } else if self.is_zero() {
            0
        } else {
            1
        }
    }

    /// Absolute value.
    pub fn abs(&self) -> BigInt {
        Self {
            limbs: self.limbs.clone(),
            negative: false,
        }
    }

    /// Bit `idx` of the magnitude (0-indexed from the LSB).
    pub fn get_bit(&self, idx: usize) -> bool {
        let limb_idx = idx / LIMB_BITS;
        limb_idx < self.limbs.len() && (self.limbs[limb_idx] >> (idx % LIMB_BITS)) & 1 == 1
    }

    /// Set bit `idx` of the magnitude, growing it as needed.
    pub fn set_bit(&mut self, idx: usize) {
        let limb_idx = idx / LIMB_BITS;
        if limb_idx >= self.limbs.len() {
            self.limbs.resize(limb_idx + 1, 0);
        }
        self.limbs[limb_idx] |= 1u64 << (idx % LIMB_BITS);
    }

    /// Flip the sign in place. Zero stays non-negative.
    pub(crate) fn negate_in_place(&mut self) {
        if !self.is_zero() {
            self.negative = !self.negative;
        }
    }

    /// Drop most-significant zero limbs and clear the sign of zero.
    pub(crate) fn normalize(&mut self) {
        while self.limbs.len() > 1 && self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
        if self.limbs.is_empty() {
            self.limbs.push(0);
        }
        if self.is_zero() {
            self.negative = false;
        }
    }
}

impl Zeroize for BigInt {
    /// Wipe the limbs and leave a canonical zero behind.
    fn zeroize(&mut self) {
        self.limbs.zeroize();
        self.limbs.push(0);
        self.negative = false;
    }
}

impl Drop for BigInt {
    fn drop(&mut self) {
        self.limbs.zeroize();
    }
}

impl ZeroizeOnDrop for BigInt {}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.negative == other.negative && self.limbs == other.limbs
    }
}

impl Eq for BigInt {}

impl Hash for BigInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.negative.hash(state);
        self.limbs.hash(state);
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => cmp_mag(&self.limbs, &other.limbs),
            // Both negative: larger magnitude is smaller
            (true, true) => cmp_mag(&other.limbs, &self.limbs),
        }
    }
}
