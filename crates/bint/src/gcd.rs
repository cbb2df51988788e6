//! GCD and modular inverse operations.

use bint_types::BintError;

use crate::bigint::BigInt;
use crate::ops::div_rem_mag;

impl BigInt {
    /// Greatest common divisor of the magnitudes, by the Euclidean algorithm.
    ///
    /// Always non-negative; `gcd(0, 0)` is 0.
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        let mut a = self.limbs().to_vec();
        let mut b = other.limbs().to_vec();
        while !(b.len() == 1 && b[0] == 0) {
            let (_, r) = div_rem_mag(&a, &b);
            a = std::mem::replace(&mut b, r);
        }
        BigInt::from_limbs(a)
    }

    /// Modular inverse: the `x` in `[0, |modulus|)` with `self * x ≡ 1`.
    ///
    /// Uses the extended Euclidean algorithm. The sign of `modulus` does not
    /// matter. When `|modulus| == 1` every value is congruent to zero and
    /// the inverse is 0.
    ///
    /// Returns `Err(ZeroModulus)` for a zero modulus and `Err(NoInverse)`
    /// when gcd(self, modulus) != 1.
    pub fn mod_inverse(&self, modulus: &BigInt) -> Result<BigInt, BintError> {
        if modulus.is_zero() {
            tracing::warn!(op = "mod_inverse", "modulus is zero");
            return Err(BintError::ZeroModulus);
        }
        let m = modulus.abs();
        if m.is_one() {
            return Ok(BigInt::zero());
        }

        // Invariant: old_r ≡ old_s * self (mod m), and likewise for r, s
        let mut old_r = self.rem_euclid(&m)?;
        let mut r = m.clone();
        let mut old_s = BigInt::one();
        let mut s = BigInt::zero();
        let mut rounds = 0usize;

        while !r.is_zero() {
            let (quotient, remainder) = old_r.div_rem(&r)?;
            old_r = std::mem::replace(&mut r, remainder);

            let next_s = &old_s - &(&quotient * &s);
            old_s = std::mem::replace(&mut s, next_s);
            rounds += 1;
        }
        tracing::trace!(rounds, "extended euclid finished");

        // old_r is gcd(self, m)
        if !old_r.is_one() {
            tracing::warn!(op = "mod_inverse", "operands are not coprime");
            return Err(BintError::NoInverse);
        }
        old_s.rem_euclid(&m)
    }
}
