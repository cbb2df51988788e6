//! Magnitude kernel and signed arithmetic for BigInt.
//!
//! The kernel works on little-endian limb slices and knows nothing about
//! signs; the signed layer combines magnitudes and applies the sign rules of
//! truncating integer arithmetic. Every operator taking a native integer on
//! the right converts it with `From` and forwards to the BigInt operator.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Rem, Sub, SubAssign};

use bint_types::BintError;

use crate::bigint::{BigInt, DoubleLimb, Limb, LIMB_BITS};

/// Compare two magnitudes, ignoring any high zero limbs.
pub(crate) fn cmp_mag(a: &[Limb], b: &[Limb]) -> Ordering {
    let max_len = a.len().max(b.len());
    for i in (0..max_len).rev() {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        if av != bv {
            return av.cmp(&bv);
        }
    }
    Ordering::Equal
}

/// Remove high zero limbs, keeping at least one limb.
pub(crate) fn trim(limbs: &mut Vec<Limb>) {
    while limbs.len() > 1 && limbs.last() == Some(&0) {
        limbs.pop();
    }
    if limbs.is_empty() {
        limbs.push(0);
    }
}

/// a + b over magnitudes.
pub(crate) fn add_mag(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut limbs = Vec::with_capacity(long.len() + 1);
    let mut carry: Limb = 0;

    for (i, &lv) in long.iter().enumerate() {
        let sv = short.get(i).copied().unwrap_or(0);
        let sum = lv as DoubleLimb + sv as DoubleLimb + carry as DoubleLimb;
        limbs.push(sum as Limb);
        carry = (sum >> LIMB_BITS) as Limb;
    }
    limbs.push(carry);
    trim(&mut limbs);
    limbs
}

/// a - b over magnitudes. Requires a >= b.
pub(crate) fn sub_mag(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    debug_assert!(cmp_mag(a, b) != Ordering::Less);
    let mut limbs = Vec::with_capacity(a.len());
    let mut borrow = false;

    for (i, &av) in a.iter().enumerate() {
        let bv = b.get(i).copied().unwrap_or(0);
        let (d1, b1) = av.overflowing_sub(bv);
        let (d2, b2) = d1.overflowing_sub(borrow as Limb);
        limbs.push(d2);
        borrow = b1 || b2;
    }
    trim(&mut limbs);
    limbs
}

/// Schoolbook multiplication over magnitudes.
pub(crate) fn mul_mag(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    if a.iter().all(|&l| l == 0) || b.iter().all(|&l| l == 0) {
        return vec![0];
    }

    let mut limbs = vec![0; a.len() + b.len()];
    for (i, &av) in a.iter().enumerate() {
        let mut carry: Limb = 0;
        for (j, &bv) in b.iter().enumerate() {
            let prod = av as DoubleLimb * bv as DoubleLimb
                + limbs[i + j] as DoubleLimb
                + carry as DoubleLimb;
            limbs[i + j] = prod as Limb;
            carry = (prod >> LIMB_BITS) as Limb;
        }
        limbs[i + b.len()] = carry;
    }
    trim(&mut limbs);
    limbs
}

/// limbs = limbs * mul + add, in place.
pub(crate) fn mul_add_limb(limbs: &mut Vec<Limb>, mul: Limb, add: Limb) {
    let mut carry = add as DoubleLimb;
    for limb in limbs.iter_mut() {
        let wide = *limb as DoubleLimb * mul as DoubleLimb + carry;
        *limb = wide as Limb;
        carry = wide >> LIMB_BITS;
    }
    if carry != 0 {
        limbs.push(carry as Limb);
    }
    trim(limbs);
}

/// Divide a magnitude by a single nonzero limb: returns (quotient, remainder).
pub(crate) fn div_rem_limb(a: &[Limb], d: Limb) -> (Vec<Limb>, Limb) {
    debug_assert!(d != 0);
    let mut q = vec![0; a.len()];
    let mut rem: DoubleLimb = 0;
    for i in (0..a.len()).rev() {
        let cur = (rem << LIMB_BITS) | a[i] as DoubleLimb;
        q[i] = (cur / d as DoubleLimb) as Limb;
        rem = cur % d as DoubleLimb;
    }
    trim(&mut q);
    (q, rem as Limb)
}

/// Shift a magnitude left by `bits`.
pub(crate) fn shl_mag(a: &[Limb], bits: usize) -> Vec<Limb> {
    if a.iter().all(|&l| l == 0) {
        return vec![0];
    }
    let limb_shift = bits / LIMB_BITS;
    let bit_shift = bits % LIMB_BITS;
    let mut limbs = vec![0; a.len() + limb_shift + 1];

    for (i, &l) in a.iter().enumerate() {
        if bit_shift == 0 {
            limbs[i + limb_shift] = l;
        } else {
            limbs[i + limb_shift] |= l << bit_shift;
            limbs[i + limb_shift + 1] = l >> (LIMB_BITS - bit_shift);
        }
    }
    trim(&mut limbs);
    limbs
}

/// Shift a magnitude right by `bits`, discarding the low bits.
pub(crate) fn shr_mag(a: &[Limb], bits: usize) -> Vec<Limb> {
    let limb_shift = bits / LIMB_BITS;
    let bit_shift = bits % LIMB_BITS;
    if limb_shift >= a.len() {
        return vec![0];
    }

    let src = &a[limb_shift..];
    let mut limbs = vec![0; src.len()];
    for (i, out) in limbs.iter_mut().enumerate() {
        if bit_shift == 0 {
            *out = src[i];
        } else {
            *out = src[i] >> bit_shift;
            if let Some(&next) = src.get(i + 1) {
                *out |= next << (LIMB_BITS - bit_shift);
            }
        }
    }
    trim(&mut limbs);
    limbs
}

/// Long division over magnitudes (Knuth, TAOCP vol. 2, 4.3.1, Algorithm D).
///
/// `b` must be nonzero and trimmed. Returns (quotient, remainder).
pub(crate) fn div_rem_mag(a: &[Limb], b: &[Limb]) -> (Vec<Limb>, Vec<Limb>) {
    if cmp_mag(a, b) == Ordering::Less {
        let mut r = a.to_vec();
        trim(&mut r);
        return (vec![0], r);
    }
    if b.len() == 1 {
        tracing::trace!(dividend_limbs = a.len(), "single-limb division");
        let (q, r) = div_rem_limb(a, b[0]);
        return (q, vec![r]);
    }
    tracing::trace!(dividend_limbs = a.len(), divisor_limbs = b.len(), "long division");

    let n = b.len();
    let m = a.len() - n;

    // D1: normalize so the divisor's top bit is set.
    let s = b[n - 1].leading_zeros() as usize;
    let mut v = vec![0; n];
    let mut u = vec![0; a.len() + 1];
    if s == 0 {
        v.copy_from_slice(b);
        u[..a.len()].copy_from_slice(a);
    } else {
        for i in (1..n).rev() {
            v[i] = (b[i] << s) | (b[i - 1] >> (LIMB_BITS - s));
        }
        v[0] = b[0] << s;
        u[a.len()] = a[a.len() - 1] >> (LIMB_BITS - s);
        for i in (1..a.len()).rev() {
            u[i] = (a[i] << s) | (a[i - 1] >> (LIMB_BITS - s));
        }
        u[0] = a[0] << s;
    }

    let base: DoubleLimb = 1 << LIMB_BITS;
    let v_hi = v[n - 1] as DoubleLimb;
    let v_lo = v[n - 2] as DoubleLimb;
    let mut q = vec![0; m + 1];

    for j in (0..=m).rev() {
        // D3: estimate the quotient digit from the top two limbs.
        let num = ((u[j + n] as DoubleLimb) << LIMB_BITS) | u[j + n - 1] as DoubleLimb;
        let mut qhat = num / v_hi;
        let mut rhat = num % v_hi;
        while qhat >= base || qhat * v_lo > ((rhat << LIMB_BITS) | u[j + n - 2] as DoubleLimb) {
            qhat -= 1;
            rhat += v_hi;
            if rhat >= base {
                break;
            }
        }

        // D4: multiply and subtract.
        let mut borrow: i128 = 0;
        let mut carry: DoubleLimb = 0;
        for i in 0..n {
            let p = qhat * v[i] as DoubleLimb + carry;
            carry = p >> LIMB_BITS;
            let t = u[i + j] as i128 - (p as Limb) as i128 + borrow;
            u[i + j] = t as Limb;
            borrow = t >> LIMB_BITS;
        }
        let t = u[j + n] as i128 - carry as i128 + borrow;
        u[j + n] = t as Limb;

        // D5/D6: the estimate was one too large; add the divisor back.
        if t < 0 {
            qhat -= 1;
            let mut c: DoubleLimb = 0;
            for i in 0..n {
                let sum = u[i + j] as DoubleLimb + v[i] as DoubleLimb + c;
                u[i + j] = sum as Limb;
                c = sum >> LIMB_BITS;
            }
            u[j + n] = u[j + n].wrapping_add(c as Limb);
        }
        q[j] = qhat as Limb;
    }

    // D8: unnormalize the remainder.
    let mut r = vec![0; n];
    for (i, out) in r.iter_mut().enumerate() {
        *out = if s == 0 {
            u[i]
        } else {
            (u[i] >> s) | (u[i + 1] << (LIMB_BITS - s))
        };
    }
    trim(&mut q);
    trim(&mut r);
    (q, r)
}

/// Signed addition.
fn add_signed(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_negative() == b.is_negative() {
        return BigInt::from_parts(add_mag(a.limbs(), b.limbs()), a.is_negative());
    }
    // Opposite signs: subtract the smaller magnitude from the larger
    match cmp_mag(a.limbs(), b.limbs()) {
        Ordering::Equal => BigInt::zero(),
        Ordering::Greater => BigInt::from_parts(sub_mag(a.limbs(), b.limbs()), a.is_negative()),
        Ordering::Less => BigInt::from_parts(sub_mag(b.limbs(), a.limbs()), b.is_negative()),
    }
}

fn sub_signed(a: &BigInt, b: &BigInt) -> BigInt {
    let mut neg_b = b.clone();
    neg_b.negate_in_place();
    add_signed(a, &neg_b)
}

fn mul_signed(a: &BigInt, b: &BigInt) -> BigInt {
    BigInt::from_parts(
        mul_mag(a.limbs(), b.limbs()),
        a.is_negative() != b.is_negative(),
    )
}

impl BigInt {
    /// Truncating division with remainder: returns (quotient, remainder).
    ///
    /// The quotient rounds toward zero and the remainder takes the sign of
    /// the dividend, so `q * divisor + r == self`.
    pub fn div_rem(&self, divisor: &BigInt) -> Result<(BigInt, BigInt), BintError> {
        if divisor.is_zero() {
            tracing::warn!(op = "div_rem", "division by zero");
            return Err(BintError::DivisionByZero);
        }
        let (q, r) = div_rem_mag(self.limbs(), divisor.limbs());
        Ok((
            BigInt::from_parts(q, self.is_negative() != divisor.is_negative()),
            BigInt::from_parts(r, self.is_negative()),
        ))
    }

    /// Truncating division. Also reachable as `a / b`.
    pub fn checked_div(&self, divisor: &BigInt) -> Result<BigInt, BintError> {
        self.div_rem(divisor).map(|(q, _)| q)
    }

    /// Truncating remainder. Also reachable as `a % b`.
    pub fn checked_rem(&self, divisor: &BigInt) -> Result<BigInt, BintError> {
        self.div_rem(divisor).map(|(_, r)| r)
    }

    /// Least non-negative residue of `self` modulo `|modulus|`.
    pub fn rem_euclid(&self, modulus: &BigInt) -> Result<BigInt, BintError> {
        let r = self.checked_rem(modulus)?;
        if r.is_negative() {
            Ok(&r + &modulus.abs())
        } else {
            Ok(r)
        }
    }

    /// `self /= divisor`, returning the receiver for chaining.
    ///
    /// On a zero divisor the receiver is set to zero and the error is
    /// returned; it is never left holding its old value.
    pub fn try_div_assign(&mut self, divisor: &BigInt) -> Result<&mut Self, BintError> {
        match self.checked_div(divisor) {
            Ok(q) => {
                *self = q;
                Ok(self)
            }
            Err(e) => {
                *self = BigInt::zero();
                Err(e)
            }
        }
    }

    /// `self %= divisor`, with the same zero-divisor rule as
    /// [`try_div_assign`](Self::try_div_assign).
    pub fn try_rem_assign(&mut self, divisor: &BigInt) -> Result<&mut Self, BintError> {
        match self.checked_rem(divisor) {
            Ok(r) => {
                *self = r;
                Ok(self)
            }
            Err(e) => {
                *self = BigInt::zero();
                Err(e)
            }
        }
    }

    /// Prefix increment: adds one and returns the updated receiver.
    pub fn inc(&mut self) -> &mut Self {
        *self = &*self + &BigInt::one();
        self
    }

    /// Prefix decrement: subtracts one and returns the updated receiver.
    pub fn dec(&mut self) -> &mut Self {
        *self = &*self - &BigInt::one();
        self
    }

    /// Postfix increment: adds one and returns the value from before.
    pub fn post_inc(&mut self) -> BigInt {
        let before = self.clone();
        self.inc();
        before
    }

    /// Postfix decrement: subtracts one and returns the value from before.
    pub fn post_dec(&mut self) -> BigInt {
        let before = self.clone();
        self.dec();
        before
    }

    /// Compare absolute values.
    pub fn cmp_abs(&self, other: &BigInt) -> Ordering {
        cmp_mag(self.limbs(), other.limbs())
    }

    /// Raise to a native power by square-and-multiply.
    pub fn pow(&self, mut exp: u32) -> BigInt {
        let mut result = BigInt::one();
        let mut base = self.clone();
        while exp > 0 {
            if exp & 1 == 1 {
                result = &result * &base;
            }
            exp >>= 1;
            if exp > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// Modular exponentiation: self^exp mod |modulus|, in `[0, |modulus|)`.
    pub fn mod_exp(&self, exp: &BigInt, modulus: &BigInt) -> Result<BigInt, BintError> {
        if modulus.is_zero() {
            tracing::warn!(op = "mod_exp", "division by zero");
            return Err(BintError::DivisionByZero);
        }
        if exp.is_negative() {
            return Err(BintError::InvalidArg);
        }

        let mut result = BigInt::one().rem_euclid(modulus)?;
        let mut base = self.rem_euclid(modulus)?;
        for i in 0..exp.bit_len() {
            if exp.get_bit(i) {
                result = (&result * &base).rem_euclid(modulus)?;
            }
            base = (&base * &base).rem_euclid(modulus)?;
        }
        Ok(result)
    }
}

impl Neg for &BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        let mut n = self.clone();
        n.negate_in_place();
        n
    }
}

impl Neg for BigInt {
    type Output = BigInt;

    fn neg(mut self) -> BigInt {
        self.negate_in_place();
        self
    }
}

impl Add<&BigInt> for &BigInt {
    type Output = BigInt;

    fn add(self, rhs: &BigInt) -> BigInt {
        add_signed(self, rhs)
    }
}

impl Sub<&BigInt> for &BigInt {
    type Output = BigInt;

    fn sub(self, rhs: &BigInt) -> BigInt {
        sub_signed(self, rhs)
    }
}

impl Mul<&BigInt> for &BigInt {
    type Output = BigInt;

    fn mul(self, rhs: &BigInt) -> BigInt {
        mul_signed(self, rhs)
    }
}

impl Div<&BigInt> for &BigInt {
    type Output = Result<BigInt, BintError>;

    fn div(self, rhs: &BigInt) -> Self::Output {
        self.checked_div(rhs)
    }
}

impl Rem<&BigInt> for &BigInt {
    type Output = Result<BigInt, BintError>;

    fn rem(self, rhs: &BigInt) -> Self::Output {
        self.checked_rem(rhs)
    }
}

/// Owned-operand forms of a binary operator, forwarding to the `&BigInt`
/// implementation.
macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident, $out:ty) => {
        impl $imp<BigInt> for BigInt {
            type Output = $out;

            fn $method(self, rhs: BigInt) -> $out {
                $imp::$method(&self, &rhs)
            }
        }

        impl $imp<&BigInt> for BigInt {
            type Output = $out;

            fn $method(self, rhs: &BigInt) -> $out {
                $imp::$method(&self, rhs)
            }
        }

        impl $imp<BigInt> for &BigInt {
            type Output = $out;

            fn $method(self, rhs: BigInt) -> $out {
                $imp::$method(self, &rhs)
            }
        }
    };
}

/// Compound assignment through the matching `&BigInt` operator.
macro_rules! forward_assign_op {
    ($imp:ident, $method:ident, $op:tt) => {
        impl $imp<&BigInt> for BigInt {
            fn $method(&mut self, rhs: &BigInt) {
                *self = &*self $op rhs;
            }
        }

        impl $imp<BigInt> for BigInt {
            fn $method(&mut self, rhs: BigInt) {
                *self = &*self $op &rhs;
            }
        }
    };
}

pub(crate) use forward_assign_op;
pub(crate) use forward_owned_binop;

forward_owned_binop!(Add, add, BigInt);
forward_owned_binop!(Sub, sub, BigInt);
forward_owned_binop!(Mul, mul, BigInt);
forward_owned_binop!(Div, div, Result<BigInt, BintError>);
forward_owned_binop!(Rem, rem, Result<BigInt, BintError>);

forward_assign_op!(AddAssign, add_assign, +);
forward_assign_op!(SubAssign, sub_assign, -);
forward_assign_op!(MulAssign, mul_assign, *);

/// Native right-hand operands: promote with `From`, then apply the BigInt
/// operator. There is no separate native fast path.
macro_rules! impl_native_arith {
    (@binop $t:ty, $imp:ident, $method:ident, $out:ty) => {
        impl $imp<$t> for &BigInt {
            type Output = $out;

            fn $method(self, rhs: $t) -> $out {
                $imp::$method(self, &BigInt::from(rhs))
            }
        }

        impl $imp<$t> for BigInt {
            type Output = $out;

            fn $method(self, rhs: $t) -> $out {
                $imp::$method(&self, &BigInt::from(rhs))
            }
        }
    };
    ($($t:ty),*) => {$(
        impl_native_arith!(@binop $t, Add, add, BigInt);
        impl_native_arith!(@binop $t, Sub, sub, BigInt);
        impl_native_arith!(@binop $t, Mul, mul, BigInt);
        impl_native_arith!(@binop $t, Div, div, Result<BigInt, BintError>);
        impl_native_arith!(@binop $t, Rem, rem, Result<BigInt, BintError>);

        impl AddAssign<$t> for BigInt {
            fn add_assign(&mut self, rhs: $t) {
                *self += &BigInt::from(rhs);
            }
        }

        impl SubAssign<$t> for BigInt {
            fn sub_assign(&mut self, rhs: $t) {
                *self -= &BigInt::from(rhs);
            }
        }

        impl MulAssign<$t> for BigInt {
            fn mul_assign(&mut self, rhs: $t) {
                *self *= &BigInt::from(rhs);
            }
        }
    )*};
}

impl_native_arith!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
