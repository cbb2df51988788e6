#![forbid(unsafe_code)]
#![doc = "Arbitrary-precision signed integers with native-integer interop."]

mod bigint;
mod bitwise;
mod convert;
mod fmt;
mod gcd;
mod ops;

pub use bigint::{BigInt, DoubleLimb, Limb, LIMB_BITS};
pub use bint_types::BintError;
pub use bitwise::MAX_SHIFT;
