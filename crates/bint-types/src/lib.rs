#![forbid(unsafe_code)]
#![doc = "Common error types for the bint arbitrary-precision integer crates."]

pub mod error;

pub use error::*;
