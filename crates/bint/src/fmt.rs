//! Text parsing and decimal formatting.
//!
//! Accepted literals are exactly `0x[0-9a-fA-F]+` (hexadecimal) and
//! `[0-9]+` (decimal). Both are non-negative; a negative BigInt can only be
//! built from a native integer or by arithmetic. Output is always canonical
//! decimal.

use std::fmt;
use std::io::{BufRead, ErrorKind};
use std::str::FromStr;

use bint_types::BintError;

use crate::bigint::{BigInt, Limb, LIMB_BITS};
use crate::ops::{div_rem_limb, mul_add_limb, trim};

/// Largest power of ten that fits in a limb, and its exponent.
const DEC_CHUNK: Limb = 10_000_000_000_000_000_000;
const DEC_CHUNK_DIGITS: usize = 19;

/// Hex digits per limb.
const HEX_CHUNK_DIGITS: usize = LIMB_BITS / 4;

fn parse_hex_digits(digits: &[u8]) -> Option<Vec<Limb>> {
    if digits.is_empty() {
        return None;
    }
    let mut limbs = vec![0; digits.len().div_ceil(HEX_CHUNK_DIGITS)];
    for (i, &c) in digits.iter().rev().enumerate() {
        let nibble = (c as char).to_digit(16)? as Limb;
        limbs[i / HEX_CHUNK_DIGITS] |= nibble << ((i % HEX_CHUNK_DIGITS) * 4);
    }
    trim(&mut limbs);
    Some(limbs)
}

fn parse_dec_digits(digits: &[u8]) -> Option<Vec<Limb>> {
    if digits.is_empty() {
        return None;
    }
    let mut limbs = vec![0];
    // Leading chunk is short so the rest are exactly DEC_CHUNK_DIGITS long
    let head = match digits.len() % DEC_CHUNK_DIGITS {
        0 => DEC_CHUNK_DIGITS,
        n => n,
    };
    let (first, rest) = digits.split_at(head);
    for chunk in std::iter::once(first).chain(rest.chunks(DEC_CHUNK_DIGITS)) {
        let mut value: Limb = 0;
        for &c in chunk {
            if !c.is_ascii_digit() {
                return None;
            }
            value = value * 10 + (c - b'0') as Limb;
        }
        mul_add_limb(&mut limbs, 10u64.pow(chunk.len() as u32), value);
    }
    Some(limbs)
}

impl BigInt {
    /// Parse a literal: `0x` followed by hex digits, or decimal digits.
    ///
    /// Anything else, including signs, whitespace, an uppercase `0X`
    /// prefix, or an empty string, is rejected with [`BintError::Parse`].
    pub fn parse(text: &str) -> Result<BigInt, BintError> {
        let limbs = match text.strip_prefix("0x") {
            Some(hex) => parse_hex_digits(hex.as_bytes()),
            None => parse_dec_digits(text.as_bytes()),
        };
        match limbs {
            Some(limbs) => Ok(BigInt::from_limbs(limbs)),
            None => {
                tracing::warn!(op = "parse", input = text, "invalid integer literal");
                Err(BintError::parse(text))
            }
        }
    }

    /// Read one whitespace-delimited token from `reader` and parse it.
    ///
    /// Leading ASCII whitespace is skipped and the delimiter after the token
    /// is left unread. Reaching end of input before any token is a parse
    /// error on the empty string. Interrupted reads are retried; any other
    /// reader failure is [`BintError::Io`].
    pub fn read_token<R: BufRead + ?Sized>(reader: &mut R) -> Result<BigInt, BintError> {
        let mut token = Vec::new();
        loop {
            let buf = match reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if buf.is_empty() {
                break;
            }
            let mut used = 0;
            let mut complete = false;
            for &c in buf {
                if c.is_ascii_whitespace() {
                    if !token.is_empty() {
                        complete = true;
                        break;
                    }
                } else {
                    token.push(c);
                }
                used += 1;
            }
            reader.consume(used);
            if complete {
                break;
            }
        }
        BigInt::parse(&String::from_utf8_lossy(&token))
    }

    /// Canonical decimal digits of the magnitude, without a sign.
    fn magnitude_to_decimal(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut chunks = Vec::new();
        let mut rest = self.limbs().to_vec();
        while !(rest.len() == 1 && rest[0] == 0) {
            let (q, r) = div_rem_limb(&rest, DEC_CHUNK);
            chunks.push(r);
            rest = q;
        }

        let mut out = String::with_capacity(chunks.len() * DEC_CHUNK_DIGITS);
        let mut iter = chunks.iter().rev();
        if let Some(top) = iter.next() {
            out.push_str(&top.to_string());
        }
        for chunk in iter {
            out.push_str(&format!("{chunk:019}"));
        }
        out
    }
}

impl FromStr for BigInt {
    type Err = BintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigInt::parse(s)
    }
}

impl TryFrom<&str> for BigInt {
    type Error = BintError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        BigInt::parse(s)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "", &self.magnitude_to_decimal())
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, BufReader, Cursor, Read};

    /// Reader that fails with `kind` on the given call, then serves `data`.
    struct FlakyReader {
        data: Cursor<Vec<u8>>,
        fail_on: usize,
        kind: ErrorKind,
        calls: usize,
    }

    impl FlakyReader {
        fn new(data: &str, fail_on: usize, kind: ErrorKind) -> Self {
            Self {
                data: Cursor::new(data.as_bytes().to_vec()),
                fail_on,
                kind,
                calls: 0,
            }
        }
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls == self.fail_on {
                return Err(io::Error::new(self.kind, "flaky"));
            }
            // One byte per call so failures can land mid-token
            let n = buf.len().min(1);
            self.data.read(&mut buf[..n])
        }
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(BigInt::parse("0x1F").unwrap(), BigInt::from(31));
        assert_eq!(BigInt::parse("0xff").unwrap(), BigInt::from(255));
        assert_eq!(
            BigInt::parse("0x10000000000000000").unwrap().limbs(),
            &[0, 1]
        );
        assert!(BigInt::parse("0x0000").unwrap().is_zero());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(BigInt::parse("0").unwrap(), BigInt::zero());
        assert_eq!(BigInt::parse("007").unwrap(), BigInt::from(7));
        assert_eq!(
            BigInt::parse("18446744073709551616").unwrap().limbs(),
            &[0, 1]
        );
        assert_eq!(
            BigInt::parse("340282366920938463463374607431768211455").unwrap(),
            BigInt::from(u128::MAX)
        );
    }

    #[test]
    fn test_parse_rejects() {
        for bad in [
            "", "-5", "+5", " 5", "5 ", "0x", "0X1F", "0xg", "1_000", "12a", "٣", "0x-1", "00x1",
        ] {
            match BigInt::parse(bad) {
                Err(BintError::Parse { input }) => assert_eq!(input, bad),
                other => panic!("{bad:?} parsed as {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_str_and_try_from() {
        let a: BigInt = "123".parse().unwrap();
        let b = BigInt::try_from("877").unwrap();
        assert_eq!((a + b).to_string(), "1000");
        assert!("-5".parse::<BigInt>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(BigInt::zero().to_string(), "0");
        assert_eq!(BigInt::from(-42).to_string(), "-42");
        assert_eq!(BigInt::from(i64::MIN).to_string(), i64::MIN.to_string());
        assert_eq!(BigInt::from(u128::MAX).to_string(), u128::MAX.to_string());
        // Inner chunks keep their zeros: 10^19 and 10^38
        assert_eq!(BigInt::from(DEC_CHUNK).to_string(), "10000000000000000000");
        let big = BigInt::from(DEC_CHUNK) * BigInt::from(DEC_CHUNK);
        assert_eq!(big.to_string(), format!("1{}", "0".repeat(38)));
    }

    #[test]
    fn test_display_padding() {
        assert_eq!(format!("{:>6}", BigInt::from(-42)), "   -42");
        assert_eq!(format!("{:06}", BigInt::from(-42)), "-00042");
        assert_eq!(format!("{:+}", BigInt::from(7)), "+7");
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", BigInt::from(-3)), "BigInt(-3)");
    }

    #[test]
    fn test_decimal_roundtrip_long() {
        let text = "123456789012345678901234567890123456789012345678901234567890";
        assert_eq!(BigInt::parse(text).unwrap().to_string(), text);
    }

    #[test]
    fn test_read_token() {
        let mut input = Cursor::new("  42\n0x10 nope");
        assert_eq!(BigInt::read_token(&mut input).unwrap(), BigInt::from(42));
        assert_eq!(BigInt::read_token(&mut input).unwrap(), BigInt::from(16));
        assert!(matches!(
            BigInt::read_token(&mut input),
            Err(BintError::Parse { input }) if input == "nope"
        ));
        assert!(matches!(
            BigInt::read_token(&mut input),
            Err(BintError::Parse { input }) if input.is_empty()
        ));
    }

    #[test]
    fn test_read_token_leaves_delimiter() {
        let mut input = Cursor::new("7 rest");
        BigInt::read_token(&mut input).unwrap();
        let mut rest = String::new();
        input.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, " rest");
    }

    #[test]
    fn test_read_token_retries_interrupted() {
        let reader = FlakyReader::new("12345 ", 3, ErrorKind::Interrupted);
        let mut input = BufReader::with_capacity(1, reader);
        assert_eq!(BigInt::read_token(&mut input).unwrap(), BigInt::from(12345));
    }

    #[test]
    fn test_read_token_reports_reader_failure() {
        let reader = FlakyReader::new("12345 ", 3, ErrorKind::BrokenPipe);
        let mut input = BufReader::with_capacity(1, reader);
        match BigInt::read_token(&mut input) {
            Err(BintError::Io(e)) => assert_eq!(e.kind(), ErrorKind::BrokenPipe),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_token_across_buffer_boundary() {
        let digits = "98765432109876543210";
        let mut input = BufReader::with_capacity(3, Cursor::new(format!("\t{digits} 1")));
        assert_eq!(BigInt::read_token(&mut input).unwrap().to_string(), digits);
        assert_eq!(BigInt::read_token(&mut input).unwrap(), BigInt::one());
    }
}
