//! Canonical byte encoding for values.
//!
//! Every [`Value`] shape maps to one deterministic byte string:
//!
//! - Text: the literal UTF-8 bytes
//! - Bytes: unchanged
//! - Int/Uint: decimal digits, no leading zeros, `-` prefix for negatives
//! - Float: fixed notation with [`FLOAT_PRECISION`] fractional digits
//!
//! Note: decimal-encoded integers sort lexicographically, not numerically,
//! under byte comparison (`"10"` sorts before `"2"`). Auto-generated keys
//! from [`crate::Database::add`] inherit this ordering.

use crate::error::{Error, Result};
use crate::value::Value;

/// Number of fractional digits in the fixed-notation float encoding.
///
/// Callers relying on the exact byte form of encoded floats must account
/// for this precision.
pub const FLOAT_PRECISION: usize = 6;

/// Encode a value into its canonical byte string.
///
/// Encoding is total over the [`Value`] union, deterministic, and needs no
/// external state: the same logical value always yields the same bytes.
#[must_use]
pub fn encode(value: &Value) -> Vec<u8> {
    match value {
        Value::Text(s) => s.clone().into_bytes(),
        Value::Bytes(b) => b.clone(),
        Value::Int(i) => i.to_string().into_bytes(),
        Value::Uint(u) => u.to_string().into_bytes(),
        Value::Float(f) => format!("{f:.prec$}", prec = FLOAT_PRECISION).into_bytes(),
    }
}

/// Decode encoded text back into a string.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes are not valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| Error::Encoding(e.to_string()))
}

/// Decode a decimal-encoded signed integer.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes are not a decimal integer.
pub fn decode_int(bytes: &[u8]) -> Result<i64> {
    decode_text(bytes)?.parse().map_err(|e: std::num::ParseIntError| Error::Encoding(e.to_string()))
}

/// Decode a decimal-encoded unsigned integer.
///
/// Used by tests and by callers parsing auto-generated sequence keys.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes are not a decimal unsigned integer.
pub fn decode_uint(bytes: &[u8]) -> Result<u64> {
    decode_text(bytes)?.parse().map_err(|e: std::num::ParseIntError| Error::Encoding(e.to_string()))
}

/// Decode a fixed-notation encoded float.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes are not a decimal number.
pub fn decode_float(bytes: &[u8]) -> Result<f64> {
    decode_text(bytes)?
        .parse()
        .map_err(|e: std::num::ParseFloatError| Error::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_encodes_to_literal_bytes() {
        assert_eq!(encode(&Value::from("hello")), b"hello");
        assert_eq!(encode(&Value::from("")), b"");
    }

    #[test]
    fn bytes_pass_through_unchanged() {
        let raw = vec![0x00, 0xFF, 0x10];
        assert_eq!(encode(&Value::Bytes(raw.clone())), raw);
    }

    #[test]
    fn integers_encode_as_decimal() {
        assert_eq!(encode(&Value::Int(0)), b"0");
        assert_eq!(encode(&Value::Int(-42)), b"-42");
        assert_eq!(encode(&Value::Uint(42)), b"42");
        assert_eq!(encode(&Value::Uint(u64::MAX)), u64::MAX.to_string().as_bytes());
        assert_eq!(encode(&Value::Int(i64::MIN)), i64::MIN.to_string().as_bytes());
    }

    #[test]
    fn floats_encode_in_fixed_notation() {
        assert_eq!(encode(&Value::Float(3.14)), b"3.140000");
        assert_eq!(encode(&Value::Float(-0.5)), b"-0.500000");
        assert_eq!(encode(&Value::Float(2.0)), b"2.000000");
    }

    #[test]
    fn decimal_keys_sort_lexicographically_not_numerically() {
        // The documented ordering caveat: "10" < "2" under byte comparison.
        let two = encode(&Value::Uint(2));
        let ten = encode(&Value::Uint(10));
        assert!(ten < two);
    }

    #[test]
    fn decode_helpers_roundtrip() {
        assert_eq!(decode_text(&encode(&Value::from("abc"))).unwrap(), "abc");
        assert_eq!(decode_int(&encode(&Value::Int(-7))).unwrap(), -7);
        assert_eq!(decode_uint(&encode(&Value::Uint(7))).unwrap(), 7);
        assert_eq!(decode_float(&encode(&Value::Float(1.25))).unwrap(), 1.25);
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert!(decode_text(&[0xFF, 0xFE]).is_err());
        assert!(decode_int(b"not a number").is_err());
        assert!(decode_uint(b"-1").is_err());
        assert!(decode_float(b"").is_err());
    }
}
