//! Key and value shapes accepted by the database.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A key or value accepted by table operations.
///
/// This is the closed set of shapes the codec knows how to turn into
/// canonical bytes. Anything convertible with `Into<Value>` can be passed
/// directly to [`crate::Database::set`] and friends; types outside the set
/// are rejected at compile time rather than through runtime inspection.
///
/// Integers of every width convert losslessly into [`Value::Int`] or
/// [`Value::Uint`]. Arbitrary `Display` types enter through
/// [`Value::custom`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// UTF-8 text, encoded as its literal bytes.
    Text(String),
    /// Raw bytes, stored unchanged.
    Bytes(Vec<u8>),
    /// Signed integer, encoded as decimal digits.
    Int(i64),
    /// Unsigned integer, encoded as decimal digits.
    Uint(u64),
    /// Floating point number, encoded in fixed notation.
    Float(f64),
}

impl Value {
    /// Build a value from any type with a canonical string representation.
    ///
    /// The representation is captured eagerly via `Display`, so the encoded
    /// bytes are identical to passing `v.to_string()` as text.
    pub fn custom<T: fmt::Display>(v: T) -> Self {
        Self::Text(v.to_string())
    }

    /// Returns the value as a string slice if it is text.
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a byte slice if it is raw bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a signed integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as an unsigned integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(u) => Some(*u),
            _ => None,
        }
    }

    /// Returns the value as a float if it is one.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    #[inline]
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    #[inline]
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

macro_rules! value_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            #[inline]
            fn from(i: $t) -> Self {
                Self::Int(i64::from(i))
            }
        }
    )*};
}

macro_rules! value_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            #[inline]
            fn from(u: $t) -> Self {
                Self::Uint(u64::from(u))
            }
        }
    )*};
}

value_from_signed!(i8, i16, i32, i64);
value_from_unsigned!(u8, u16, u32, u64);

// usize and isize are at most 64 bits on supported platforms, so the casts
// are lossless.
impl From<isize> for Value {
    #[inline]
    fn from(i: isize) -> Self {
        Self::Int(i as i64)
    }
}

impl From<usize> for Value {
    #[inline]
    fn from(u: usize) -> Self {
        Self::Uint(u as u64)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}
