//! Events produced by an [`EventSource`](crate::EventSource) and the scalar
//! values they carry.
//!
//! An [`Event`] is one step of a depth-first walk over a JSON document. Text
//! payloads borrow from the input buffer (`'src`); they are already unescaped.
//!
//! # Examples
//!
//! ```
//! use lookahead_json::{Event, Number, Reader};
//!
//! let mut buf = br#"[1, "two"]"#.to_vec();
//! let events: Vec<_> = Reader::new(&mut buf).collect::<Result<_, _>>().unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::StartArray,
//!         Event::Number(Number::PosInt(1)),
//!         Event::String("two"),
//!         Event::EndArray,
//!     ]
//! );
//! ```
use core::fmt;

/// A JSON number as produced by the reader.
///
/// Integers are kept exact when they fit `u64` (non-negative) or `i64`
/// (negative); everything else is an `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
pub enum Number {
    /// A non-negative integer.
    PosInt(u64),
    /// A negative integer.
    NegInt(i64),
    /// A number written with a fraction or exponent, or an integer too large
    /// for the integer variants.
    Float(f64),
}

impl Number {
    /// Returns `true` if the number was read as an exact integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        !matches!(self, Number::Float(_))
    }

    /// The value as an `i32`, if it is an integer in range.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Number::PosInt(u) => i32::try_from(u).ok(),
            Number::NegInt(i) => i32::try_from(i).ok(),
            Number::Float(_) => None,
        }
    }

    /// The value as an `i64`, if it is an integer in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::PosInt(u) => i64::try_from(u).ok(),
            Number::NegInt(i) => Some(i),
            Number::Float(_) => None,
        }
    }

    /// The value as a `u64`, if it is a non-negative integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Number::PosInt(u) => Some(u),
            Number::NegInt(_) | Number::Float(_) => None,
        }
    }

    /// The value widened to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::PosInt(u) => u as f64,
            Number::NegInt(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::PosInt(u) => u.fmt(f),
            Number::NegInt(i) => i.fmt(f),
            Number::Float(x) => x.fmt(f),
        }
    }
}

/// One parse event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
pub enum Event<'src> {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// A converted number.
    Number(Number),
    /// The unconverted text of a number. Only emitted with
    /// [`ParserOptions::numbers_as_raw`](crate::ParserOptions::numbers_as_raw).
    RawNumber(&'src str),
    /// A string value, unescaped.
    String(&'src str),
    /// `{`
    StartObject,
    /// An object key, unescaped.
    Key(&'src str),
    /// `}`
    EndObject,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
}

/// The value held by a scalar or key token.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
pub enum Scalar<'src> {
    Null,
    Bool(bool),
    Number(Number),
    String(&'src str),
}

impl<'src> Scalar<'src> {
    /// The JSON type of this value.
    #[must_use]
    pub fn json_type(&self) -> JsonType {
        match self {
            Scalar::Null => JsonType::Null,
            Scalar::Bool(_) => JsonType::Bool,
            Scalar::Number(_) => JsonType::Number,
            Scalar::String(_) => JsonType::String,
        }
    }

    /// The text of a string or key.
    #[must_use]
    pub fn as_str(&self) -> Option<&'src str> {
        match *self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Scalar::Number(n) => Some(n),
            _ => None,
        }
    }
}

/// The type of the value under the cursor, as reported by
/// [`LookaheadParser::peek_type`](crate::LookaheadParser::peek_type).
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
pub enum JsonType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JsonType::Null => "null",
            JsonType::Bool => "boolean",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        })
    }
}
