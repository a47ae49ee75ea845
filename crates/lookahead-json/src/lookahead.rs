//! The one-token-lookahead pull parser.
//!
//! [`LookaheadParser`] buffers exactly one token from its [`EventSource`] and
//! lets the caller walk the document with recursive-descent code shaped like
//! the expected schema:
//!
//! ```
//! use lookahead_json::{JsonType, LookaheadParser};
//!
//! let mut buf = br#"{"a":1,"b":[true,null]}"#.to_vec();
//! let mut p = LookaheadParser::new(&mut buf);
//!
//! assert!(p.enter_object());
//! assert_eq!(p.next_object_key(), Some("a"));
//! assert_eq!(p.get_int(), Some(1));
//! assert_eq!(p.next_object_key(), Some("b"));
//! assert_eq!(p.peek_type(), Some(JsonType::Array));
//! assert!(p.enter_array());
//! assert!(p.next_array_value());
//! assert_eq!(p.get_bool(), Some(true));
//! assert!(p.next_array_value());
//! assert!(p.get_null());
//! assert!(!p.next_array_value());
//! assert_eq!(p.next_object_key(), None);
//! assert!(p.is_valid());
//! ```
//!
//! Every operation is defined in every state. An operation whose precondition
//! does not hold moves the parser into the absorbing [`State::Error`] and
//! returns its sentinel (`false`, `None`); the first error is kept and can be
//! inspected with [`LookaheadParser::error`].
//!
//! Objects and arrays advance asymmetrically: [`next_object_key`] consumes the
//! key, while [`next_array_value`] only reports that a value follows and
//! leaves it for a getter, `enter_*` or `skip_value` to consume.
//!
//! [`next_object_key`]: LookaheadParser::next_object_key
//! [`next_array_value`]: LookaheadParser::next_array_value

use core::fmt;

use crate::{
    error::LookaheadError,
    event::{Event, JsonType, Number, Scalar},
    options::ParserOptions,
    reader::{EventSource, Reader},
};

/// What the buffered token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
pub enum State {
    /// Before the first fetch. Never observed on a constructed parser.
    Init,
    /// Terminal failure.
    Error,
    /// A `null` value.
    HasNull,
    /// A boolean value.
    HasBool,
    /// A number value.
    HasNumber,
    /// A string value.
    HasString,
    /// An object key. Consumed only by `next_object_key`.
    HasKey,
    /// `{`
    EnteringObject,
    /// `}`
    ExitingObject,
    /// `[`
    EnteringArray,
    /// `]`
    ExitingArray,
    /// The root value has been consumed.
    Finished,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Init => "nothing",
            State::Error => "an error",
            State::HasNull => "a null",
            State::HasBool => "a boolean",
            State::HasNumber => "a number",
            State::HasString => "a string",
            State::HasKey => "an object key",
            State::EnteringObject => "the start of an object",
            State::ExitingObject => "the end of an object",
            State::EnteringArray => "the start of an array",
            State::ExitingArray => "the end of an array",
            State::Finished => "the end of the document",
        })
    }
}

/// The lookahead token: a [`State`] together with its payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Token<'src> {
    Init,
    Error,
    Null,
    Bool(bool),
    Number(Number),
    String(&'src str),
    Key(&'src str),
    EnteringObject,
    ExitingObject,
    EnteringArray,
    ExitingArray,
    Finished,
}

impl<'src> Token<'src> {
    pub(crate) fn state(&self) -> State {
        match self {
            Token::Init => State::Init,
            Token::Error => State::Error,
            Token::Null => State::HasNull,
            Token::Bool(_) => State::HasBool,
            Token::Number(_) => State::HasNumber,
            Token::String(_) => State::HasString,
            Token::Key(_) => State::HasKey,
            Token::EnteringObject => State::EnteringObject,
            Token::ExitingObject => State::ExitingObject,
            Token::EnteringArray => State::EnteringArray,
            Token::ExitingArray => State::ExitingArray,
            Token::Finished => State::Finished,
        }
    }

    /// The scalar payload of a `HasNull..=HasKey` token.
    fn scalar(&self) -> Option<Scalar<'src>> {
        match *self {
            Token::Null => Some(Scalar::Null),
            Token::Bool(b) => Some(Scalar::Bool(b)),
            Token::Number(n) => Some(Scalar::Number(n)),
            Token::String(s) | Token::Key(s) => Some(Scalar::String(s)),
            _ => None,
        }
    }
}

/// Maps one event to the token it produces.
///
/// # Errors
///
/// [`Event::RawNumber`] is not supported.
pub(crate) fn apply_event(event: Event<'_>) -> Result<Token<'_>, LookaheadError> {
    Ok(match event {
        Event::Null => Token::Null,
        Event::Bool(b) => Token::Bool(b),
        Event::Number(n) => Token::Number(n),
        Event::RawNumber(_) => return Err(LookaheadError::UnsupportedRawNumber),
        Event::String(s) => Token::String(s),
        Event::StartObject => Token::EnteringObject,
        Event::Key(k) => Token::Key(k),
        Event::EndObject => Token::ExitingObject,
        Event::StartArray => Token::EnteringArray,
        Event::EndArray => Token::ExitingArray,
    })
}

/// A pull parser holding one token of lookahead over an [`EventSource`].
///
/// Returned strings borrow from the input buffer for `'src`.
pub struct LookaheadParser<'src, S: EventSource<'src> = Reader<'src>> {
    source: S,
    token: Token<'src>,
    error: Option<LookaheadError>,
}

impl<'src> LookaheadParser<'src> {
    /// Creates a parser over a complete JSON document and reads its first
    /// token.
    ///
    /// The buffer is decoded in place and must not be parsed again.
    pub fn new(buf: &'src mut [u8]) -> Self {
        Self::with_options(buf, ParserOptions::default())
    }

    /// Like [`new`](Self::new), with reader options.
    pub fn with_options(buf: &'src mut [u8], options: ParserOptions) -> Self {
        Self::from_source(Reader::with_options(buf, options))
    }
}

impl<'src, S: EventSource<'src>> LookaheadParser<'src, S> {
    /// Wraps an event source and reads its first token.
    pub fn from_source(source: S) -> Self {
        let mut parser = Self {
            source,
            token: Token::Init,
            error: None,
        };
        parser.parse_next();
        parser
    }

    /// Advances the lookahead by exactly one event.
    fn parse_next(&mut self) {
        if self.token == Token::Error {
            return;
        }
        if let Some(error) = self.source.syntax_error() {
            self.fail(error.into());
            return;
        }

        let next = match self.source.next_event() {
            Ok(Some(event)) => apply_event(event),
            Ok(None) => Ok(Token::Finished),
            Err(error) => Err(error.into()),
        };
        match next {
            Ok(token) => {
                tracing::trace!(?token, "fetched");
                self.token = token;
            }
            Err(error) => self.fail(error),
        }
    }

    fn fail(&mut self, error: LookaheadError) {
        if self.error.is_none() {
            tracing::debug!(%error, "lookahead parser failed");
            self.error = Some(error);
        }
        self.token = Token::Error;
    }

    fn structural_mismatch(&mut self, expected: &'static str) {
        let found = self.token.state();
        self.fail(LookaheadError::StructuralMismatch { expected, found });
    }

    fn type_mismatch(&mut self, expected: &'static str) {
        let found = self.token.state();
        self.fail(LookaheadError::TypeMismatch { expected, found });
    }

    /// Steps into the object under the cursor.
    pub fn enter_object(&mut self) -> bool {
        if self.token != Token::EnteringObject {
            self.structural_mismatch("the start of an object");
            return false;
        }
        self.parse_next();
        true
    }

    /// Steps into the array under the cursor.
    pub fn enter_array(&mut self) -> bool {
        if self.token != Token::EnteringArray {
            self.structural_mismatch("the start of an array");
            return false;
        }
        self.parse_next();
        true
    }

    /// Consumes the next key of the current object.
    ///
    /// Returns `None` and steps out of the object once it is exhausted. The
    /// value belonging to the key is left under the cursor.
    pub fn next_object_key(&mut self) -> Option<&'src str> {
        match self.token {
            Token::Key(key) => {
                self.parse_next();
                Some(key)
            }
            Token::ExitingObject => {
                self.parse_next();
                None
            }
            _ => {
                self.structural_mismatch("an object key or the end of an object");
                None
            }
        }
    }

    /// Reports whether the current array has another value.
    ///
    /// Returns `false` and steps out of the array once it is exhausted.
    /// Otherwise the value stays under the cursor and must be consumed by a
    /// getter, an `enter_*` call, or [`skip_value`](Self::skip_value).
    pub fn next_array_value(&mut self) -> bool {
        match self.token {
            Token::ExitingArray => {
                self.parse_next();
                false
            }
            Token::Error | Token::ExitingObject | Token::Key(_) | Token::Finished => {
                self.structural_mismatch("an array value or the end of an array");
                false
            }
            _ => true,
        }
    }

    fn take_number<T>(
        &mut self,
        expected: &'static str,
        convert: impl FnOnce(&Number) -> Option<T>,
    ) -> Option<T> {
        let value = match &self.token {
            Token::Number(n) => convert(n),
            _ => None,
        };
        match value {
            Some(value) => {
                self.parse_next();
                Some(value)
            }
            None => {
                self.type_mismatch(expected);
                None
            }
        }
    }

    /// Consumes a number that is exactly representable as an `i32`.
    ///
    /// Floating-point and out-of-range numbers are a type mismatch.
    pub fn get_int(&mut self) -> Option<i32> {
        self.take_number("an integer that fits in i32", Number::as_i32)
    }

    /// Consumes a number that is exactly representable as an `i64`.
    pub fn get_i64(&mut self) -> Option<i64> {
        self.take_number("an integer that fits in i64", Number::as_i64)
    }

    /// Consumes a number that is exactly representable as a `u64`.
    pub fn get_u64(&mut self) -> Option<u64> {
        self.take_number("an integer that fits in u64", Number::as_u64)
    }

    /// Consumes any number, widening integers to `f64`.
    pub fn get_double(&mut self) -> Option<f64> {
        self.take_number("a number", |n| Some(n.as_f64()))
    }

    /// Consumes a boolean.
    pub fn get_bool(&mut self) -> Option<bool> {
        match self.token {
            Token::Bool(b) => {
                self.parse_next();
                Some(b)
            }
            _ => {
                self.type_mismatch("a boolean");
                None
            }
        }
    }

    /// Consumes a string value. Keys are not string values.
    pub fn get_string(&mut self) -> Option<&'src str> {
        match self.token {
            Token::String(s) => {
                self.parse_next();
                Some(s)
            }
            _ => {
                self.type_mismatch("a string");
                None
            }
        }
    }

    /// Consumes a `null`. Returns whether one was there.
    pub fn get_null(&mut self) -> bool {
        if self.token != Token::Null {
            self.type_mismatch("null");
            return false;
        }
        self.parse_next();
        true
    }

    /// Skips the rest of the object just entered with
    /// [`enter_object`](Self::enter_object).
    pub fn skip_object(&mut self) {
        self.skip_out(1);
    }

    /// Skips the rest of the array just entered with
    /// [`enter_array`](Self::enter_array).
    pub fn skip_array(&mut self) {
        self.skip_out(1);
    }

    /// Skips exactly one value at the current depth, scalar or container.
    pub fn skip_value(&mut self) {
        self.skip_out(0);
    }

    fn skip_out(&mut self, mut depth: isize) {
        loop {
            match self.token {
                Token::EnteringArray | Token::EnteringObject => depth += 1,
                Token::ExitingArray | Token::ExitingObject => depth -= 1,
                Token::Error => return,
                _ => {}
            }
            self.parse_next();
            if depth <= 0 {
                break;
            }
        }
    }

    /// The scalar or key under the cursor, without advancing.
    #[must_use]
    pub fn peek_value(&self) -> Option<Scalar<'src>> {
        self.token.scalar()
    }

    /// The type of the value under the cursor, without advancing.
    ///
    /// Keys report [`JsonType::String`]. Returns `None` at the end of a
    /// container, at the end of the document and in the error state.
    #[must_use]
    pub fn peek_type(&self) -> Option<JsonType> {
        match self.token {
            Token::EnteringArray => Some(JsonType::Array),
            Token::EnteringObject => Some(JsonType::Object),
            token => token.scalar().map(|s| s.json_type()),
        }
    }

    /// Whether the parser has not failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.token != Token::Error
    }

    /// What the buffered token is.
    #[must_use]
    pub fn state(&self) -> State {
        self.token.state()
    }

    /// The error that moved the parser into [`State::Error`], if any.
    #[must_use]
    pub fn error(&self) -> Option<&LookaheadError> {
        self.error.as_ref()
    }
}

impl<'src, S: EventSource<'src> + fmt::Debug> fmt::Debug for LookaheadParser<'src, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookaheadParser")
            .field("token", &self.token)
            .field("error", &self.error)
            .field("source", &self.source)
            .finish()
    }
}
