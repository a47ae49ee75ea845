//! In-situ, iterative JSON reader.
//!
//! Overview
//! - [`Reader`] walks a mutable byte buffer and produces one [`Event`] per
//!   call to [`EventSource::next_event`]. It never looks further ahead than
//!   the token it is producing.
//! - String and key payloads are returned as `&'src str` slices of the input
//!   buffer. Escape sequences are decoded in place, overwriting the escaped
//!   bytes, so the buffer is left partially rewritten and must not be parsed
//!   again.
//! - The buffer ends at its last byte or at the first NUL byte, whichever
//!   comes first, so C-style NUL-terminated buffers work unchanged.
//!
//! Splitting the buffer
//! - The unread input is held as `rest: &'src mut [u8]`. Consuming a token
//!   splits it off the front with `split_at_mut`, which hands the token bytes
//!   out for the full `'src` lifetime while the reader keeps exclusive access
//!   to the remainder. No byte is ever visible both to the caller and to the
//!   reader.
//!
//! Errors
//! - The first syntax error is sticky: it is recorded with the position of
//!   the offending token and returned by every later call.

mod escape;
mod number;

use alloc::vec::Vec;

use bstr::ByteSlice;

use crate::{
    error::{ReaderError, SyntaxError},
    event::Event,
    options::ParserOptions,
};
use number::NumberLexeme;

/// A producer of parse events.
///
/// This is the seam between the [`LookaheadParser`](crate::LookaheadParser)
/// and whatever tokenizes the input. [`Reader`] is the implementation used by
/// default.
pub trait EventSource<'src> {
    /// Drives exactly one parse step.
    ///
    /// Returns `Ok(None)` once the document is complete.
    ///
    /// # Errors
    ///
    /// Returns the source's syntax error. Once an error has been returned,
    /// every later call returns it again.
    fn next_event(&mut self) -> Result<Option<Event<'src>>, ReaderError>;

    /// The syntax error encountered so far, if any.
    fn syntax_error(&self) -> Option<ReaderError>;

    /// Whether a syntax error has been encountered. Once true, stays true.
    fn has_syntax_error(&self) -> bool {
        self.syntax_error().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforeFirstPropertyName,
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    BeforeFirstArrayValue,
    BeforeArrayValue,
    AfterPropertyValue,
    AfterArrayValue,
    End,
}

/// Bytes that interrupt the plain run of a string literal.
#[allow(clippy::cast_possible_truncation)]
static STRING_SPECIAL: [u8; 34] = {
    let mut set = [0u8; 34];
    set[0] = b'"';
    set[1] = b'\\';
    let mut control = 0;
    while control < 0x20 {
        set[control + 2] = control as u8;
        control += 1;
    }
    set
};

/// An in-situ JSON tokenizer over a mutable byte buffer.
///
/// # Examples
///
/// ```
/// use lookahead_json::{Event, EventSource, Reader};
///
/// let mut buf = br#"{"a": null}"#.to_vec();
/// let mut reader = Reader::new(&mut buf);
/// assert_eq!(reader.next_event(), Ok(Some(Event::StartObject)));
/// assert_eq!(reader.next_event(), Ok(Some(Event::Key("a"))));
/// assert_eq!(reader.next_event(), Ok(Some(Event::Null)));
/// assert_eq!(reader.next_event(), Ok(Some(Event::EndObject)));
/// assert_eq!(reader.next_event(), Ok(None));
/// ```
#[derive(Debug)]
pub struct Reader<'src> {
    /// Unread suffix of the input buffer.
    rest: &'src mut [u8],

    /// Position of the next unread byte.
    offset: usize,
    line: usize,
    column: usize,

    /// Position of the token currently being read, for error reporting.
    token_offset: usize,
    token_line: usize,
    token_column: usize,

    state: ParseState,
    stack: Vec<Container>,
    error: Option<ReaderError>,
    /// Set once [`Iterator::next`] has yielded the error.
    error_yielded: bool,
    options: ParserOptions,
}

impl<'src> Reader<'src> {
    /// Creates a reader over `buf` with default options.
    pub fn new(buf: &'src mut [u8]) -> Self {
        Self::with_options(buf, ParserOptions::default())
    }

    /// Creates a reader over `buf`.
    pub fn with_options(buf: &'src mut [u8], options: ParserOptions) -> Self {
        Self {
            rest: buf,
            offset: 0,
            line: 1,
            column: 1,
            token_offset: 0,
            token_line: 1,
            token_column: 1,
            state: ParseState::Start,
            stack: Vec::new(),
            error: None,
            error_yielded: false,
            options,
        }
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Byte offset of the next unread byte.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The next unread byte, or `None` at the end of the buffer.
    #[inline]
    fn peek(&self) -> Option<u8> {
        match self.rest.first() {
            None | Some(0) => None,
            Some(&b) => Some(b),
        }
    }

    /// Splits the next `n` bytes off the unread input.
    fn take(&mut self, n: usize) -> &'src mut [u8] {
        let rest = core::mem::take(&mut self.rest);
        let (head, tail) = rest.split_at_mut(n);
        self.rest = tail;
        self.offset += n;
        self.column += n;
        head
    }

    fn skip_whitespace(&mut self) {
        let mut n = 0;
        while let Some(&b) = self.rest.get(n) {
            match b {
                b'\n' => {
                    self.line += 1;
                    self.column = 1;
                }
                b' ' | b'\t' | b'\r' => self.column += 1,
                _ => break,
            }
            n += 1;
        }
        let rest = core::mem::take(&mut self.rest);
        self.rest = &mut rest[n..];
        self.offset += n;
    }

    fn mark(&mut self) {
        self.token_offset = self.offset;
        self.token_line = self.line;
        self.token_column = self.column;
    }

    fn state_after_value(&self) -> ParseState {
        match self.stack.last() {
            None => ParseState::End,
            Some(Container::Object) => ParseState::AfterPropertyValue,
            Some(Container::Array) => ParseState::AfterArrayValue,
        }
    }

    fn open(&mut self, container: Container) -> Result<Event<'src>, SyntaxError> {
        if let Some(max) = self.options.max_depth {
            if self.stack.len() >= max {
                return Err(SyntaxError::DepthLimitExceeded(max));
            }
        }
        self.take(1);
        self.stack.push(container);
        Ok(match container {
            Container::Object => {
                self.state = ParseState::BeforeFirstPropertyName;
                Event::StartObject
            }
            Container::Array => {
                self.state = ParseState::BeforeFirstArrayValue;
                Event::StartArray
            }
        })
    }

    fn close(&mut self) -> Event<'src> {
        self.take(1);
        let container = self.stack.pop();
        self.state = self.state_after_value();
        match container {
            Some(Container::Array) => Event::EndArray,
            _ => Event::EndObject,
        }
    }

    fn read_value(&mut self) -> Result<Event<'src>, SyntaxError> {
        let event = match self.peek() {
            None if self.state == ParseState::Start => return Err(SyntaxError::EmptyDocument),
            None => return Err(SyntaxError::UnexpectedEndOfInput),
            Some(b'{') => return self.open(Container::Object),
            Some(b'[') => return self.open(Container::Array),
            Some(b'"') => Event::String(self.read_string()?),
            Some(b't') => self.read_literal(b"true", Event::Bool(true))?,
            Some(b'f') => self.read_literal(b"false", Event::Bool(false))?,
            Some(b'n') => self.read_literal(b"null", Event::Null)?,
            Some(b'-' | b'0'..=b'9') => self.read_number()?,
            Some(b) => return Err(SyntaxError::UnexpectedCharacter(b)),
        };
        self.state = self.state_after_value();
        Ok(event)
    }

    fn read_literal(
        &mut self,
        literal: &'static [u8],
        event: Event<'src>,
    ) -> Result<Event<'src>, SyntaxError> {
        if !self.rest.starts_with(literal) {
            return Err(SyntaxError::InvalidLiteral);
        }
        self.take(literal.len());
        Ok(event)
    }

    fn read_number(&mut self) -> Result<Event<'src>, SyntaxError> {
        let (len, integer) = number::scan_number(self.rest)?;
        let bytes: &'src [u8] = self.take(len);
        let text = bytes.to_str().map_err(|_| SyntaxError::InvalidNumber)?;
        if self.options.numbers_as_raw {
            return Ok(Event::RawNumber(text));
        }
        let lexeme = if integer {
            NumberLexeme::Integer(text)
        } else {
            NumberLexeme::Float(text)
        };
        number::convert(lexeme).map(Event::Number)
    }

    /// Reads the string literal under the cursor, decoding escapes in place.
    fn read_string(&mut self) -> Result<&'src str, SyntaxError> {
        self.take(1);
        let rest = core::mem::take(&mut self.rest);
        let mut read = 0;
        let mut write = 0;
        loop {
            let run = rest[read..]
                .find_byteset(&STRING_SPECIAL)
                .ok_or(SyntaxError::UnexpectedEndOfInput)?;
            if read != write {
                rest.copy_within(read..read + run, write);
            }
            read += run;
            write += run;
            match rest[read] {
                b'"' => break,
                b'\\' => (read, write) = escape::unescape_in_place(rest, read, write)?,
                0 => return Err(SyntaxError::UnexpectedEndOfInput),
                _ => return Err(SyntaxError::ControlCharacter),
            }
        }

        let (literal, tail) = rest.split_at_mut(read + 1);
        self.rest = tail;
        self.offset += read + 1;
        self.column += read + 1;
        let literal: &'src [u8] = literal;
        literal[..write]
            .to_str()
            .map_err(|_| SyntaxError::InvalidUtf8)
    }

    fn step(&mut self) -> Result<Option<Event<'src>>, SyntaxError> {
        loop {
            self.skip_whitespace();
            self.mark();
            let next = self.peek();
            let state = self.state;
            return match state {
                ParseState::Start
                | ParseState::BeforePropertyValue
                | ParseState::BeforeArrayValue => self.read_value().map(Some),
                ParseState::BeforeFirstArrayValue => match next {
                    Some(b']') => Ok(Some(self.close())),
                    _ => self.read_value().map(Some),
                },
                ParseState::BeforeFirstPropertyName | ParseState::BeforePropertyName => {
                    match next {
                        Some(b'}') if state == ParseState::BeforeFirstPropertyName => {
                            Ok(Some(self.close()))
                        }
                        Some(b'"') => {
                            let key = self.read_string()?;
                            self.state = ParseState::AfterPropertyName;
                            Ok(Some(Event::Key(key)))
                        }
                        None => Err(SyntaxError::UnexpectedEndOfInput),
                        Some(_) => Err(SyntaxError::ExpectedKey),
                    }
                }
                ParseState::AfterPropertyName => match next {
                    Some(b':') => {
                        self.take(1);
                        self.state = ParseState::BeforePropertyValue;
                        continue;
                    }
                    None => Err(SyntaxError::UnexpectedEndOfInput),
                    Some(_) => Err(SyntaxError::ExpectedColon),
                },
                ParseState::AfterPropertyValue => match next {
                    Some(b',') => {
                        self.take(1);
                        self.state = ParseState::BeforePropertyName;
                        continue;
                    }
                    Some(b'}') => Ok(Some(self.close())),
                    None => Err(SyntaxError::UnexpectedEndOfInput),
                    Some(_) => Err(SyntaxError::ExpectedCommaOrObjectEnd),
                },
                ParseState::AfterArrayValue => match next {
                    Some(b',') => {
                        self.take(1);
                        self.state = ParseState::BeforeArrayValue;
                        continue;
                    }
                    Some(b']') => Ok(Some(self.close())),
                    None => Err(SyntaxError::UnexpectedEndOfInput),
                    Some(_) => Err(SyntaxError::ExpectedCommaOrArrayEnd),
                },
                ParseState::End => match next {
                    Some(_) if !self.options.stop_when_done => Err(SyntaxError::TrailingContent),
                    _ => Ok(None),
                },
            };
        }
    }
}

impl<'src> EventSource<'src> for Reader<'src> {
    fn next_event(&mut self) -> Result<Option<Event<'src>>, ReaderError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.state == ParseState::End && self.options.stop_when_done {
            return Ok(None);
        }

        self.step().map_err(|kind| {
            let error = ReaderError {
                kind,
                offset: self.token_offset,
                line: self.token_line,
                column: self.token_column,
            };
            tracing::debug!(%error, "reader rejected input");
            self.error = Some(error);
            error
        })
    }

    fn syntax_error(&self) -> Option<ReaderError> {
        self.error
    }
}

/// Yields events until the document ends. A syntax error is yielded once,
/// after which the iterator is exhausted.
impl<'src> Iterator for Reader<'src> {
    type Item = Result<Event<'src>, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(event) => event.map(Ok),
            Err(_) if self.error_yielded => None,
            Err(error) => {
                self.error_yielded = true;
                Some(Err(error))
            }
        }
    }
}
