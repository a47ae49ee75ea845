/// Configuration options for the in-situ [`Reader`](crate::Reader).
///
/// # Examples
///
/// ```rust
/// use lookahead_json::{LookaheadParser, ParserOptions};
///
/// let mut buf = br#"{"depth": 1} trailing"#.to_vec();
/// let parser = LookaheadParser::with_options(
///     &mut buf,
///     ParserOptions {
///         stop_when_done: true,
///         ..Default::default()
///     },
/// );
/// assert!(parser.is_valid());
/// ```
///
/// # Default
///
/// No depth limit; all flags `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Maximum nesting depth of objects and arrays.
    ///
    /// Opening a container beyond this depth is a
    /// [`SyntaxError::DepthLimitExceeded`](crate::SyntaxError::DepthLimitExceeded).
    ///
    /// # Default
    ///
    /// `None` (unlimited)
    pub max_depth: Option<usize>,

    /// Whether to stop once the root value is complete.
    ///
    /// When `false`, anything other than whitespace after the root value is a
    /// [`SyntaxError::TrailingContent`](crate::SyntaxError::TrailingContent).
    /// When `true`, the bytes after the root value are never examined.
    ///
    /// # Default
    ///
    /// `false`
    pub stop_when_done: bool,

    /// Whether to report numbers as [`Event::RawNumber`](crate::Event::RawNumber)
    /// instead of converting them.
    ///
    /// The lookahead parser does not accept raw numbers and fails on the first
    /// one; this is useful only to callers that drive the
    /// [`Reader`](crate::Reader) directly.
    ///
    /// # Default
    ///
    /// `false`
    pub numbers_as_raw: bool,
}
