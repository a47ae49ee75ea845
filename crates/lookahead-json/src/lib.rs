//! A one-token-lookahead pull parser for JSON documents held in memory.
//!
//! Instead of building a tree, [`LookaheadParser`] lets the caller walk a
//! document with code that mirrors its schema: enter objects and arrays, read
//! keys one at a time, fetch scalars, or skip whole subtrees. Only the visited
//! nodes are ever materialized, and strings are borrowed from the input
//! buffer, which is decoded in place by the [`Reader`].
//!
//! ```rust
//! use lookahead_json::LookaheadParser;
//!
//! let mut buf = br#"{"name": "resnet", "layers": [{"k": 3}, {"k": 5}], "seed": 7}"#.to_vec();
//! let mut p = LookaheadParser::new(&mut buf);
//!
//! let mut name = None;
//! let mut seed = None;
//! p.enter_object();
//! while let Some(key) = p.next_object_key() {
//!     match key {
//!         "name" => name = p.get_string(),
//!         "seed" => seed = p.get_int(),
//!         _ => p.skip_value(),
//!     }
//! }
//! assert!(p.is_valid());
//! assert_eq!(name, Some("resnet"));
//! assert_eq!(seed, Some(7));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod event;
mod lookahead;
mod options;
mod reader;

#[cfg(test)]
mod tests;

pub use error::{LookaheadError, ReaderError, SyntaxError};
pub use event::{Event, JsonType, Number, Scalar};
pub use lookahead::{LookaheadParser, State};
pub use options::ParserOptions;
pub use reader::{EventSource, Reader};
