//! Incremental XML event parser for memory-constrained pipelines.
//!
//! ## Description
//!
//! `trickle-xml` turns a stream of UTF-8 bytes, delivered in chunks of
//! any size, into a flat sequence of structural [`Event`]s without ever
//! building a tree. It is a two-stage pipeline:
//!
//! - [`Parser`]: recognizes raw constructs (tags, attributes, text,
//!   comments, CDATA, processing instructions) with strict byte limits
//!   and resumes cleanly at any chunk boundary.
//! - [`Sanitizer`]: consumes the raw events and enforces global
//!   well-formedness: single root, balanced nesting, unique attributes
//!   per element, no significant text outside the root.
//!
//! Parse failures are in-band [`Event::Error`] values, never `Result`
//! errors: both stages keep making forward progress after every failure,
//! which matters when the input comes from the network or from a
//! decompressor and cannot be re-read.
//!
//! All payload slices borrow from a caller-owned [`Arena`], so holding
//! an event, or the sanitizer's open-element stack, statically pins the
//! storage it points into.
//!
//! ## Example
//!
//! ```rust
//! use trickle_xml::{Arena, Event, Parser, Sanitizer, SanitizerConfig};
//!
//! let arena = Arena::new();
//! let mut parser = Parser::new(&arena);
//! let mut sanitizer = Sanitizer::new(SanitizerConfig::default());
//!
//! // Chunk boundaries may fall anywhere, even inside a tag.
//! parser.feed(b"<doc lang='en'>hel");
//! parser.feed(b"lo</doc>");
//! parser.finish();
//!
//! loop {
//!     let event = parser.next_event();
//!     let done = event == Event::EndOfStream;
//!     sanitizer.push(event);
//!     if done {
//!         break;
//!     }
//! }
//!
//! let mut names = Vec::new();
//! let mut text = Vec::new();
//! loop {
//!     match sanitizer.next_event() {
//!         Event::ElementStart { name, .. } => names.push(name),
//!         Event::Text(bytes) => text.extend_from_slice(bytes),
//!         Event::Error { message, .. } => panic!("unexpected error: {}", message),
//!         Event::EndOfStream => break,
//!         _ => {}
//!     }
//! }
//! assert_eq!(names, [b"doc".as_ref()]);
//! assert_eq!(text, b"hello");
//! ```
//!
//! For a pull-style loop over anything implementing [`std::io::Read`],
//! see [`Reader`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod chars;
mod utils;

pub mod arena;
pub mod errors;
pub mod events;
pub mod parser;
pub mod reader;
pub mod sanitizer;

// reexports
pub use crate::arena::Arena;
pub use crate::errors::ErrorKind;
pub use crate::events::{Event, Origin};
pub use crate::parser::{Config, Parser, ParserMode};
pub use crate::reader::Reader;
pub use crate::sanitizer::{Sanitizer, SanitizerConfig};
