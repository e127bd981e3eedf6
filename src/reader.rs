//! Pull adapter over any [`std::io::Read`] source.
//!
//! The core [`Parser`](crate::parser::Parser) is pushed-to; adapting a
//! pull-based byte source to `feed` is mechanical, so [`Reader`] does it
//! once: whenever the parser asks for more input the reader fills a
//! scratch chunk from the source and feeds it in, calling
//! [`finish`](crate::parser::Parser::finish) on a zero-length read.

use std::io::{self, Read};

use crate::arena::Arena;
use crate::events::Event;
use crate::parser::{Config, Parser};

/// Size of the scratch chunk filled from the source per refill.
const CHUNK_SIZE: usize = 8 * 1024;

/// Drives a [`Parser`] from a [`Read`] source.
///
/// ```
/// use std::io::Cursor;
/// use trickle_xml::{Arena, Event, Reader};
///
/// let arena = Arena::new();
/// let mut reader = Reader::new(Cursor::new(b"<a>hi</a>".to_vec()), &arena);
///
/// let mut texts = 0;
/// loop {
///     match reader.read_event().unwrap() {
///         Event::Text(_) => texts += 1,
///         Event::EndOfStream => break,
///         _ => {}
///     }
/// }
/// assert_eq!(texts, 1);
/// ```
pub struct Reader<'a, R> {
    parser: Parser<'a>,
    source: R,
    chunk: Box<[u8]>,
}

impl<'a, R: Read> Reader<'a, R> {
    /// Creates a reader with the default parser [`Config`].
    pub fn new(source: R, arena: &'a Arena) -> Self {
        Self::with_config(Config::default(), source, arena)
    }

    /// Creates a reader with an explicit parser configuration.
    pub fn with_config(config: Config, source: R, arena: &'a Arena) -> Self {
        Self {
            parser: Parser::with_config(config, arena),
            source,
            chunk: vec![0; CHUNK_SIZE].into_boxed_slice(),
        }
    }

    /// The parser driven by this reader.
    pub fn parser(&self) -> &Parser<'a> {
        &self.parser
    }

    /// Returns the next event, refilling from the source as needed.
    ///
    /// Unlike [`Parser::next_event`] this never returns
    /// [`NeedMoreInput`](Event::NeedMoreInput): the reader resolves it
    /// by pulling bytes until the parser can produce a real event or the
    /// source is exhausted.
    pub fn read_event(&mut self) -> io::Result<Event<'a>> {
        loop {
            match self.parser.next_event() {
                Event::NeedMoreInput => {
                    let n = loop {
                        match self.source.read(&mut self.chunk) {
                            Ok(n) => break n,
                            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                            Err(e) => return Err(e),
                        }
                    };
                    if n == 0 {
                        self.parser.finish();
                    } else {
                        self.parser.feed(&self.chunk[..n]);
                    }
                }
                event => return Ok(event),
            }
        }
    }
}
