//! The raw element parser: bytes in, events out.
//!
//! [`Parser`] is a push parser. [`feed`] appends a chunk of any size,
//! including a single byte, and never produces events on its own;
//! [`next_event`] advances the state machine until exactly one event can
//! be returned. When the buffered bytes end inside a construct the
//! parser answers [`NeedMoreInput`] and re-examines the construct once
//! more data arrives, which is what makes the emitted sequence
//! independent of how the input was chunked. [`finish`] declares the end
//! of the stream, after which partial constructs turn into
//! [`UnexpectedEof`] errors and the final event is [`EndOfStream`].
//!
//! ```
//! use trickle_xml::{Arena, Event, Origin, Parser};
//!
//! let arena = Arena::new();
//! let mut parser = Parser::new(&arena);
//!
//! parser.feed(b"<greeting lang='en'>hi");
//! parser.feed(b"</greeting>");
//! parser.finish();
//!
//! assert_eq!(
//!     parser.next_event(),
//!     Event::ElementStart { name: b"greeting", origin: Origin::Explicit },
//! );
//! assert_eq!(
//!     parser.next_event(),
//!     Event::Attribute { name: b"lang", value: b"en" },
//! );
//! assert_eq!(parser.next_event(), Event::Text(b"hi"));
//! assert_eq!(
//!     parser.next_event(),
//!     Event::ElementEnd { name: b"greeting", origin: Origin::Explicit },
//! );
//! assert_eq!(parser.next_event(), Event::EndOfStream);
//! ```
//!
//! [`feed`]: Parser::feed()
//! [`next_event`]: Parser::next_event()
//! [`finish`]: Parser::finish()
//! [`NeedMoreInput`]: crate::events::Event::NeedMoreInput
//! [`UnexpectedEof`]: crate::errors::ErrorKind::UnexpectedEof
//! [`EndOfStream`]: crate::events::Event::EndOfStream

use std::collections::VecDeque;
use std::ops::Range;

use log::debug;
use memchr::memchr;

use crate::arena::Arena;
use crate::buffer::InputBuffer;
use crate::chars::{is_name_byte, is_name_start, is_whitespace, utf8_boundary};
use crate::errors::ErrorKind;
use crate::events::{Event, Origin};

mod cdata;
mod comment;
mod pi;

const COMMENT_OPEN: &[u8] = b"<!--";
const CDATA_OPEN: &[u8] = b"<![CDATA[";

const NAME_START_MSG: &str = "name must start with a letter, `_` or `:`";
const NAME_LEN_MSG: &str = "name exceeds the configured length limit";

/// Markup dialect selector.
///
/// Only [`Xml`](ParserMode::Xml) is implemented. The other selectors are
/// part of the configuration surface so that callers can already wire a
/// dialect choice through their own option plumbing; picking one of them
/// reports [`Unsupported`](ErrorKind::Unsupported) on the first event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ParserMode {
    /// Parse XML-shaped markup.
    #[default]
    Xml,
    /// HTML dialect; not implemented.
    Html,
    /// Sniff the dialect from the input; not implemented.
    Auto,
}

/// Static per-parser configuration.
///
/// The byte limits bound every per-event allocation, which is what keeps
/// the parser usable on hostile or truncated input: no single construct
/// can make the arena grow past `max(max_name_len, max_attr_len,
/// max_text_chunk)` per event.
#[derive(Clone, Debug)]
pub struct Config {
    /// Dialect selector. Only [`ParserMode::Xml`] is implemented.
    pub mode: ParserMode,
    /// Byte cap on element, attribute and PI-target names.
    pub max_name_len: usize,
    /// Byte cap on a single attribute value.
    pub max_attr_len: usize,
    /// Soft cap per [`Text`](Event::Text) event; longer runs are split
    /// at a UTF-8 codepoint boundary.
    pub max_text_chunk: usize,
    /// Hard cap on the number of attributes in one start tag.
    pub max_attrs_per_element: usize,
    /// Emit [`Comment`](Event::Comment) events instead of skipping
    /// comments silently.
    pub emit_comments: bool,
    /// Emit [`ProcessingInstruction`](Event::ProcessingInstruction)
    /// events instead of skipping instructions silently.
    pub emit_pi: bool,
    /// Emit [`Cdata`](Event::Cdata) events instead of skipping CDATA
    /// sections silently.
    pub emit_cdata: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ParserMode::Xml,
            max_name_len: 1024,
            max_attr_len: 65536,
            max_text_chunk: 65536,
            max_attrs_per_element: 256,
            emit_comments: false,
            emit_pi: false,
            emit_cdata: false,
        }
    }
}

/// Outcome of one scanner attempt over the buffered bytes.
enum Scan<'a> {
    /// The construct was recognized; its events (possibly none) are
    /// queued and its bytes are consumed.
    Done,
    /// The buffered bytes end inside the construct; nothing consumed.
    NeedData,
    /// The construct is malformed; one byte was consumed and the error
    /// event should be returned to the caller.
    Fault(Event<'a>),
}

/// Outcome of a pure scanning helper that does not touch parser state.
enum Parsed<T> {
    Done(T),
    NeedData,
    Fault(ErrorKind, &'static str),
}

/// Attribute name/value spans in input-buffer coordinates. Spans are
/// only turned into arena copies when the whole start tag commits.
struct AttrSpan {
    name: Range<usize>,
    value: Range<usize>,
}

/// A committed start tag, still in input-buffer coordinates.
struct StartTag {
    name: Range<usize>,
    self_closing: bool,
    len: usize,
}

/// A committed end tag, still in input-buffer coordinates.
struct EndTag {
    name: Range<usize>,
    len: usize,
}

/// Split points of a processing-instruction interior.
struct PiParts {
    target_end: usize,
    data_start: usize,
}

/// Incremental recognizer for XML constructs in a byte stream delivered
/// in arbitrary chunks.
///
/// The parser borrows a caller-owned [`Arena`]; every slice inside an
/// emitted [`Event`] points into it. See the [module docs](self) for the
/// feed/next_event loop and the crate docs for the two-stage pipeline.
pub struct Parser<'a> {
    arena: &'a Arena,
    buffer: InputBuffer,
    queue: VecDeque<Event<'a>>,
    /// Scratch for attribute spans of the start tag being scanned.
    attr_spans: Vec<AttrSpan>,
    config: Config,
    finished: bool,
    mode_reported: bool,
}

impl<'a> Parser<'a> {
    /// Creates a parser with the default [`Config`].
    pub fn new(arena: &'a Arena) -> Self {
        Self::with_config(Config::default(), arena)
    }

    /// Creates a parser with an explicit configuration.
    pub fn with_config(config: Config, arena: &'a Arena) -> Self {
        Self {
            arena,
            buffer: InputBuffer::new(),
            queue: VecDeque::new(),
            attr_spans: Vec::new(),
            config,
            finished: false,
            mode_reported: false,
        }
    }

    /// The configuration this parser was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute offset of the read cursor: the number of bytes consumed
    /// since construction or the last [`reset`](Parser::reset). This is
    /// the offset carried by [`Error`](Event::Error) events.
    pub fn offset(&self) -> u64 {
        self.buffer.offset()
    }

    /// Appends a chunk of input. Never emits events and never fails;
    /// chunks may be of any size, including one byte.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.feed(bytes);
    }

    /// Declares the end of the stream.
    ///
    /// Buffered complete constructs still parse normally afterwards;
    /// a partial construct at the end of the buffer turns into an
    /// [`UnexpectedEof`](ErrorKind::UnexpectedEof) error and the
    /// remaining bytes are drained so that subsequent calls return
    /// [`EndOfStream`](Event::EndOfStream).
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Returns the parser to its initial state for a new document.
    ///
    /// Parser state only: the arena is owned by the caller and is
    /// reclaimed separately with [`Arena::reset`] once no events from
    /// the previous document are held.
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.queue.clear();
        self.attr_spans.clear();
        self.finished = false;
        self.mode_reported = false;
    }

    /// Advances the state machine until it can return exactly one event.
    ///
    /// Returns [`NeedMoreInput`](Event::NeedMoreInput) only while the
    /// stream is open, and [`EndOfStream`](Event::EndOfStream) only once
    /// [`finish`](Parser::finish) was called, all bytes are consumed and
    /// the internal queue is empty.
    pub fn next_event(&mut self) -> Event<'a> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return event;
            }
            if self.config.mode != ParserMode::Xml {
                return self.reject_mode();
            }
            if self.buffer.remaining().is_empty() {
                return if self.finished {
                    Event::EndOfStream
                } else {
                    Event::NeedMoreInput
                };
            }
            let first = self.buffer.remaining()[0];
            let second = self.buffer.remaining().get(1).copied();
            let scan = if first != b'<' {
                self.scan_text()
            } else {
                match second {
                    None => Scan::NeedData,
                    Some(b'/') => self.scan_end_tag(),
                    Some(b'!') => self.scan_bang(),
                    Some(b'?') => self.scan_pi(),
                    Some(_) => self.scan_start_tag(),
                }
            };
            match scan {
                Scan::Done => continue,
                Scan::Fault(event) => return event,
                Scan::NeedData if !self.finished => return Event::NeedMoreInput,
                Scan::NeedData => {
                    // Partial construct at the end of the stream: report
                    // it at the construct start and drain what is left.
                    let event = self.error_event(
                        ErrorKind::UnexpectedEof,
                        "input ended inside a construct",
                    );
                    let rest = self.buffer.remaining().len();
                    self.buffer.consume(rest);
                    return event;
                }
            }
        }
    }

    /// Builds an error event at the current cursor position.
    fn error_event(&self, kind: ErrorKind, message: &'static str) -> Event<'a> {
        debug!("parse error at offset {}: {}", self.buffer.offset(), message);
        Event::Error {
            kind,
            message,
            offset: self.buffer.offset(),
        }
    }

    /// Reports a malformed construct and steps over one byte so the next
    /// call makes progress from the following position.
    fn fault(&mut self, kind: ErrorKind, message: &'static str) -> Scan<'a> {
        let event = self.error_event(kind, message);
        self.buffer.consume(1);
        Scan::Fault(event)
    }

    /// Non-XML modes report one `Unsupported` error for the whole
    /// stream and swallow all input, keeping the emitted sequence
    /// independent of chunking.
    fn reject_mode(&mut self) -> Event<'a> {
        let rest = self.buffer.remaining().len();
        if !self.mode_reported && rest > 0 {
            self.mode_reported = true;
            let event =
                self.error_event(ErrorKind::Unsupported, "only the xml dialect is implemented");
            self.buffer.consume(rest);
            return event;
        }
        self.buffer.consume(rest);
        if self.finished {
            Event::EndOfStream
        } else {
            Event::NeedMoreInput
        }
    }

    /// Text runs end at the next `<` or at the soft cap, whichever comes
    /// first. The cap cut is moved back onto a UTF-8 codepoint boundary;
    /// cuts dictated by the source (`<` or end of stream) emit as-is.
    fn scan_text(&mut self) -> Scan<'a> {
        let bytes = self.buffer.remaining();
        let cap = self.config.max_text_chunk;
        let window = cap.min(bytes.len());
        let cut = match memchr(b'<', &bytes[..window]) {
            Some(i) => i,
            None if bytes.len() >= cap => {
                // Forced cut: keep the tail codepoint intact. A cap
                // inside the very first codepoint still emits one raw
                // byte so the parser keeps moving.
                match utf8_boundary(&bytes[..cap]) {
                    0 => 1,
                    boundary => boundary,
                }
            }
            None if self.finished => bytes.len(),
            None => return Scan::NeedData,
        };
        let text = self.arena.dupe(&bytes[..cut]);
        self.buffer.consume(cut);
        self.queue.push_back(Event::Text(text));
        Scan::Done
    }

    /// A start tag expands into `ElementStart`, one `Attribute` per
    /// captured span and, for the self-closing form, an `ElementEnd`
    /// with the same arena-backed name.
    fn scan_start_tag(&mut self) -> Scan<'a> {
        self.attr_spans.clear();
        let tag = match scan_tag_body(self.buffer.remaining(), &self.config, &mut self.attr_spans)
        {
            Parsed::Done(tag) => tag,
            Parsed::NeedData => return Scan::NeedData,
            Parsed::Fault(kind, message) => return self.fault(kind, message),
        };
        let bytes = self.buffer.remaining();
        let name = self.arena.dupe(&bytes[tag.name]);
        self.queue.push_back(Event::ElementStart {
            name,
            origin: Origin::Explicit,
        });
        for span in &self.attr_spans {
            let key = self.arena.dupe(&bytes[span.name.clone()]);
            let value = self.arena.dupe(&bytes[span.value.clone()]);
            self.queue.push_back(Event::Attribute { name: key, value });
        }
        if tag.self_closing {
            self.queue.push_back(Event::ElementEnd {
                name,
                origin: Origin::Explicit,
            });
        }
        self.buffer.consume(tag.len);
        Scan::Done
    }

    fn scan_end_tag(&mut self) -> Scan<'a> {
        let tag = match scan_end_body(self.buffer.remaining(), self.config.max_name_len) {
            Parsed::Done(tag) => tag,
            Parsed::NeedData => return Scan::NeedData,
            Parsed::Fault(kind, message) => return self.fault(kind, message),
        };
        let bytes = self.buffer.remaining();
        let name = self.arena.dupe(&bytes[tag.name]);
        self.queue.push_back(Event::ElementEnd {
            name,
            origin: Origin::Explicit,
        });
        self.buffer.consume(tag.len);
        Scan::Done
    }

    /// `<!` introduces a comment or a CDATA section; everything else
    /// behind a bang (DOCTYPE included) is reported as unsupported.
    fn scan_bang(&mut self) -> Scan<'a> {
        enum Bang {
            Comment,
            Cdata,
            Partial,
            Unsupported,
        }
        let bang = {
            let bytes = self.buffer.remaining();
            if bytes.starts_with(COMMENT_OPEN) {
                Bang::Comment
            } else if bytes.starts_with(CDATA_OPEN) {
                Bang::Cdata
            } else if COMMENT_OPEN.starts_with(bytes) || CDATA_OPEN.starts_with(bytes) {
                Bang::Partial
            } else {
                Bang::Unsupported
            }
        };
        match bang {
            Bang::Comment => self.scan_comment(),
            Bang::Cdata => self.scan_cdata(),
            Bang::Partial => Scan::NeedData,
            Bang::Unsupported => {
                self.fault(ErrorKind::Unsupported, "unsupported markup declaration")
            }
        }
    }

    fn scan_comment(&mut self) -> Scan<'a> {
        let open = COMMENT_OPEN.len();
        let body_len = match comment::search(&self.buffer.remaining()[open..]) {
            Some(n) => n,
            None => return Scan::NeedData,
        };
        if self.config.emit_comments {
            let bytes = self.buffer.remaining();
            let body = self.arena.dupe(&bytes[open..open + body_len]);
            self.queue.push_back(Event::Comment(body));
        }
        self.buffer.consume(open + body_len + 3);
        Scan::Done
    }

    fn scan_cdata(&mut self) -> Scan<'a> {
        let open = CDATA_OPEN.len();
        let body_len = match cdata::search(&self.buffer.remaining()[open..]) {
            Some(n) => n,
            None => return Scan::NeedData,
        };
        if self.config.emit_cdata {
            let bytes = self.buffer.remaining();
            let body = self.arena.dupe(&bytes[open..open + body_len]);
            self.queue.push_back(Event::Cdata(body));
        }
        self.buffer.consume(open + body_len + 3);
        Scan::Done
    }

    fn scan_pi(&mut self) -> Scan<'a> {
        let interior_len = match pi::search(&self.buffer.remaining()[2..]) {
            Some(n) => n,
            None => return Scan::NeedData,
        };
        let total = 2 + interior_len + 2;
        if !self.config.emit_pi {
            self.buffer.consume(total);
            return Scan::Done;
        }
        let parts = {
            let interior = &self.buffer.remaining()[2..2 + interior_len];
            scan_pi_interior(interior, self.config.max_name_len)
        };
        match parts {
            Err((kind, message)) => self.fault(kind, message),
            Ok(parts) => {
                let bytes = self.buffer.remaining();
                let interior = &bytes[2..2 + interior_len];
                let target = self.arena.dupe(&interior[..parts.target_end]);
                let data = self.arena.dupe(&interior[parts.data_start..]);
                self.queue
                    .push_back(Event::ProcessingInstruction { target, data });
                self.buffer.consume(total);
                Scan::Done
            }
        }
    }
}

/// Advances `i` past any ASCII whitespace.
fn skip_whitespace(bytes: &[u8], i: &mut usize) {
    while let Some(&b) = bytes.get(*i) {
        if is_whitespace(b) {
            *i += 1;
        } else {
            break;
        }
    }
}

/// Scans a name starting at `*i`, leaving `*i` on the first byte after
/// it. `NeedData` means the name may continue past the buffered bytes.
fn scan_name(bytes: &[u8], i: &mut usize, max_name_len: usize) -> Parsed<Range<usize>> {
    let start = *i;
    match bytes.get(start).copied() {
        None => return Parsed::NeedData,
        Some(b) if !is_name_start(b) => {
            return Parsed::Fault(ErrorKind::InvalidName, NAME_START_MSG)
        }
        Some(_) => {}
    }
    let mut end = start + 1;
    loop {
        match bytes.get(end).copied() {
            Some(b) if is_name_byte(b) => {
                end += 1;
                if end - start > max_name_len {
                    return Parsed::Fault(ErrorKind::LimitExceeded, NAME_LEN_MSG);
                }
            }
            Some(_) => break,
            None => return Parsed::NeedData,
        }
    }
    *i = end;
    Parsed::Done(start..end)
}

/// Walks a start tag from the `<` at `bytes[0]`: name, attribute list,
/// then `>` or `/>`. Attribute spans are pushed onto `spans`; nothing is
/// copied until the tag commits.
fn scan_tag_body(bytes: &[u8], config: &Config, spans: &mut Vec<AttrSpan>) -> Parsed<StartTag> {
    debug_assert_eq!(bytes.first(), Some(&b'<'));
    let mut i = 1;
    let name = match scan_name(bytes, &mut i, config.max_name_len) {
        Parsed::Done(range) => range,
        Parsed::NeedData => return Parsed::NeedData,
        Parsed::Fault(kind, message) => return Parsed::Fault(kind, message),
    };
    loop {
        skip_whitespace(bytes, &mut i);
        match bytes.get(i).copied() {
            None => return Parsed::NeedData,
            Some(b'>') => {
                return Parsed::Done(StartTag {
                    name,
                    self_closing: false,
                    len: i + 1,
                })
            }
            Some(b'/') => {
                return match bytes.get(i + 1).copied() {
                    None => Parsed::NeedData,
                    Some(b'>') => Parsed::Done(StartTag {
                        name,
                        self_closing: true,
                        len: i + 2,
                    }),
                    Some(_) => {
                        Parsed::Fault(ErrorKind::MalformedMarkup, "expected `>` after `/`")
                    }
                };
            }
            Some(_) => {}
        }
        if spans.len() >= config.max_attrs_per_element {
            return Parsed::Fault(ErrorKind::LimitExceeded, "too many attributes in one element");
        }
        let key = match scan_name(bytes, &mut i, config.max_name_len) {
            Parsed::Done(range) => range,
            Parsed::NeedData => return Parsed::NeedData,
            Parsed::Fault(kind, message) => return Parsed::Fault(kind, message),
        };
        skip_whitespace(bytes, &mut i);
        match bytes.get(i).copied() {
            None => return Parsed::NeedData,
            Some(b'=') => i += 1,
            Some(_) => {
                return Parsed::Fault(ErrorKind::MalformedMarkup, "expected `=` after attribute name")
            }
        }
        skip_whitespace(bytes, &mut i);
        let quote = match bytes.get(i).copied() {
            None => return Parsed::NeedData,
            Some(q @ (b'"' | b'\'')) => q,
            Some(_) => {
                return Parsed::Fault(ErrorKind::MalformedMarkup, "attribute value must be quoted")
            }
        };
        i += 1;
        let value_start = i;
        match memchr(quote, &bytes[i..]) {
            Some(n) if n > config.max_attr_len => {
                return Parsed::Fault(ErrorKind::LimitExceeded, "attribute value too long")
            }
            Some(n) => {
                spans.push(AttrSpan {
                    name: key,
                    value: value_start..value_start + n,
                });
                i = value_start + n + 1;
            }
            // The value is already over the cap even though the closing
            // quote is still missing; report it now so the decision does
            // not depend on chunking.
            None if bytes.len() - value_start > config.max_attr_len => {
                return Parsed::Fault(ErrorKind::LimitExceeded, "attribute value too long")
            }
            None => return Parsed::NeedData,
        }
    }
}

/// Walks an end tag from the `</` at `bytes[0]`: name, optional
/// whitespace, `>`.
fn scan_end_body(bytes: &[u8], max_name_len: usize) -> Parsed<EndTag> {
    debug_assert_eq!(bytes.first(), Some(&b'<'));
    let mut i = 2;
    let name = match scan_name(bytes, &mut i, max_name_len) {
        Parsed::Done(range) => range,
        Parsed::NeedData => return Parsed::NeedData,
        Parsed::Fault(kind, message) => return Parsed::Fault(kind, message),
    };
    skip_whitespace(bytes, &mut i);
    match bytes.get(i).copied() {
        None => Parsed::NeedData,
        Some(b'>') => Parsed::Done(EndTag { name, len: i + 1 }),
        Some(_) => Parsed::Fault(ErrorKind::MalformedMarkup, "expected `>` in end tag"),
    }
}

/// Splits a complete PI interior into target and data. The interior is
/// fully buffered by the time this runs, so running out of bytes here
/// means the target is missing or malformed, not that data is pending.
fn scan_pi_interior(
    interior: &[u8],
    max_name_len: usize,
) -> Result<PiParts, (ErrorKind, &'static str)> {
    match interior.first().copied() {
        None => return Err((ErrorKind::InvalidName, NAME_START_MSG)),
        Some(b) if !is_name_start(b) => return Err((ErrorKind::InvalidName, NAME_START_MSG)),
        Some(_) => {}
    }
    let mut i = 1;
    while i < interior.len() && is_name_byte(interior[i]) {
        i += 1;
        if i > max_name_len {
            return Err((ErrorKind::LimitExceeded, NAME_LEN_MSG));
        }
    }
    let target_end = i;
    if i < interior.len() && !is_whitespace(interior[i]) {
        return Err((
            ErrorKind::InvalidName,
            "expected whitespace after instruction target",
        ));
    }
    while i < interior.len() && is_whitespace(interior[i]) {
        i += 1;
    }
    Ok(PiParts {
        target_end,
        data_start: i,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn start(name: &[u8]) -> Event<'_> {
        Event::ElementStart {
            name,
            origin: Origin::Explicit,
        }
    }

    fn end(name: &[u8]) -> Event<'_> {
        Event::ElementEnd {
            name,
            origin: Origin::Explicit,
        }
    }

    fn attr<'a>(name: &'a [u8], value: &'a [u8]) -> Event<'a> {
        Event::Attribute { name, value }
    }

    #[test]
    fn text_waits_for_markup() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        parser.feed(b"some text");
        // No `<` seen and the stream is still open.
        assert_eq!(parser.next_event(), Event::NeedMoreInput);
        parser.feed(b"<t/>");
        assert_eq!(parser.next_event(), Event::Text(b"some text"));
    }

    #[test]
    fn text_flushes_on_finish() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        parser.feed(b"tail");
        parser.finish();
        assert_eq!(parser.next_event(), Event::Text(b"tail"));
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn text_soft_cap_respects_codepoints() {
        let arena = Arena::new();
        let config = Config {
            max_text_chunk: 4,
            ..Config::default()
        };
        let mut parser = Parser::with_config(config, &arena);
        // a b c é d = 6 bytes; the cap at 4 lands between the two
        // bytes of é and the cut backs off onto the boundary.
        parser.feed("abc\u{e9}d".as_bytes());
        parser.finish();
        assert_eq!(parser.next_event(), Event::Text(b"abc"));
        assert_eq!(parser.next_event(), Event::Text("\u{e9}d".as_bytes()));
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn pathological_cap_still_progresses() {
        let arena = Arena::new();
        let config = Config {
            max_text_chunk: 1,
            ..Config::default()
        };
        let mut parser = Parser::with_config(config, &arena);
        parser.feed("\u{e9}".as_bytes());
        parser.finish();
        // The cap lands inside the very first codepoint: the parser
        // emits the raw bytes one at a time rather than stalling.
        assert_eq!(parser.next_event(), Event::Text(b"\xC3"));
        assert_eq!(parser.next_event(), Event::Text(b"\xA9"));
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn start_tag_with_attributes() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        parser.feed(b"<item id=\"1\" class = 'x y'>");
        parser.finish();
        assert_eq!(parser.next_event(), start(b"item"));
        assert_eq!(parser.next_event(), attr(b"id", b"1"));
        assert_eq!(parser.next_event(), attr(b"class", b"x y"));
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn self_closing_expands() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        parser.feed(b"<br a='b'/>");
        parser.finish();
        assert_eq!(parser.next_event(), start(b"br"));
        assert_eq!(parser.next_event(), attr(b"a", b"b"));
        assert_eq!(parser.next_event(), end(b"br"));
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn end_tag_with_trailing_whitespace() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        parser.feed(b"</a \r\n\t>");
        parser.finish();
        assert_eq!(parser.next_event(), end(b"a"));
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn comments_are_skipped_by_default() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        parser.feed(b"<!--note--><x/>");
        parser.finish();
        assert_eq!(parser.next_event(), start(b"x"));
    }

    #[test]
    fn comments_emit_when_enabled() {
        let arena = Arena::new();
        let config = Config {
            emit_comments: true,
            ..Config::default()
        };
        let mut parser = Parser::with_config(config, &arena);
        parser.feed(b"<!--note with -- inside? no: ->--><x/>");
        parser.finish();
        assert_eq!(
            parser.next_event(),
            Event::Comment(b"note with -- inside? no: ->")
        );
        assert_eq!(parser.next_event(), start(b"x"));
    }

    #[test]
    fn cdata_emits_when_enabled() {
        let arena = Arena::new();
        let config = Config {
            emit_cdata: true,
            ..Config::default()
        };
        let mut parser = Parser::with_config(config, &arena);
        parser.feed(b"<![CDATA[a < b && c]]>");
        parser.finish();
        assert_eq!(parser.next_event(), Event::Cdata(b"a < b && c"));
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn pi_target_and_data() {
        let arena = Arena::new();
        let config = Config {
            emit_pi: true,
            ..Config::default()
        };
        let mut parser = Parser::with_config(config, &arena);
        parser.feed(b"<?xml-stylesheet  href='a.css'?><?empty?>");
        parser.finish();
        assert_eq!(
            parser.next_event(),
            Event::ProcessingInstruction {
                target: b"xml-stylesheet",
                data: b"href='a.css'",
            }
        );
        assert_eq!(
            parser.next_event(),
            Event::ProcessingInstruction {
                target: b"empty",
                data: b"",
            }
        );
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn doctype_is_unsupported() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        parser.feed(b"<!DOCTYPE html>");
        parser.finish();
        match parser.next_event() {
            Event::Error {
                kind: ErrorKind::Unsupported,
                offset: 0,
                ..
            } => {}
            other => panic!("expected unsupported error, got {:?}", other),
        }
    }

    #[test]
    fn partial_construct_reports_eof() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        parser.feed(b"<a");
        assert_eq!(parser.next_event(), Event::NeedMoreInput);
        parser.finish();
        match parser.next_event() {
            Event::Error {
                kind: ErrorKind::UnexpectedEof,
                offset: 0,
                ..
            } => {}
            other => panic!("expected eof error, got {:?}", other),
        }
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn error_offsets_point_at_construct_start() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        // Text "ab", then a tag with an unquoted value.
        parser.feed(b"ab<t v=1>");
        parser.finish();
        assert_eq!(parser.next_event(), Event::Text(b"ab"));
        match parser.next_event() {
            Event::Error {
                kind: ErrorKind::MalformedMarkup,
                offset: 2,
                ..
            } => {}
            other => panic!("expected malformed markup at 2, got {:?}", other),
        }
    }

    #[test]
    fn name_limit() {
        let arena = Arena::new();
        let config = Config {
            max_name_len: 4,
            ..Config::default()
        };
        let mut parser = Parser::with_config(config, &arena);
        parser.feed(b"<abcde/>");
        parser.finish();
        match parser.next_event() {
            Event::Error {
                kind: ErrorKind::LimitExceeded,
                ..
            } => {}
            other => panic!("expected limit error, got {:?}", other),
        }
    }

    #[test]
    fn attribute_count_limit() {
        let arena = Arena::new();
        let config = Config {
            max_attrs_per_element: 2,
            ..Config::default()
        };
        let mut parser = Parser::with_config(config, &arena);
        parser.feed(b"<t a='1' b='2' c='3'>");
        parser.finish();
        match parser.next_event() {
            Event::Error {
                kind: ErrorKind::LimitExceeded,
                ..
            } => {}
            other => panic!("expected limit error, got {:?}", other),
        }
    }

    #[test]
    fn non_xml_mode_is_rejected_once() {
        let arena = Arena::new();
        let config = Config {
            mode: ParserMode::Html,
            ..Config::default()
        };
        let mut parser = Parser::with_config(config, &arena);
        parser.feed(b"<p>text");
        parser.feed(b"</p>");
        parser.finish();
        match parser.next_event() {
            Event::Error {
                kind: ErrorKind::Unsupported,
                ..
            } => {}
            other => panic!("expected unsupported error, got {:?}", other),
        }
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }

    #[test]
    fn reset_starts_a_fresh_document() {
        let arena = Arena::new();
        let mut parser = Parser::new(&arena);
        parser.feed(b"<a>");
        parser.finish();
        assert_eq!(parser.next_event(), start(b"a"));
        assert_eq!(parser.next_event(), Event::EndOfStream);

        parser.reset();
        assert_eq!(parser.offset(), 0);
        assert_eq!(parser.config().max_name_len, 1024);
        parser.feed(b"<b/>");
        parser.finish();
        assert_eq!(parser.next_event(), start(b"b"));
        assert_eq!(parser.next_event(), end(b"b"));
        assert_eq!(parser.next_event(), Event::EndOfStream);
    }
}
