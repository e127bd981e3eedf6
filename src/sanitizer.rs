//! The well-formedness layer: events in, cleaned events out.
//!
//! [`Sanitizer`] consumes the raw event sequence and enforces the global
//! invariants the byte-level parser cannot see: a single root element,
//! balanced nesting, unique attribute names per element, bounded depth
//! and no significant text outside the root. It never looks at input
//! bytes and never copies payloads: its open-element stack borrows the
//! very slices the upstream parser allocated, so a sanitizer is bound to
//! the same arena generation as its parser.
//!
//! ```
//! use trickle_xml::{Arena, Event, Parser, Sanitizer, SanitizerConfig};
//!
//! let arena = Arena::new();
//! let mut parser = Parser::new(&arena);
//! let mut sanitizer = Sanitizer::new(SanitizerConfig::default());
//!
//! parser.feed(b"<a><b></a>");
//! parser.finish();
//! loop {
//!     let event = parser.next_event();
//!     let done = event == Event::EndOfStream;
//!     sanitizer.push(event);
//!     if done {
//!         break;
//!     }
//! }
//!
//! let mut saw_mismatch = false;
//! loop {
//!     match sanitizer.next_event() {
//!         Event::Error { message, .. } => saw_mismatch |= message == "mismatched end tag",
//!         Event::EndOfStream => break,
//!         _ => {}
//!     }
//! }
//! assert!(saw_mismatch);
//! ```

use std::collections::VecDeque;

use log::debug;

use crate::chars::is_whitespace;
use crate::errors::ErrorKind;
use crate::events::Event;

/// Static per-sanitizer configuration.
#[derive(Clone, Debug)]
pub struct SanitizerConfig {
    /// After the first [`Error`](Event::Error) leaves the sanitizer,
    /// drop all further non-error input instead of repairing around it.
    pub fail_fast: bool,
    /// Maximum element nesting depth.
    pub max_depth: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_depth: 1024,
        }
    }
}

/// Enforces global well-formedness on a raw event sequence.
///
/// Drive it with [`push`](Sanitizer::push) for every upstream event
/// (including `EndOfStream`, which triggers the finish checks) and drain
/// it with [`next_event`](Sanitizer::next_event). Errors emitted by the
/// sanitizer itself carry offset 0 because it does not know byte
/// positions.
pub struct Sanitizer<'a> {
    config: SanitizerConfig,
    queue: VecDeque<Event<'a>>,
    /// Names of currently open elements, outermost first. Borrowed, not
    /// copied: entries point into the upstream parser's arena.
    stack: Vec<&'a [u8]>,
    /// Attribute names seen in the current attribute phase. Elements
    /// rarely carry more than a handful, so a linear probe beats a
    /// hashed set here.
    attr_seen: Vec<&'a [u8]>,
    /// Whether the stream sits immediately after an `ElementStart`,
    /// where `Attribute` events are legal.
    in_attrs: bool,
    root_seen: bool,
    root_closed: bool,
    /// Set under `fail_fast` once the first error left the sanitizer.
    stopped: bool,
    finished: bool,
}

impl<'a> Sanitizer<'a> {
    /// Creates a sanitizer with the given configuration.
    pub fn new(config: SanitizerConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            stack: Vec::new(),
            attr_seen: Vec::new(),
            in_attrs: false,
            root_seen: false,
            root_closed: false,
            stopped: false,
            finished: false,
        }
    }

    /// The configuration this sanitizer was built with.
    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Current element nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Accepts one upstream event.
    ///
    /// `NeedMoreInput` is ignored; `EndOfStream` triggers the same
    /// checks as [`finish`](Sanitizer::finish). Everything else is
    /// checked against the structural invariants and either forwarded or
    /// replaced by an [`Error`](Event::Error) event.
    pub fn push(&mut self, event: Event<'a>) {
        match event {
            Event::NeedMoreInput => {}
            Event::EndOfStream => self.finish(),
            Event::Error { .. } => {
                // Upstream errors pass through even in the stopped
                // state; only non-error output is suppressed.
                self.in_attrs = false;
                self.queue.push_back(event);
                if self.config.fail_fast {
                    self.stopped = true;
                }
            }
            _ if self.stopped => {}
            Event::ElementStart { name, .. } => {
                self.in_attrs = false;
                if self.root_closed {
                    self.violation(ErrorKind::MalformedMarkup, "multiple root elements");
                } else if self.stack.len() >= self.config.max_depth {
                    self.violation(ErrorKind::LimitExceeded, "element nesting too deep");
                } else {
                    self.stack.push(name);
                    if self.stack.len() == 1 {
                        self.root_seen = true;
                    }
                    self.attr_seen.clear();
                    self.in_attrs = true;
                    self.queue.push_back(event);
                }
            }
            Event::Attribute { name, .. } => {
                if !self.in_attrs {
                    self.violation(ErrorKind::MalformedMarkup, "attribute without start tag");
                } else if self.attr_seen.contains(&name) {
                    self.violation(ErrorKind::MalformedMarkup, "duplicate attribute");
                } else {
                    self.attr_seen.push(name);
                    self.queue.push_back(event);
                }
            }
            Event::ElementEnd { name, .. } => {
                self.in_attrs = false;
                match self.stack.last() {
                    None => self.violation(ErrorKind::MalformedMarkup, "end tag without start"),
                    Some(top) if *top != name => {
                        self.violation(ErrorKind::MalformedMarkup, "mismatched end tag")
                    }
                    Some(_) => {
                        self.stack.pop();
                        self.queue.push_back(event);
                        if self.stack.is_empty() && self.root_seen {
                            self.root_closed = true;
                        }
                    }
                }
            }
            Event::Text(bytes) => {
                self.in_attrs = false;
                if self.stack.is_empty() && !bytes.iter().all(|&b| is_whitespace(b)) {
                    self.violation(ErrorKind::MalformedMarkup, "text outside root");
                } else {
                    self.queue.push_back(event);
                }
            }
            Event::Comment(_) | Event::Cdata(_) | Event::ProcessingInstruction { .. } => {
                self.in_attrs = false;
                self.queue.push_back(event);
            }
        }
    }

    /// Signals that no further events will arrive.
    ///
    /// Runs the end-of-document checks (unclosed element, missing root)
    /// unless the sanitizer already stopped under `fail_fast`: once
    /// stopped, it stays stopped and finishes silently.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.in_attrs = false;
        if !self.stopped {
            if !self.stack.is_empty() {
                self.violation(ErrorKind::UnexpectedEof, "unclosed element");
            } else if !self.root_seen {
                self.violation(ErrorKind::MalformedMarkup, "missing root");
            }
        }
        self.finished = true;
    }

    /// Drains one sanitized event.
    ///
    /// Returns [`NeedMoreInput`](Event::NeedMoreInput) while the output
    /// queue is empty and [`finish`](Sanitizer::finish) has not been
    /// called, and [`EndOfStream`](Event::EndOfStream) once it has and
    /// the queue is drained.
    pub fn next_event(&mut self) -> Event<'a> {
        if let Some(event) = self.queue.pop_front() {
            return event;
        }
        if self.finished {
            Event::EndOfStream
        } else {
            Event::NeedMoreInput
        }
    }

    /// Returns the sanitizer to its initial state.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.stack.clear();
        self.attr_seen.clear();
        self.in_attrs = false;
        self.root_seen = false;
        self.root_closed = false;
        self.stopped = false;
        self.finished = false;
    }

    fn violation(&mut self, kind: ErrorKind, message: &'static str) {
        debug!("structural violation: {}", message);
        self.queue.push_back(Event::Error {
            kind,
            message,
            offset: 0,
        });
        if self.config.fail_fast {
            self.stopped = true;
        }
    }
}
