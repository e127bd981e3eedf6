//! The event vocabulary emitted by the parser pipeline.
//!
//! Both pipeline stages speak the same [`Event`] type: the raw parser
//! produces it from bytes, the sanitizer consumes and re-emits it. All
//! payload slices borrow from the [`Arena`] the parser was built with
//! and stay valid until [`Arena::reset`], which the borrow checker will
//! not allow while any event is still alive.
//!
//! [`Arena`]: crate::arena::Arena
//! [`Arena::reset`]: crate::arena::Arena::reset

use std::fmt;

use crate::errors::ErrorKind;
use crate::utils::write_byte_string;

/// Records whether an element boundary was present in the source or
/// synthesized by a normalization layer.
///
/// The raw parser only ever emits [`Explicit`] boundaries (a self-closing
/// tag counts as explicit: both of its boundaries are spelled out in the
/// source). [`Implied`] is reserved for dialect normalizers layered on
/// top of the pipeline; the sanitizer forwards it unchanged.
///
/// [`Explicit`]: Origin::Explicit
/// [`Implied`]: Origin::Implied
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Origin {
    /// The boundary is spelled out in the source bytes.
    Explicit,
    /// The boundary was injected on behalf of a dialect rule.
    Implied,
}

/// One unit of parser output.
///
/// Events compare by payload content, so test expectations can be written
/// against `'static` byte strings.
#[derive(Clone, Copy, Eq, PartialEq)]
pub enum Event<'a> {
    /// An opening tag was recognized. Its attributes, if any, follow
    /// immediately as [`Attribute`](Event::Attribute) events.
    ElementStart {
        /// Element name.
        name: &'a [u8],
        /// Whether the boundary is spelled out in the source.
        origin: Origin,
    },
    /// One attribute of the most recent unclosed
    /// [`ElementStart`](Event::ElementStart).
    Attribute {
        /// Attribute name.
        name: &'a [u8],
        /// Attribute value, between the quotes, not entity-decoded.
        value: &'a [u8],
    },
    /// A closing tag, explicit or synthesized from a self-closing form.
    ElementEnd {
        /// Element name.
        name: &'a [u8],
        /// Whether the boundary is spelled out in the source.
        origin: Origin,
    },
    /// Character data outside markup. Long runs are split at the
    /// configured soft cap, never inside a UTF-8 codepoint.
    Text(&'a [u8]),
    /// Interior of `<!-- ... -->`; only emitted when enabled.
    Comment(&'a [u8]),
    /// Contents of `<? ... ?>`; only emitted when enabled.
    ProcessingInstruction {
        /// The PI target name.
        target: &'a [u8],
        /// Everything after the target and the whitespace that follows it.
        data: &'a [u8],
    },
    /// Interior of `<![CDATA[ ... ]]>`; only emitted when enabled.
    Cdata(&'a [u8]),
    /// A recoverable parse failure. The pipeline keeps making forward
    /// progress after every such event.
    Error {
        /// Failure classification.
        kind: ErrorKind,
        /// Short, static, human-readable description.
        message: &'static str,
        /// Absolute byte offset of the offending construct. Sanitizer
        /// errors carry 0 because the sanitizer does not see bytes.
        offset: u64,
    },
    /// The cursor sits at a partial construct; feed more bytes.
    NeedMoreInput,
    /// Finalization complete; no further events will be produced.
    EndOfStream,
}

impl<'a> Event<'a> {
    /// The name payload of an element boundary, or the target of a
    /// processing instruction.
    pub fn name(&self) -> Option<&'a [u8]> {
        match *self {
            Event::ElementStart { name, .. }
            | Event::Attribute { name, .. }
            | Event::ElementEnd { name, .. } => Some(name),
            Event::ProcessingInstruction { target, .. } => Some(target),
            _ => None,
        }
    }

    /// `true` for the control signals that carry no document content.
    pub fn is_control(&self) -> bool {
        matches!(self, Event::NeedMoreInput | Event::EndOfStream)
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::ElementStart { name, origin } => {
                f.write_str("ElementStart(")?;
                write_byte_string(f, name)?;
                if origin == Origin::Implied {
                    f.write_str(", implied")?;
                }
                f.write_str(")")
            }
            Event::Attribute { name, value } => {
                f.write_str("Attribute(")?;
                write_byte_string(f, name)?;
                f.write_str(" = ")?;
                write_byte_string(f, value)?;
                f.write_str(")")
            }
            Event::ElementEnd { name, origin } => {
                f.write_str("ElementEnd(")?;
                write_byte_string(f, name)?;
                if origin == Origin::Implied {
                    f.write_str(", implied")?;
                }
                f.write_str(")")
            }
            Event::Text(bytes) => {
                f.write_str("Text(")?;
                write_byte_string(f, bytes)?;
                f.write_str(")")
            }
            Event::Comment(bytes) => {
                f.write_str("Comment(")?;
                write_byte_string(f, bytes)?;
                f.write_str(")")
            }
            Event::ProcessingInstruction { target, data } => {
                f.write_str("ProcessingInstruction(")?;
                write_byte_string(f, target)?;
                f.write_str(", ")?;
                write_byte_string(f, data)?;
                f.write_str(")")
            }
            Event::Cdata(bytes) => {
                f.write_str("Cdata(")?;
                write_byte_string(f, bytes)?;
                f.write_str(")")
            }
            Event::Error {
                kind,
                message,
                offset,
            } => write!(f, "Error({:?}, {:?}, offset {})", kind, message, offset),
            Event::NeedMoreInput => f.write_str("NeedMoreInput"),
            Event::EndOfStream => f.write_str("EndOfStream"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn debug_rendering() {
        let event = Event::ElementStart {
            name: b"book",
            origin: Origin::Explicit,
        };
        assert_eq!(format!("{:?}", event), r#"ElementStart("book")"#);

        let event = Event::Attribute {
            name: b"lang",
            value: b"en",
        };
        assert_eq!(format!("{:?}", event), r#"Attribute("lang" = "en")"#);

        let event = Event::ElementEnd {
            name: b"p",
            origin: Origin::Implied,
        };
        assert_eq!(format!("{:?}", event), r#"ElementEnd("p", implied)"#);
    }

    #[test]
    fn name_accessor() {
        let event = Event::ProcessingInstruction {
            target: b"xml-stylesheet",
            data: b"href='a.css'",
        };
        assert_eq!(event.name(), Some(b"xml-stylesheet".as_ref()));
        assert_eq!(Event::Text(b"x").name(), None);
    }

    #[test]
    fn control_events() {
        assert!(Event::NeedMoreInput.is_control());
        assert!(Event::EndOfStream.is_control());
        assert!(!Event::Text(b"").is_control());
    }
}
