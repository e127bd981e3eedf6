//! Arena storage for event payloads.
//!
//! Every byte slice inside an [`Event`](crate::events::Event) is copied
//! out of the transient input buffer into an [`Arena`] before emission,
//! because the input buffer compacts itself and would invalidate spans.
//! The arena is owned by the caller and borrowed by the parser, so the
//! lifetime contract (events are valid until the arena is reset or
//! dropped) is enforced by the compiler rather than by documentation.

use bumpalo::Bump;

/// Bulk allocator with bulk reclamation.
///
/// Reclamation is coarse on purpose: [`reset`](Arena::reset) frees every
/// payload at once while keeping the largest internal chunk, so parsing
/// one document after another settles into a steady state with no
/// per-event allocator traffic.
///
/// ```
/// use trickle_xml::{Arena, Parser};
///
/// let mut arena = Arena::new();
/// {
///     let mut parser = Parser::new(&arena);
///     parser.feed(b"<doc/>");
///     parser.finish();
///     // ... drain events ...
/// }
/// // All events and the parser are gone; storage can be reused.
/// arena.reset();
/// ```
#[derive(Default)]
pub struct Arena {
    bump: Bump,
}

impl Arena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Copies `bytes` into the arena and returns the copy.
    ///
    /// The copy lives as long as the arena itself; the borrow checker
    /// prevents [`reset`](Arena::reset) while any copy is still held.
    pub fn dupe<'a>(&'a self, bytes: &[u8]) -> &'a [u8] {
        self.bump.alloc_slice_copy(bytes)
    }

    /// Frees all payloads at once, retaining capacity for reuse.
    pub fn reset(&mut self) {
        self.bump.reset();
    }

    /// Total bytes currently allocated from the backing chunks.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}
