//! Append-only input buffer with a read cursor and delayed compaction.

use log::trace;

/// Compaction does not run before this many bytes have been consumed.
const COMPACT_MIN_CONSUMED: usize = 4096;

/// Holds unconsumed input bytes between `feed` and construct commits.
///
/// The buffer tracks two positions: a cursor into the backing storage and
/// an absolute offset counting every byte consumed since construction or
/// the last [`reset`](InputBuffer::reset). The absolute offset is what
/// error events report; it is monotonic and unaffected by compaction.
///
/// Compaction is deliberately lazy: the consumed prefix is only dropped
/// once it is at least [`COMPACT_MIN_CONSUMED`] bytes *and* larger than
/// the unconsumed suffix, which amortizes the copy while keeping
/// steady-state occupancy proportional to the largest unresolved
/// construct rather than to the stream length.
#[derive(Debug, Default)]
pub(crate) struct InputBuffer {
    data: Vec<u8>,
    /// Cursor into `data`; everything before it is consumed.
    head: usize,
    /// Bytes consumed since construction or the last reset.
    consumed: u64,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk, compacting first if the trigger is met.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.compact();
        self.data.extend_from_slice(bytes);
    }

    /// The unconsumed suffix, starting at the cursor.
    #[inline]
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.head..]
    }

    /// Advances the cursor and the absolute offset by `n` bytes.
    #[inline]
    pub fn consume(&mut self, n: usize) {
        debug_assert!(self.head + n <= self.data.len());
        self.head += n;
        self.consumed += n as u64;
    }

    /// Absolute offset of the cursor: total bytes consumed so far.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.consumed
    }

    /// Moves the unconsumed suffix to the front of the backing storage
    /// when the consumed prefix dominates it.
    pub fn compact(&mut self) {
        if self.head >= COMPACT_MIN_CONSUMED && self.head > self.data.len() - self.head {
            let len = self.data.len();
            self.data.copy_within(self.head..len, 0);
            self.data.truncate(len - self.head);
            trace!("compacted input buffer, dropped {} consumed bytes", self.head);
            self.head = 0;
        }
    }

    /// Returns to the initial state, retaining storage capacity.
    pub fn reset(&mut self) {
        self.data.clear();
        self.head = 0;
        self.consumed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn feed_and_consume() {
        let mut buffer = InputBuffer::new();
        buffer.feed(b"hello");
        assert_eq!(buffer.remaining(), b"hello");
        buffer.consume(2);
        assert_eq!(buffer.remaining(), b"llo");
        assert_eq!(buffer.offset(), 2);
        buffer.feed(b" world");
        assert_eq!(buffer.remaining(), b"llo world");
    }

    #[test]
    fn compaction_needs_minimum_consumed() {
        let mut buffer = InputBuffer::new();
        buffer.feed(&[b'x'; 100]);
        buffer.consume(90);
        buffer.compact();
        // 90 < 4096: nothing moved.
        assert_eq!(buffer.data.len(), 100);
        assert_eq!(buffer.head, 90);
    }

    #[test]
    fn compaction_needs_dominant_prefix() {
        let mut buffer = InputBuffer::new();
        buffer.feed(&[b'x'; 16384]);
        buffer.consume(5000);
        // 5000 consumed < 11384 remaining: not yet.
        buffer.compact();
        assert_eq!(buffer.head, 5000);
        buffer.consume(5000);
        buffer.compact();
        assert_eq!(buffer.head, 0);
        assert_eq!(buffer.data.len(), 6384);
        // Absolute offset is unaffected by the move.
        assert_eq!(buffer.offset(), 10000);
    }

    #[test]
    fn offsets_survive_compaction_on_feed() {
        let mut buffer = InputBuffer::new();
        buffer.feed(&[b'a'; 8192]);
        buffer.consume(8000);
        buffer.feed(b"tail");
        assert_eq!(buffer.head, 0);
        assert_eq!(buffer.offset(), 8000);
        let mut expected = vec![b'a'; 192];
        expected.extend_from_slice(b"tail");
        assert_eq!(buffer.remaining(), &expected[..]);
    }

    #[test]
    fn reset_clears_positions() {
        let mut buffer = InputBuffer::new();
        buffer.feed(b"abc");
        buffer.consume(3);
        buffer.reset();
        assert_eq!(buffer.remaining(), b"");
        assert_eq!(buffer.offset(), 0);
    }
}
