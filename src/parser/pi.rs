//! Terminator search for processing instructions.

use memchr::memchr_iter;

/// Finds the first `?>` in `interior` and returns the length of the
/// instruction content before it, or `None` when the terminator has not
/// been buffered yet.
///
/// `interior` starts right after the `<?` opener, so `<??>` yields
/// `Some(0)` and a lone `>` stays part of the content.
pub(super) fn search(interior: &[u8]) -> Option<usize> {
    for i in memchr_iter(b'>', interior) {
        if i > 0 && interior[i - 1] == b'?' {
            return Some(i - 1);
        }
    }
    None
}
