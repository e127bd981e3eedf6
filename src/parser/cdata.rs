//! Terminator search for CDATA sections.

use memchr::memchr_iter;

/// Finds the first `]]>` in `interior` and returns the length of the
/// character data before it, or `None` when the terminator has not been
/// buffered yet.
///
/// `interior` starts right after the `<![CDATA[` opener. A body ending
/// in braces (`<![CDATA[a]]]>`) resolves the same way as comments: the
/// first `]]>` terminates, braces before it belong to the body.
pub(super) fn search(interior: &[u8]) -> Option<usize> {
    for i in memchr_iter(b'>', interior) {
        if interior[..i].ends_with(b"]]") {
            return Some(i - 2);
        }
    }
    None
}
