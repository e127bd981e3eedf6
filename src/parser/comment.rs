//! Terminator search for XML comments.

use memchr::memchr_iter;

/// Finds the first `-->` in `interior` and returns the length of the
/// comment body before it, or `None` when the terminator has not been
/// buffered yet.
///
/// `interior` starts right after the `<!--` opener, so a comment whose
/// body itself ends in dashes (`<!----->`) is handled by the plain
/// suffix check: the terminator is the *first* `-->`, dashes before it
/// belong to the body.
pub(super) fn search(interior: &[u8]) -> Option<usize> {
    for i in memchr_iter(b'>', interior) {
        if interior[..i].ends_with(b"--") {
            return Some(i - 2);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn terminator_positions() {
        assert_eq!(search(b""), None); // <!--|
        assert_eq!(search(b"-"), None); // <!--|-
        assert_eq!(search(b"--"), None); // <!--|--
        assert_eq!(search(b"-->"), Some(0)); // <!--|-->
        assert_eq!(search(b"x-->"), Some(1));
        assert_eq!(search(b"--->"), Some(1)); // body is "-"
        assert_eq!(search(b"---->"), Some(2)); // body is "--"
        assert_eq!(search(b"a > b --> tail"), Some(6));
        assert_eq!(search(b"a -> b"), None);
    }

    #[test]
    fn first_terminator_wins() {
        assert_eq!(search(b"one--> two-->"), Some(3));
    }
}
