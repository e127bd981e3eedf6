//! Small formatting helpers shared by the event `Debug` impls.

use std::fmt;

/// Writes `bytes` as a quoted string, keeping printable ASCII as-is and
/// rendering everything else as an escape or a hex byte. Used by `Debug`
/// impls so that assertion failures stay readable for binary payloads.
pub(crate) fn write_byte_string(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("\"")?;
    for &b in bytes {
        match b {
            b'"' => f.write_str("\\\"")?,
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            0x20..=0x7E => write!(f, "{}", b as char)?,
            _ => write!(f, "\\x{:02X}", b)?,
        }
    }
    f.write_str("\"")
}
