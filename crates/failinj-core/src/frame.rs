//! Frame-label formatting.
//!
//! Both consumers of the stack walk go through these helpers so they can
//! never drift apart: the fingerprint fold hashes exactly the label text,
//! and the ledger backtrace strings are the same labels indented one per
//! line.

use std::fmt::Write as _;

/// Literal used for frames whose procedure lookup fails. No offset suffix.
pub const UNKNOWN_FRAME: &str = "unknown";

/// `name+0xoff`, or `unknown` when the symbol could not be resolved.
#[must_use]
pub fn label(name: Option<&str>, offset: u64) -> String {
    match name {
        Some(n) => format!("{n}+{offset:#x}"),
        None => UNKNOWN_FRAME.to_owned(),
    }
}

/// Append one backtrace line (`    name+0xoff\n`) to `out`.
pub fn push_line(out: &mut String, name: Option<&str>, offset: u64) {
    // Infallible for String; the unwrap-free form keeps the signature tidy.
    let _ = writeln!(out, "    {}", label(name, offset));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_formats_lowercase_hex() {
        assert_eq!(label(Some("main"), 0x1f), "main+0x1f");
        assert_eq!(label(Some("_IO_fflush"), 0), "_IO_fflush+0x0");
    }

    #[test]
    fn unresolved_frame_has_no_offset() {
        assert_eq!(label(None, 0xdead), "unknown");
    }

    #[test]
    fn backtrace_lines_are_indented() {
        let mut bt = String::new();
        push_line(&mut bt, Some("fopen"), 0x24);
        push_line(&mut bt, None, 0);
        assert_eq!(bt, "    fopen+0x24\n    unknown\n");
    }
}
