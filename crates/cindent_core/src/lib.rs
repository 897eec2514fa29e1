//! Provide the canonical C-family vocabulary used by the cindent heuristics.
//!
//! This crate is intentionally small and dependency-free. It records which words the indentation engine treats
//! specially (block openers, labels, scope declarations, declaration prefixes) and how a word is recognised at the
//! start of a piece of line text.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no engine types.
//! - Lookups work on raw bytes because the engine scans lines byte by byte.

pub mod keywords;

pub use keywords::{KeywordCategory, KeywordId};

/// Whether `b` may appear inside an identifier.
///
/// ASCII alphanumerics and `_` qualify, as do all bytes of multi-byte UTF-8 sequences so that non-ASCII
/// identifiers are never split in the middle.
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Whether `text` starts with `word` followed by a non-identifier byte (or the end of the text).
///
/// ## Examples
/// ```rust
/// use cindent_core::starts_with_word;
///
/// assert!(starts_with_word(b"if (x)", b"if"));
/// assert!(!starts_with_word(b"ifdef", b"if"));
/// ```
pub fn starts_with_word(text: &[u8], word: &[u8]) -> bool {
    text.starts_with(word) && !text.get(word.len()).is_some_and(|&b| is_ident_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_bytes() {
        assert!(is_ident_byte(b'a'));
        assert!(is_ident_byte(b'_'));
        assert!(is_ident_byte(b'9'));
        assert!(!is_ident_byte(b' '));
        assert!(!is_ident_byte(b':'));
    }

    #[test]
    fn test_starts_with_word_at_end_of_text() {
        assert!(starts_with_word(b"else", b"else"));
        assert!(!starts_with_word(b"elsewhere", b"else"));
        assert!(!starts_with_word(b"els", b"else"));
    }
}
