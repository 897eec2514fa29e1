//! Read-only line access and bounded bracket matching
//!
//! The engine never sees an editor's text storage directly. It reads lines through [`LineSource`] and finds
//! matching brackets with [`find_match`], whose search is limited to a number of lines.

/// Read-only access to the lines of a buffer.
///
/// Line numbers are 1-based. Asking for line 0 or a line past the end yields an empty line.
pub trait LineSource {
    /// Number of lines in the buffer.
    fn line_count(&self) -> usize;

    /// Text of line `lnum` without its line terminator.
    fn line(&self, lnum: usize) -> &str;
}

/// A buffer that owns its lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl TextBuffer {
    /// Split `text` into lines. A trailing newline does not add an empty last line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Build a buffer from already split lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Replace the text of line `lnum`. Out-of-range line numbers are ignored.
    pub fn set_line(&mut self, lnum: usize, text: String) {
        if let Some(line) = lnum.checked_sub(1).and_then(|i| self.lines.get_mut(i)) {
            *line = text;
        }
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Join the lines back into text, terminating every line with `\n`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl LineSource for TextBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, lnum: usize) -> &str {
        lnum.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl LineSource for [&str] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, lnum: usize) -> &str {
        lnum.checked_sub(1).and_then(|i| self.get(i)).copied().unwrap_or("")
    }
}

/// A position in a buffer: 1-based line number and 0-based byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub lnum: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(lnum: usize, col: usize) -> Self {
        Self { lnum, col }
    }

    /// The start of line `lnum`.
    pub const fn line_start(lnum: usize) -> Self {
        Self { lnum, col: 0 }
    }
}

/// Byte at `i`, or 0 past the end of `b`.
#[inline]
pub(crate) fn at(b: &[u8], i: usize) -> u8 {
    b.get(i).copied().unwrap_or(0)
}

/// Screen column of byte `byte` in `line`, expanding tabs to `tabstop`.
pub fn virtual_col(line: &str, byte: usize, tabstop: usize) -> usize {
    let ts = tabstop.max(1);
    let end = byte.min(line.len());
    let mut col = 0;
    for (i, ch) in line.char_indices() {
        if i >= end {
            break;
        }
        if ch == '\t' {
            col += ts - col % ts;
        } else {
            col += 1;
        }
    }
    col
}

/// Width of the leading whitespace of `line`, in screen columns.
pub fn indent_of(line: &str, tabstop: usize) -> usize {
    let ws = line.len() - line.trim_start_matches([' ', '\t']).len();
    virtual_col(line, ws, tabstop)
}

/// Per-byte flags telling which bytes of `line` are code that bracket matching may count.
///
/// String and character literals and everything after a `//` comment are excluded. Block comments are not:
/// callers verify that a match is not inside one.
fn code_mask(line: &[u8]) -> Vec<bool> {
    let mut mask = vec![true; line.len()];
    let mut i = 0;
    while i < line.len() {
        match line[i] {
            b'/' if at(line, i + 1) == b'/' => {
                mask[i..].iter_mut().for_each(|m| *m = false);
                break;
            }
            b'"' => {
                let start = i;
                i += 1;
                while i < line.len() && line[i] != b'"' {
                    if line[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                let end = (i + 1).min(line.len());
                mask[start..end].iter_mut().for_each(|m| *m = false);
                i = end;
            }
            b'\'' => {
                // 'c', '\n' and '\000'
                let mut j = i + 2;
                if at(line, i + 1) == b'\\' && at(line, i + 2) != 0 {
                    j += 1;
                    while at(line, j - 1).is_ascii_digit() {
                        j += 1;
                    }
                }
                if at(line, i + 1) != 0 && at(line, j - 1) != 0 && at(line, j) == b'\'' {
                    mask[i..=j].iter_mut().for_each(|m| *m = false);
                    i = j + 1;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    mask
}

fn partner(c: u8) -> Option<(u8, bool)> {
    // (partner, search backward)
    match c {
        b'(' => Some((b')', true)),
        b'{' => Some((b'}', true)),
        b'[' => Some((b']', true)),
        b')' => Some((b'(', false)),
        b'}' => Some((b'{', false)),
        b']' => Some((b'[', false)),
        _ => None,
    }
}

/// Find the bracket `target` that is unmatched as seen from `from`.
///
/// An opening bracket is searched backward, a closing one forward. The byte at `from` itself is not
/// examined. `max_lines` limits how many line boundaries the search may cross; 0 means unlimited. With
/// `block_stop`, a `{` or `}` in column 0 ends a backward search: it is the match if it is the wanted `{`
/// and nothing is pending, otherwise the search fails.
pub fn find_match<S: LineSource + ?Sized>(
    src: &S,
    from: Pos,
    target: u8,
    max_lines: usize,
    block_stop: bool,
) -> Option<Pos> {
    let (other, backward) = partner(target)?;
    if from.lnum == 0 || from.lnum > src.line_count() {
        return None;
    }

    let mut pos = from;
    let mut line = src.line(pos.lnum).as_bytes();
    let mut mask = code_mask(line);
    let mut travelled = 0;
    let mut depth = 0usize;

    loop {
        if backward {
            if pos.col == 0 {
                if pos.lnum == 1 {
                    return None;
                }
                pos.lnum -= 1;
                travelled += 1;
                if max_lines > 0 && travelled > max_lines {
                    return None;
                }
                line = src.line(pos.lnum).as_bytes();
                mask = code_mask(line);
                pos.col = line.len();
                continue;
            }
            pos.col -= 1;
            if pos.col == 0 && block_stop && (line.first() == Some(&b'{') || line.first() == Some(&b'}')) {
                if line[0] == target && depth == 0 {
                    return Some(pos);
                }
                return None;
            }
        } else {
            pos.col += 1;
            if pos.col >= line.len() {
                if pos.lnum >= src.line_count() {
                    return None;
                }
                pos.lnum += 1;
                travelled += 1;
                if max_lines > 0 && travelled > max_lines {
                    return None;
                }
                line = src.line(pos.lnum).as_bytes();
                mask = code_mask(line);
                pos.col = 0;
            }
        }

        if pos.col >= line.len() || !mask[pos.col] {
            continue;
        }
        let c = line[pos.col];
        if c == other {
            depth += 1;
        } else if c == target {
            if depth == 0 {
                return Some(pos);
            }
            depth -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(text: &str) -> TextBuffer {
        TextBuffer::from_text(text)
    }

    // ========================================
    // TextBuffer tests
    // ========================================

    #[test]
    fn test_line_out_of_range_is_empty() {
        let b = buf("a\nb\n");
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0), "");
        assert_eq!(b.line(2), "b");
        assert_eq!(b.line(3), "");
    }

    #[test]
    fn test_set_line_and_to_text() {
        let mut b = buf("a\nb");
        b.set_line(2, "  b".to_string());
        b.set_line(9, "ignored".to_string());
        assert_eq!(b.to_text(), "a\n  b\n");
    }

    #[test]
    fn test_from_lines_matches_from_text() {
        assert_eq!(TextBuffer::from_lines(["a", "  b"]), buf("a\n  b\n"));
    }

    // ========================================
    // Column helpers
    // ========================================

    #[test]
    fn test_virtual_col_expands_tabs() {
        assert_eq!(virtual_col("\tx", 1, 8), 8);
        assert_eq!(virtual_col("ab\tx", 3, 4), 4);
        assert_eq!(virtual_col("abc", 10, 8), 3);
    }

    #[test]
    fn test_indent_of() {
        assert_eq!(indent_of("    x", 8), 4);
        assert_eq!(indent_of("\t  x", 8), 10);
        assert_eq!(indent_of("", 8), 0);
    }

    // ========================================
    // Bracket matching
    // ========================================

    #[test]
    fn test_find_open_paren_backward() {
        let b = buf("foo(a,\n    b");
        assert_eq!(find_match(&b, Pos::line_start(2), b'(', 0, false), Some(Pos::new(1, 3)));
    }

    #[test]
    fn test_find_skips_balanced_pairs() {
        let b = buf("f(g(x), (y)\n  z");
        assert_eq!(find_match(&b, Pos::line_start(2), b'(', 0, false), Some(Pos::new(1, 1)));
    }

    #[test]
    fn test_find_ignores_strings_and_line_comments() {
        let b = buf("f(\"(\", ')', // (\n  z");
        assert_eq!(find_match(&b, Pos::line_start(2), b'(', 0, false), Some(Pos::new(1, 1)));
    }

    #[test]
    fn test_find_close_paren_forward() {
        let b = buf("while (a &&\n   b);");
        assert_eq!(find_match(&b, Pos::new(1, 6), b')', 0, false), Some(Pos::new(2, 4)));
    }

    #[test]
    fn test_find_respects_line_limit() {
        let b = buf("(\n\n\n\nx");
        assert_eq!(find_match(&b, Pos::line_start(5), b'(', 2, false), None);
        assert_eq!(find_match(&b, Pos::line_start(5), b'(', 4, false), Some(Pos::new(1, 0)));
    }

    #[test]
    fn test_block_stop_at_column_zero() {
        let b = buf("{\n}\nx");
        assert_eq!(find_match(&b, Pos::line_start(3), b'{', 0, true), None);
        let b = buf("{\n  x");
        assert_eq!(find_match(&b, Pos::line_start(2), b'{', 0, true), Some(Pos::new(1, 0)));
    }
}
