//! Structural locator
//!
//! Finds the constructs that enclose a position: the unmatched `(` or `{`, the start of the block comment
//! the position is in, and the `//` comment a line continues. Matches that turn out to be inside a comment or
//! string literal are discarded and the search is retried from the comment start with whatever search bound
//! remains.

use super::buffer::{LineSource, Pos, at, find_match};
use super::context::Indenter;
use super::predicates::{is_line_comment, is_pos_in_string, line_comment_col, skip_to_pos, skip_white};

impl<S: LineSource + ?Sized> Indenter<'_, S> {
    /// Backward scan for the `/*` of an unterminated block comment around `from`.
    ///
    /// The byte at `from` is not examined. `max_lines` of 0 means unlimited. A `*/` found first ends the
    /// search unless a `/*` was already seen after it.
    fn comment_opener_before(&self, from: Pos, max_lines: usize) -> Option<Pos> {
        let mut pos = from;
        let mut line = self.text(pos.lnum);
        let mut comment_col = line_comment_col(line).unwrap_or(usize::MAX);
        let mut travelled = 0;
        let mut opener = None;

        loop {
            if pos.col == 0 {
                if pos.lnum <= 1 {
                    break;
                }
                pos.lnum -= 1;
                travelled += 1;
                if max_lines > 0 && travelled > max_lines {
                    break;
                }
                line = self.text(pos.lnum);
                pos.col = line.len();
                comment_col = line_comment_col(line).unwrap_or(usize::MAX);
            } else {
                pos.col -= 1;
            }
            if pos.col == 0 {
                continue;
            }

            let (prev, cur) = (line[pos.col - 1], at(line, pos.col));
            if prev == b'/' && cur == b'*' && (pos.col == 1 || line[pos.col - 2] != b'*') && pos.col < comment_col {
                opener = Some(Pos::new(pos.lnum, pos.col - 1));
            } else if prev == b'*' && cur == b'/' {
                if opener.is_some() {
                    return opener;
                }
                // "/*/" opens a comment
                if pos.col > 1 && line[pos.col - 2] == b'/' && pos.col <= comment_col {
                    return Some(Pos::new(pos.lnum, pos.col - 2));
                }
                return None;
            }
        }
        opener
    }

    /// Start of the block comment that `from` is inside, searching at most `max_lines` back.
    ///
    /// An opener that sits inside a string literal is ignored and the search is retried below it.
    pub(crate) fn find_comment_start(&self, from: Pos, max_lines: usize) -> Option<Pos> {
        let mut bound = max_lines;
        loop {
            let pos = self.comment_opener_before(from, bound)?;
            if !is_pos_in_string(self.text(pos.lnum), pos.col) {
                return Some(pos);
            }
            let remaining = from.lnum.saturating_sub(pos.lnum + 1);
            if remaining == 0 {
                return None;
            }
            tracing::trace!(line = pos.lnum, "comment opener inside string, retrying");
            bound = remaining;
        }
    }

    /// The enclosing block comment's start as seen from the beginning of line `lnum`.
    pub(crate) fn comment_start_above(&self, lnum: usize) -> Option<Pos> {
        self.find_comment_start(Pos::line_start(lnum), self.cfg.comment_bound())
    }

    /// Unmatched `open` before `from`, within `max_lines`, that is live code.
    pub(crate) fn find_match_char(&self, open: u8, from: Pos, max_lines: i32) -> Option<Pos> {
        let origin = from.lnum;
        let mut cursor = from;
        let mut bound = max_lines;
        loop {
            let found = find_match(self.src, cursor, open, bound.max(0) as usize, false)?;
            let line = self.text(found.lnum);
            if skip_to_pos(self.lexer, line, found.col) > found.col {
                // inside a comment on its own line
                bound = max_lines - (origin - found.lnum) as i32;
                if bound <= 0 {
                    return None;
                }
                cursor = Pos::line_start(found.lnum);
                continue;
            }
            match self.find_comment_start(found, self.cfg.comment_bound()) {
                None => return Some(found),
                Some(start) => {
                    bound = max_lines - (origin - start.lnum) as i32;
                    if bound <= 0 {
                        return None;
                    }
                    cursor = start;
                }
            }
        }
    }

    /// Unmatched `(` above `from`.
    pub(crate) fn find_match_paren(&self, from: Pos, max_lines: i32) -> Option<Pos> {
        self.find_match_char(b'(', from, max_lines)
    }

    /// Unmatched `(` above `from`, unless an unmatched `{` is closer.
    pub(crate) fn find_match_paren_after_brace(&self, from: Pos, max_lines: i32) -> Option<Pos> {
        let paren = self.find_match_paren(from, max_lines)?;
        match self.find_start_brace(from) {
            Some(brace) if paren < brace => None,
            _ => Some(paren),
        }
    }

    /// The `{` of the block containing `from`.
    ///
    /// The search is unbounded but stops at a `{` or `}` in column 0. Braces inside comments are skipped.
    pub(crate) fn find_start_brace(&self, from: Pos) -> Option<Pos> {
        let mut cursor = from;
        loop {
            let found = find_match(self.src, cursor, b'{', 0, true)?;
            let line = self.text(found.lnum);
            let in_line_comment = skip_to_pos(self.lexer, line, found.col) != found.col;
            let comment = if in_line_comment {
                None
            } else {
                self.find_comment_start(found, self.cfg.comment_bound())
            };
            if !in_line_comment && comment.is_none() {
                return Some(found);
            }
            cursor = comment.unwrap_or(found);
        }
    }

    /// The search bound for parentheses at `lnum`, widened when the scan has already moved up from `origin`.
    pub(crate) fn corrected_max_paren(&self, origin: usize, lnum: usize) -> i32 {
        let max = self.cfg.max_paren;
        let n = origin as i64 - lnum as i64;
        if n > 0 && n < i64::from(max / 2) {
            max - n as i32
        } else {
            max
        }
    }

    /// The `//` comment on a line directly above `lnum` (blank lines excluded) that `lnum` continues.
    pub(crate) fn find_line_comment(&self, lnum: usize) -> Option<Pos> {
        let mut l = lnum;
        while l > 1 {
            l -= 1;
            let line = self.text(l);
            let p = skip_white(line, 0);
            if is_line_comment(line, p) {
                return Some(Pos::new(l, p));
            }
            if at(line, p) != 0 {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::indent::buffer::{Pos, TextBuffer};
    use crate::indent::comments::CommentLeaders;
    use crate::indent::config::StyleConfig;
    use crate::indent::context::Indenter;

    fn check<R>(text: &str, f: impl FnOnce(&Indenter<'_, TextBuffer>) -> R) -> R {
        let buf = TextBuffer::from_text(text);
        let cfg = StyleConfig::defaults(4, 8);
        let leaders = CommentLeaders::default();
        let ind = Indenter::new(&buf, &cfg, &leaders);
        f(&ind)
    }

    // ========================================
    // Comment starts
    // ========================================

    #[test]
    fn test_comment_start_found() {
        let found = check("x;\n  /* one\n   two\n   three", |ind| ind.comment_start_above(4));
        assert_eq!(found, Some(Pos::new(2, 2)));
    }

    #[test]
    fn test_closed_comment_is_not_open() {
        let found = check("/* one */\nx;\ny;", |ind| ind.comment_start_above(3));
        assert_eq!(found, None);
    }

    #[test]
    fn test_comment_reopened_after_close() {
        let found = check("/* a */ x; /* b\n c", |ind| ind.comment_start_above(2));
        assert_eq!(found, Some(Pos::new(1, 11)));
    }

    #[test]
    fn test_comment_opener_in_string_ignored() {
        let found = check("s = \"/*\";\nx;", |ind| ind.comment_start_above(2));
        assert_eq!(found, None);
    }

    #[test]
    fn test_comment_opener_after_line_comment_ignored() {
        let found = check("x; // /* no\ny;", |ind| ind.comment_start_above(2));
        assert_eq!(found, None);
    }

    // ========================================
    // Bracket searches
    // ========================================

    #[test]
    fn test_paren_in_comment_skipped() {
        let found = check("foo(a,\n  /* ( */ b,\n  c", |ind| ind.find_match_paren(Pos::line_start(3), 20));
        assert_eq!(found, Some(Pos::new(1, 3)));
    }

    #[test]
    fn test_paren_bound() {
        let found = check("foo(\n\n\n\nx", |ind| ind.find_match_paren(Pos::line_start(5), 2));
        assert_eq!(found, None);
    }

    #[test]
    fn test_start_brace() {
        let found = check("void f()\n{\n  if (x) {\n  }\n  y;", |ind| ind.find_start_brace(Pos::line_start(5)));
        assert_eq!(found, Some(Pos::new(2, 0)));
    }

    #[test]
    fn test_start_brace_in_comment_skipped() {
        let found = check("  {\n  /* { */\n  x;", |ind| ind.find_start_brace(Pos::line_start(3)));
        assert_eq!(found, Some(Pos::new(1, 2)));
    }

    #[test]
    fn test_paren_after_brace_prefers_closer_brace() {
        let found = check("f(a, {\n  x", |ind| ind.find_match_paren_after_brace(Pos::line_start(2), 20));
        assert_eq!(found, None);
        let found = check("{ f(a,\n  x", |ind| ind.find_match_paren_after_brace(Pos::line_start(2), 20));
        assert_eq!(found, Some(Pos::new(1, 3)));
    }

    #[test]
    fn test_corrected_max_paren() {
        check("", |ind| {
            assert_eq!(ind.corrected_max_paren(10, 7), 17);
            assert_eq!(ind.corrected_max_paren(10, 10), 20);
            assert_eq!(ind.corrected_max_paren(30, 10), 20);
        });
    }

    #[test]
    fn test_line_comment_chain() {
        check("x;\n  // a\n\n  // b", |ind| {
            assert_eq!(ind.find_line_comment(3), Some(Pos::new(2, 2)));
            assert_eq!(ind.find_line_comment(2), None);
        });
    }
}
