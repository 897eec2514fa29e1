//! Pairing `else` with `if` and `while` with `do`

use cindent_core::keywords::{self, KeywordId};

use super::buffer::{LineSource, Pos};
use super::context::Indenter;

/// What the matcher pairs the current line with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pairing {
    /// An `else` looking for its `if`.
    If,
    /// A `while (...);` looking for its `do`.
    Do,
}

impl<S: LineSource + ?Sized> Indenter<'_, S> {
    /// Walk up from `from` to the `if` or `do` that belongs to it, staying inside the block that starts on
    /// line `scope` (0 for file scope).
    ///
    /// Constructs in nested blocks are skipped. Every bare `else` met on the way needs one more `if`, and every
    /// `while` of a `do` one more `do`.
    pub(crate) fn match_conditional(&self, pairing: Pairing, scope: usize, from: usize) -> Option<usize> {
        let lx = self.lexer;
        let (mut elselevel, mut whilelevel) = match pairing {
            Pairing::If => (1i32, 0i32),
            Pairing::Do => (0, 1),
        };

        let mut lnum = from;
        while lnum > scope + 1 {
            lnum -= 1;
            let line = self.text(lnum);
            let look = &line[lx.code_start(line).min(line.len())..];
            let is_else = lx.is_else_keyword(look);
            let is_if = lx.is_if_keyword(look);
            let is_do = lx.is_do_keyword(look);
            let is_while = !is_else && !is_if && !is_do && self.is_while_of_do(look, lnum);
            if !(is_else || is_if || is_do || is_while) {
                continue;
            }

            // file scope counts as line 0
            let theirs = self.find_start_brace(Pos::line_start(lnum)).map_or(0, |b| b.lnum);
            if theirs < scope {
                tracing::trace!(line = lnum, "left the scope while pairing");
                return None;
            }
            if theirs > scope {
                continue;
            }

            if is_else {
                let mut i = if look.first() == Some(&b'}') { lx.skip_comment(look, 1) } else { 0 };
                i = lx.skip_comment(look, i + keywords::as_str(KeywordId::Else).len());
                if !lx.is_if_keyword(&look[i.min(look.len())..]) {
                    elselevel += 1;
                }
                continue;
            }
            if is_while {
                whilelevel += 1;
                continue;
            }
            if is_if {
                elselevel -= 1;
                if elselevel == 0 && pairing == Pairing::If {
                    whilelevel = 0;
                }
            }
            if is_do {
                whilelevel -= 1;
            }
            if elselevel <= 0 && whilelevel <= 0 {
                return Some(lnum);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::Pairing;
    use crate::indent::buffer::TextBuffer;
    use crate::indent::comments::CommentLeaders;
    use crate::indent::config::StyleConfig;
    use crate::indent::context::Indenter;

    fn pair(text: &str, pairing: Pairing, scope: usize, from: usize) -> Option<usize> {
        let buf = TextBuffer::from_text(text);
        let cfg = StyleConfig::defaults(4, 8);
        let leaders = CommentLeaders::default();
        Indenter::new(&buf, &cfg, &leaders).match_conditional(pairing, scope, from)
    }

    const NESTED: &str = "\
{
    if (a)
        if (b)
            x;
        else
            y;
    else
        z;
}";

    // ========================================
    // else -> if
    // ========================================

    #[test]
    fn test_simple_else() {
        assert_eq!(pair("{\n  if (c)\n    x;\n  else\n    y;\n}", Pairing::If, 1, 4), Some(2));
    }

    #[test]
    fn test_inner_else_pairs_with_inner_if() {
        assert_eq!(pair(NESTED, Pairing::If, 1, 5), Some(3));
    }

    #[test]
    fn test_outer_else_skips_nested_pair() {
        assert_eq!(pair(NESTED, Pairing::If, 1, 7), Some(2));
    }

    #[test]
    fn test_else_if_chain() {
        // "} else if" lines sit inside the block they close
        let text = "{\n  if (a) {\n  } else if (b) {\n  }\n  else\n}";
        assert_eq!(pair(text, Pairing::If, 1, 5), Some(2));
    }

    #[test]
    fn test_if_in_nested_block_ignored() {
        let text = "{\n  if (a) {\n    if (b)\n      x;\n  }\n  else\n}";
        assert_eq!(pair(text, Pairing::If, 1, 6), Some(2));
    }

    #[test]
    fn test_file_scope_else() {
        assert_eq!(pair("if (c)\n  x;\nelse\n  y;", Pairing::If, 0, 3), Some(1));
    }

    #[test]
    fn test_no_if_in_scope() {
        assert_eq!(pair("{\n  x;\n  else\n}", Pairing::If, 1, 3), None);
    }

    // ========================================
    // while -> do
    // ========================================

    #[test]
    fn test_while_pairs_with_do() {
        assert_eq!(pair("{\n  do\n    x;\n  while (c);\n}", Pairing::Do, 1, 4), Some(2));
    }

    #[test]
    fn test_while_skips_nested_do() {
        let text = "{\n  do\n    do\n      x;\n    while (a);\n  while (b);\n}";
        assert_eq!(pair(text, Pairing::Do, 1, 6), Some(2));
    }
}
