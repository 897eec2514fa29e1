//! Predicates that look beyond a single line
//!
//! These need the lines around the one being classified: whether a `name:` is really a jump label depends on
//! the line before it, whether `while (x);` closes a `do` depends on where its parenthesis closes, and so on.

use cindent_core::keywords::{self, KeywordId};
use cindent_core::{is_ident_byte, starts_with_word};

use super::buffer::{LineSource, Pos, at, find_match};
use super::context::Indenter;
use super::predicates::{ends_in_backslash, is_comment, is_preprocessor_line, skip_string, skip_white};

/// Memo of the most recent C++ base-class lookup, valid for one indent computation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BaseclassCache {
    /// First line of the statement the lookup examined; `usize::MAX` when empty.
    start: usize,
    found: bool,
    /// Byte column to line up with, or 0 to use the statement's indent.
    pub col: usize,
}

impl Default for BaseclassCache {
    fn default() -> Self {
        Self {
            start: usize::MAX,
            found: false,
            col: 0,
        }
    }
}

impl<S: LineSource + ?Sized> Indenter<'_, S> {
    /// Whether line `lnum` is a `goto` target.
    ///
    /// `default:` and scope declarations are not. A `name:` only counts when the closest code line above is
    /// terminated or is itself a label, which rules out the tail of a `?:` expression.
    pub(crate) fn is_jump_label(&self, lnum: usize) -> bool {
        let lx = self.lexer;
        let line = self.text(lnum);
        let s = &line[lx.code_start(line).min(line.len())..];
        if lx.is_default_label(s) || lx.is_scope_decl_label(s) || lx.label_end(s).is_none() {
            return false;
        }

        let mut l = lnum;
        while l > 1 {
            l -= 1;
            if let Some(start) = self.comment_start_above(l) {
                l = start.lnum;
            }
            let text = self.text(l);
            if is_preprocessor_line(text) {
                continue;
            }
            let code = &text[lx.code_start(text).min(text.len())..];
            if code.is_empty() {
                continue;
            }
            return lx.classify_terminator(code, true, false).is_some()
                || lx.is_scope_decl_label(code)
                || lx.is_case_label(code, true)
                || lx
                    .label_end(code)
                    .is_some_and(|end| lx.no_code(code, end));
        }
        true
    }

    /// Whether `lnum` is a `case`, scope declaration or jump label.
    pub(crate) fn is_any_label(&self, lnum: usize) -> bool {
        let line = self.text(lnum);
        self.lexer.is_case_label(line, false) || self.lexer.is_scope_decl_label(line) || self.is_jump_label(lnum)
    }

    /// If `lnum` is part of a preprocessor directive (possibly continued with backslashes), the line of the `#`.
    ///
    /// The second value is the indent of `lnum` when it ends in a backslash itself.
    pub(crate) fn preprocessor_continuation(&self, lnum: usize) -> Option<(usize, Option<i32>)> {
        let first = self.text(lnum);
        let candidate = ends_in_backslash(first).then(|| self.indent(lnum));

        let mut l = lnum;
        let mut line = first;
        loop {
            if is_preprocessor_line(line) {
                return Some((l, candidate));
            }
            if l <= 1 {
                return None;
            }
            l -= 1;
            line = self.text(l);
            if !ends_in_backslash(line) {
                return None;
            }
        }
    }

    /// Whether the statement containing `first_lnum` is a function declaration header.
    ///
    /// `text` is the code examined on `first_lnum`. When the line closes a parenthesis opened further up, the
    /// opening line is checked instead, unless it lies above `min_lnum`. Argument lists continued over lines
    /// must keep a `,` at the end of a line or a `,`/`)` at the start of the next.
    pub(crate) fn is_function_declaration(&self, text: &[u8], first_lnum: usize, min_lnum: usize) -> bool {
        let lx = self.lexer;
        let mut lnum = first_lnum;
        let mut s = text;

        if let Some(col) = lx.last_unmatched_close(s, b'(', b')') {
            if let Some(open) = self.find_match_paren(Pos::new(first_lnum, col), self.cfg.max_paren) {
                lnum = open.lnum;
                if lnum < min_lnum {
                    return false;
                }
                s = self.text(lnum);
            }
        }

        if is_preprocessor_line(s) {
            return false;
        }

        let mut i = 0;
        while !matches!(at(s, i), 0 | b'(' | b';' | b'\'' | b'"') {
            if is_comment(s, i) {
                i = lx.skip_comment(s, i);
            } else if at(s, i) == b':' {
                if at(s, i + 1) == b':' {
                    i += 2;
                } else {
                    // A::A(int a) : a(0) is an initializer list
                    return false;
                }
            } else {
                i += 1;
            }
        }
        if at(s, i) != b'(' {
            return false;
        }

        let mut just_started = true;
        while !matches!(at(s, i), 0 | b';' | b'\'' | b'"') {
            let c = at(s, i);
            if c == b')' && lx.no_code(s, i + 1) {
                // "#if defined(x) && \" is not a declaration
                return !ends_in_backslash(self.text(first_lnum.saturating_sub(1)));
            }
            if (c == b',' && lx.no_code(s, i + 1)) || at(s, i + 1) == 0 || lx.no_code(s, i) {
                let comma = c == b',';
                let count = self.line_count();
                loop {
                    if lnum >= count {
                        break;
                    }
                    lnum += 1;
                    s = self.text(lnum);
                    if !is_preprocessor_line(s) {
                        break;
                    }
                }
                if lnum >= count {
                    break;
                }
                i = skip_white(s, 0);
                if !just_started && !comma && at(s, i) != b',' && at(s, i) != b')' {
                    break;
                }
                just_started = false;
            } else if is_comment(s, i) {
                i = lx.skip_comment(s, i);
            } else {
                i += 1;
                just_started = false;
            }
        }
        false
    }

    /// Whether `text` (line `lnum`) is the `while (cond);` that ends a `do` loop.
    pub(crate) fn is_while_of_do(&self, text: &[u8], lnum: usize) -> bool {
        if !self.lexer.starts_with_while(text) {
            return false;
        }
        let line = self.text(lnum);
        let Some(w) = line.iter().position(|&b| b == b'w') else {
            return false;
        };
        let Some(open) = line[w..].iter().position(|b| b"(){}[]".contains(b)).map(|p| p + w) else {
            return false;
        };
        if line[open] != b'(' {
            return false;
        }
        find_match(self.src, Pos::new(lnum, open), b')', self.cfg.paren_bound(), false).is_some_and(|close| {
            let text = self.text(close.lnum);
            at(text, self.lexer.skip_comment(text, close.col + 1)) == b';'
        })
    }

    /// If line `lnum` ends in `);` closing a `while (` opened further up, the line of that `while`.
    pub(crate) fn while_of_do_end(&self, terminated: Option<u8>, lnum: usize) -> Option<usize> {
        if terminated != Some(b';') {
            return None;
        }
        let lx = self.lexer;
        let line = self.text(lnum);
        let mut p = 0;
        while at(line, p) != 0 {
            p = lx.skip_comment(line, p);
            if at(line, p) == b')' {
                let s = skip_white(line, p + 1);
                if at(line, s) == b';' && lx.no_code(line, s + 1) {
                    if let Some(open) = self.find_match_paren(Pos::new(lnum, p), self.cfg.max_paren) {
                        let text = self.text(open.lnum);
                        let mut s = lx.code_start(text);
                        if at(text, s) == b'}' {
                            s = lx.skip_comment(text, s + 1);
                        }
                        if starts_with_word(&text[s.min(text.len())..], keywords::as_bytes(KeywordId::While)) {
                            return Some(open.lnum);
                        }
                    }
                }
            }
            if at(line, p) != 0 {
                p += 1;
            }
        }
        None
    }

    /// Whether line `lnum` continues a C++ base-class list or constructor initializer.
    ///
    /// The result is memoized in `cache` for the statement it belongs to. On success `cache.col` holds the
    /// column of the first base or member, or 0.
    pub(crate) fn is_cpp_baseclass_init(&self, lnum: usize, cache: &mut BaseclassCache) -> bool {
        if cache.start <= lnum {
            return cache.found;
        }
        cache.col = 0;

        let lx = self.lexer;
        let cur = self.text(lnum);
        let s = skip_white(cur, 0);
        if at(cur, s) == b'#' || at(cur, lx.skip_comment(cur, s)) == 0 {
            return false;
        }

        // start below the closest line that is empty, a directive, or has a brace or a terminating ';'
        let mut l = lnum;
        while l > 1 {
            let line = self.text(l - 1);
            let mut s = skip_white(line, 0);
            if matches!(at(line, s), b'#' | 0) {
                break;
            }
            while at(line, s) != 0 {
                s = lx.skip_comment(line, s);
                let c = at(line, s);
                if c == b'{' || c == b'}' || (c == b';' && lx.no_code(line, s + 1)) {
                    break;
                }
                if c != 0 {
                    s += 1;
                }
            }
            if at(line, s) != 0 {
                break;
            }
            l -= 1;
        }

        cache.start = l;
        let mut line = self.text(l);
        let mut s = 0;
        let mut at_line_start = true;
        let mut class_or_struct = false;
        let mut lookfor_ctor_init = false;
        let mut cpp_base_class = false;

        loop {
            if at(line, s) == 0 {
                if l == lnum {
                    break;
                }
                l += 1;
                line = self.text(l);
                s = 0;
                at_line_start = true;
            }
            if at_line_start {
                at_line_start = false;
                // "case (foo):" is not a base class
                if lx.is_case_label(line, false) {
                    break;
                }
                s = lx.skip_comment(line, 0);
                if at(line, s) == 0 {
                    continue;
                }
            }

            let c = at(line, s);
            let rest = &line[s.min(line.len())..];
            if c == b'"' {
                s = skip_string(line, s) + 1;
            } else if c == b':' {
                if at(line, s + 1) == b':' {
                    lookfor_ctor_init = false;
                    s = lx.skip_comment(line, s + 2);
                } else if lookfor_ctor_init || class_or_struct {
                    cpp_base_class = true;
                    lookfor_ctor_init = false;
                    class_or_struct = false;
                    cache.col = 0;
                    s = lx.skip_comment(line, s + 1);
                } else {
                    s = lx.skip_comment(line, s + 1);
                }
            } else if let Some(word) = [KeywordId::Class, KeywordId::Struct]
                .into_iter()
                .map(keywords::as_bytes)
                .find(|word| starts_with_word(rest, word))
            {
                class_or_struct = true;
                lookfor_ctor_init = false;
                s = lx.skip_comment(line, s + word.len());
            } else {
                if c == b'{' || c == b'}' || c == b';' {
                    cpp_base_class = false;
                    lookfor_ctor_init = false;
                    class_or_struct = false;
                } else if c == b')' {
                    // "):" starts a constructor initializer
                    class_or_struct = false;
                    lookfor_ctor_init = true;
                } else if c == b'?' {
                    return false;
                } else if !is_ident_byte(c) {
                    class_or_struct = false;
                    lookfor_ctor_init = false;
                } else if cache.col == 0 {
                    lookfor_ctor_init = false;
                    if cpp_base_class {
                        cache.col = s;
                    }
                }

                if l == lnum && c == b',' && lx.no_code(line, s + 1) {
                    cache.col = 0;
                }
                s = lx.skip_comment(line, s + 1);
            }
        }

        cache.found = cpp_base_class;
        if cpp_base_class {
            cache.start = l;
        }
        cpp_base_class
    }

    /// Indent for a line inside a C++ base-class list, scanning at `lnum`.
    pub(crate) fn baseclass_amount(&self, lnum: usize, col: usize) -> i32 {
        let amount = if col == 0 {
            let line = self.text(lnum);
            let mut amount = self.indent(lnum);
            if let Some(close) = self.lexer.last_unmatched_close(line, b'(', b')') {
                if let Some(open) = self.find_match_paren(Pos::new(lnum, close), self.cfg.max_paren) {
                    amount = self.indent(open.lnum);
                }
            }
            if !self.lexer.ends_in(line, b",", None) {
                amount = amount.saturating_add(self.cfg.cpp_baseclass);
            }
            amount
        } else {
            self.vcol(Pos::new(lnum, col))
        };
        amount.max(self.cfg.cpp_baseclass)
    }

    /// Screen column of the code after a label on `lnum`, or 0 when nothing follows the label.
    pub(crate) fn indent_after_label(&self, lnum: usize) -> i32 {
        match self.lexer.after_label(self.text(lnum)) {
            Some(col) => self.vcol(Pos::new(lnum, col)),
            None => 0,
        }
    }

    /// The indent of line `lnum` ignoring a leading label, and the offset of the text after the label.
    pub(crate) fn skip_label(&self, lnum: usize) -> (i32, usize) {
        if self.is_any_label(lnum) {
            let amount = self.indent_after_label(lnum);
            (amount, self.lexer.after_label(self.text(lnum)).unwrap_or(0))
        } else {
            (self.indent(lnum), 0)
        }
    }

    /// Column to align a declaration continued after `type name,` on line `lnum`, or 0.
    pub(crate) fn first_id_amount(&self, lnum: usize) -> i32 {
        match self.lexer.first_id_offset(self.text(lnum)) {
            Some(col) => self.vcol(Pos::new(lnum, col)),
            None => 0,
        }
    }

    /// Column of the value in `x = value` on line `lnum`, for backslash-continued assignments.
    ///
    /// Returns -1 when the line before also ends in a backslash and 0 when there is no assignment.
    pub(crate) fn equal_amount(&self, lnum: usize) -> i32 {
        if lnum > 1 && ends_in_backslash(self.text(lnum - 1)) {
            return -1;
        }
        match self.lexer.equal_value_offset(self.text(lnum)) {
            Some(col) => self.vcol(Pos::new(lnum, col)),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BaseclassCache;
    use crate::indent::buffer::TextBuffer;
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
    // Jump labels
    // ========================================

    #[test]
    fn test_jump_label_after_statement() {
        assert!(check("    x = 1;\nout:\n", |ind| ind.is_jump_label(2)));
    }

    #[test]
    fn test_ternary_tail_is_not_label() {
        assert!(!check("    x = c ?\n  a :\n", |ind| ind.is_jump_label(2)));
    }

    #[test]
    fn test_default_is_not_jump_label() {
        assert!(!check("x;\ndefault:\n", |ind| ind.is_jump_label(2)));
    }

    #[test]
    fn test_label_at_start_of_file() {
        assert!(check("start:\n", |ind| ind.is_jump_label(1)));
    }

    // ========================================
    // Preprocessor continuation
    // ========================================

    #[test]
    fn test_preprocessor_continuation() {
        check("#define X \\\n    a \\\n    b\nint y;", |ind| {
            assert_eq!(ind.preprocessor_continuation(3), Some((1, None)));
            assert_eq!(ind.preprocessor_continuation(2), Some((1, Some(4))));
            assert_eq!(ind.preprocessor_continuation(4), None);
        });
    }

    // ========================================
    // Function declarations
    // ========================================

    #[test]
    fn test_function_declaration_single_line() {
        check("int\nmain(void)\n{", |ind| {
            assert!(ind.is_function_declaration(ind.text(2), 2, 0));
            assert!(!ind.is_function_declaration(ind.text(1), 1, 0));
        });
    }

    #[test]
    fn test_function_declaration_over_lines() {
        check("int f(int a,\n      int b)\n{", |ind| {
            assert!(ind.is_function_declaration(ind.text(1), 1, 0));
            assert!(ind.is_function_declaration(ind.text(2), 2, 0));
        });
    }

    #[test]
    fn test_call_statement_is_not_declaration() {
        check("foo(a);\n", |ind| assert!(!ind.is_function_declaration(ind.text(1), 1, 0)));
    }

    #[test]
    fn test_initializer_list_is_not_declaration() {
        check("A::A(int a, int b)\n    : a(0)\n{", |ind| {
            assert!(!ind.is_function_declaration(ind.text(2), 2, 0));
        });
    }

    // ========================================
    // do/while
    // ========================================

    #[test]
    fn test_while_of_do() {
        check("do {\n} while (x);\nwhile (y)\n", |ind| {
            assert!(ind.is_while_of_do(b"} while (x);", 2));
            assert!(!ind.is_while_of_do(b"while (y)", 3));
        });
    }

    #[test]
    fn test_while_of_do_end_multi_line() {
        check("do\n  x;\nwhile (a &&\n       b);\n", |ind| {
            assert_eq!(ind.while_of_do_end(Some(b';'), 4), Some(3));
            assert_eq!(ind.while_of_do_end(None, 4), None);
        });
    }

    // ========================================
    // C++ base classes
    // ========================================

    #[test]
    fn test_baseclass_after_class_colon() {
        check("class A :\n    public B", |ind| {
            let mut cache = BaseclassCache::default();
            assert!(ind.is_cpp_baseclass_init(2, &mut cache));
        });
    }

    #[test]
    fn test_baseclass_after_struct_colon() {
        check("struct A : B", |ind| {
            let mut cache = BaseclassCache::default();
            assert!(ind.is_cpp_baseclass_init(1, &mut cache));
            assert_eq!(cache.col, 11);
        });
        check("structs : x", |ind| {
            let mut cache = BaseclassCache::default();
            assert!(!ind.is_cpp_baseclass_init(1, &mut cache));
        });
    }

    #[test]
    fn test_ctor_initializer() {
        check("};\nA::A()\n    : x(1)", |ind| {
            let mut cache = BaseclassCache::default();
            assert!(ind.is_cpp_baseclass_init(3, &mut cache));
        });
    }

    #[test]
    fn test_ternary_is_not_baseclass() {
        check("x;\na = c ? f() :\n    g();", |ind| {
            let mut cache = BaseclassCache::default();
            assert!(!ind.is_cpp_baseclass_init(3, &mut cache));
        });
    }

    // ========================================
    // Amount helpers
    // ========================================

    #[test]
    fn test_skip_label_amounts() {
        check("  case 1: x = 2;\n    y;", |ind| {
            assert_eq!(ind.skip_label(1), (10, 10));
            assert_eq!(ind.skip_label(2), (4, 0));
        });
    }

    #[test]
    fn test_first_id_amount() {
        check("    int a,", |ind| assert_eq!(ind.first_id_amount(1), 8));
    }

    #[test]
    fn test_equal_amount() {
        check("x = \"a\\\n  b\"", |ind| {
            assert_eq!(ind.equal_amount(1), 5);
            assert_eq!(ind.equal_amount(2), -1);
        });
    }
}
