//! Lexical predicates over single lines
//!
//! Every function here looks at one line of text (as bytes) and answers a question about it: where the code
//! after a comment starts, whether the line is terminated, whether it is a `case` label, and so on. Offsets are
//! byte offsets into the slice passed in. Reading past the end behaves as if the line ended in a NUL byte, so
//! lookahead never panics.
//!
//! Predicates that need neighbouring lines live on the engine instead; see `classify.rs`.

use cindent_core::keywords::{self, KeywordCategory, KeywordId};
use cindent_core::{is_ident_byte, starts_with_word};

use super::buffer::at;

/// Comment-aware scanning of line text.
///
/// The only knob is whether `#` introduces a comment (shell/Perl style) rather than a preprocessor line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lexer {
    pub hash_comments: bool,
}

#[inline]
fn is_white(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Index of the first non-blank byte at or after `i`.
pub fn skip_white(s: &[u8], mut i: usize) -> usize {
    while is_white(at(s, i)) {
        i += 1;
    }
    i
}

/// Whether `s[i..]` starts a `//` or `/*` comment.
pub fn is_comment(s: &[u8], i: usize) -> bool {
    at(s, i) == b'/' && matches!(at(s, i + 1), b'*' | b'/')
}

/// Whether `s[i..]` starts a `//` comment.
pub fn is_line_comment(s: &[u8], i: usize) -> bool {
    at(s, i) == b'/' && at(s, i + 1) == b'/'
}

/// Whether the line is a preprocessor directive.
pub fn is_preprocessor_line(s: &[u8]) -> bool {
    at(s, skip_white(s, 0)) == b'#'
}

/// Whether the last byte of the line is a backslash.
pub fn ends_in_backslash(s: &[u8]) -> bool {
    s.last() == Some(&b'\\')
}

/// Skip string and character literals starting at `i`.
///
/// Adjacent literals (`"date""time"`) are skipped together. Returns `i` unchanged when no literal starts there.
/// When the scan runs into the end of the line the result backs up to the last byte.
pub fn skip_string(s: &[u8], mut p: usize) -> usize {
    loop {
        match at(s, p) {
            b'\'' => {
                if at(s, p + 1) == 0 {
                    break;
                }
                let mut i = 2;
                if at(s, p + 1) == b'\\' && at(s, p + 2) != 0 {
                    i += 1;
                    while at(s, p + i - 1).is_ascii_digit() {
                        i += 1;
                    }
                }
                if at(s, p + i - 1) != 0 && at(s, p + i) == b'\'' {
                    p += i + 1;
                    continue;
                }
                break;
            }
            b'"' => {
                p += 1;
                while at(s, p) != 0 {
                    if at(s, p) == b'\\' && at(s, p + 1) != 0 {
                        p += 1;
                    } else if at(s, p) == b'"' {
                        break;
                    }
                    p += 1;
                }
                if at(s, p) == b'"' {
                    p += 1;
                    continue;
                }
                break;
            }
            _ => break,
        }
    }
    if at(s, p) == 0 {
        p = p.saturating_sub(1);
    }
    p
}

/// Walk from the start of the line to `col`, jumping over comments and literals.
///
/// A result greater than `col` means `col` lies inside a comment or literal.
pub fn skip_to_pos(lexer: Lexer, s: &[u8], col: usize) -> usize {
    let mut p = 0;
    while at(s, p) != 0 && p < col {
        if is_comment(s, p) {
            p = lexer.skip_comment(s, p);
        } else {
            let next = skip_string(s, p);
            p = if next == p { p + 1 } else { next };
        }
    }
    p
}

/// Whether byte `col` is inside a string literal.
pub fn is_pos_in_string(s: &[u8], col: usize) -> bool {
    let mut p = 0;
    while at(s, p) != 0 && p < col {
        p = skip_string(s, p) + 1;
    }
    p > col
}

/// Column where a `//` comment starts outside any string, if the line has one.
pub fn line_comment_col(s: &[u8]) -> Option<usize> {
    let mut p = 0;
    while p + 1 < s.len() {
        if s[p] == b'/'
            && s[p + 1] == b'/'
            && (p == 0 || s[p - 1] != b'*' || at(s, p + 2) == b'*')
            && !is_pos_in_string(s, p)
        {
            return Some(p);
        }
        p += 1;
    }
    None
}

impl Lexer {
    pub fn new(hash_comments: bool) -> Self {
        Self { hash_comments }
    }

    /// Skip blanks and comments starting at `i`.
    ///
    /// A `//` comment (or a `#` comment after blanks, when enabled) runs to the end of the line.
    pub fn skip_comment(self, s: &[u8], mut i: usize) -> usize {
        while at(s, i) != 0 {
            let prev = i;
            i = skip_white(s, i);
            if self.hash_comments && i != prev && at(s, i) == b'#' {
                return s.len();
            }
            if at(s, i) != b'/' {
                break;
            }
            i += 1;
            if at(s, i) == b'/' {
                return s.len();
            }
            if at(s, i) != b'*' {
                break;
            }
            i += 1;
            loop {
                if at(s, i) == 0 {
                    break;
                }
                if at(s, i) == b'*' && at(s, i + 1) == b'/' {
                    i += 2;
                    break;
                }
                i += 1;
            }
        }
        i
    }

    /// Whether nothing but blanks and comments follows `i`.
    pub fn no_code(self, s: &[u8], i: usize) -> bool {
        at(s, self.skip_comment(s, i)) == 0
    }

    /// Offset of the first code byte of the line.
    pub fn code_start(self, s: &[u8]) -> usize {
        self.skip_comment(s, 0)
    }

    /// Classify how a line ends.
    ///
    /// Returns `;`, `}` or (with `incl_comma`) `,` when that byte ends the line, ignoring trailing comments. With
    /// `incl_open` a trailing `{` counts too. Otherwise a line that starts with `{` or `}` returns that byte.
    /// An `else` line counts as terminated only once its own braces are balanced.
    pub fn classify_terminator(self, s: &[u8], incl_open: bool, incl_comma: bool) -> Option<u8> {
        let mut i = self.skip_comment(s, 0);
        let mut found_start = 0u8;
        let mut n_open = 0u32;

        if at(s, i) == b'{' || (at(s, i) == b'}' && !self.is_else_keyword(&s[i..])) {
            found_start = at(s, i);
        }
        let is_else = found_start == 0 && self.is_else_keyword(&s[i.min(s.len())..]);

        while at(s, i) != 0 {
            i = skip_string(s, self.skip_comment(s, i));
            let c = at(s, i);
            if c == b'}' && n_open > 0 {
                n_open -= 1;
            }
            if (!is_else || n_open == 0)
                && (c == b';' || c == b'}' || (incl_comma && c == b','))
                && self.no_code(s, i + 1)
            {
                return Some(c);
            } else if c == b'{' {
                if incl_open && self.no_code(s, i + 1) {
                    return Some(c);
                }
                n_open += 1;
            }
            if c != 0 {
                i += 1;
            }
        }
        (found_start != 0).then_some(found_start)
    }

    /// If the text starts with an identifier followed by a single `:`, the offset just past that `:`.
    pub fn label_end(self, s: &[u8]) -> Option<usize> {
        if !is_ident_byte(at(s, 0)) {
            return None;
        }
        let mut i = 0;
        while is_ident_byte(at(s, i)) {
            i += 1;
        }
        i = self.skip_comment(s, i);
        // "::" is not a label, it's C++
        (at(s, i) == b':' && at(s, i + 1) != b':').then_some(i + 1)
    }

    /// `default:`
    pub fn is_default_label(self, s: &[u8]) -> bool {
        let word = keywords::as_bytes(KeywordId::Default);
        if !s.starts_with(word) {
            return false;
        }
        let i = self.skip_comment(s, word.len());
        at(s, i) == b':' && at(s, i + 1) != b':'
    }

    /// `case x:` or `default:`. With `strict`, a string literal before the `:` rejects the line.
    pub fn is_case_label(self, s: &[u8], strict: bool) -> bool {
        let start = self.skip_comment(s, 0);
        let s = &s[start.min(s.len())..];
        if starts_with_word(s, keywords::as_bytes(KeywordId::Case)) {
            let mut i = 4;
            while at(s, i) != 0 {
                i = self.skip_comment(s, i);
                if at(s, i) == 0 {
                    break;
                }
                if at(s, i) == b':' {
                    if at(s, i + 1) == b':' {
                        i += 1;
                    } else {
                        return true;
                    }
                }
                if at(s, i) == b'\'' && at(s, i + 1) != 0 && at(s, i + 2) == b'\'' {
                    i += 2;
                } else if is_comment(s, i) {
                    return false;
                } else if at(s, i) == b'"' {
                    return !strict;
                }
                i += 1;
            }
            return false;
        }
        self.is_default_label(s)
    }

    /// `public:`, `protected:` or `private:`.
    pub fn is_scope_decl_label(self, s: &[u8]) -> bool {
        let start = self.skip_comment(s, 0);
        let s = &s[start.min(s.len())..];
        keywords::in_category(KeywordCategory::ScopeDecl).any(|id| {
            let word = keywords::as_bytes(id);
            if !s.starts_with(word) {
                return false;
            }
            let i = self.skip_comment(s, word.len());
            at(s, i) == b':' && at(s, i + 1) != b':'
        })
    }

    /// A C++ `namespace` opener, optionally prefixed by `inline`/`export`, with at most one (possibly nested) name.
    pub fn is_namespace_decl(self, s: &[u8]) -> bool {
        let mut i = self.skip_comment(s, 0);
        let word_at = |i: usize, id: KeywordId| starts_with_word(&s[i.min(s.len())..], keywords::as_bytes(id));
        while let Some(id) = [KeywordId::Inline, KeywordId::Export].into_iter().find(|&id| word_at(i, id)) {
            i = self.skip_comment(s, skip_white(s, i + keywords::as_str(id).len()));
        }
        if !word_at(i, KeywordId::Namespace) {
            return false;
        }

        let mut p = self.skip_comment(s, skip_white(s, i + keywords::as_str(KeywordId::Namespace).len()));
        let mut has_name = false;
        let mut has_name_start = false;
        while at(s, p) != 0 {
            let c = at(s, p);
            if is_white(c) {
                has_name = true;
                p = self.skip_comment(s, skip_white(s, p));
            } else if c == b'{' {
                break;
            } else if is_ident_byte(c) {
                has_name_start = true;
                if has_name {
                    return false;
                }
                p += 1;
            } else if c == b':' && at(s, p + 1) == b':' && is_ident_byte(at(s, p + 2)) {
                // C++17 nested namespace
                if !has_name_start || has_name {
                    return false;
                }
                p += 3;
            } else {
                return false;
            }
        }
        true
    }

    /// Whether the code of the line starts with an `enum` or ends in `=` (optionally followed by `{`).
    pub fn is_initializer(self, s: &[u8]) -> bool {
        let mut i = self.skip_comment(s, 0);
        let word = |i: usize, id: KeywordId| starts_with_word(&s[i.min(s.len())..], keywords::as_bytes(id));

        if word(i, KeywordId::Typedef) {
            i = self.skip_comment(s, i + keywords::as_str(KeywordId::Typedef).len());
        }
        'prefixes: loop {
            for id in [KeywordId::Static, KeywordId::Public, KeywordId::Protected, KeywordId::Private] {
                if word(i, id) {
                    i = self.skip_comment(s, i + keywords::as_str(id).len());
                    continue 'prefixes;
                }
            }
            break;
        }

        word(i, KeywordId::Enum) || self.ends_in(&s[i.min(s.len())..], b"=", Some(b"{"))
    }

    /// Whether `find` occurs outside comments and is followed only by blanks, an optional `ignore` and comments.
    pub fn ends_in(self, s: &[u8], find: &[u8], ignore: Option<&[u8]>) -> bool {
        let mut p = 0;
        while at(s, p) != 0 {
            p = self.skip_comment(s, p);
            if s[p.min(s.len())..].starts_with(find) {
                let mut r = skip_white(s, p + find.len());
                if let Some(ignore) = ignore {
                    if s[r.min(s.len())..].starts_with(ignore) {
                        r = skip_white(s, r + ignore.len());
                    }
                }
                if self.no_code(s, r) {
                    return true;
                }
            }
            if at(s, p) != 0 {
                p += 1;
            }
        }
        false
    }

    /// Column of the last `close` that has no matching `open` before it on the same line.
    pub fn last_unmatched_close(self, s: &[u8], open: u8, close: u8) -> Option<usize> {
        let mut found = None;
        let mut open_count = 0u32;
        let mut i = 0;
        while at(s, i) != 0 {
            i = self.skip_comment(s, i);
            i = skip_string(s, i);
            let c = at(s, i);
            if c == open {
                open_count += 1;
            } else if c == close {
                if open_count > 0 {
                    open_count -= 1;
                } else {
                    found = Some(i);
                }
            }
            i += 1;
        }
        found
    }

    /// Offset of the code after a `label:`, `case x:` or `public:` prefix, if any code follows it.
    pub fn after_label(self, s: &[u8]) -> Option<usize> {
        let mut i = 0;
        while at(s, i) != 0 {
            let c = at(s, i);
            if c == b':' {
                if at(s, i + 1) == b':' {
                    // skip over "::" for C++
                    i += 1;
                } else if !self.is_case_label(&s[i + 1..], false) {
                    break;
                }
            } else if c == b'\'' && at(s, i + 1) != 0 && at(s, i + 2) == b'\'' {
                i += 2;
            }
            i += 1;
        }
        if at(s, i) == 0 {
            return None;
        }
        let j = self.skip_comment(s, i + 1);
        (at(s, j) != 0).then_some(j)
    }

    /// `'key':` or `key:` at the start of the line, as in a JavaScript object literal.
    pub fn has_js_object_key(self, s: &[u8]) -> bool {
        let mut i = skip_white(s, 0);
        let mut quote = None;
        if matches!(at(s, i), b'\'' | b'"') {
            quote = Some(at(s, i));
            i += 1;
        }
        if !is_ident_byte(at(s, i)) {
            return false;
        }
        while is_ident_byte(at(s, i)) {
            i += 1;
        }
        if quote == Some(at(s, i)) {
            i += 1;
        }
        i = self.skip_comment(s, i);
        at(s, i) == b':' && at(s, i + 1) != b':'
    }

    /// `if` as a word.
    pub fn is_if_keyword(self, s: &[u8]) -> bool {
        starts_with_word(s, keywords::as_bytes(KeywordId::If))
    }

    /// `else` as a word, also when preceded by `}`.
    pub fn is_else_keyword(self, s: &[u8]) -> bool {
        let i = if at(s, 0) == b'}' { self.skip_comment(s, 1) } else { 0 };
        starts_with_word(&s[i.min(s.len())..], keywords::as_bytes(KeywordId::Else))
    }

    /// `do` as a word.
    pub fn is_do_keyword(self, s: &[u8]) -> bool {
        starts_with_word(s, keywords::as_bytes(KeywordId::Do))
    }

    /// `break` as a word.
    pub fn is_break_keyword(self, s: &[u8]) -> bool {
        starts_with_word(s, keywords::as_bytes(KeywordId::Break))
    }

    /// Whether the code starts with `while` (after an optional `}`).
    pub fn starts_with_while(self, s: &[u8]) -> bool {
        let mut i = self.skip_comment(s, 0);
        if at(s, i) == b'}' {
            i = self.skip_comment(s, i + 1);
        }
        starts_with_word(&s[i.min(s.len())..], keywords::as_bytes(KeywordId::While))
    }

    /// Whether the line starts with a word that opens a statement body (`if`, `else`, `while`, `do`, `for`,
    /// `switch`).
    pub fn is_block_word(self, s: &[u8]) -> bool {
        let s = &s[skip_white(s, 0).min(s.len())..];
        keywords::in_category(KeywordCategory::Block).any(|id| {
            let word = keywords::as_bytes(id);
            let len = word.len();
            s.starts_with(word) && (!is_ident_byte(at(s, len)) || !is_ident_byte(word[len - 1]))
        })
    }

    /// Whether the `(` at `col` is the condition of an `if`, `for` or `while`.
    pub fn is_if_for_while_before(self, s: &[u8], col: usize) -> bool {
        if col < 2 {
            return false;
        }
        let mut offset = col - 1;
        while offset > 2 && is_white(at(s, offset)) {
            offset -= 1;
        }
        let word_ends_here = |start: usize| start == 0 || !is_ident_byte(at(s, start - 1));

        let end = offset + 1;
        [KeywordId::If, KeywordId::For, KeywordId::While]
            .into_iter()
            .find_map(|id| {
                let word = keywords::as_bytes(id);
                let start = end.checked_sub(word.len())?;
                s[start..].starts_with(word).then(|| word_ends_here(start))
            })
            .unwrap_or(false)
    }

    /// Offset of the first identifier after a declaration's type, for aligning `int a,\n    b;`.
    ///
    /// Skips `static`, then `struct`/`enum` or a `signed`/`unsigned` prefix of a basic type. Returns `None`
    /// when the line does not look like `type name`.
    pub fn first_id_offset(self, s: &[u8]) -> Option<usize> {
        let word_len = |p: usize| {
            let mut e = p;
            while at(s, e) != 0 && !is_white(at(s, e)) {
                e += 1;
            }
            e - p
        };
        let is = |p: usize, len: usize, id: KeywordId| len == keywords::as_str(id).len() && s[p..].starts_with(keywords::as_bytes(id));

        let mut p = skip_white(s, 0);
        let mut len = word_len(p);
        if is(p, len, KeywordId::Static) {
            p = skip_white(s, p + len);
            len = word_len(p);
        }
        if is(p, len, KeywordId::Struct) || is(p, len, KeywordId::Enum) {
            p = skip_white(s, p + len);
        } else if is(p, len, KeywordId::Unsigned) || is(p, len, KeywordId::Signed) {
            let q = skip_white(s, p + len);
            let basic = [KeywordId::Int, KeywordId::Long, KeywordId::Short, KeywordId::Char]
                .into_iter()
                .any(|id| {
                    let w = keywords::as_bytes(id);
                    s[q.min(s.len())..].starts_with(w) && is_white(at(s, q + w.len()))
                });
            if basic {
                p = q;
            }
        }

        let mut id_len = 0;
        while is_ident_byte(at(s, p + id_len)) {
            id_len += 1;
        }
        if id_len == 0 || !is_white(at(s, p + id_len)) || self.no_code(s, p) {
            return None;
        }
        Some(skip_white(s, p + id_len))
    }

    /// Offset of the value after the first `=` of an assignment, for aligning continued strings.
    ///
    /// Stops at `;`, braces and quotes. A value starting with `"` aligns after the quote.
    pub fn equal_value_offset(self, s: &[u8]) -> Option<usize> {
        let mut p = 0;
        while at(s, p) != 0 && !b"=;{}\"'".contains(&at(s, p)) {
            if is_comment(s, p) {
                p = self.skip_comment(s, p);
            } else {
                p += 1;
            }
        }
        if at(s, p) != b'=' {
            return None;
        }
        let mut v = skip_white(s, p + 1);
        if self.no_code(s, v) {
            return None;
        }
        if at(s, v) == b'"' {
            v += 1;
        }
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LX: Lexer = Lexer { hash_comments: false };

    // ========================================
    // Comment and string skipping
    // ========================================

    #[test]
    fn test_skip_comment_block_then_code() {
        let s = b"  /* a */ x = 1;";
        assert_eq!(LX.skip_comment(s, 0), 10);
    }

    #[test]
    fn test_skip_comment_line_comment_to_end() {
        let s = b"  // hello";
        assert_eq!(LX.skip_comment(s, 0), s.len());
        assert!(LX.no_code(s, 0));
    }

    #[test]
    fn test_hash_comment_needs_leading_blank() {
        let lx = Lexer::new(true);
        assert!(lx.no_code(b"  # note", 0));
        assert!(!lx.no_code(b"#define X", 0));
    }

    #[test]
    fn test_skip_string_simple_and_concatenated() {
        assert_eq!(skip_string(b"\"ab\" x", 0), 4);
        assert_eq!(skip_string(b"\"a\"\"b\";", 0), 6);
        assert_eq!(skip_string(b"'c';", 0), 3);
        assert_eq!(skip_string(b"'\\n';", 0), 4);
        assert_eq!(skip_string(b"x", 0), 0);
    }

    #[test]
    fn test_skip_string_escaped_quote() {
        assert_eq!(skip_string(b"\"a\\\"b\" ;", 0), 6);
    }

    #[test]
    fn test_pos_in_string() {
        let s = b"x = \"/*\";";
        assert!(is_pos_in_string(s, 5));
        assert!(!is_pos_in_string(s, 1));
    }

    #[test]
    fn test_line_comment_col_outside_string() {
        assert_eq!(line_comment_col(b"x = 1; // c"), Some(7));
        assert_eq!(line_comment_col(b"s = \"//\";"), None);
    }

    // ========================================
    // Terminator classification
    // ========================================

    #[test]
    fn test_terminator_semicolon_and_comment() {
        assert_eq!(LX.classify_terminator(b"x = 1; // done", false, false), Some(b';'));
        assert_eq!(LX.classify_terminator(b"x = a +", false, false), None);
    }

    #[test]
    fn test_terminator_comma_only_when_requested() {
        assert_eq!(LX.classify_terminator(b"int a,", false, true), Some(b','));
        assert_eq!(LX.classify_terminator(b"int a,", false, false), None);
    }

    #[test]
    fn test_terminator_open_brace() {
        assert_eq!(LX.classify_terminator(b"if (x) {", true, false), Some(b'{'));
        assert_eq!(LX.classify_terminator(b"if (x) {", false, false), None);
        assert_eq!(LX.classify_terminator(b"{", false, false), Some(b'{'));
    }

    #[test]
    fn test_terminator_ignores_semicolon_in_string() {
        assert_eq!(LX.classify_terminator(b"s = \";\" +", false, false), None);
    }

    #[test]
    fn test_terminator_else_needs_balanced_braces() {
        assert_eq!(LX.classify_terminator(b"else { x; }", false, false), Some(b'}'));
        assert_eq!(LX.classify_terminator(b"else { x;", false, false), None);
    }

    // ========================================
    // Labels
    // ========================================

    #[test]
    fn test_case_labels() {
        assert!(LX.is_case_label(b"case 1:", false));
        assert!(LX.is_case_label(b"case ':':", false));
        assert!(LX.is_case_label(b"default:", false));
        assert!(!LX.is_case_label(b"case A::B", false));
        assert!(!LX.is_case_label(b"casex:", false));
    }

    #[test]
    fn test_case_label_with_string_is_strictness_dependent() {
        assert!(LX.is_case_label(b"case \"a\":", false));
        assert!(!LX.is_case_label(b"case \"a\":", true));
    }

    #[test]
    fn test_scope_decl_labels() {
        assert!(LX.is_scope_decl_label(b"public:"));
        assert!(LX.is_scope_decl_label(b"private :"));
        assert!(!LX.is_scope_decl_label(b"public::x"));
        assert!(!LX.is_scope_decl_label(b"friend:"));
    }

    #[test]
    fn test_label_end() {
        assert_eq!(LX.label_end(b"out: x"), Some(4));
        assert_eq!(LX.label_end(b"std::x"), None);
        assert_eq!(LX.label_end(b": x"), None);
    }

    #[test]
    fn test_after_label() {
        assert_eq!(LX.after_label(b"case 1: x = 2;"), Some(8));
        assert_eq!(LX.after_label(b"case 1:"), None);
        assert_eq!(LX.after_label(b"a::b"), None);
    }

    // ========================================
    // Keywords
    // ========================================

    #[test]
    fn test_keywords() {
        assert!(LX.is_if_keyword(b"if (x)"));
        assert!(!LX.is_if_keyword(b"ifdef"));
        assert!(LX.is_else_keyword(b"} else {"));
        assert!(LX.is_else_keyword(b"else"));
        assert!(LX.is_do_keyword(b"do {"));
        assert!(!LX.is_do_keyword(b"double x;"));
        assert!(LX.is_break_keyword(b"break;"));
        assert!(LX.starts_with_while(b"} while (x);"));
    }

    #[test]
    fn test_block_words() {
        assert!(LX.is_block_word(b"  for (;;)"));
        assert!(LX.is_block_word(b"switch (x)"));
        assert!(!LX.is_block_word(b"format(x)"));
    }

    #[test]
    fn test_if_for_while_before_paren() {
        assert!(LX.is_if_for_while_before(b"  if (a", 5));
        assert!(LX.is_if_for_while_before(b"  while(a", 7));
        assert!(LX.is_if_for_while_before(b"for (a", 4));
        assert!(!LX.is_if_for_while_before(b"elif (a", 5));
        assert!(!LX.is_if_for_while_before(b"foo(a", 3));
    }

    // ========================================
    // Declarations
    // ========================================

    #[test]
    fn test_namespace_decl() {
        assert!(LX.is_namespace_decl(b"namespace foo {"));
        assert!(LX.is_namespace_decl(b"inline namespace v1"));
        assert!(LX.is_namespace_decl(b"namespace a::b {"));
        assert!(LX.is_namespace_decl(b"namespace {"));
        assert!(!LX.is_namespace_decl(b"namespace a b {"));
        assert!(!LX.is_namespace_decl(b"namespaces x"));
    }

    #[test]
    fn test_namespace_decl_prefixes_are_whole_words() {
        assert!(LX.is_namespace_decl(b"export namespace m {"));
        assert!(!LX.is_namespace_decl(b"inlined namespace x"));
    }

    #[test]
    fn test_default_label() {
        assert!(LX.is_default_label(b"default:"));
        assert!(LX.is_default_label(b"default /* c */ :"));
        assert!(!LX.is_default_label(b"default::x"));
        assert!(!LX.is_default_label(b"defaults:"));
    }

    #[test]
    fn test_initializer() {
        assert!(LX.is_initializer(b"enum color {"));
        assert!(LX.is_initializer(b"static int table[] = {"));
        assert!(LX.is_initializer(b"x ="));
        assert!(!LX.is_initializer(b"int a,"));
    }

    #[test]
    fn test_ends_in() {
        assert!(LX.ends_in(b"} foo; /* c */", b";", None));
        assert!(LX.ends_in(b"x = {", b"=", Some(b"{")));
        assert!(!LX.ends_in(b"a; b", b";", None));
    }

    #[test]
    fn test_last_unmatched_close() {
        assert_eq!(LX.last_unmatched_close(b"b) && (c)", b'(', b')'), Some(1));
        assert_eq!(LX.last_unmatched_close(b"(a)", b'(', b')'), None);
        assert_eq!(LX.last_unmatched_close(b"x, \")\")", b'(', b')'), Some(6));
    }

    #[test]
    fn test_js_object_key() {
        assert!(LX.has_js_object_key(b"  key: 1,"));
        assert!(LX.has_js_object_key(b"'key': 1,"));
        assert!(!LX.has_js_object_key(b"a::b"));
        assert!(!LX.has_js_object_key(b"x = 1"));
    }

    #[test]
    fn test_first_id_offset() {
        assert_eq!(LX.first_id_offset(b"int a,"), Some(4));
        assert_eq!(LX.first_id_offset(b"static unsigned int  x,"), Some(21));
        assert_eq!(LX.first_id_offset(b"foo,"), None);
    }

    #[test]
    fn test_first_id_offset_after_tag_keyword() {
        assert_eq!(LX.first_id_offset(b"struct foo *p,"), Some(11));
        assert_eq!(LX.first_id_offset(b"static enum color c,"), Some(18));
        assert_eq!(LX.first_id_offset(b"structure x,"), Some(10));
    }

    #[test]
    fn test_equal_value_offset() {
        assert_eq!(LX.equal_value_offset(b"x = \"abc\\"), Some(5));
        assert_eq!(LX.equal_value_offset(b"x = y"), Some(4));
        assert_eq!(LX.equal_value_offset(b"x;"), None);
    }
}
