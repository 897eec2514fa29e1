//! Style configuration for the indentation engine
//!
//! A style string is a comma-separated list of `letter[-]digits[.digits][s]` tokens, e.g. `">2,(0,:0"`. A trailing
//! `s` multiplies by `shiftwidth`; a leading `-` negates. Every field not mentioned keeps its default.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Shiftwidth used when none is given.
pub const DEFAULT_SHIFTWIDTH: i32 = 4;
/// Tabstop used when none is given.
pub const DEFAULT_TABSTOP: i32 = 8;

/// Errors reported by [`StyleConfig::parse_strict`].
///
/// The lenient parser never surfaces these; it skips the offending token instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum StyleError {
    #[error("unknown style option `{letter}`")]
    #[diagnostic(code(cindent::style::unknown_option), help("see `cindent style --help` for the option letters"))]
    UnknownOption {
        letter: char,
        #[label("not a style option")]
        span: SourceSpan,
    },

    #[error("malformed style token `{token}`")]
    #[diagnostic(
        code(cindent::style::malformed),
        help("a token is an option letter, an optional `-`, digits, an optional `.digits` and an optional `s`")
    )]
    Malformed {
        token: String,
        #[label("cannot be parsed")]
        span: SourceSpan,
    },
}

/// Resolved indentation parameters for one buffer.
///
/// All amounts are in screen columns and may be negative, except the two search bounds
/// (`max_paren`, `max_comment`) which are line counts and never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    /// `>`: extra indent for a statement inside a block
    pub level: i32,
    /// `:`: indent of a `case` label relative to the `switch` block
    pub case: i32,
    /// `=`: indent of statements after a `case` label
    pub case_code: i32,
    /// `b`: when non-zero, `break;` lines up with its `case` label
    pub case_break: i32,
    /// `g`: indent of `public:`/`protected:`/`private:`
    pub scope_decl: i32,
    /// `h`: indent of statements after a scope declaration
    pub scope_decl_code: i32,
    /// `p`: indent of K&R-style parameter declarations
    pub param: i32,
    /// `t`: indent of a function return type on its own line
    pub func_type: i32,
    /// `i`: indent of C++ base-class lists and constructor initializers
    pub cpp_baseclass: i32,
    /// `+`: indent of a continuation line
    pub continuation: i32,
    /// `(`: indent inside an unclosed parenthesis
    pub unclosed: i32,
    /// `u`: the same, one nesting level deeper
    pub unclosed2: i32,
    /// `U`: when non-zero, do not ignore the `(` special case for a line starting with `(`
    pub unclosed_no_ignore: i32,
    /// `W`: indent when the unclosed `(` ends its line
    pub unclosed_wrapped: i32,
    /// `w`: when non-zero, align right after the `(` even if whitespace follows it
    pub unclosed_white_ok: i32,
    /// `m`: when non-zero, a line starting with `)` lines up with the line of the matching `(`
    pub matching_paren: i32,
    /// `M`: when non-zero, a line starting with `)` lines up with the previous line
    pub paren_prev: i32,
    /// `/`: extra indent for comment lines
    pub comment: i32,
    /// `c`: indent of comment text relative to the comment opener
    pub in_comment: i32,
    /// `C`: when non-zero, always apply `in_comment` even when text follows the opener
    pub in_comment2: i32,
    /// `)`: how many lines to search back for an unclosed parenthesis
    pub max_paren: i32,
    /// `*`: how many lines to search back for an unclosed comment
    pub max_comment: i32,
    /// `j`: Java mode
    pub java: i32,
    /// `J`: JavaScript mode
    pub js: i32,
    /// `l`: when non-zero, align to a `case` label rather than to statements after it
    pub keep_case_label: i32,
    /// `#`: when non-zero, `#` starts a comment instead of a preprocessor line
    pub hash_comment: i32,
    /// `N`: extra indent inside a C++ namespace
    pub cpp_namespace: i32,
    /// `k`: extra indent inside the condition of `if`/`for`/`while`
    pub if_for_while: i32,
    /// `L`: placement of jump labels; negative means column 0
    pub jump_label: i32,
    /// `e`: extra indent when the opening `{` ends its line
    pub open_imag: i32,
    /// `n`: extra indent for a statement after `if`/`while` without braces
    pub no_brace: i32,
    /// `f`: indent of a top-level `{`
    pub first_open: i32,
    /// `{`: indent of a `{` relative to its opener
    pub open_extra: i32,
    /// `}`: indent of a `}` relative to its `{`
    pub close_extra: i32,
    /// `^`: extra indent inside a block whose `{` is in column 0
    pub open_left_imag: i32,
    /// Width of one shift, used to resolve `s` suffixes
    pub shiftwidth: i32,
    /// Width of a tab character
    pub tabstop: i32,
}

impl StyleConfig {
    /// The default configuration for the given shift and tab widths.
    pub fn defaults(shiftwidth: i32, tabstop: i32) -> Self {
        let sw = shiftwidth;
        Self {
            level: sw,
            case: sw,
            case_code: sw,
            case_break: 0,
            scope_decl: sw,
            scope_decl_code: sw,
            param: sw,
            func_type: sw,
            cpp_baseclass: sw,
            continuation: sw,
            unclosed: sw.saturating_mul(2),
            unclosed2: sw,
            unclosed_no_ignore: 0,
            unclosed_wrapped: 0,
            unclosed_white_ok: 0,
            matching_paren: 0,
            paren_prev: 0,
            comment: 0,
            in_comment: 3,
            in_comment2: 0,
            max_paren: 20,
            max_comment: 70,
            java: 0,
            js: 0,
            keep_case_label: 0,
            hash_comment: 0,
            cpp_namespace: 0,
            if_for_while: 0,
            jump_label: -1,
            open_imag: 0,
            no_brace: 0,
            first_open: 0,
            open_extra: 0,
            close_extra: 0,
            open_left_imag: 0,
            shiftwidth,
            tabstop,
        }
    }

    /// Parse a style string, skipping unknown letters and malformed tokens.
    pub fn parse(spec: &str, shiftwidth: i32, tabstop: i32) -> Self {
        let mut config = Self::defaults(shiftwidth, tabstop);
        for (offset, token) in tokens(spec) {
            match parse_token(token, shiftwidth) {
                Some((letter, value)) => {
                    if !config.set(letter, value) {
                        tracing::debug!(%letter, offset, "skipping unknown style option");
                    }
                }
                None => tracing::debug!(token, offset, "skipping malformed style token"),
            }
        }
        config
    }

    /// Parse a style string, reporting the first token the lenient parser would skip.
    pub fn parse_strict(spec: &str, shiftwidth: i32, tabstop: i32) -> Result<Self, StyleError> {
        let mut config = Self::defaults(shiftwidth, tabstop);
        for (offset, token) in tokens(spec) {
            let Some((letter, value)) = parse_token(token, shiftwidth) else {
                return Err(StyleError::Malformed {
                    token: token.to_string(),
                    span: (offset, token.len()).into(),
                });
            };
            if !config.set(letter, value) {
                return Err(StyleError::UnknownOption {
                    letter,
                    span: (offset, letter.len_utf8()).into(),
                });
            }
        }
        Ok(config)
    }

    /// Store `value` under the option `letter`. Returns `false` for an unknown letter.
    fn set(&mut self, letter: char, value: i32) -> bool {
        let slot = match letter {
            '>' => &mut self.level,
            ':' => &mut self.case,
            '=' => &mut self.case_code,
            'b' => &mut self.case_break,
            'g' => &mut self.scope_decl,
            'h' => &mut self.scope_decl_code,
            'p' => &mut self.param,
            't' => &mut self.func_type,
            'i' => &mut self.cpp_baseclass,
            '+' => &mut self.continuation,
            '(' => &mut self.unclosed,
            'u' => &mut self.unclosed2,
            'U' => &mut self.unclosed_no_ignore,
            'W' => &mut self.unclosed_wrapped,
            'w' => &mut self.unclosed_white_ok,
            'm' => &mut self.matching_paren,
            'M' => &mut self.paren_prev,
            '/' => &mut self.comment,
            'c' => &mut self.in_comment,
            'C' => &mut self.in_comment2,
            ')' => {
                self.max_paren = value.max(0);
                return true;
            }
            '*' => {
                self.max_comment = value.max(0);
                return true;
            }
            'j' => &mut self.java,
            'J' => &mut self.js,
            'l' => &mut self.keep_case_label,
            '#' => &mut self.hash_comment,
            'N' => &mut self.cpp_namespace,
            'k' => &mut self.if_for_while,
            'L' => &mut self.jump_label,
            'e' => &mut self.open_imag,
            'n' => &mut self.no_brace,
            'f' => &mut self.first_open,
            '{' => &mut self.open_extra,
            '}' => &mut self.close_extra,
            '^' => &mut self.open_left_imag,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Every option as `(letter, name, value)`, in the order the letters are documented.
    pub fn entries(&self) -> Vec<(char, &'static str, i32)> {
        vec![
            ('>', "level", self.level),
            (':', "case", self.case),
            ('=', "case_code", self.case_code),
            ('b', "case_break", self.case_break),
            ('g', "scope_decl", self.scope_decl),
            ('h', "scope_decl_code", self.scope_decl_code),
            ('p', "param", self.param),
            ('t', "func_type", self.func_type),
            ('i', "cpp_baseclass", self.cpp_baseclass),
            ('+', "continuation", self.continuation),
            ('(', "unclosed", self.unclosed),
            ('u', "unclosed2", self.unclosed2),
            ('U', "unclosed_no_ignore", self.unclosed_no_ignore),
            ('W', "unclosed_wrapped", self.unclosed_wrapped),
            ('w', "unclosed_white_ok", self.unclosed_white_ok),
            ('m', "matching_paren", self.matching_paren),
            ('M', "paren_prev", self.paren_prev),
            ('/', "comment", self.comment),
            ('c', "in_comment", self.in_comment),
            ('C', "in_comment2", self.in_comment2),
            (')', "max_paren", self.max_paren),
            ('*', "max_comment", self.max_comment),
            ('j', "java", self.java),
            ('J', "js", self.js),
            ('l', "keep_case_label", self.keep_case_label),
            ('#', "hash_comment", self.hash_comment),
            ('N', "cpp_namespace", self.cpp_namespace),
            ('k', "if_for_while", self.if_for_while),
            ('L', "jump_label", self.jump_label),
            ('e', "open_imag", self.open_imag),
            ('n', "no_brace", self.no_brace),
            ('f', "first_open", self.first_open),
            ('{', "open_extra", self.open_extra),
            ('}', "close_extra", self.close_extra),
            ('^', "open_left_imag", self.open_left_imag),
        ]
    }

    /// The parenthesis search bound as a line count.
    pub fn paren_bound(&self) -> usize {
        self.max_paren.max(0) as usize
    }

    /// The comment search bound as a line count.
    pub fn comment_bound(&self) -> usize {
        self.max_comment.max(0) as usize
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::defaults(DEFAULT_SHIFTWIDTH, DEFAULT_TABSTOP)
    }
}

/// Split a style string on commas, yielding each non-empty token with its byte offset.
fn tokens(spec: &str) -> impl Iterator<Item = (usize, &str)> {
    spec.split(',')
        .scan(0usize, |offset, token| {
            let start = *offset;
            *offset += token.len() + 1;
            Some((start, token))
        })
        .filter(|(_, token)| !token.is_empty())
}

/// Option values are clamped to this magnitude.
const MAX_VALUE: i64 = 1 << 20;

/// Parse one `letter[-]digits[.digits][s]` token into its letter and resolved value.
fn parse_token(token: &str, shiftwidth: i32) -> Option<(char, i32)> {
    let mut chars = token.chars();
    let letter = chars.next()?;
    let rest = chars.as_str().as_bytes();

    let mut i = 0;
    let negative = rest.first() == Some(&b'-');
    if negative {
        i += 1;
    }

    let digits_start = i;
    while i < rest.len() && rest[i].is_ascii_digit() {
        i += 1;
    }
    let whole = parse_digits(&rest[digits_start..i]);
    let has_digits = i > digits_start;

    let mut fraction = 0i64;
    let mut divider = 0i64;
    let saw_dot = rest.get(i) == Some(&b'.');
    if saw_dot {
        i += 1;
        let frac_start = i;
        while i < rest.len() && rest[i].is_ascii_digit() {
            i += 1;
        }
        fraction = parse_digits(&rest[frac_start..i]);
        divider = 10i64.saturating_pow((i - frac_start) as u32);
        if i == frac_start {
            divider = 0;
        }
    }

    let mut value = whole;
    if rest.get(i) == Some(&b's') {
        let sw = i64::from(shiftwidth);
        if !has_digits && !saw_dot {
            value = sw;
        } else {
            value = whole.saturating_mul(sw);
            if divider != 0 {
                value = value.saturating_add(sw.saturating_mul(fraction).saturating_add(divider / 2) / divider);
            }
        }
        i += 1;
    }

    if i != rest.len() {
        return None;
    }
    if negative {
        value = -value;
    }
    Some((letter, value.clamp(-MAX_VALUE, MAX_VALUE) as i32))
}

fn parse_digits(digits: &[u8]) -> i64 {
    digits
        .iter()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')))
}
