//! Comment leader markers
//!
//! Editors describe their comment styles with a `comments` string such as `s1:/*,mb:*,ex:*/,://`. Each
//! comma-separated entry is `flags:text`. A three-part comment is a start (`s`), middle (`m`) and end (`e`)
//! entry, in that order. The indent engine uses them to line up the middle and end lines of a block comment
//! with its opener.

use super::buffer::at;

/// Marker string used when the caller does not supply one.
pub const DEFAULT_COMMENTS: &str = "s1:/*,mb:*,ex:*/,://,b:#";

/// Which part of a three-part comment an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPart {
    Start,
    Middle,
    End,
}

/// Alignment flag of a three-part entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// One entry of the `comments` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLeader {
    pub part: Option<CommentPart>,
    pub align: Option<Align>,
    /// Extra offset of the middle part relative to the start (the digits in `s1`).
    pub offset: i32,
    /// `b`: the text must be followed by a blank.
    pub blank_required: bool,
    /// `f`: only the first line carries the text.
    pub first_line_only: bool,
    /// `n`: nested comments are allowed.
    pub nested: bool,
    /// `x`: typing the last character of the end text on a middle line ends the comment.
    pub end_shortcut: bool,
    pub text: String,
}

impl CommentLeader {
    fn parse(entry: &str) -> Self {
        let (flags, text) = entry.split_once(':').unwrap_or((entry, ""));
        let mut leader = CommentLeader {
            part: None,
            align: None,
            offset: 0,
            blank_required: false,
            first_line_only: false,
            nested: false,
            end_shortcut: false,
            text: text.to_string(),
        };

        let flags = flags.as_bytes();
        let mut i = 0;
        while i < flags.len() {
            match flags[i] {
                b's' => leader.part = Some(CommentPart::Start),
                b'm' => leader.part = Some(CommentPart::Middle),
                b'e' => leader.part = Some(CommentPart::End),
                b'l' => leader.align = Some(Align::Left),
                b'r' => leader.align = Some(Align::Right),
                b'b' => leader.blank_required = true,
                b'f' => leader.first_line_only = true,
                b'n' => leader.nested = true,
                b'x' => leader.end_shortcut = true,
                b'-' | b'0'..=b'9' => {
                    let start = i;
                    i += 1;
                    while i < flags.len() && flags[i].is_ascii_digit() {
                        i += 1;
                    }
                    leader.offset = flags_number(&flags[start..i]);
                    continue;
                }
                other => tracing::debug!(flag = %(other as char), "ignoring unknown comment flag"),
            }
            i += 1;
        }
        leader
    }
}

fn flags_number(digits: &[u8]) -> i32 {
    let (negative, digits) = match digits.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, digits),
    };
    let value = digits
        .iter()
        .fold(0i32, |acc, d| acc.saturating_mul(10).saturating_add(i32::from(d - b'0')));
    if negative { -value } else { value }
}

/// Split a `comments` string on commas. A backslash escapes the next character.
fn split_entries(option: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut chars = option.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => entries.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

/// Compare the first `n` bytes of two strings, where a string shorter than `n` ends in a NUL byte.
fn prefix_eq(a: &[u8], b: &[u8], n: usize) -> bool {
    for i in 0..n {
        let (x, y) = (at(a, i), at(b, i));
        if x != y {
            return false;
        }
        if x == 0 {
            break;
        }
    }
    true
}

fn width(s: &[u8]) -> i32 {
    String::from_utf8_lossy(s).chars().count() as i32
}

/// The line before the one being indented, as seen from inside a block comment.
#[derive(Debug, Clone, Copy)]
pub struct PrevLine<'a> {
    /// Text after the leading blanks.
    pub text: &'a [u8],
    pub indent: i32,
}

/// Parsed `comments` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLeaders {
    leaders: Vec<CommentLeader>,
}

impl Default for CommentLeaders {
    fn default() -> Self {
        Self::parse(DEFAULT_COMMENTS)
    }
}

impl CommentLeaders {
    pub fn parse(option: &str) -> Self {
        Self {
            leaders: split_entries(option).iter().map(|e| CommentLeader::parse(e)).collect(),
        }
    }

    pub fn leaders(&self) -> &[CommentLeader] {
        &self.leaders
    }

    /// Indent of a middle or end line of a three-part block comment.
    ///
    /// `line` is the current line without leading blanks, `opener` the text of the comment's first line from
    /// the opener onwards and `opener_col` the opener's screen column. `prev` is `None` on the first line of the
    /// buffer. Returns `None` when no three-part entry applies.
    pub fn three_part_indent(
        &self,
        line: &[u8],
        prev: Option<PrevLine<'_>>,
        opener: &[u8],
        opener_col: i32,
    ) -> Option<i32> {
        let mut amount = opener_col;
        let mut done = false;

        let mut lead_start: &[u8] = b"";
        let mut lead_start_len = 2;
        let mut start_off = 0;
        let mut start_align = None;
        let mut lead_middle: &[u8] = b"";
        let mut lead_middle_len = 1;

        for leader in &self.leaders {
            let text = leader.text.as_bytes();
            match leader.part {
                Some(CommentPart::Start) => {
                    lead_start = text;
                    lead_start_len = text.len();
                    start_off = leader.offset;
                    start_align = leader.align;
                }
                Some(CommentPart::Middle) => {
                    lead_middle = text;
                    lead_middle_len = text.len();
                }
                Some(CommentPart::End) => {
                    let on_middle = prefix_eq(line, lead_middle, lead_middle_len);
                    let on_end = prefix_eq(line, text, text.len());

                    if on_middle && !on_end {
                        done = true;
                        if let Some(prev) = prev {
                            if prefix_eq(prev.text, lead_start, lead_start_len) {
                                amount = prev.indent;
                            } else if prefix_eq(prev.text, lead_middle, lead_middle_len) {
                                amount = prev.indent;
                                break;
                            } else if !prefix_eq(opener, lead_start, lead_start_len) {
                                continue;
                            }
                        }
                        if start_off != 0 {
                            amount = amount.saturating_add(start_off);
                        } else if start_align == Some(Align::Right) {
                            amount = amount.saturating_add(width(lead_start)).saturating_sub(width(lead_middle));
                        }
                        break;
                    }

                    if !on_middle && on_end {
                        amount = prev.map_or(0, |p| p.indent);
                        if leader.offset != 0 {
                            amount = amount.saturating_add(leader.offset);
                        } else if leader.align == Some(Align::Right) {
                            amount = amount.saturating_add(width(lead_start)).saturating_sub(width(lead_middle));
                        }
                        done = true;
                        break;
                    }
                }
                None => {}
            }
        }

        done.then_some(amount)
    }
}
