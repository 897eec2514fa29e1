//! C-family auto-indentation
//!
//! [`compute_indent`] suggests the indent of one line from the lines above it, the way an editor's C indenter
//! does when a line is typed: no syntax tree, just a bounded backward scan over braces, parentheses, labels,
//! comments and statement ends. The rest of this module applies it to whole files.
//!
//! ```
//! use cindent::indent::{IndentOptions, reindent_source};
//!
//! let out = reindent_source("int f() {\nreturn 0;\n}\n", &IndentOptions::default());
//! assert_eq!(out, "int f() {\n    return 0;\n}\n");
//! ```

mod block;
mod buffer;
mod classify;
mod comments;
mod conditional;
mod config;
mod context;
mod engine;
mod locator;
mod options;
mod predicates;

pub use buffer::{LineSource, Pos, TextBuffer, find_match, indent_of, virtual_col};
pub use comments::{Align, CommentLeader, CommentLeaders, CommentPart, DEFAULT_COMMENTS};
pub use config::{StyleConfig, StyleError};
pub use options::IndentOptions;

use context::Indenter;

/// Suggested indent, in screen columns, of line `lnum` (1-based).
///
/// Reads `src` only. Line 1 and line numbers outside the buffer get 0.
#[tracing::instrument(skip_all, fields(line = lnum))]
pub fn compute_indent<S: LineSource + ?Sized>(
    src: &S,
    style: &StyleConfig,
    comments: &CommentLeaders,
    lnum: usize,
) -> u32 {
    Indenter::new(src, style, comments).compute(lnum).max(0) as u32
}

/// Reindent every line of `source`, top to bottom.
///
/// Each line is measured against the already reindented lines above it. Blank lines lose their whitespace.
/// A missing final newline stays missing.
pub fn reindent_source(source: &str, opts: &IndentOptions) -> String {
    let style = opts.style_config();
    let comments = opts.comment_leaders();
    let mut buf = TextBuffer::from_text(source);

    for lnum in 1..=buf.line_count() {
        let line = buf.line(lnum);
        let body = line.trim_start_matches([' ', '\t']);
        if body.is_empty() {
            if !line.is_empty() {
                buf.set_line(lnum, String::new());
            }
            continue;
        }
        let amount = compute_indent(&buf, &style, &comments, lnum);
        let rewritten = format!("{}{}", opts.indent_string(amount), body);
        if rewritten != buf.line(lnum) {
            buf.set_line(lnum, rewritten);
        }
    }

    let mut out = buf.to_text();
    if !source.is_empty() && !source.ends_with('\n') {
        out.pop();
    }
    out
}

/// Whether `source` is already indented the way [`reindent_source`] would indent it.
pub fn check_indented(source: &str, opts: &IndentOptions) -> bool {
    reindent_source(source, opts) == source
}

/// Line-by-line differences between `source` and its reindented form, or `None` when there are none.
pub fn indent_diff(source: &str, opts: &IndentOptions) -> Option<String> {
    let reindented = reindent_source(source, opts);
    if reindented == source {
        return None;
    }

    let mut diff = String::new();
    for (i, (orig, new)) in source.lines().zip(reindented.lines()).enumerate() {
        if orig != new {
            diff.push_str(&format!("-{:4} | {}\n", i + 1, orig));
            diff.push_str(&format!("+{:4} | {}\n", i + 1, new));
        }
    }
    Some(diff)
}
