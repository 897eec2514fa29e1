#![forbid(unsafe_code)]
//! Heuristic auto-indentation for C-family source
//!
//! cindent suggests the indent of a line of C, C++, Java or JavaScript from the lines above it, following the
//! behavior of a long-standing editor C indenter. It does not parse: it scans backwards over braces,
//! parentheses, labels and comments, with every search bounded by the style configuration.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Engine**: The indent engine never fails. Exhausted searches fall back to a simpler rule and, at worst,
//!   to an indent of 0.

pub mod cli;
pub mod indent;

pub use indent::{
    CommentLeaders, IndentOptions, LineSource, StyleConfig, StyleError, TextBuffer, check_indented, compute_indent,
    indent_diff, reindent_source,
};
