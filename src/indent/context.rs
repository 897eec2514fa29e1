//! Per-call engine context
//!
//! An [`Indenter`] bundles everything one indent computation reads: the lines, the style and the comment
//! markers. It holds no mutable state. Scan positions are plain [`Pos`] values passed between its methods.

use super::buffer::{LineSource, Pos, indent_of, virtual_col};
use super::comments::CommentLeaders;
use super::config::StyleConfig;
use super::predicates::{Lexer, skip_white};

pub(crate) struct Indenter<'a, S: LineSource + ?Sized> {
    pub src: &'a S,
    pub cfg: &'a StyleConfig,
    pub leaders: &'a CommentLeaders,
    pub lexer: Lexer,
}

impl<'a, S: LineSource + ?Sized> Indenter<'a, S> {
    pub fn new(src: &'a S, cfg: &'a StyleConfig, leaders: &'a CommentLeaders) -> Self {
        Self {
            src,
            cfg,
            leaders,
            lexer: Lexer::new(cfg.hash_comment != 0),
        }
    }

    pub fn line_count(&self) -> usize {
        self.src.line_count()
    }

    /// Raw bytes of line `lnum`.
    pub fn text(&self, lnum: usize) -> &'a [u8] {
        self.src.line(lnum).as_bytes()
    }

    /// Bytes of line `lnum` after its leading blanks.
    pub fn trimmed(&self, lnum: usize) -> &'a [u8] {
        let line = self.text(lnum);
        &line[skip_white(line, 0).min(line.len())..]
    }

    fn tabstop(&self) -> usize {
        self.cfg.tabstop.max(1) as usize
    }

    /// Indent of line `lnum` in screen columns.
    pub fn indent(&self, lnum: usize) -> i32 {
        indent_of(self.src.line(lnum), self.tabstop()) as i32
    }

    /// Screen column of `pos`.
    pub fn vcol(&self, pos: Pos) -> i32 {
        virtual_col(self.src.line(pos.lnum), pos.col, self.tabstop()) as i32
    }

    /// Whether line `lnum` is empty or only blanks.
    pub fn is_blank(&self, lnum: usize) -> bool {
        self.trimmed(lnum).is_empty()
    }
}
