//! Indent computation for one line
//!
//! [`Indenter::compute`] classifies the line's context in a fixed order: preprocessor line, jump label, line
//! comment continuation, block comment interior, closing `]`, inside an unclosed `(`, inside a `{` block,
//! and otherwise top level. The first context that applies decides the indent.

use super::buffer::{LineSource, Pos, at, find_match};
use super::classify::BaseclassCache;
use super::comments::PrevLine;
use super::conditional::Pairing;
use super::context::Indenter;
use super::predicates::{ends_in_backslash, is_comment, is_line_comment, line_comment_col, skip_white};

impl<'a, S: LineSource + ?Sized> Indenter<'a, S> {
    /// Indent in screen columns for line `cur`, never negative.
    #[tracing::instrument(level = "debug", skip_all, fields(line = cur))]
    pub(crate) fn compute(&self, cur: usize) -> i32 {
        if cur <= 1 || cur > self.line_count() {
            return 0;
        }
        let amount = self.compute_raw(cur).max(0);
        tracing::debug!(amount, "computed indent");
        amount
    }

    fn compute_raw(&self, cur: usize) -> i32 {
        let cfg = self.cfg;
        let theline = self.trimmed(cur);
        let original_is_label = self.is_jump_label(cur);
        let comment_pos = self.comment_start_above(cur);

        if at(theline, 0) == b'#' {
            return cfg.hash_comment;
        }

        if original_is_label && cfg.js == 0 && cfg.jump_label < 0 {
            return 0;
        }

        if is_line_comment(theline, 0) {
            let above = self
                .find_line_comment(cur)
                .or_else(|| line_comment_col(self.text(cur - 1)).map(|col| Pos::new(cur - 1, col)));
            if let Some(pos) = above {
                return self.vcol(pos);
            }
        }

        if !is_comment(theline, 0) {
            if let Some(opener) = comment_pos {
                return self.block_comment_indent(cur, theline, opener);
            }
        }

        if at(theline, 0) == b']' {
            if let Some(open) = self.find_match_char(b'[', Pos::line_start(cur), cfg.max_paren) {
                return self.indent(open.lnum);
            }
        }

        let from = Pos::line_start(cur);
        let paren = self.find_match_paren(from, cfg.max_paren);
        let brace = self.find_start_brace(from);
        let enclosing = match (paren, brace) {
            (Some(p), Some(b)) if b > p => Enclosing::Brace(b),
            (Some(p), _) => Enclosing::Paren(p),
            (None, Some(b)) => Enclosing::Brace(b),
            (None, None) => Enclosing::TopLevel,
        };
        tracing::trace!(?enclosing, "enclosing construct");

        let mut amount = match enclosing {
            Enclosing::Paren(p) => self.paren_indent(cur, theline, p),
            Enclosing::Brace(b) => {
                if at(theline, 0) != b'}' {
                    if let Some(line) = self.pairing_target(cur, theline, b.lnum) {
                        return self.indent(line);
                    }
                }
                self.block_indent(cur, theline, b)
            }
            Enclosing::TopLevel => {
                if let Some(line) = self.pairing_target(cur, theline, 0) {
                    return self.indent(line);
                }
                return self.top_level_indent(cur, theline);
            }
        };

        if is_comment(theline, 0) {
            amount = amount.saturating_add(cfg.comment);
        }
        if cfg.jump_label > 0 && original_is_label {
            amount = amount.saturating_sub(cfg.jump_label);
        }
        amount
    }

    /// An `else` or a `while` of a `do` lines up with the statement it belongs to.
    fn pairing_target(&self, cur: usize, theline: &[u8], scope: usize) -> Option<usize> {
        let lx = self.lexer;
        if lx.is_else_keyword(theline) {
            self.match_conditional(Pairing::If, scope, cur)
        } else if self.is_while_of_do(theline, cur) {
            self.match_conditional(Pairing::Do, scope, cur)
        } else {
            None
        }
    }

    /// Indent of a line inside a block comment that starts at `opener`.
    fn block_comment_indent(&self, cur: usize, theline: &[u8], opener: Pos) -> i32 {
        let cfg = self.cfg;
        let opener_col = self.vcol(opener);
        let prev = PrevLine {
            text: self.trimmed(cur - 1),
            indent: self.indent(cur - 1),
        };
        let opener_text = &self.text(opener.lnum)[opener.col..];
        if let Some(amount) = self.leaders.three_part_indent(theline, Some(prev), opener_text, opener_col) {
            return amount;
        }
        if at(theline, 0) == b'*' {
            return opener_col + 1;
        }

        // follow the previous non-blank comment line
        if let Some(lnum) = (opener.lnum + 1..cur).rev().find(|&l| !self.is_blank(l)) {
            return self.indent(lnum);
        }

        let line = self.text(opener.lnum);
        let nothing_after = at(line, opener.col + 2) == 0;
        let col = if cfg.in_comment2 == 0 && !nothing_after {
            skip_white(line, opener.col + 2)
        } else {
            opener.col
        };
        let mut amount = self.vcol(Pos::new(opener.lnum, col));
        if cfg.in_comment2 != 0 || nothing_after {
            amount = amount.saturating_add(cfg.in_comment);
        }
        amount
    }

    /// Indent of line `cur` inside the parenthesis opened at `paren`.
    fn paren_indent(&self, cur: usize, theline: &[u8], paren: Pos) -> i32 {
        let (cfg, lx) = (self.cfg, self.lexer);
        let closing = at(theline, 0) == b')';
        let mut cur_amount: Option<i32> = None;
        let mut amount: Option<i32> = None;

        if closing && cfg.paren_prev != 0 {
            amount = Some(self.indent(cur - 1));
        } else {
            // line up with an earlier line that is inside the same parenthesis
            let mut next = cur - 1;
            while next > paren.lnum {
                let lnum = next;
                next = lnum - 1;
                let l = self.trimmed(lnum);
                if lx.no_code(l, 0) {
                    continue;
                }
                if let Some((hash, candidate)) = self.preprocessor_continuation(lnum) {
                    if candidate.is_some() {
                        amount = candidate;
                    }
                    next = hash - 1;
                    continue;
                }
                if let Some(start) = self.comment_start_above(lnum) {
                    next = start.lnum;
                    continue;
                }
                let found = self.find_match_paren(Pos::line_start(lnum), self.corrected_max_paren(cur, lnum));
                if found == Some(paren) {
                    let indent = self.indent(lnum);
                    if closing {
                        if lnum != paren.lnum && cur_amount.is_none_or(|c| c > indent) {
                            cur_amount = Some(indent);
                        }
                    } else {
                        amount = Some(indent);
                    }
                    break;
                }
            }
        }

        match amount {
            Some(amount) => amount,
            None => self.align_in_paren(paren, closing, cur_amount),
        }
    }

    /// Indent relative to the unclosed `(` itself, when no earlier line in the parenthesis decides it.
    fn align_in_paren(&self, paren: Pos, closing: bool, mut cur_amount: Option<i32>) -> i32 {
        let (cfg, lx) = (self.cfg, self.lexer);
        let mut pp = paren;
        let pline = self.text(paren.lnum);

        let mut is_if_for_while = false;
        if cfg.if_for_while != 0 {
            let mut outermost = pp;
            while let Some(p) = self.find_match_paren(outermost, cfg.max_paren) {
                if p.lnum != outermost.lnum {
                    break;
                }
                outermost = p;
            }
            is_if_for_while = lx.is_if_for_while_before(self.text(outermost.lnum), outermost.col);
        }

        let (mut amount, off) = self.skip_label(paren.lnum);
        let look_col = skip_white(pline, off);
        let look_is_paren = at(pline, look_col) == b'(';

        // the line starts with a parenthesized group that closes before our paren: ignore that group
        let mut ignore_paren_col = 0;
        if look_is_paren {
            if let Some(close) = find_match(self.src, Pos::new(paren.lnum, look_col + 1), b')', cfg.paren_bound(), false) {
                if close.lnum == paren.lnum && close.col < paren.col {
                    ignore_paren_col = close.col + 1;
                }
            }
        }

        let align_to_paren =
            (cfg.unclosed == 0 && !is_if_for_while) || (cfg.unclosed_no_ignore == 0 && look_is_paren && ignore_paren_col == 0);

        if closing || align_to_paren {
            if !closing {
                cur_amount = None;
                if cfg.unclosed_wrapped != 0 && lx.ends_in(pline, b"(", None) {
                    let mut levels = 1;
                    for &c in &pline[..pp.col] {
                        match c {
                            b'(' | b'{' => levels += 1,
                            b')' | b'}' if levels > 1 => levels -= 1,
                            _ => {}
                        }
                    }
                    pp.col = 0;
                    amount = amount.saturating_add(cfg.unclosed_wrapped.saturating_mul(levels));
                } else if cfg.unclosed_white_ok != 0 {
                    pp.col += 1;
                } else {
                    let col = skip_white(pline, pp.col + 1);
                    pp.col = if at(pline, col) != 0 { col } else { pp.col + 1 };
                }
            }
            if pp.col > 0 {
                let col = self.vcol(pp);
                if cur_amount.is_none_or(|c| c > col) {
                    cur_amount = Some(col);
                }
            }
        }

        if closing && cfg.matching_paren != 0 {
            // line up with the line of the matching `(`
        } else if align_to_paren {
            if let Some(c) = cur_amount {
                amount = c;
            }
        } else {
            // add the indent for each unclosed `(` between the line start and ours
            let mut open_col = Some(pp.col);
            let mut i = pp.col;
            while i > ignore_paren_col {
                i -= 1;
                match at(pline, i) {
                    b'(' => {
                        amount = amount.saturating_add(cfg.unclosed2);
                        open_col = Some(i);
                    }
                    b')' => {
                        amount = amount.saturating_sub(cfg.unclosed2);
                        open_col = None;
                    }
                    _ => {}
                }
            }
            amount = amount.saturating_add(match open_col {
                None => cfg.unclosed,
                Some(col) => {
                    if self.find_match_paren_after_brace(Pos::new(pp.lnum, col), cfg.max_paren).is_some() {
                        cfg.unclosed2
                    } else if is_if_for_while {
                        cfg.if_for_while
                    } else {
                        cfg.unclosed
                    }
                }
            });
            if let Some(c) = cur_amount {
                amount = amount.min(c);
            }
        }
        amount
    }

    /// Indent of a line that is not inside any parenthesis or block.
    fn top_level_indent(&self, cur: usize, theline: &[u8]) -> i32 {
        let (cfg, lx) = (self.cfg, self.lexer);

        if at(theline, 0) == b'{' {
            return cfg.first_open;
        }

        // a return type on its own line above a function header
        if cur < self.line_count()
            && !lx.no_code(theline, 0)
            && !theline.contains(&b'{')
            && !theline.contains(&b'}')
            && !lx.ends_in(theline, b":", None)
            && !lx.ends_in(theline, b",", None)
            && self.is_function_declaration(self.text(cur + 1), cur + 1, cur + 1)
            && lx.classify_terminator(theline, false, true).is_none()
        {
            return cfg.func_type;
        }

        let mut amount = self.top_level_scan(cur);

        if is_comment(theline, 0) {
            amount = amount.saturating_add(cfg.comment);
        }
        if ends_in_backslash(self.text(cur - 1)) {
            let value = self.equal_amount(cur - 1);
            if value > 0 {
                amount = value;
            } else if value == 0 {
                amount = amount.saturating_add(cfg.continuation);
            }
        }
        amount
    }

    /// Walk up from `cur` to the line that decides a top-level indent.
    fn top_level_scan(&self, cur: usize) -> i32 {
        let (cfg, lx) = (self.cfg, self.lexer);
        let mut cache = BaseclassCache::default();
        let mut amount = 0;
        let mut lnum = cur;

        while lnum > 1 {
            lnum -= 1;
            if let Some(start) = self.comment_start_above(lnum) {
                lnum = start.lnum + 1;
                continue;
            }
            if cfg.cpp_baseclass != 0 && self.is_cpp_baseclass_init(lnum, &mut cache) {
                return self.baseclass_amount(lnum, cache.col);
            }
            if let Some((hash, candidate)) = self.preprocessor_continuation(lnum) {
                if let Some(c) = candidate {
                    amount = c;
                }
                lnum = hash;
                continue;
            }
            let l = self.text(lnum);
            if lx.no_code(l, 0) {
                continue;
            }

            // a declaration or macro continued onto the current line
            let ends_in_comma = lx.ends_in(l, b",", None);
            if ends_in_comma || ends_in_backslash(l) {
                let mut start = lx
                    .last_unmatched_close(l, b'(', b')')
                    .and_then(|col| self.find_match_paren(Pos::new(lnum, col), cfg.max_paren))
                    .map_or(lnum, |p| p.lnum);
                if ends_in_comma {
                    while start > 1 && ends_in_backslash(self.text(start - 1)) {
                        start -= 1;
                    }
                }
                let mut amount = self.indent(start);
                if amount == 0 {
                    amount = self.first_id_amount(start);
                }
                if amount == 0 {
                    amount = cfg.continuation;
                }
                return amount;
            }

            if self.is_function_declaration(self.text(cur), cur, 0) {
                return amount;
            }
            if at(l, skip_white(l, 0)) == b'}' || lx.ends_in(l, b"};", None) {
                return amount;
            }
            if lx.ends_in(l, b"[", None) {
                return self.indent(lnum).saturating_add(cfg.continuation);
            }

            // a lone `;` after `}` ends a definition like `struct x {\n}\n;`
            let look = skip_white(l, 0);
            if at(l, look) == b';' && lx.no_code(l, look + 1) {
                let mut back = lnum;
                let mut prev = l;
                while back > 1 {
                    back -= 1;
                    prev = self.text(back);
                    if lx.no_code(prev, 0) {
                        continue;
                    }
                    if let Some((hash, candidate)) = self.preprocessor_continuation(back) {
                        if let Some(c) = candidate {
                            amount = c;
                        }
                        back = hash;
                        prev = self.text(hash);
                        continue;
                    }
                    break;
                }
                if lx.ends_in(prev, b"}", None) {
                    return amount;
                }
            }

            if self.is_function_declaration(l, lnum, 0) {
                return cfg.param;
            }

            // the end of a declaration continued with commas or backslashes
            if lx.ends_in(l, b";", None) {
                let before = self.text(lnum - 1);
                if lx.ends_in(before, b",", None) || ends_in_backslash(before) {
                    return amount;
                }
            }

            let from = Pos::new(lnum, lx.last_unmatched_close(l, b'(', b')').unwrap_or(0));
            let start = self.find_match_paren(from, cfg.max_paren).map_or(lnum, |p| p.lnum);
            return self.indent(start);
        }
        amount
    }
}

/// The innermost construct around the line being indented.
#[derive(Debug, Clone, Copy)]
enum Enclosing {
    Paren(Pos),
    Brace(Pos),
    TopLevel,
}
