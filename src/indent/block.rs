//! Indent inside a `{ ... }` block
//!
//! The current line's indent comes from the lines above it in the same block. [`BlockScan`] walks up from
//! the current line one line per [`BlockScan::step`], carrying what it is looking for in [`Lookfor`], until a
//! line settles the amount or the walk reaches the line holding the block's `{`.

use super::buffer::{LineSource, Pos, at};
use super::classify::BaseclassCache;
use super::conditional::Pairing;
use super::context::Indenter;
use super::predicates::{ends_in_backslash, is_comment, skip_white};

/// How many lines above a column-0 `{` are searched for a `namespace` declaration.
const NAMESPACE_SEARCH_LINES: i64 = 20;

/// What the block scan is looking for on the lines above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookfor {
    /// The first statement above.
    Initial,
    /// The previous `case` label of this `switch`.
    Case,
    /// Any statement or label.
    Any,
    /// A terminated statement.
    Term,
    /// The start of an unterminated statement.
    Unterm,
    /// The previous `public:`-style scope declaration.
    ScopeDecl,
    /// A `case` label where the statement in between is not `break;`.
    NoBreak,
    /// The line that starts a C++ base-class list.
    CppBaseclass,
    /// The start of an enum body or an initializer list.
    EnumOrInit,
    /// A JavaScript object key.
    JsKey,
    /// The previous element of a JavaScript array literal.
    Comma,
}

/// Outcome of one step of the block scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanStep {
    Resolved(i32),
    Continue,
}

/// Where the block's `{` sits on its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BracePlacement {
    /// In column 0.
    InCol0,
    /// First on its line, after some indent.
    AtStart,
    /// After other code on the line.
    AtEnd,
}

pub(crate) struct BlockScan<'i, 'a, S: LineSource + ?Sized> {
    ind: &'i Indenter<'a, S>,
    theline: &'a [u8],
    cur: usize,
    brace: Pos,
    ourscope: usize,
    placement: BracePlacement,
    cursor: Pos,
    lookfor: Lookfor,
    lookfor_break: bool,
    lookfor_cpp_namespace: bool,
    js_cur_has_key: bool,
    amount: i32,
    scope_amount: i32,
    cont_amount: i32,
    ind_continuation: i32,
    added_to_amount: i32,
    whilelevel: i32,
    cache: BaseclassCache,
}

impl<'a, S: LineSource + ?Sized> Indenter<'a, S> {
    /// Indent of line `cur` (trimmed text `theline`) inside the block opened at `brace`.
    ///
    /// `else` and `while` lines that pair with an earlier `if` or `do` are handled by the caller.
    #[tracing::instrument(level = "trace", skip_all, fields(line = cur, brace = brace.lnum))]
    pub(crate) fn block_indent(&self, cur: usize, theline: &'a [u8], brace: Pos) -> i32 {
        let (cfg, lx) = (self.cfg, self.lexer);
        let ourscope = brace.lnum;
        let start = self.text(ourscope);

        let (mut amount, placement) = if at(start, skip_white(start, 0)) == b'{' {
            let placement = if at(start, 0) == b'{' {
                BracePlacement::InCol0
            } else {
                BracePlacement::AtStart
            };
            (self.vcol(brace), placement)
        } else {
            // line up with the start of a continued opener like `if (a &&\n b) {`
            let opener = lx
                .last_unmatched_close(start, b'(', b')')
                .and_then(|col| self.find_match_paren(Pos::new(ourscope, col), cfg.max_paren))
                .map_or(ourscope, |p| p.lnum);
            let amount = if (cfg.js != 0 || cfg.keep_case_label != 0) && lx.is_case_label(self.trimmed(ourscope), false) {
                self.indent(ourscope)
            } else if cfg.js != 0 {
                self.indent(opener)
            } else {
                self.skip_label(opener).0
            };
            (amount, BracePlacement::AtEnd)
        };

        if at(theline, 0) == b'}' {
            return amount.saturating_add(cfg.close_extra);
        }

        let mut lookfor_cpp_namespace = false;
        match placement {
            BracePlacement::InCol0 => {
                amount = cfg.open_left_imag;
                lookfor_cpp_namespace = true;
            }
            BracePlacement::AtStart => amount = amount.saturating_sub(cfg.open_extra).max(0),
            BracePlacement::AtEnd => {
                amount = amount.saturating_add(cfg.open_imag);
                if lx.is_namespace_decl(self.trimmed(ourscope)) {
                    amount = amount.saturating_add(cfg.cpp_namespace);
                }
            }
        }

        let mut lookfor_break = false;
        let lookfor = if lx.is_case_label(theline, false) {
            amount = amount.saturating_add(cfg.case);
            Lookfor::Case
        } else if lx.is_scope_decl_label(theline) {
            amount = amount.saturating_add(cfg.scope_decl);
            Lookfor::ScopeDecl
        } else {
            if cfg.case_break != 0 && lx.is_break_keyword(theline) {
                lookfor_break = true;
            }
            amount = amount.saturating_add(cfg.level);
            Lookfor::Initial
        };

        let scan = BlockScan {
            ind: self,
            theline,
            cur,
            brace,
            ourscope,
            placement,
            cursor: Pos::line_start(cur),
            lookfor,
            lookfor_break,
            lookfor_cpp_namespace,
            js_cur_has_key: cfg.js != 0 && lx.has_js_object_key(theline),
            amount,
            scope_amount: amount,
            cont_amount: 0,
            ind_continuation: cfg.continuation,
            added_to_amount: 0,
            whilelevel: 0,
            cache: BaseclassCache::default(),
        };
        scan.run()
    }
}

impl<'i, 'a, S: LineSource + ?Sized> BlockScan<'i, 'a, S> {
    pub(crate) fn run(mut self) -> i32 {
        loop {
            if let ScanStep::Resolved(amount) = self.step() {
                return amount;
            }
        }
    }

    fn resolved(&self) -> ScanStep {
        ScanStep::Resolved(self.amount)
    }

    fn opens_with_brace(&self) -> bool {
        at(self.theline, 0) == b'{'
    }

    /// Indent for a line that continues an unterminated statement.
    fn continuation(&self) -> i32 {
        if self.cont_amount > 0 {
            self.cont_amount
        } else {
            self.amount.saturating_add(self.ind_continuation)
        }
    }

    /// Examine the line above the cursor.
    pub(crate) fn step(&mut self) -> ScanStep {
        if self.cursor.lnum == 0 {
            return self.resolved();
        }
        let (ind, lx) = (self.ind, self.ind.lexer);
        self.cursor = Pos::line_start(self.cursor.lnum - 1);
        let lnum = self.cursor.lnum;

        if lnum <= self.ourscope {
            return self.at_scope_start();
        }

        if let Some(start) = ind.comment_start_above(lnum) {
            self.cursor.lnum = start.lnum + 1;
            return ScanStep::Continue;
        }

        let l = ind.text(lnum);
        let iscase = lx.is_case_label(l, false);
        if iscase || lx.is_scope_decl_label(l) {
            return self.on_label(l, iscase);
        }

        // skip whole nested blocks while looking for a label
        if matches!(self.lookfor, Lookfor::Case | Lookfor::ScopeDecl) {
            if let Some(col) = lx.last_unmatched_close(l, b'{', b'}') {
                if let Some(open) = ind.find_start_brace(Pos::new(lnum, col)) {
                    self.cursor.lnum = open.lnum + 1;
                }
            }
            return ScanStep::Continue;
        }

        if ind.cfg.js == 0 && ind.is_jump_label(lnum) {
            match lx.after_label(l) {
                Some(off) if !lx.no_code(l, off) => {}
                _ => return ScanStep::Continue,
            }
        }

        if let Some((hash, candidate)) = ind.preprocessor_continuation(lnum) {
            if let Some(amount) = candidate {
                self.amount = amount;
            }
            self.cursor.lnum = hash;
            return ScanStep::Continue;
        }
        if lx.no_code(l, 0) {
            return ScanStep::Continue;
        }

        if ind.cfg.cpp_baseclass != 0 && self.lookfor != Lookfor::Term && ind.is_cpp_baseclass_init(lnum, &mut self.cache) {
            if self.lookfor == Lookfor::Unterm {
                self.amount = self.continuation();
            } else if self.opens_with_brace() {
                // a `{` after an initializer list lines up with the declaration it belongs to
                self.lookfor = Lookfor::Unterm;
                self.ind_continuation = 0;
                return ScanStep::Continue;
            } else {
                self.amount = ind.baseclass_amount(lnum, self.cache.col);
            }
            return self.resolved();
        }
        if self.lookfor == Lookfor::CppBaseclass {
            return if lx.classify_terminator(l, true, false).is_some() {
                self.resolved()
            } else {
                ScanStep::Continue
            };
        }

        let terminated = lx.classify_terminator(l, false, true);

        if self.js_cur_has_key {
            self.js_cur_has_key = false;
            if terminated == Some(b',') {
                self.lookfor = Lookfor::JsKey;
            }
        }
        if self.lookfor == Lookfor::JsKey && lx.has_js_object_key(l) {
            self.amount = ind.indent(lnum);
            return self.resolved();
        }
        if self.lookfor == Lookfor::Comma {
            if self.brace.lnum >= lnum || terminated == Some(b',') {
                return self.resolved();
            }
            self.amount = ind.indent(lnum);
            if lnum - 1 == self.ourscope {
                return self.resolved();
            }
        }

        if terminated.is_none() || (self.lookfor != Lookfor::Unterm && terminated == Some(b',')) {
            return self.unterminated(l, terminated);
        }

        if let Some(while_line) = ind.while_of_do_end(terminated, lnum) {
            // `while (x);` ending a do-loop: find the `do` before looking further
            self.cursor = Pos::line_start(while_line);
            if matches!(self.lookfor, Lookfor::Unterm | Lookfor::EnumOrInit) {
                self.amount = self.continuation();
                return self.resolved();
            }
            if self.whilelevel == 0 {
                self.lookfor = Lookfor::Term;
                self.amount = ind.indent(while_line);
                if self.opens_with_brace() {
                    self.amount = self.amount.saturating_add(ind.cfg.open_extra);
                }
            }
            self.whilelevel += 1;
            return ScanStep::Continue;
        }

        self.terminated(l)
    }

    /// The walk reached the line with the block's `{` or went above it.
    fn at_scope_start(&mut self) -> ScanStep {
        let (ind, lx, cfg) = (self.ind, self.ind.lexer, self.ind.cfg);
        let lnum = self.cursor.lnum;

        match self.lookfor {
            Lookfor::EnumOrInit => {
                if lnum == 0 || (lnum as i64) < self.ourscope as i64 - i64::from(cfg.max_paren) {
                    if self.cont_amount > 0 {
                        self.amount = self.cont_amount;
                    } else if cfg.js == 0 {
                        self.amount = self.amount.saturating_add(self.ind_continuation);
                    }
                    return self.resolved();
                }
                if let Some(start) = ind.comment_start_above(lnum) {
                    self.cursor.lnum = start.lnum + 1;
                    return ScanStep::Continue;
                }
                if let Some((hash, candidate)) = ind.preprocessor_continuation(lnum) {
                    if let Some(amount) = candidate {
                        self.amount = amount;
                    }
                    self.cursor.lnum = hash;
                    return ScanStep::Continue;
                }
                let l = ind.text(lnum);
                if lx.no_code(l, 0) {
                    return ScanStep::Continue;
                }

                let terminated = lx.classify_terminator(l, false, true);
                if self.placement != BracePlacement::InCol0 || !ind.is_function_declaration(l, lnum, 0) {
                    if terminated == Some(b',') {
                        return self.resolved();
                    }
                    if terminated != Some(b';') && lx.is_initializer(l) {
                        return self.resolved();
                    }
                    if terminated.is_none() || terminated == Some(b'{') {
                        return ScanStep::Continue;
                    }
                }
                if terminated != Some(b';') {
                    let open = lx
                        .last_unmatched_close(l, b'(', b')')
                        .and_then(|col| ind.find_match_paren(Pos::new(lnum, col), cfg.max_paren))
                        .or_else(|| {
                            lx.last_unmatched_close(l, b'{', b'}')
                                .and_then(|col| ind.find_start_brace(Pos::new(lnum, col)))
                        });
                    if let Some(open) = open {
                        self.cursor.lnum = open.lnum + 1;
                        return ScanStep::Continue;
                    }
                }
                self.amount = self.continuation();
                self.resolved()
            }
            Lookfor::Unterm => {
                self.amount = self.continuation();
                self.resolved()
            }
            _ => {
                if !matches!(self.lookfor, Lookfor::Term | Lookfor::CppBaseclass | Lookfor::Comma) {
                    self.amount = self.scope_amount;
                    if self.opens_with_brace() {
                        self.amount = self.amount.saturating_add(cfg.open_extra);
                        self.added_to_amount = cfg.open_extra;
                    }
                }
                if !self.lookfor_cpp_namespace {
                    return self.resolved();
                }

                if lnum == self.ourscope {
                    return ScanStep::Continue;
                }
                if lnum == 0 || (lnum as i64) < self.ourscope as i64 - NAMESPACE_SEARCH_LINES {
                    return self.resolved();
                }
                if let Some(start) = ind.comment_start_above(lnum) {
                    self.cursor.lnum = start.lnum + 1;
                    return ScanStep::Continue;
                }
                if let Some((hash, _)) = ind.preprocessor_continuation(lnum) {
                    self.cursor.lnum = hash;
                    return ScanStep::Continue;
                }
                let l = ind.text(lnum);
                if lx.is_namespace_decl(l) {
                    self.amount = self.amount.saturating_add(cfg.cpp_namespace).saturating_sub(self.added_to_amount);
                    return self.resolved();
                }
                if lx.no_code(l, 0) {
                    return ScanStep::Continue;
                }
                self.resolved()
            }
        }
    }

    /// A `case` or scope declaration label on the cursor line.
    fn on_label(&mut self, l: &[u8], iscase: bool) -> ScanStep {
        let (ind, lx, cfg) = (self.ind, self.ind.lexer, self.ind.cfg);
        let lnum = self.cursor.lnum;

        if self.lookfor == Lookfor::CppBaseclass {
            return self.resolved();
        }
        if self.whilelevel > 0 {
            return ScanStep::Continue;
        }
        if matches!(self.lookfor, Lookfor::Unterm | Lookfor::EnumOrInit) {
            self.amount = self.continuation();
            return self.resolved();
        }

        // a sibling label of the same block lines the current label up with it
        if (iscase && (self.lookfor == Lookfor::Case || self.lookfor_break))
            || (!iscase && self.lookfor == Lookfor::ScopeDecl)
        {
            match ind.find_start_brace(self.cursor) {
                Some(open) if open.lnum != self.ourscope => return ScanStep::Continue,
                _ => {
                    self.amount = ind.indent(lnum);
                    return self.resolved();
                }
            }
        }

        let after = ind.indent_after_label(lnum);
        if self.lookfor == Lookfor::Term {
            if after != 0 {
                self.amount = after;
            }
            if !self.lookfor_break {
                return self.resolved();
            }
        }

        if after != 0 {
            self.amount = after;
            if let Some(off) = lx.after_label(l) {
                if lx.is_block_word(&l[off..]) {
                    if self.opens_with_brace() {
                        self.amount = self.amount.saturating_add(cfg.open_extra);
                    } else {
                        self.amount = self.amount.saturating_add(cfg.level).saturating_add(cfg.no_brace);
                    }
                }
            }
            return self.resolved();
        }

        self.scope_amount = ind.indent(lnum).saturating_add(if iscase { cfg.case_code } else { cfg.scope_decl_code });
        self.lookfor = if cfg.case_break != 0 { Lookfor::NoBreak } else { Lookfor::Any };
        ScanStep::Continue
    }

    /// A line that does not end a statement, or one ending in a comma.
    fn unterminated(&mut self, l: &[u8], terminated: Option<u8>) -> ScanStep {
        let (ind, lx, cfg) = (self.ind, self.ind.lexer, self.ind.cfg);
        let lnum = self.cursor.lnum;

        if self.lookfor != Lookfor::EnumOrInit && (at(l, skip_white(l, 0)) == b'[' || l.last() == Some(&b'[')) {
            self.amount = self.amount.saturating_add(self.ind_continuation);
        }

        // move to the line holding the `(` of a parenthesis closed on this line
        self.cursor.col = lx.last_unmatched_close(l, b'(', b')').unwrap_or(0);
        let mut open = ind
            .find_match_paren(self.cursor, ind.corrected_max_paren(self.cur, lnum))
            .filter(|p| *p >= self.brace);
        if open.is_none() && terminated == Some(b',') {
            let close = lx.last_unmatched_close(l, b'{', b'}');
            self.cursor.col = close.unwrap_or(0);
            if close.is_some() {
                open = ind.find_start_brace(self.cursor);
            }
        }
        if let Some(open) = open {
            self.cursor = open;
            let ol = ind.text(open.lnum);
            if lx.is_case_label(ol, false) || lx.is_scope_decl_label(ol) {
                self.cursor = Pos::line_start(open.lnum + 1);
                return ScanStep::Continue;
            }
        }

        if terminated == Some(b',') {
            while self.cursor.lnum > 1 && ends_in_backslash(ind.text(self.cursor.lnum - 1)) {
                self.cursor = Pos::line_start(self.cursor.lnum - 1);
            }
        }

        let lnum = self.cursor.lnum;
        let line = ind.text(lnum);
        let (cur_amount, off) = if cfg.js != 0 {
            (ind.indent(lnum), 0)
        } else {
            ind.skip_label(lnum)
        };
        let rest = &line[off..];
        let rest_trimmed = &rest[skip_white(rest, 0).min(rest.len())..];

        // `{` of a block whose opener is continued over several lines
        if terminated != Some(b',') && self.lookfor != Lookfor::Term && self.opens_with_brace() {
            self.amount = cur_amount;
            if at(rest_trimmed, 0) != b'{' {
                self.amount = self.amount.saturating_add(cfg.open_extra);
            }
            if cfg.cpp_baseclass != 0 && cfg.js == 0 {
                self.lookfor = Lookfor::CppBaseclass;
                return ScanStep::Continue;
            }
            return self.resolved();
        }

        if lx.is_block_word(rest) || lx.is_else_keyword(rest_trimmed) {
            if matches!(self.lookfor, Lookfor::Unterm | Lookfor::EnumOrInit) {
                self.amount = self.continuation();
                return self.resolved();
            }

            self.amount = cur_amount;
            if self.opens_with_brace() {
                self.amount = self.amount.saturating_add(cfg.open_extra);
            }
            if self.lookfor != Lookfor::Term {
                self.amount = self.amount.saturating_add(cfg.level).saturating_add(cfg.no_brace);
                return self.resolved();
            }

            // statement after an unbraced if/else/do: carry on from the construct's own start
            let tl = ind.trimmed(lnum);
            if lx.is_do_keyword(tl) {
                if self.whilelevel == 0 {
                    return self.resolved();
                }
                self.whilelevel -= 1;
            }
            if lx.is_else_keyword(tl) && self.whilelevel == 0 {
                let mut from = self.cursor;
                if tl.first() == Some(&b'}') {
                    from.col = line.len() - tl.len() + 1;
                }
                let Some(open) = ind.find_start_brace(from) else {
                    return self.resolved();
                };
                let Some(if_line) = ind.match_conditional(Pairing::If, open.lnum, lnum) else {
                    return self.resolved();
                };
                self.cursor = Pos::line_start(if_line);
            }
            return ScanStep::Continue;
        }

        match self.lookfor {
            Lookfor::Unterm => {
                if terminated == Some(b',') {
                    self.amount = self.amount.saturating_add(self.ind_continuation);
                }
                return self.resolved();
            }
            Lookfor::EnumOrInit => {
                if terminated == Some(b',') {
                    if cfg.cpp_baseclass == 0 {
                        return self.resolved();
                    }
                    self.lookfor = Lookfor::CppBaseclass;
                    return ScanStep::Continue;
                }
                self.amount = self.amount.min(cur_amount);
            }
            _ => {
                self.amount = cur_amount;
                let n = line.len();
                if terminated == Some(b',') && (at(line, skip_white(line, 0)) == b']' || (n >= 2 && line[n - 2] == b']')) {
                    return self.resolved();
                }

                if self.lookfor == Lookfor::Initial && terminated == Some(b',') {
                    if cfg.js != 0 {
                        if is_comment(line, skip_white(line, 0)) {
                            return self.resolved();
                        }
                        self.lookfor = Lookfor::Comma;
                        if let Some(open) = ind.find_match_char(b'[', self.cursor, cfg.max_paren) {
                            if open.lnum + 1 == self.cursor.lnum {
                                return self.resolved();
                            }
                            self.ourscope = open.lnum;
                        }
                    } else {
                        self.lookfor = Lookfor::EnumOrInit;
                        self.cont_amount = ind.first_id_amount(lnum);
                    }
                } else {
                    if self.lookfor == Lookfor::Initial && ends_in_backslash(line) {
                        self.cont_amount = ind.equal_amount(lnum);
                    }
                    if !matches!(self.lookfor, Lookfor::Term | Lookfor::JsKey | Lookfor::Comma) {
                        self.lookfor = Lookfor::Unterm;
                    }
                }
            }
        }
        ScanStep::Continue
    }

    /// A line that ends a statement with `;` or `}`.
    fn terminated(&mut self, l: &[u8]) -> ScanStep {
        let (ind, lx, cfg) = (self.ind, self.ind.lexer, self.ind.cfg);
        let lnum = self.cursor.lnum;

        if self.lookfor == Lookfor::NoBreak && lx.is_break_keyword(ind.trimmed(lnum)) {
            self.lookfor = Lookfor::Any;
            return ScanStep::Continue;
        }

        if self.whilelevel > 0 {
            let code = &l[lx.code_start(l).min(l.len())..];
            if lx.is_do_keyword(code) {
                self.amount = ind.indent(lnum);
                self.whilelevel -= 1;
                return ScanStep::Continue;
            }
        }

        if matches!(self.lookfor, Lookfor::Unterm | Lookfor::EnumOrInit) {
            self.amount = self.continuation();
            return self.resolved();
        }

        if self.lookfor == Lookfor::Term {
            if !self.lookfor_break && self.whilelevel == 0 {
                return self.resolved();
            }
            return ScanStep::Continue;
        }

        // Found a terminated statement: line up with the start of it. Statements that end in a `}` need the
        // line of the matching `{`, which may itself end an `if` that is followed by the `else`.
        loop {
            let line = ind.text(self.cursor.lnum);
            if let Some(col) = lx.last_unmatched_close(line, b'(', b')') {
                self.cursor.col = col;
                if let Some(open) = ind.find_match_paren(self.cursor, cfg.max_paren) {
                    self.cursor = open;
                    let ol = ind.text(open.lnum);
                    if lx.is_case_label(ol, false) || lx.is_scope_decl_label(ol) {
                        self.cursor = Pos::line_start(open.lnum + 1);
                        return ScanStep::Continue;
                    }
                }
            }

            let lnum = self.cursor.lnum;
            let line = ind.text(lnum);
            let iscase = cfg.keep_case_label != 0 && lx.is_case_label(line, false);
            let (amount, off) = ind.skip_label(lnum);
            let rest = &line[off..];
            let rest = &rest[skip_white(rest, 0).min(rest.len())..];

            self.amount = amount;
            if self.opens_with_brace() {
                self.amount = self.amount.saturating_add(cfg.open_extra);
            }
            if at(rest, 0) == b'{' {
                self.amount = self.amount.saturating_sub(cfg.open_extra);
            }
            self.lookfor = if iscase { Lookfor::Any } else { Lookfor::Term };

            if self.lookfor == Lookfor::Term && at(rest, 0) != b'}' && lx.is_else_keyword(rest) && self.whilelevel == 0 {
                let Some(open) = ind.find_start_brace(self.cursor) else {
                    return self.resolved();
                };
                let Some(if_line) = ind.match_conditional(Pairing::If, open.lnum, lnum) else {
                    return self.resolved();
                };
                self.cursor = Pos::line_start(if_line);
                return ScanStep::Continue;
            }

            let close = lx.last_unmatched_close(line, b'{', b'}');
            self.cursor.col = close.unwrap_or(0);
            if close.is_some() {
                if let Some(open) = ind.find_start_brace(self.cursor) {
                    self.cursor = open;
                    let ol = ind.text(open.lnum);
                    let code = &ol[lx.code_start(ol).min(ol.len())..];
                    if at(code, 0) == b'}' || !lx.is_else_keyword(code) {
                        continue;
                    }
                    self.cursor = Pos::line_start(open.lnum + 1);
                }
            }
            return ScanStep::Continue;
        }
    }
}
