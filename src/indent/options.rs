//! Buffer-scoped indent settings

use super::comments::{CommentLeaders, DEFAULT_COMMENTS};
use super::config::{DEFAULT_SHIFTWIDTH, DEFAULT_TABSTOP, StyleConfig, StyleError};

/// Everything that stays fixed for one buffer: widths, the style string and the comment markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentOptions {
    /// Width of one indent level, used to resolve `s` suffixes in the style
    pub shiftwidth: i32,
    /// Width of a tab character
    pub tabstop: i32,
    /// Style string such as `>4,:0,(0`
    pub style: String,
    /// Comment marker string such as `s1:/*,mb:*,ex:*/,://`
    pub comments: String,
    /// Write indents with spaces only
    pub expand_tab: bool,
}

impl Default for IndentOptions {
    fn default() -> Self {
        Self {
            shiftwidth: DEFAULT_SHIFTWIDTH,
            tabstop: DEFAULT_TABSTOP,
            style: String::new(),
            comments: DEFAULT_COMMENTS.to_string(),
            expand_tab: true,
        }
    }
}

impl IndentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shiftwidth(mut self, shiftwidth: i32) -> Self {
        self.shiftwidth = shiftwidth;
        self
    }

    pub fn with_tabstop(mut self, tabstop: i32) -> Self {
        self.tabstop = tabstop;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn with_expand_tab(mut self, expand_tab: bool) -> Self {
        self.expand_tab = expand_tab;
        self
    }

    /// The style table, skipping tokens that do not parse.
    pub fn style_config(&self) -> StyleConfig {
        StyleConfig::parse(&self.style, self.shiftwidth, self.tabstop)
    }

    /// The style table, failing on the first token that does not parse.
    pub fn strict_style_config(&self) -> Result<StyleConfig, StyleError> {
        StyleConfig::parse_strict(&self.style, self.shiftwidth, self.tabstop)
    }

    pub fn comment_leaders(&self) -> CommentLeaders {
        CommentLeaders::parse(&self.comments)
    }

    /// Leading whitespace for an indent of `amount` screen columns.
    pub fn indent_string(&self, amount: u32) -> String {
        let amount = amount as usize;
        let tabstop = self.tabstop.max(1) as usize;
        if self.expand_tab {
            " ".repeat(amount)
        } else {
            let mut out = "\t".repeat(amount / tabstop);
            out.push_str(&" ".repeat(amount % tabstop));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Builder tests
    // ========================================

    #[test]
    fn test_default_options() {
        let opts = IndentOptions::default();
        assert_eq!(opts.shiftwidth, 4);
        assert_eq!(opts.tabstop, 8);
        assert!(opts.expand_tab);
        assert_eq!(opts.comments, DEFAULT_COMMENTS);
    }

    #[test]
    fn test_default_options_match_default_style() {
        assert_eq!(IndentOptions::default().style_config(), StyleConfig::default());
    }

    #[test]
    fn test_style_uses_shiftwidth() {
        let cfg = IndentOptions::new().with_shiftwidth(2).with_style("(s").style_config();
        assert_eq!(cfg.unclosed, 2);
        assert_eq!(cfg.level, 2);
    }

    #[test]
    fn test_strict_style_reports_bad_token() {
        let opts = IndentOptions::new().with_style(">4,Q5");
        assert!(opts.strict_style_config().is_err());
        assert_eq!(opts.style_config().level, 4);
    }

    // ========================================
    // Whitespace tests
    // ========================================

    #[test]
    fn test_indent_string_spaces() {
        assert_eq!(IndentOptions::default().indent_string(6), "      ");
    }

    #[test]
    fn test_indent_string_tabs() {
        let opts = IndentOptions::new().with_expand_tab(false).with_tabstop(4);
        assert_eq!(opts.indent_string(10), "\t\t  ");
        assert_eq!(opts.indent_string(0), "");
    }
}
