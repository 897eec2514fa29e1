//! Define the reserved-word vocabulary the indentation heuristics recognise.
//!
//! This module is the single source of truth for the words cindent treats specially: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - The table is **pure** (no IO/side effects); the engine decides what a match means in context.
//!
//! ## Examples
//! ```rust
//! use cindent_core::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("while"), Some(KeywordId::While));
//! assert_eq!(keywords::as_str(KeywordId::While), "while");
//! ```

/// Stable identifier for every recognised word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Block openers
    If,
    Else,
    While,
    Do,
    For,
    Switch,

    // Labels / jumps
    Case,
    Default,
    Break,

    // Scope declarations
    Public,
    Protected,
    Private,

    // Declarations
    Namespace,
    Inline,
    Export,
    Class,
    Struct,
    Enum,
    Typedef,
    Static,

    // Type-name prefixes
    Unsigned,
    Signed,
    Int,
    Long,
    Short,
    Char,
}

/// High-level grouping of a keyword.
///
/// ## Notes
/// - [`KeywordCategory::Block`] words start a statement whose body may be a single unbraced line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Block,
    Label,
    ScopeDecl,
    Declaration,
    TypeName,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering of the [`KeywordCategory::Block`] and [`KeywordCategory::ScopeDecl`] entries is the order in which
///   the engine tries them.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::If, "if", KeywordCategory::Block),
    info(KeywordId::Else, "else", KeywordCategory::Block),
    info(KeywordId::While, "while", KeywordCategory::Block),
    info(KeywordId::Do, "do", KeywordCategory::Block),
    info(KeywordId::For, "for", KeywordCategory::Block),
    info(KeywordId::Switch, "switch", KeywordCategory::Block),
    info(KeywordId::Case, "case", KeywordCategory::Label),
    info(KeywordId::Default, "default", KeywordCategory::Label),
    info(KeywordId::Break, "break", KeywordCategory::Label),
    info(KeywordId::Public, "public", KeywordCategory::ScopeDecl),
    info(KeywordId::Protected, "protected", KeywordCategory::ScopeDecl),
    info(KeywordId::Private, "private", KeywordCategory::ScopeDecl),
    info(KeywordId::Namespace, "namespace", KeywordCategory::Declaration),
    info(KeywordId::Inline, "inline", KeywordCategory::Declaration),
    info(KeywordId::Export, "export", KeywordCategory::Declaration),
    info(KeywordId::Class, "class", KeywordCategory::Declaration),
    info(KeywordId::Struct, "struct", KeywordCategory::Declaration),
    info(KeywordId::Enum, "enum", KeywordCategory::Declaration),
    info(KeywordId::Typedef, "typedef", KeywordCategory::Declaration),
    info(KeywordId::Static, "static", KeywordCategory::Declaration),
    info(KeywordId::Unsigned, "unsigned", KeywordCategory::TypeName),
    info(KeywordId::Signed, "signed", KeywordCategory::TypeName),
    info(KeywordId::Int, "int", KeywordCategory::TypeName),
    info(KeywordId::Long, "long", KeywordCategory::TypeName),
    info(KeywordId::Short, "short", KeywordCategory::TypeName),
    info(KeywordId::Char, "char", KeywordCategory::TypeName),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Canonical spelling as bytes, for the byte-oriented scanners.
pub fn as_bytes(id: KeywordId) -> &'static [u8] {
    as_str(id).as_bytes()
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

/// All keywords of `category`, in registry order.
pub fn in_category(category: KeywordCategory) -> impl Iterator<Item = KeywordId> {
    KEYWORDS.iter().filter(move |k| k.category == category).map(|k| k.id)
}

/// Whether `id` is a C++ access specifier (`public:` and friends).
pub fn is_scope_decl(id: KeywordId) -> bool {
    category(id) == KeywordCategory::ScopeDecl
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo { id, canonical, category }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_words_in_order() {
        let words: Vec<&str> = in_category(KeywordCategory::Block).map(as_str).collect();
        assert_eq!(words, vec!["if", "else", "while", "do", "for", "switch"]);
    }

    #[test]
    fn test_scope_decls() {
        assert!(is_scope_decl(KeywordId::Private));
        assert!(!is_scope_decl(KeywordId::Case));
    }

    #[test]
    fn test_unknown_word() {
        assert_eq!(from_str("elif"), None);
        assert_eq!(from_str("If"), None);
    }
}
