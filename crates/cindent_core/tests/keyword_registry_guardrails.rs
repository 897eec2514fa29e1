use std::collections::HashMap;

use cindent_core::keywords::{self, KeywordCategory};

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(keywords::as_str(info.id), info.canonical, "keyword as_str mismatch for {:?}", info.id);

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn keywords_are_plain_identifiers() {
    for info in keywords::KEYWORDS {
        assert!(
            info.canonical.bytes().all(|b| b.is_ascii_lowercase()),
            "keyword {:?} must be a lowercase ASCII word",
            info.canonical
        );
        assert!(cindent_core::starts_with_word(info.canonical.as_bytes(), keywords::as_bytes(info.id)));
    }
}

#[test]
fn every_category_is_populated() {
    for category in [
        KeywordCategory::Block,
        KeywordCategory::Label,
        KeywordCategory::ScopeDecl,
        KeywordCategory::Declaration,
        KeywordCategory::TypeName,
    ] {
        assert!(keywords::in_category(category).next().is_some(), "empty category {category:?}");
    }
}
