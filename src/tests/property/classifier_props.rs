//! Property-based tests for collection classification
//!
//! Tests invariants:
//! - `classify` is a case-insensitive `articles_` prefix test
//! - partition places every name in exactly one section, keeping order
//! - the detail viewer picks the same variant as the list

use proptest::prelude::*;

use crate::core::collection::{classify, title_case, Variant};
use crate::core::detail::CollectionDetail;
use crate::core::listing::partition;

/// Names that sometimes carry the article prefix in mixed case.
fn arb_collection_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9_]{0,20}",
        "(articles|ARTICLES|Articles|aRtIcLeS)_[a-z0-9_]{0,12}",
        "articles[a-z]{0,3}",
        "[a-zA-Z0-9_é]{0,16}",
    ]
}

proptest! {
    #[test]
    fn classify_matches_lowercase_prefix(name in arb_collection_name()) {
        let expected = if name.to_lowercase().starts_with("articles_") {
            Variant::ArticleGroup
        } else {
            Variant::Journal
        };
        prop_assert_eq!(classify(&name), expected);
    }

    #[test]
    fn partition_is_exhaustive_and_ordered(names in prop::collection::vec(arb_collection_name(), 0..20)) {
        let p = partition(&names);
        prop_assert_eq!(p.len(), names.len());

        let journals: Vec<String> = names
            .iter()
            .filter(|n| classify(n) == Variant::Journal)
            .cloned()
            .collect();
        prop_assert_eq!(&p.journals, &journals);
        prop_assert!(p.article_groups.iter().all(|n| classify(n) == Variant::ArticleGroup));
    }

    #[test]
    fn detail_variant_agrees_with_classifier(name in "[a-zA-Z_]{1,20}") {
        let mut detail = CollectionDetail::new();
        prop_assert!(detail.open(&name).is_some());
        prop_assert_eq!(detail.variant(), Some(classify(&name)));
    }

    #[test]
    fn title_case_has_no_underscores(name in "[a-z_]{0,30}") {
        let title = title_case(&name);
        prop_assert!(!title.contains('_'));
        prop_assert!(!title.contains("  "));
    }
}
