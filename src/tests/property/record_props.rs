//! Property-based tests for lenient record decoding
//!
//! Tests invariants:
//! - arbitrary JSON documents decode without panicking, one record each
//! - sentinel link values never become link targets

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::core::collection::Variant;
use crate::core::records::{Records, NO_GARUDA_LINK, NO_SINTA_LINK};
use crate::core::rows::FieldValue;

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,10}".prop_map(Value::from),
        Just(Value::from(NO_SINTA_LINK)),
        Just(Value::from(NO_GARUDA_LINK)),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::hash_map(
                prop_oneof![
                    Just("name".to_string()),
                    Just("sinta".to_string()),
                    Just("sinta_link".to_string()),
                    Just("garuda_link".to_string()),
                    Just("journal_name".to_string()),
                    Just("results".to_string()),
                    Just("download_link".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0..5,
            )
            .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Case and padding variations of `sentinel`.
fn arb_sentinel(sentinel: &'static str) -> impl Strategy<Value = String> {
    (any::<bool>(), "[ ]{0,2}", "[ ]{0,2}").prop_map(move |(upper, before, after)| {
        let s = if upper {
            sentinel.to_uppercase()
        } else {
            sentinel.to_string()
        };
        format!("{before}{s}{after}")
    })
}

proptest! {
    #[test]
    fn any_documents_yield_one_row_each(
        docs in prop::collection::vec(arb_json(), 0..6),
        articles in any::<bool>(),
    ) {
        let variant = if articles { Variant::ArticleGroup } else { Variant::Journal };
        let count = docs.len();
        let records = Records::from_documents(variant, docs);
        prop_assert_eq!(records.len(), count);
        prop_assert_eq!(records.rows().len(), count);
    }

    #[test]
    fn sentinels_never_render_as_links(
        no_sinta in arb_sentinel(NO_SINTA_LINK),
        no_garuda in arb_sentinel(NO_GARUDA_LINK),
        download_sinta in any::<bool>(),
    ) {
        let download = if download_sinta { &no_sinta } else { &no_garuda };
        let journal = Records::from_documents(
            Variant::Journal,
            vec![json!({ "name": "J", "sinta_link": no_sinta, "garuda_link": no_garuda })],
        );
        let group = Records::from_documents(
            Variant::ArticleGroup,
            vec![json!({
                "garuda_link": no_garuda,
                "results": [{ "title": "t", "download_link": download }]
            })],
        );

        for row in journal.rows().into_iter().chain(group.rows()) {
            prop_assert!(row.links().is_empty());
            for field in &row.fields {
                if let FieldValue::Link(url) = &field.value {
                    prop_assert!(false, "unexpected link {}", url);
                }
            }
        }
    }
}
