use dsnsync_types::{to_canonical_json, to_canonical_string};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
struct Unsorted {
    zeta: u32,
    alpha: &'static str,
    middle: Nested,
}

#[derive(Serialize)]
struct Nested {
    y: bool,
    b: Vec<u8>,
}

#[test]
fn struct_fields_are_sorted() {
    let value = Unsorted {
        zeta: 1,
        alpha: "a",
        middle: Nested {
            y: true,
            b: vec![1, 2],
        },
    };
    assert_eq!(
        to_canonical_string(&value).unwrap(),
        r#"{"alpha":"a","middle":{"b":[1,2],"y":true},"zeta":1}"#
    );
}

#[test]
fn no_whitespace_is_emitted() {
    let value = serde_json::json!({ "a": [1, 2, { "c": null }] });
    let s = to_canonical_string(&value).unwrap();
    assert!(!s.contains(' '));
    assert!(!s.contains('\n'));
}

#[test]
fn bytes_and_string_forms_agree() {
    let value = serde_json::json!({ "b": 1, "a": "x" });
    assert_eq!(
        to_canonical_json(&value).unwrap(),
        to_canonical_string(&value).unwrap().into_bytes()
    );
}

proptest! {
    /// Insertion order never changes the canonical form.
    #[test]
    fn hashmap_order_does_not_matter(
        entries in prop::collection::vec(("[a-z]{1,8}", any::<i64>()), 0..32),
    ) {
        let forward: HashMap<String, i64> = entries.into_iter().collect();
        let mut keys: Vec<&String> = forward.keys().collect();
        keys.sort();
        keys.reverse();
        let mut reordered = HashMap::with_capacity(256);
        for key in keys {
            reordered.insert(key.clone(), forward[key]);
        }
        prop_assert_eq!(
            to_canonical_json(&forward).unwrap(),
            to_canonical_json(&reordered).unwrap()
        );
    }
}
