//! Proptest generators for Glacier inputs.

use proptest::prelude::*;

/// Generate valid vault names.
pub fn vault_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("examplevault".to_string()),
        Just("photos-2012.06_01".to_string()),
        "[A-Za-z0-9_-][A-Za-z0-9_.-]{0,62}",
    ]
}

/// Generate distinct valid vault names.
pub fn vault_names_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9-]{2,20}", 1..=max)
        .prop_map(|names| names.into_iter().collect())
}

/// Generate names Glacier rejects.
pub fn invalid_vault_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("..".to_string()),
        "[a-z]{1,10} [a-z]{1,10}",
        "[a-z]{1,10}/[a-z]{1,10}",
        "[a-z]{256,300}",
    ]
}

/// Generate region identifiers.
pub fn region_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("us-east-1".to_string()),
        Just("us-west-2".to_string()),
        Just("eu-west-1".to_string()),
        Just("ap-northeast-1".to_string()),
        ("[a-z]{2}", "[a-z]{4,9}", 1u8..4).prop_map(|(a, b, n)| format!("{a}-{b}-{n}")),
    ]
}

/// Generate opaque marker strings, including characters needing encoding.
pub fn marker_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9:/+= _~.-]{1,80}"
}
