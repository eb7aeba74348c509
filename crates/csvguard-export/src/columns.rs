//! Column schema computation.

use std::collections::{BTreeSet, HashSet};

use crate::project::Record;

/// Compute the ordered output columns.
///
/// `(raw ∩ allow, or raw when allow is empty) − deny`, keeping the order of
/// `raw` and the first occurrence of duplicated names. The deny list is
/// applied last so it always wins over the allow list.
pub fn effective_columns(
    raw: &[String],
    allow: &BTreeSet<String>,
    deny: &BTreeSet<String>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .filter(|name| allow.is_empty() || allow.contains(*name))
        .filter(|name| !deny.contains(*name))
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Union of the keys of `records`, in first-seen order.
///
/// Useful both as the default column list and as an allow list of names
/// that really exist in the data.
pub fn discover_columns<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_no_lists_keeps_raw_order() {
        let raw = cols(&["memo", "first_name", "last_name"]);
        assert_eq!(effective_columns(&raw, &set(&[]), &set(&[])), raw);
    }

    #[test]
    fn test_allowlist_intersection_keeps_raw_order() {
        let raw = cols(&["memo", "first_name", "last_name"]);
        let allow = set(&["last_name", "memo", "unknown"]);
        assert_eq!(
            effective_columns(&raw, &allow, &set(&[])),
            cols(&["memo", "last_name"])
        );
    }

    #[test]
    fn test_denylist_ignores_unknown_names() {
        let raw = cols(&["first_name", "last_name", "memo"]);
        let deny = set(&["memo", "column_that_doesnt_exist"]);
        assert_eq!(
            effective_columns(&raw, &set(&[]), &deny),
            cols(&["first_name", "last_name"])
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let raw = cols(&["a", "b", "a"]);
        assert_eq!(effective_columns(&raw, &set(&[]), &set(&[])), cols(&["a", "b"]));
    }

    #[test]
    fn test_discover_columns_first_seen_order() {
        let first: Record = [("b", "1"), ("a", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let second: Record = [("c", "3"), ("a", "4")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        // Keys within one record come out sorted (BTreeMap), new keys append.
        assert_eq!(discover_columns([&first, &second]), cols(&["a", "b", "c"]));
        assert!(discover_columns(std::iter::empty::<&Record>()).is_empty());
    }

    proptest! {
        #[test]
        fn test_denied_never_effective(
            raw in prop::collection::vec("[a-e]", 0..10),
            allow in prop::collection::btree_set("[a-e]", 0..5),
            deny in prop::collection::btree_set("[a-e]", 0..5),
        ) {
            let effective = effective_columns(&raw, &allow, &deny);
            for name in &effective {
                prop_assert!(!deny.contains(name));
                prop_assert!(raw.contains(name));
                prop_assert!(allow.is_empty() || allow.contains(name));
            }
        }
    }
}
