//! Tag set comparison.

use std::collections::BTreeMap;

use crate::diff::model::{TagComparison, TagValueChange};
use crate::model::Tags;

/// Compare two optional tag mappings.
///
/// Absent mappings are treated as empty. Keys and values compare exactly:
/// no case folding and no trimming.
pub fn compare_tags(previous: Option<&Tags>, next: Option<&Tags>) -> TagComparison {
    let empty = Tags::new();
    let previous = previous.unwrap_or(&empty);
    let next = next.unwrap_or(&empty);

    if previous == next {
        return TagComparison::default();
    }

    let mut added = Tags::new();
    let mut changed = BTreeMap::new();
    for (key, new_value) in next {
        match previous.get(key) {
            None => {
                added.insert(key.clone(), new_value.clone());
            }
            Some(old_value) if old_value != new_value => {
                changed.insert(
                    key.clone(),
                    TagValueChange {
                        old: old_value.clone(),
                        new: new_value.clone(),
                    },
                );
            }
            Some(_) => {}
        }
    }

    let removed: Tags = previous
        .iter()
        .filter(|(key, _)| !next.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    TagComparison {
        added,
        removed,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_absent_equals_empty() {
        assert!(compare_tags(None, Some(&Tags::new())).is_equal());
        assert!(compare_tags(Some(&Tags::new()), None).is_equal());
        assert!(compare_tags(None, None).is_equal());
    }

    #[test]
    fn test_identical_maps_are_equal() {
        let a = tags(&[("name", "A"), ("highway", "residential")]);
        assert!(compare_tags(Some(&a), Some(&a.clone())).is_equal());
    }

    #[test]
    fn test_comparison_is_exact() {
        let a = tags(&[("name", "Main St")]);
        let b = tags(&[("name", "main st")]);
        let c = tags(&[("name", "Main St ")]);

        assert!(!compare_tags(Some(&a), Some(&b)).is_equal());
        assert!(!compare_tags(Some(&a), Some(&c)).is_equal());
    }

    #[test]
    fn test_symmetric_difference() {
        let prev = tags(&[("name", "A"), ("old", "x"), ("keep", "y")]);
        let next = tags(&[("name", "B"), ("new", "z"), ("keep", "y")]);

        let cmp = compare_tags(Some(&prev), Some(&next));

        assert_eq!(cmp.added, tags(&[("new", "z")]));
        assert_eq!(cmp.removed, tags(&[("old", "x")]));
        assert_eq!(cmp.changed.len(), 1);
        assert_eq!(cmp.changed["name"].old, "A");
        assert_eq!(cmp.changed["name"].new, "B");
        assert_eq!(cmp.changed_keys(), vec!["name", "new", "old"]);
    }

    proptest! {
        #[test]
        fn prop_equality_matches_map_equality(
            a in proptest::collection::btree_map("[a-c]{1,2}", "[x-z]{0,2}", 0..5),
            b in proptest::collection::btree_map("[a-c]{1,2}", "[x-z]{0,2}", 0..5),
        ) {
            prop_assert_eq!(compare_tags(Some(&a), Some(&b)).is_equal(), a == b);
        }

        #[test]
        fn prop_comparison_is_symmetric(
            a in proptest::collection::btree_map("[a-c]{1,2}", "[x-z]{0,2}", 0..5),
            b in proptest::collection::btree_map("[a-c]{1,2}", "[x-z]{0,2}", 0..5),
        ) {
            let forward = compare_tags(Some(&a), Some(&b));
            let backward = compare_tags(Some(&b), Some(&a));
            prop_assert_eq!(&forward.added, &backward.removed);
            prop_assert_eq!(&forward.removed, &backward.added);
            prop_assert_eq!(forward.changed.len(), backward.changed.len());
        }
    }
}
