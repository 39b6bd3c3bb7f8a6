//! Merge operations for configuration objects
//!
//! This module provides the deep-merge algebra used to layer templates
//! beneath explicit configuration. Every configuration shape has its own
//! submodule implementing [`Merge`]; the field helpers below cover the
//! shapes those implementations are built from.
//!
//! ## Semantics
//!
//! `to.merge(&from)` changes `to` so that it incorporates `from`:
//!
//! - scalar (`Option<T>`): a value present in `from` replaces the one in `to`;
//! - list (`Option<Vec<T>>`): elements of `from` are appended after those of
//!   `to` (concatenation, no deduplication); this also covers lists of
//!   objects such as free-standing branch protections;
//! - nested object (`Option<T: Merge>`): merged recursively, creating the
//!   object in `to` first when needed;
//! - keyed map (`Option<BTreeMap<K, V>>`): shared keys merge recursively,
//!   new keys are cloned in.
//!
//! A field absent from `from` never changes `to`. Values are always cloned
//! out of `from`, so the merged object owns everything it holds.

use std::collections::BTreeMap;

mod branch;
mod protection;
mod repo;

pub use branch::merge_branch_into_default;

/// Deep merge of a configuration object.
pub trait Merge {
    /// Incorporates `from` into `self`; `from` takes precedence.
    fn merge(&mut self, from: &Self);
}

/// Copies a scalar from `from` when it holds one.
pub fn merge_value<T: Clone>(to: &mut Option<T>, from: &Option<T>) {
    if let Some(value) = from {
        *to = Some(value.clone());
    }
}

/// Appends the elements of `from` after those of `to`.
pub fn merge_list<T: Clone>(to: &mut Option<Vec<T>>, from: &Option<Vec<T>>) {
    if let Some(items) = from {
        to.get_or_insert_with(Vec::new)
            .extend(items.iter().cloned());
    }
}

/// Recursively merges a nested optional object.
pub fn merge_nested<T: Merge + Default>(to: &mut Option<T>, from: &Option<T>) {
    if let Some(inner) = from {
        to.get_or_insert_with(T::default).merge(inner);
    }
}

/// Merges a keyed map entry by entry.
pub fn merge_map<K, V>(to: &mut Option<BTreeMap<K, V>>, from: &Option<BTreeMap<K, V>>)
where
    K: Ord + Clone,
    V: Merge + Clone,
{
    let Some(entries) = from else {
        return;
    };
    let target = to.get_or_insert_with(BTreeMap::new);
    for (key, value) in entries {
        match target.get_mut(key) {
            Some(existing) => existing.merge(value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Layers an ordered template chain beneath an explicit object.
///
/// Equivalent to merging `T1..Tn` and then `explicit` into an empty
/// accumulator: the explicit object's scalars win and its lists come last.
pub fn merge_chain<T: Merge + Default>(chain: &[&T], explicit: &T) -> T {
    let mut acc = T::default();
    for template in chain {
        acc.merge(template);
    }
    acc.merge(explicit);
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BranchConfig;

    #[test]
    fn test_merge_value_overrides() {
        let mut to = Some("a".to_string());
        merge_value(&mut to, &Some("b".to_string()));
        assert_eq!(to.as_deref(), Some("b"));
    }

    #[test]
    fn test_merge_value_absent_keeps_target() {
        let mut to = Some("a".to_string());
        merge_value(&mut to, &None);
        assert_eq!(to.as_deref(), Some("a"));
    }

    #[test]
    fn test_merge_value_empty_is_a_value() {
        let mut to = Some("a".to_string());
        merge_value(&mut to, &Some(String::new()));
        assert_eq!(to.as_deref(), Some(""));
    }

    #[test]
    fn test_merge_list_appends_without_dedup() {
        let mut to = Some(vec!["a".to_string(), "b".to_string()]);
        merge_list(&mut to, &Some(vec!["b".to_string(), "c".to_string()]));
        assert_eq!(to.unwrap(), vec!["a", "b", "b", "c"]);
    }

    #[test]
    fn test_merge_list_empty_marks_present() {
        let mut to: Option<Vec<String>> = None;
        merge_list(&mut to, &Some(Vec::new()));
        assert_eq!(to, Some(Vec::new()));

        let mut untouched: Option<Vec<String>> = None;
        merge_list(&mut untouched, &None);
        assert_eq!(untouched, None);
    }

    #[test]
    fn test_merge_nested_creates_target() {
        let mut to: Option<BranchConfig> = None;
        let from = Some(BranchConfig {
            source_sha: Some("abc".to_string()),
            ..Default::default()
        });
        merge_nested(&mut to, &from);
        assert_eq!(to, from);
    }

    #[test]
    fn test_merge_map_merges_shared_and_clones_new_keys() {
        let mut to = Some(BTreeMap::from([(
            "dev".to_string(),
            BranchConfig {
                source_branch: Some("main".to_string()),
                ..Default::default()
            },
        )]));
        let from = Some(BTreeMap::from([
            (
                "dev".to_string(),
                BranchConfig {
                    source_sha: Some("abc".to_string()),
                    ..Default::default()
                },
            ),
            ("qa".to_string(), BranchConfig::default()),
        ]));

        merge_map(&mut to, &from);

        let merged = to.unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["dev"].source_branch.as_deref(), Some("main"));
        assert_eq!(merged["dev"].source_sha.as_deref(), Some("abc"));
        assert_eq!(merged["qa"], BranchConfig::default());
    }

    #[test]
    fn test_merge_chain_explicit_wins_and_lists_come_last() {
        let first = BranchConfig {
            source_branch: Some("first".to_string()),
            templates: Some(vec!["t1".to_string()]),
            ..Default::default()
        };
        let second = BranchConfig {
            source_branch: Some("second".to_string()),
            source_sha: Some("sha".to_string()),
            templates: Some(vec!["t2".to_string()]),
            ..Default::default()
        };
        let explicit = BranchConfig {
            source_branch: Some("explicit".to_string()),
            templates: Some(vec!["own".to_string()]),
            ..Default::default()
        };

        let merged = merge_chain(&[&first, &second], &explicit);

        assert_eq!(merged.source_branch.as_deref(), Some("explicit"));
        assert_eq!(merged.source_sha.as_deref(), Some("sha"));
        assert_eq!(merged.templates.unwrap(), vec!["t1", "t2", "own"]);
    }
}
