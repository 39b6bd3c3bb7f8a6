//! Property-based tests for the merge algebra.
//!
//! These tests use proptest to generate random configurations and verify that
//! the merge invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::config::{
        BranchConfig, BranchProtectionConfig, BranchProtectionStatusChecks, RepoConfig,
    };
    use crate::merge::{merge_chain, Merge};
    use proptest::collection::{btree_map, vec};
    use proptest::option;
    use proptest::prelude::*;

    fn opt_string() -> impl Strategy<Value = Option<String>> {
        option::of("[a-z]{0,6}")
    }

    fn opt_bool() -> impl Strategy<Value = Option<bool>> {
        option::of(any::<bool>())
    }

    fn opt_list() -> impl Strategy<Value = Option<Vec<String>>> {
        option::of(vec("[a-z]{1,4}", 0..3))
    }

    prop_compose! {
        fn arb_protection()(
            pattern in opt_string(),
            forbid in opt_bool(),
            templates in opt_list(),
            enforce_admins in opt_bool(),
            status_checks in option::of((opt_bool(), opt_list())),
        ) -> BranchProtectionConfig {
            BranchProtectionConfig {
                pattern,
                forbid,
                templates,
                enforce_admins,
                status_checks: status_checks
                    .map(|(strict, contexts)| BranchProtectionStatusChecks { strict, contexts }),
                ..Default::default()
            }
        }
    }

    prop_compose! {
        fn arb_branch()(
            source_branch in opt_string(),
            source_sha in opt_string(),
            templates in opt_list(),
            protection in option::of(arb_protection()),
        ) -> BranchConfig {
            BranchConfig { source_branch, source_sha, templates, protection }
        }
    }

    prop_compose! {
        fn arb_repo()(
            name in opt_string(),
            description in opt_string(),
            templates in opt_list(),
            branches in option::of(btree_map("[a-z]{1,4}", arb_branch(), 0..3)),
            branch_protections in option::of(vec(arb_protection(), 0..3)),
        ) -> RepoConfig {
            RepoConfig {
                name,
                description,
                templates,
                branches,
                branch_protections,
                ..Default::default()
            }
        }
    }

    // ============================================================================
    // Identity properties
    // ============================================================================

    proptest! {
        /// Property: merging an object with every field absent changes nothing
        #[test]
        fn merge_absent_from_leaves_target_unchanged(repo in arb_repo()) {
            let mut merged = repo.clone();
            merged.merge(&RepoConfig::default());
            prop_assert_eq!(merged, repo);
        }

        /// Property: merging into an empty accumulator reproduces the source
        #[test]
        fn merge_into_empty_reproduces_source(repo in arb_repo()) {
            let mut merged = RepoConfig::default();
            merged.merge(&repo);
            prop_assert_eq!(merged, repo);
        }

        /// Property: a chain without templates yields the explicit object
        #[test]
        fn empty_chain_is_identity(branch in arb_branch()) {
            prop_assert_eq!(merge_chain::<BranchConfig>(&[], &branch), branch);
        }
    }

    // ============================================================================
    // Precedence and concatenation properties
    // ============================================================================

    proptest! {
        /// Property: a scalar present in `from` always wins
        #[test]
        fn present_scalar_wins(to in arb_protection(), from in arb_protection()) {
            let mut merged = to.clone();
            merged.merge(&from);
            let expected = from.enforce_admins.or(to.enforce_admins);
            prop_assert_eq!(merged.enforce_admins, expected);
        }

        /// Property: free-standing protections concatenate without deduplication
        #[test]
        fn protection_lists_concatenate(to in arb_repo(), from in arb_repo()) {
            let count = |repo: &RepoConfig| repo.branch_protections.as_ref().map_or(0, Vec::len);
            let mut merged = to.clone();
            merged.merge(&from);
            prop_assert_eq!(count(&merged), count(&to) + count(&from));
        }

        /// Property: every branch key of either side survives the merge
        #[test]
        fn branch_keys_are_unioned(to in arb_repo(), from in arb_repo()) {
            let mut merged = to.clone();
            merged.merge(&from);
            for source in [&to, &from] {
                if let Some(branches) = &source.branches {
                    for key in branches.keys() {
                        prop_assert!(merged.branches.as_ref().is_some_and(|m| m.contains_key(key)));
                    }
                }
            }
        }
    }
}
