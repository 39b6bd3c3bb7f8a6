//! Branch-protection merges

use super::{merge_list, merge_nested, merge_value, Merge};
use crate::config::{
    BranchProtectionConfig, BranchProtectionPushes, BranchProtectionReviews,
    BranchProtectionStatusChecks,
};

impl Merge for BranchProtectionConfig {
    fn merge(&mut self, from: &Self) {
        merge_value(&mut self.pattern, &from.pattern);
        merge_value(&mut self.forbid, &from.forbid);
        merge_list(&mut self.templates, &from.templates);
        merge_value(&mut self.enforce_admins, &from.enforce_admins);
        merge_value(&mut self.allows_deletions, &from.allows_deletions);
        merge_value(&mut self.require_linear_history, &from.require_linear_history);
        merge_value(&mut self.require_signed_commits, &from.require_signed_commits);
        merge_value(
            &mut self.require_conversation_resolution,
            &from.require_conversation_resolution,
        );
        merge_nested(&mut self.pushes, &from.pushes);
        merge_nested(&mut self.status_checks, &from.status_checks);
        merge_nested(&mut self.pull_request_reviews, &from.pull_request_reviews);
    }
}

impl Merge for BranchProtectionPushes {
    fn merge(&mut self, from: &Self) {
        merge_value(&mut self.allows_force_pushes, &from.allows_force_pushes);
        merge_value(&mut self.blocks_creations, &from.blocks_creations);
        merge_list(&mut self.push_restrictions, &from.push_restrictions);
    }
}

impl Merge for BranchProtectionStatusChecks {
    fn merge(&mut self, from: &Self) {
        merge_value(&mut self.strict, &from.strict);
        merge_list(&mut self.contexts, &from.contexts);
    }
}

impl Merge for BranchProtectionReviews {
    fn merge(&mut self, from: &Self) {
        merge_value(&mut self.dismiss_stale_reviews, &from.dismiss_stale_reviews);
        merge_value(&mut self.restrict_dismissals, &from.restrict_dismissals);
        merge_list(&mut self.dismissal_restrictions, &from.dismissal_restrictions);
        merge_list(&mut self.pull_request_bypassers, &from.pull_request_bypassers);
        merge_value(
            &mut self.require_code_owner_reviews,
            &from.require_code_owner_reviews,
        );
        merge_value(
            &mut self.required_approving_review_count,
            &from.required_approving_review_count,
        );
        merge_value(
            &mut self.require_last_push_approval,
            &from.require_last_push_approval,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_check_contexts_concatenate() {
        let mut to = BranchProtectionConfig {
            status_checks: Some(BranchProtectionStatusChecks {
                strict: Some(false),
                contexts: Some(vec!["ci/build".to_string()]),
            }),
            ..Default::default()
        };
        let from = BranchProtectionConfig {
            status_checks: Some(BranchProtectionStatusChecks {
                strict: Some(true),
                contexts: Some(vec!["ci/test".to_string()]),
            }),
            ..Default::default()
        };

        to.merge(&from);

        let checks = to.status_checks.unwrap();
        assert_eq!(checks.strict, Some(true));
        assert_eq!(checks.contexts.unwrap(), vec!["ci/build", "ci/test"]);
    }

    #[test]
    fn test_review_count_overrides() {
        let mut to = BranchProtectionReviews {
            required_approving_review_count: Some(1),
            require_code_owner_reviews: Some(true),
            ..Default::default()
        };
        to.merge(&BranchProtectionReviews {
            required_approving_review_count: Some(2),
            ..Default::default()
        });
        assert_eq!(to.required_approving_review_count, Some(2));
        assert_eq!(to.require_code_owner_reviews, Some(true));
    }

    #[test]
    fn test_empty_push_restrictions_stay_present() {
        let mut to = BranchProtectionPushes::default();
        to.merge(&BranchProtectionPushes {
            push_restrictions: Some(Vec::new()),
            ..Default::default()
        });
        assert_eq!(to.push_restrictions, Some(Vec::new()));
    }
}
