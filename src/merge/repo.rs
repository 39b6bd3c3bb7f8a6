//! Repository-level merges

use super::{merge_list, merge_map, merge_nested, merge_value, Merge};
use crate::config::{RepoConfig, RepoMiscConfig, RepoPullRequestConfig, RepoSecurityConfig};

impl Merge for RepoConfig {
    fn merge(&mut self, from: &Self) {
        merge_value(&mut self.name, &from.name);
        merge_value(&mut self.visibility, &from.visibility);
        merge_value(&mut self.description, &from.description);
        merge_value(&mut self.homepage_url, &from.homepage_url);
        merge_nested(&mut self.misc, &from.misc);
        merge_nested(&mut self.pull_requests, &from.pull_requests);
        merge_nested(&mut self.security, &from.security);
        merge_list(&mut self.templates, &from.templates);
        merge_nested(&mut self.default_branch, &from.default_branch);
        merge_map(&mut self.branches, &from.branches);
        merge_list(&mut self.branch_protections, &from.branch_protections);
    }
}

impl Merge for RepoMiscConfig {
    fn merge(&mut self, from: &Self) {
        merge_list(&mut self.topics, &from.topics);
        merge_value(&mut self.has_issues, &from.has_issues);
        merge_value(&mut self.has_wiki, &from.has_wiki);
        merge_value(&mut self.has_projects, &from.has_projects);
        merge_value(&mut self.has_discussions, &from.has_discussions);
        merge_value(&mut self.is_template, &from.is_template);
        merge_value(&mut self.archived, &from.archived);
        merge_value(&mut self.vulnerability_alerts, &from.vulnerability_alerts);
    }
}

impl Merge for RepoPullRequestConfig {
    fn merge(&mut self, from: &Self) {
        merge_value(&mut self.allow_merge_commit, &from.allow_merge_commit);
        merge_value(&mut self.allow_squash_merge, &from.allow_squash_merge);
        merge_value(&mut self.allow_rebase_merge, &from.allow_rebase_merge);
        merge_value(&mut self.allow_auto_merge, &from.allow_auto_merge);
        merge_value(&mut self.allow_update_branch, &from.allow_update_branch);
        merge_value(&mut self.delete_branch_on_merge, &from.delete_branch_on_merge);
        merge_value(&mut self.merge_commit_title, &from.merge_commit_title);
        merge_value(&mut self.merge_commit_message, &from.merge_commit_message);
        merge_value(
            &mut self.squash_merge_commit_title,
            &from.squash_merge_commit_title,
        );
        merge_value(
            &mut self.squash_merge_commit_message,
            &from.squash_merge_commit_message,
        );
    }
}

impl Merge for RepoSecurityConfig {
    fn merge(&mut self, from: &Self) {
        merge_value(&mut self.advanced_security, &from.advanced_security);
        merge_value(&mut self.secret_scanning, &from.secret_scanning);
        merge_value(
            &mut self.secret_scanning_push_protection,
            &from.secret_scanning_push_protection,
        );
    }
}
