//! # Configuration Schema
//!
//! This module defines the data structures describing a repository's settings
//! and the templates they may inherit from. The loader decodes YAML documents
//! into these types, the computer expands them, and the linker projects the
//! computed result into resource descriptors.
//!
//! ## Presence
//!
//! Every field that may be inherited is an `Option`:
//!
//! - `None`: absent, the value is inherited from templates;
//! - `Some(empty)`: present but empty (`""`, `[]`, `{}`);
//! - `Some(value)`: present with a value.
//!
//! Merging never conflates the first two states. An absent list inherits, an
//! empty list contributes nothing but still marks the field as present.
//!
//! ## Key Components
//!
//! - **`RepoConfig`**: one repository and everything hanging off it.
//! - **`BranchConfig`** / **`DefaultBranchConfig`**: branches to create and
//!   the branch to make default.
//! - **`BranchProtectionConfig`**: a protection rule, either free-standing
//!   (identified by its pattern) or attached to a branch.
//! - **`Templates`**: the template environment, three keyed maps of named
//!   partial configurations.
//! - **`Config`**: a decoded batch, repositories plus templates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A decoded batch: every repository plus the shared template environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Repositories to compute, in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepoConfig>,
    /// Named templates the repositories may reference.
    #[serde(skip_serializing_if = "Templates::is_empty")]
    pub templates: Templates,
}

/// The template environment.
///
/// Each map is keyed by template name. A template is a full configuration of
/// its kind and may itself list further templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Templates {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub repository: BTreeMap<String, RepoConfig>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub branch: BTreeMap<String, BranchConfig>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub branch_protection: BTreeMap<String, BranchProtectionConfig>,
}

impl Templates {
    pub fn is_empty(&self) -> bool {
        self.repository.is_empty() && self.branch.is_empty() && self.branch_protection.is_empty()
    }
}

/// Settings of a single repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    /// Repository name. Mandatory on explicit repositories, unique per batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `public`, `private` or `internal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc: Option<RepoMiscConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_requests: Option<RepoPullRequestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<RepoSecurityConfig>,
    /// Repository templates applied beneath this object, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<DefaultBranchConfig>,
    /// Branches to create, keyed by branch name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<BTreeMap<String, BranchConfig>>,
    /// Free-standing protection rules, identified by pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_protections: Option<Vec<BranchProtectionConfig>>,
}

/// Miscellaneous repository toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoMiscConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_discussions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability_alerts: Option<bool>,
}

/// How pull requests may be merged into the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoPullRequestConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_auto_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_update_branch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_commit_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_commit_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squash_merge_commit_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squash_merge_commit_message: Option<String>,
}

/// Security and analysis features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoSecurityConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_security: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_scanning_push_protection: Option<bool>,
}

/// A branch to create in the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchConfig {
    /// Branch the new branch is forked from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    /// Commit the new branch starts at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,
    /// Protection applied to exactly this branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<BranchProtectionConfig>,
}

/// The repository's default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultBranchConfig {
    /// Name of the default branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rename the current default branch instead of switching to another one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<bool>,
    /// Branch templates; only their protection settings apply here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<BranchProtectionConfig>,
}

/// A branch-protection rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchProtectionConfig {
    /// Branch-name glob the rule applies to. Unused on attached protections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Make matching branches read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_admins: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_deletions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_linear_history: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_signed_commits: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_conversation_resolution: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushes: Option<BranchProtectionPushes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_checks: Option<BranchProtectionStatusChecks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_reviews: Option<BranchProtectionReviews>,
}

/// Who may push to matching branches, and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchProtectionPushes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_force_pushes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks_creations: Option<bool>,
    /// Actors allowed to push; an empty list restricts pushes to nobody.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_restrictions: Option<Vec<String>>,
}

/// Status checks that must pass before merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchProtectionStatusChecks {
    /// Require branches to be up to date before merging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<String>>,
}

/// Pull request review requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchProtectionReviews {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismiss_stale_reviews: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_dismissals: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissal_restrictions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_bypassers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_code_owner_reviews: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_last_push_approval: Option<bool>,
}
