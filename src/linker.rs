//! # Dependency-Aware Resource Linking
//!
//! Projects a computed repository configuration into Terraform resource
//! descriptors: the repository itself, its default branch, every named
//! branch, and every branch protection.
//!
//! ## Links
//!
//! Terraform orders resource creation by the references between them. The
//! caller chooses, per relationship, whether an identifying attribute should
//! be a literal or a reference:
//!
//! - **to-repository** (`Links::repository`): the repository attribute of a
//!   branch, default-branch or protection resource references the repository
//!   resource instead of naming it literally.
//! - **to-branch** (`Links::branch`): a branch-identifying attribute (source
//!   branch, default branch, protection pattern) references the resource that
//!   governs that branch. An explicitly configured branch wins; otherwise the
//!   default-branch resource is used when the name is the default branch;
//!   otherwise the name stays literal.
//!
//! ## Identifiers
//!
//! Resource identifiers are built from transliterated names: the repository
//! name, extended with the branch name or protection pattern. The default
//! branch resource shares the repository's identifier; its protection adds
//! [`DEFAULT_BRANCH_SUFFIX`]. A free-standing protection without a pattern
//! gets [`MISSING_PATTERN_SUFFIX`], which keeps the misconfiguration visible
//! in the generated output.
//!
//! ## Contract
//!
//! Mappers must be able to refer to their repository: either a repository
//! configuration with a name is in scope, or a to-repository link is
//! requested. Calling a mapper without either is a caller bug and panics.

use log::warn;

use crate::config::{BranchConfig, BranchProtectionConfig, DefaultBranchConfig, RepoConfig};
use crate::resource::{
    block, ident, insert_opt, Attributes, Reference, Resource, ResourceKind, Value,
};

/// Identifier suffix of the default branch's protection.
pub const DEFAULT_BRANCH_SUFFIX: &str = "_default";

/// Identifier suffix of a free-standing protection without a pattern.
pub const MISSING_PATTERN_SUFFIX: &str = "MISSING_PATTERN";

/// Link kinds requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    /// Reference the repository resource instead of its literal name.
    pub repository: bool,
    /// Reference branch resources instead of literal branch names.
    pub branch: bool,
}

impl Links {
    pub const NONE: Links = Links {
        repository: false,
        branch: false,
    };
    pub const ALL: Links = Links {
        repository: true,
        branch: true,
    };
}

/// The repository a mapper works under.
#[derive(Debug, Clone)]
pub struct RepoScope<'a> {
    id: String,
    repo: Option<&'a RepoConfig>,
}

impl<'a> RepoScope<'a> {
    /// Scope of a computed repository.
    pub fn of(repo: &'a RepoConfig) -> Self {
        Self {
            id: ident(repo.name.as_deref().unwrap_or_default()),
            repo: Some(repo),
        }
    }

    /// Scope of a repository known only by name.
    ///
    /// Mappers under a detached scope require a to-repository link.
    pub fn detached(name: &str) -> Self {
        Self {
            id: ident(name),
            repo: None,
        }
    }

    /// Resource identifier of the repository.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn child_id(&self, suffix: &str) -> String {
        format!("{}_{}", self.id, suffix)
    }

    fn branch_id(&self, branch: &str) -> String {
        self.child_id(&ident(branch))
    }

    /// Value of a repository-identifying attribute.
    ///
    /// # Panics
    ///
    /// Panics when no repository configuration with a name is in scope and no
    /// to-repository link was requested.
    fn repository_value(&self, links: Links, attribute: &str) -> Value {
        if links.repository {
            return Value::Reference(Reference::new(
                ResourceKind::Repository,
                self.id.clone(),
                attribute,
            ));
        }
        match self.repo.and_then(|repo| repo.name.as_deref()) {
            Some(name) => Value::string(name),
            None => panic!(
                "cannot determine a repository reference for `{}`: no repository configuration and no repository link",
                self.id
            ),
        }
    }

    /// Reference to an explicitly configured branch of this repository.
    fn explicit_branch_reference(&self, name: &str) -> Option<Value> {
        let branches = self.repo?.branches.as_ref()?;
        branches.contains_key(name).then(|| {
            Value::Reference(Reference::new(
                ResourceKind::Branch,
                self.branch_id(name),
                "branch",
            ))
        })
    }

    /// Value of a branch-identifying attribute.
    fn branch_value(&self, name: &str, links: Links) -> Value {
        if links.branch {
            if let Some(reference) = self.explicit_branch_reference(name) {
                return reference;
            }
            let default_name = self
                .repo
                .and_then(|repo| repo.default_branch.as_ref())
                .and_then(|default_branch| default_branch.name.as_deref());
            if default_name == Some(name) {
                return Value::Reference(Reference::new(
                    ResourceKind::DefaultBranch,
                    self.id.clone(),
                    "branch",
                ));
            }
        }
        Value::string(name)
    }
}

/// Where a branch protection comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionOrigin<'a> {
    /// Attached to the default branch, whose name may be unknown.
    DefaultBranch(Option<&'a str>),
    /// Attached to a named branch.
    Branch(&'a str),
    /// Free-standing, identified by its own pattern.
    Pattern,
}

fn status(enabled: bool) -> Value {
    Value::string(if enabled { "enabled" } else { "disabled" })
}

/// Maps the repository itself.
pub fn map_repository(repo: &RepoConfig) -> Resource {
    let scope = RepoScope::of(repo);
    let mut resource = Resource::new(ResourceKind::Repository, scope.id());

    resource.set_opt("name", repo.name.clone().map(Value::String));
    resource.set_opt("description", repo.description.clone().map(Value::String));
    resource.set_opt("homepage_url", repo.homepage_url.clone().map(Value::String));
    resource.set_opt("visibility", repo.visibility.clone().map(Value::String));

    if let Some(misc) = &repo.misc {
        resource.set_opt("topics", misc.topics.as_deref().map(Value::strings));
        resource.set_opt("has_issues", misc.has_issues.map(Value::Bool));
        resource.set_opt("has_wiki", misc.has_wiki.map(Value::Bool));
        resource.set_opt("has_projects", misc.has_projects.map(Value::Bool));
        resource.set_opt("has_discussions", misc.has_discussions.map(Value::Bool));
        resource.set_opt("is_template", misc.is_template.map(Value::Bool));
        resource.set_opt("archived", misc.archived.map(Value::Bool));
        resource.set_opt(
            "vulnerability_alerts",
            misc.vulnerability_alerts.map(Value::Bool),
        );
    }

    if let Some(prs) = &repo.pull_requests {
        resource.set_opt("allow_merge_commit", prs.allow_merge_commit.map(Value::Bool));
        resource.set_opt("allow_squash_merge", prs.allow_squash_merge.map(Value::Bool));
        resource.set_opt("allow_rebase_merge", prs.allow_rebase_merge.map(Value::Bool));
        resource.set_opt("allow_auto_merge", prs.allow_auto_merge.map(Value::Bool));
        resource.set_opt("allow_update_branch", prs.allow_update_branch.map(Value::Bool));
        resource.set_opt(
            "delete_branch_on_merge",
            prs.delete_branch_on_merge.map(Value::Bool),
        );
        resource.set_opt(
            "merge_commit_title",
            prs.merge_commit_title.clone().map(Value::String),
        );
        resource.set_opt(
            "merge_commit_message",
            prs.merge_commit_message.clone().map(Value::String),
        );
        resource.set_opt(
            "squash_merge_commit_title",
            prs.squash_merge_commit_title.clone().map(Value::String),
        );
        resource.set_opt(
            "squash_merge_commit_message",
            prs.squash_merge_commit_message.clone().map(Value::String),
        );
    }

    resource.set_opt(
        "security_and_analysis",
        block(&repo.security, |security, attrs| {
            let feature = |enabled: Option<bool>| {
                enabled.map(|enabled| {
                    Value::Block([("status".to_string(), status(enabled))].into())
                })
            };
            insert_opt(attrs, "advanced_security", feature(security.advanced_security));
            insert_opt(attrs, "secret_scanning", feature(security.secret_scanning));
            insert_opt(
                attrs,
                "secret_scanning_push_protection",
                feature(security.secret_scanning_push_protection),
            );
        }),
    );

    resource
}

/// Maps the default branch setting.
///
/// Under a to-branch link the branch attribute references the branch
/// resource when the default branch is also an explicitly configured branch,
/// so the branch exists before it becomes the default.
pub fn map_default_branch(
    scope: &RepoScope<'_>,
    default_branch: &DefaultBranchConfig,
    links: Links,
) -> Resource {
    let repository = scope.repository_value(links, "name");
    let mut resource = Resource::new(ResourceKind::DefaultBranch, scope.id());
    resource.set("repository", repository);

    if let Some(name) = default_branch.name.as_deref() {
        let branch = if links.branch {
            scope
                .explicit_branch_reference(name)
                .unwrap_or_else(|| Value::string(name))
        } else {
            Value::string(name)
        };
        resource.set("branch", branch);
    }
    resource.set_opt("rename", default_branch.rename.map(Value::Bool));
    resource
}

/// Maps one named branch.
pub fn map_branch(scope: &RepoScope<'_>, name: &str, branch: &BranchConfig, links: Links) -> Resource {
    let repository = scope.repository_value(links, "name");
    let mut resource = Resource::new(ResourceKind::Branch, scope.branch_id(name));
    resource.set("repository", repository);
    resource.set("branch", Value::string(name));
    resource.set_opt(
        "source_branch",
        branch
            .source_branch
            .as_deref()
            .map(|source| scope.branch_value(source, links)),
    );
    resource.set_opt("source_sha", branch.source_sha.clone().map(Value::String));
    resource
}

/// Maps one branch protection.
pub fn map_branch_protection(
    scope: &RepoScope<'_>,
    origin: ProtectionOrigin<'_>,
    protection: &BranchProtectionConfig,
    links: Links,
) -> Resource {
    let repository = scope.repository_value(links, "node_id");

    let (id, pattern) = match origin {
        ProtectionOrigin::DefaultBranch(name) => (scope.child_id(DEFAULT_BRANCH_SUFFIX), name),
        ProtectionOrigin::Branch(name) => (scope.branch_id(name), Some(name)),
        ProtectionOrigin::Pattern => match protection.pattern.as_deref() {
            Some(pattern) => (scope.branch_id(pattern), Some(pattern)),
            None => (scope.child_id(MISSING_PATTERN_SUFFIX), None),
        },
    };
    if pattern.is_none() {
        warn!("branch protection `{}` has no pattern", id);
    }

    let mut resource = Resource::new(ResourceKind::BranchProtection, id);
    resource.set("repository_id", repository);
    resource.set_opt(
        "pattern",
        pattern.map(|pattern| scope.branch_value(pattern, links)),
    );
    resource.set_opt("lock_branch", protection.forbid.map(Value::Bool));
    resource.set_opt("enforce_admins", protection.enforce_admins.map(Value::Bool));
    resource.set_opt("allows_deletions", protection.allows_deletions.map(Value::Bool));
    resource.set_opt(
        "required_linear_history",
        protection.require_linear_history.map(Value::Bool),
    );
    resource.set_opt(
        "require_signed_commits",
        protection.require_signed_commits.map(Value::Bool),
    );
    resource.set_opt(
        "require_conversation_resolution",
        protection.require_conversation_resolution.map(Value::Bool),
    );

    if let Some(pushes) = &protection.pushes {
        resource.set_opt(
            "allows_force_pushes",
            pushes.allows_force_pushes.map(Value::Bool),
        );
        if pushes.push_restrictions.is_some() || pushes.blocks_creations.is_some() {
            let mut restrict = Attributes::new();
            insert_opt(
                &mut restrict,
                "blocks_creations",
                pushes.blocks_creations.map(Value::Bool),
            );
            insert_opt(
                &mut restrict,
                "push_allowances",
                pushes.push_restrictions.as_deref().map(Value::strings),
            );
            resource.set("restrict_pushes", Value::Block(restrict));
        }
    }

    resource.set_opt(
        "required_status_checks",
        block(&protection.status_checks, |checks, attrs| {
            insert_opt(attrs, "strict", checks.strict.map(Value::Bool));
            insert_opt(attrs, "contexts", checks.contexts.as_deref().map(Value::strings));
        }),
    );

    resource.set_opt(
        "required_pull_request_reviews",
        block(&protection.pull_request_reviews, |reviews, attrs| {
            insert_opt(
                attrs,
                "dismiss_stale_reviews",
                reviews.dismiss_stale_reviews.map(Value::Bool),
            );
            insert_opt(
                attrs,
                "restrict_dismissals",
                reviews.restrict_dismissals.map(Value::Bool),
            );
            insert_opt(
                attrs,
                "dismissal_restrictions",
                reviews.dismissal_restrictions.as_deref().map(Value::strings),
            );
            insert_opt(
                attrs,
                "pull_request_bypassers",
                reviews.pull_request_bypassers.as_deref().map(Value::strings),
            );
            insert_opt(
                attrs,
                "require_code_owner_reviews",
                reviews.require_code_owner_reviews.map(Value::Bool),
            );
            insert_opt(
                attrs,
                "required_approving_review_count",
                reviews
                    .required_approving_review_count
                    .map(|count| Value::Number(u64::from(count))),
            );
            insert_opt(
                attrs,
                "require_last_push_approval",
                reviews.require_last_push_approval.map(Value::Bool),
            );
        }),
    );

    resource
}

/// Maps a whole computed repository.
///
/// Resources come in a stable order: repository, default branch, branches by
/// name, the default branch's protection, branch protections by branch name,
/// then free-standing protections in list order.
pub fn map_all(repo: &RepoConfig, links: Links) -> Vec<Resource> {
    let scope = RepoScope::of(repo);
    let mut resources = vec![map_repository(repo)];

    if let Some(default_branch) = &repo.default_branch {
        resources.push(map_default_branch(&scope, default_branch, links));
    }
    if let Some(branches) = &repo.branches {
        for (name, branch) in branches {
            resources.push(map_branch(&scope, name, branch, links));
        }
    }

    if let Some(default_branch) = &repo.default_branch {
        if let Some(protection) = &default_branch.protection {
            let origin = ProtectionOrigin::DefaultBranch(default_branch.name.as_deref());
            resources.push(map_branch_protection(&scope, origin, protection, links));
        }
    }
    if let Some(branches) = &repo.branches {
        for (name, branch) in branches {
            if let Some(protection) = &branch.protection {
                let origin = ProtectionOrigin::Branch(name);
                resources.push(map_branch_protection(&scope, origin, protection, links));
            }
        }
    }
    if let Some(protections) = &repo.branch_protections {
        for protection in protections {
            resources.push(map_branch_protection(
                &scope,
                ProtectionOrigin::Pattern,
                protection,
                links,
            ));
        }
    }

    resources
}
