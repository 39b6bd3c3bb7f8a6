//! Layered configuration computation.
//!
//! ## Overview
//!
//! Computing a repository expands every template reference it contains and
//! merges the results beneath the explicit settings:
//!
//! 1. Reject a repository without a name.
//! 2. Resolve and merge the repository template chain.
//! 3. Resolve and merge the branch template chain of the default branch and
//!    of every named branch. Their protection sub-objects are layered in the
//!    same pass: template protections first, the branch's own protection last.
//! 4. Resolve and merge the branch-protection template chain of every
//!    free-standing protection and of every branch-attached protection.
//! 5. Collapse free-standing protections sharing a pattern.
//!
//! Template lists are cleared once applied, so a computed configuration holds
//! no template references. Failures inside a branch, the default branch or a
//! free-standing protection are wrapped with the identity of that sub-object.
//!
//! Batches of repositories are computed by [`compute_all`], see [`batch`].

use std::collections::HashMap;

use log::debug;

use crate::config::{
    BranchConfig, BranchProtectionConfig, DefaultBranchConfig, RepoConfig, Templates,
};
use crate::error::{Error, Result};
use crate::merge::{merge_branch_into_default, merge_chain, Merge};
use crate::template::{resolve_all, Template};

pub mod batch;

pub use batch::compute_all;

/// Computes one repository against the template environment.
pub fn compute_repository(repo: &RepoConfig, templates: &Templates) -> Result<RepoConfig> {
    if repo.name.is_none() {
        return Err(Error::MissingName);
    }

    let mut computed = apply_repository_templates(repo, templates)?;

    if let Some(default_branch) = &computed.default_branch {
        let expanded = apply_default_branch_templates(default_branch, templates)
            .map_err(|err| err.context("default branch"))?;
        computed.default_branch = Some(expanded);
    }

    if let Some(branches) = computed.branches.as_mut() {
        for (name, branch) in branches.iter_mut() {
            *branch = apply_branch_templates(branch, templates)
                .map_err(|err| err.context(format!("branch `{}`", name)))?;
        }
    }

    if let Some(protections) = computed.branch_protections.as_mut() {
        for (index, protection) in protections.iter_mut().enumerate() {
            *protection = apply_branch_protection_templates(protection, templates)
                .map_err(|err| err.context(format!("branch protection #`{}`", index)))?;
        }
        collapse_branch_protections(protections);
    }

    Ok(computed)
}

/// Merges the repository template chain beneath `repo`.
///
/// Only the repository's own fields are expanded here; branches and
/// protections contributed by the chain still carry their template lists.
pub fn apply_repository_templates(repo: &RepoConfig, templates: &Templates) -> Result<RepoConfig> {
    let lookup = |name: &str| templates.repository.get(name);
    let chain = resolve_all(repo.template_names(), &lookup, &mut Vec::new())?;

    let mut computed = merge_chain(&chain, repo);
    computed.templates = None;
    Ok(computed)
}

/// Merges the branch template chain beneath `branch` and expands its protection.
pub fn apply_branch_templates(branch: &BranchConfig, templates: &Templates) -> Result<BranchConfig> {
    let lookup = |name: &str| templates.branch.get(name);
    let chain = resolve_all(branch.template_names(), &lookup, &mut Vec::new())?;

    let mut computed = merge_chain(&chain, branch);
    computed.templates = None;
    if let Some(protection) = &computed.protection {
        computed.protection = Some(apply_branch_protection_templates(protection, templates)?);
    }
    Ok(computed)
}

/// Merges the branch template chain beneath the default branch.
///
/// Branch templates contribute their protection settings (and further
/// protection templates); the default branch's own fields are merged last.
pub fn apply_default_branch_templates(
    default_branch: &DefaultBranchConfig,
    templates: &Templates,
) -> Result<DefaultBranchConfig> {
    let lookup = |name: &str| templates.branch.get(name);
    let names = default_branch.templates.as_deref().unwrap_or_default();
    let chain: Vec<&BranchConfig> = resolve_all(names, &lookup, &mut Vec::new())?;

    let mut computed = DefaultBranchConfig::default();
    for template in chain {
        merge_branch_into_default(&mut computed, template);
    }
    computed.merge(default_branch);
    computed.templates = None;

    if let Some(protection) = &computed.protection {
        computed.protection = Some(apply_branch_protection_templates(protection, templates)?);
    }
    Ok(computed)
}

/// Merges the branch-protection template chain beneath `protection`.
pub fn apply_branch_protection_templates(
    protection: &BranchProtectionConfig,
    templates: &Templates,
) -> Result<BranchProtectionConfig> {
    let lookup = |name: &str| templates.branch_protection.get(name);
    let chain = resolve_all(protection.template_names(), &lookup, &mut Vec::new())?;

    let mut computed = merge_chain(&chain, protection);
    computed.templates = None;
    Ok(computed)
}

/// Collapses free-standing protections that share a pattern.
///
/// The first protection seen for a pattern stays in place; every later one
/// is merged into it and removed. Protections without a pattern are kept
/// as they are.
pub fn collapse_branch_protections(protections: &mut Vec<BranchProtectionConfig>) {
    let mut collapsed: Vec<BranchProtectionConfig> = Vec::with_capacity(protections.len());
    let mut first_by_pattern: HashMap<String, usize> = HashMap::new();

    for protection in std::mem::take(protections) {
        let Some(pattern) = protection.pattern.clone() else {
            collapsed.push(protection);
            continue;
        };
        match first_by_pattern.get(&pattern) {
            Some(&index) => {
                debug!("collapsing duplicate branch protection for pattern `{}`", pattern);
                collapsed[index].merge(&protection);
            }
            None => {
                first_by_pattern.insert(pattern, collapsed.len());
                collapsed.push(protection);
            }
        }
    }

    *protections = collapsed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BranchProtectionReviews, RepoMiscConfig};
    use crate::template::TemplateKind;
    use std::collections::BTreeMap;
    use std::error::Error as _;

    fn strings(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    fn protection(pattern: &str) -> BranchProtectionConfig {
        BranchProtectionConfig {
            pattern: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    fn repo(name: &str) -> RepoConfig {
        RepoConfig {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_name_rejected() {
        let err = compute_repository(&RepoConfig::default(), &Templates::default()).unwrap_err();
        assert!(matches!(err, Error::MissingName));
    }

    #[test]
    fn test_identity_without_templates() {
        let explicit = RepoConfig {
            description: Some("service".to_string()),
            visibility: Some("private".to_string()),
            misc: Some(RepoMiscConfig {
                topics: strings(&["rust"]),
                ..Default::default()
            }),
            ..repo("api")
        };

        let computed = compute_repository(&explicit, &Templates::default()).unwrap();

        assert_eq!(computed, explicit);
    }

    #[test]
    fn test_repository_templates_layer_beneath_explicit() {
        let mut templates = Templates::default();
        templates.repository.insert(
            "base".to_string(),
            RepoConfig {
                description: Some("from base".to_string()),
                visibility: Some("private".to_string()),
                misc: Some(RepoMiscConfig {
                    topics: strings(&["org"]),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        templates.repository.insert(
            "public".to_string(),
            RepoConfig {
                templates: strings(&["base"]),
                visibility: Some("public".to_string()),
                ..Default::default()
            },
        );
        let explicit = RepoConfig {
            templates: strings(&["public"]),
            description: Some("own".to_string()),
            misc: Some(RepoMiscConfig {
                topics: strings(&["api"]),
                ..Default::default()
            }),
            ..repo("api")
        };

        let computed = compute_repository(&explicit, &templates).unwrap();

        assert_eq!(computed.description.as_deref(), Some("own"));
        assert_eq!(computed.visibility.as_deref(), Some("public"));
        assert_eq!(computed.misc.unwrap().topics, strings(&["org", "api"]));
        assert_eq!(computed.templates, None);
    }

    #[test]
    fn test_branch_templates_and_protection_layering() {
        let mut templates = Templates::default();
        templates.branch.insert(
            "feature".to_string(),
            BranchConfig {
                source_branch: Some("main".to_string()),
                protection: Some(BranchProtectionConfig {
                    templates: strings(&["reviewed"]),
                    enforce_admins: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        templates.branch_protection.insert(
            "reviewed".to_string(),
            BranchProtectionConfig {
                enforce_admins: Some(true),
                pull_request_reviews: Some(BranchProtectionReviews {
                    required_approving_review_count: Some(2),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let explicit = RepoConfig {
            branches: Some(BTreeMap::from([(
                "dev".to_string(),
                BranchConfig {
                    templates: strings(&["feature"]),
                    protection: Some(BranchProtectionConfig {
                        require_linear_history: Some(true),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )])),
            ..repo("api")
        };

        let computed = compute_repository(&explicit, &templates).unwrap();

        let dev = &computed.branches.as_ref().unwrap()["dev"];
        assert_eq!(dev.source_branch.as_deref(), Some("main"));
        assert_eq!(dev.templates, None);
        let protection = dev.protection.as_ref().unwrap();
        // Protection templates sit beneath the branch template's own settings.
        assert_eq!(protection.enforce_admins, Some(false));
        assert_eq!(protection.require_linear_history, Some(true));
        assert_eq!(
            protection
                .pull_request_reviews
                .as_ref()
                .unwrap()
                .required_approving_review_count,
            Some(2)
        );
        assert_eq!(protection.templates, None);
    }

    #[test]
    fn test_default_branch_uses_branch_template_protection() {
        let mut templates = Templates::default();
        templates.branch.insert(
            "protected".to_string(),
            BranchConfig {
                source_branch: Some("ignored".to_string()),
                protection: Some(BranchProtectionConfig {
                    allows_deletions: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let explicit = RepoConfig {
            default_branch: Some(DefaultBranchConfig {
                name: Some("main".to_string()),
                templates: strings(&["protected"]),
                ..Default::default()
            }),
            ..repo("api")
        };

        let computed = compute_repository(&explicit, &templates).unwrap();

        let default_branch = computed.default_branch.unwrap();
        assert_eq!(default_branch.name.as_deref(), Some("main"));
        assert_eq!(default_branch.templates, None);
        assert_eq!(default_branch.protection.unwrap().allows_deletions, Some(false));
    }

    #[test]
    fn test_branch_failure_has_context() {
        let explicit = RepoConfig {
            branches: Some(BTreeMap::from([(
                "dev".to_string(),
                BranchConfig {
                    templates: strings(&["x"]),
                    ..Default::default()
                },
            )])),
            ..repo("api")
        };

        let err = compute_repository(&explicit, &Templates::default()).unwrap_err();

        assert_eq!(err.to_string(), "branch `dev`: unknown branch template `x`");
        assert!(err.source().is_some());
        assert!(matches!(
            err.root_cause(),
            Error::UnknownTemplate {
                kind: TemplateKind::Branch,
                ..
            }
        ));
    }

    #[test]
    fn test_default_branch_failure_has_context() {
        let explicit = RepoConfig {
            default_branch: Some(DefaultBranchConfig {
                protection: Some(BranchProtectionConfig {
                    templates: strings(&["nope"]),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..repo("api")
        };

        let err = compute_repository(&explicit, &Templates::default()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "default branch: unknown branch protection template `nope`"
        );
    }

    #[test]
    fn test_protection_failure_has_index_context() {
        let explicit = RepoConfig {
            branch_protections: Some(vec![
                protection("main"),
                BranchProtectionConfig {
                    templates: strings(&["missing"]),
                    ..protection("release/*")
                },
            ]),
            ..repo("api")
        };

        let err = compute_repository(&explicit, &Templates::default()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "branch protection #`1`: unknown branch protection template `missing`"
        );
    }

    #[test]
    fn test_eleven_repository_templates_fail_at_root() {
        let mut templates = Templates::default();
        let names: Vec<String> = (0..11).map(|i| format!("t{}", i)).collect();
        for name in &names {
            templates.repository.insert(name.clone(), RepoConfig::default());
        }
        let explicit = RepoConfig {
            templates: Some(names),
            ..repo("api")
        };

        let err = compute_repository(&explicit, &templates).unwrap_err();

        assert_eq!(err.to_string(), "too many repository templates at ROOT");
    }

    #[test]
    fn test_collapse_duplicate_patterns() {
        let mut protections = vec![
            BranchProtectionConfig {
                forbid: None,
                ..protection("m")
            },
            BranchProtectionConfig {
                enforce_admins: Some(false),
                ..protection("m")
            },
        ];

        collapse_branch_protections(&mut protections);

        assert_eq!(
            protections,
            vec![BranchProtectionConfig {
                forbid: None,
                enforce_admins: Some(false),
                ..protection("m")
            }]
        );
    }

    #[test]
    fn test_collapse_keeps_first_position_and_later_values_win() {
        let mut protections = vec![
            BranchProtectionConfig {
                enforce_admins: Some(true),
                status_checks: None,
                ..protection("main")
            },
            protection("release/*"),
            BranchProtectionConfig {
                enforce_admins: Some(false),
                ..protection("main")
            },
            BranchProtectionConfig::default(),
            BranchProtectionConfig::default(),
        ];

        collapse_branch_protections(&mut protections);

        let patterns: Vec<Option<&str>> =
            protections.iter().map(|p| p.pattern.as_deref()).collect();
        assert_eq!(patterns, vec![Some("main"), Some("release/*"), None, None]);
        assert_eq!(protections[0].enforce_admins, Some(false));
    }

    #[test]
    fn test_collapse_happens_after_template_expansion() {
        let mut templates = Templates::default();
        templates.branch_protection.insert(
            "main-rule".to_string(),
            BranchProtectionConfig {
                require_signed_commits: Some(true),
                ..protection("main")
            },
        );
        let explicit = RepoConfig {
            branch_protections: Some(vec![
                protection("main"),
                BranchProtectionConfig {
                    templates: strings(&["main-rule"]),
                    ..Default::default()
                },
            ]),
            ..repo("api")
        };

        let computed = compute_repository(&explicit, &templates).unwrap();

        let protections = computed.branch_protections.unwrap();
        assert_eq!(protections.len(), 1);
        assert_eq!(protections[0].require_signed_commits, Some(true));
    }
}
