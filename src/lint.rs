//! Non-fatal checks on computed repositories.
//!
//! Lints flag configurations that compute and render fine but are likely
//! mistakes: protection patterns GitHub will not match as intended,
//! free-standing protections without a pattern, and branches forked from a
//! branch this configuration does not manage.

use std::fmt;

use glob::Pattern;

use crate::config::RepoConfig;

/// One finding, located within a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lint {
    /// Sub-object the finding is about, e.g. ``branch `dev` ``.
    pub location: String,
    pub message: String,
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Runs every lint against a computed repository.
pub fn check(repo: &RepoConfig) -> Vec<Lint> {
    let mut lints = Vec::new();

    for (index, protection) in repo.branch_protections.iter().flatten().enumerate() {
        let location = format!("branch protection #`{}`", index);
        match protection.pattern.as_deref() {
            None => lints.push(Lint {
                location,
                message: "no pattern given, the protection applies to no branch".to_string(),
            }),
            Some(pattern) => {
                if let Err(err) = Pattern::new(pattern) {
                    lints.push(Lint {
                        location,
                        message: format!("pattern `{}` is not a valid glob: {}", pattern, err),
                    });
                }
            }
        }
    }

    let default_name = repo
        .default_branch
        .as_ref()
        .and_then(|default_branch| default_branch.name.as_deref());
    if let Some(branches) = &repo.branches {
        for (name, branch) in branches {
            let Some(source) = branch.source_branch.as_deref() else {
                continue;
            };
            if Some(source) != default_name && !branches.contains_key(source) {
                lints.push(Lint {
                    location: format!("branch `{}`", name),
                    message: format!(
                        "source branch `{}` is neither the default branch nor a configured branch",
                        source
                    ),
                });
            }
        }
    }

    lints
}
