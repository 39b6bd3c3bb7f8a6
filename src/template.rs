//! # Template Resolution
//!
//! Expands a template name into the ordered list of templates that must be
//! merged to realise it: every ancestor first, then the template itself
//! (post-order, the same depth-first ordering used for inherited
//! configuration). Later entries are more specific, so merging the list in
//! order lets them win.
//!
//! Expansion is bounded:
//!
//! - a resolution path longer than [`MAX_TEMPLATE_DEPTH`] fails with
//!   [`Error::TooManyLevels`];
//! - a single template list with more than [`MAX_TEMPLATES_PER_LIST`] names
//!   fails with [`Error::TooManyTemplates`];
//! - a name already on the current path fails with [`Error::CycleDetected`].
//!
//! Paths are rendered arrow-joined, deepest template first, and as `ROOT`
//! when the failure happened on a top-level object's own template list.
//! The same template may legitimately appear more than once in a result when
//! two siblings share an ancestor; no deduplication happens here.

use std::fmt;

use log::trace;

use crate::config::{BranchConfig, BranchProtectionConfig, RepoConfig};
use crate::error::{Error, Result};

/// Maximum length of a template resolution path.
pub const MAX_TEMPLATE_DEPTH: usize = 10;

/// Maximum number of names in a single template list.
pub const MAX_TEMPLATES_PER_LIST: usize = 10;

/// Path label used when a failure happens outside any template.
pub const ROOT_PATH: &str = "ROOT";

/// The three independent template namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateKind {
    Repository,
    Branch,
    BranchProtection,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemplateKind::Repository => "repository",
            TemplateKind::Branch => "branch",
            TemplateKind::BranchProtection => "branch protection",
        })
    }
}

/// A configuration kind that can inherit from named templates.
pub trait Template {
    /// Namespace the template names of this kind live in.
    const KIND: TemplateKind;

    /// Names of the templates this object inherits from, in order.
    fn template_names(&self) -> &[String];
}

impl Template for RepoConfig {
    const KIND: TemplateKind = TemplateKind::Repository;

    fn template_names(&self) -> &[String] {
        self.templates.as_deref().unwrap_or_default()
    }
}

impl Template for BranchConfig {
    const KIND: TemplateKind = TemplateKind::Branch;

    fn template_names(&self) -> &[String] {
        self.templates.as_deref().unwrap_or_default()
    }
}

impl Template for BranchProtectionConfig {
    const KIND: TemplateKind = TemplateKind::BranchProtection;

    fn template_names(&self) -> &[String] {
        self.templates.as_deref().unwrap_or_default()
    }
}

/// Resolves one template name into its ancestors followed by itself.
///
/// `lookup` maps a name to its template, `path` holds the names currently
/// being expanded (empty for a top-level object). On success `path` is left
/// as it was passed in.
pub fn resolve<'a, T, L>(name: &str, lookup: &L, path: &mut Vec<String>) -> Result<Vec<&'a T>>
where
    T: Template,
    L: Fn(&str) -> Option<&'a T>,
{
    let kind = T::KIND;

    if let Some(start) = path.iter().position(|entered| entered == name) {
        let mut cycle: Vec<&str> = path[start..].iter().map(String::as_str).collect();
        cycle.push(name);
        return Err(Error::CycleDetected {
            kind,
            cycle: cycle.join(" -> "),
        });
    }

    path.push(name.to_string());
    if path.len() > MAX_TEMPLATE_DEPTH {
        return Err(Error::TooManyLevels {
            kind,
            path: format_path(path),
        });
    }

    trace!("expanding {} template `{}` at {}", kind, name, format_path(path));

    let template = lookup(name).ok_or_else(|| Error::UnknownTemplate {
        kind,
        name: name.to_string(),
    })?;

    let mut chain = resolve_all(template.template_names(), lookup, path)?;
    chain.push(template);

    path.pop();
    Ok(chain)
}

/// Resolves a whole template list, expanding each name in list order.
pub fn resolve_all<'a, T, L>(
    names: &[String],
    lookup: &L,
    path: &mut Vec<String>,
) -> Result<Vec<&'a T>>
where
    T: Template,
    L: Fn(&str) -> Option<&'a T>,
{
    if names.len() > MAX_TEMPLATES_PER_LIST {
        return Err(Error::TooManyTemplates {
            kind: T::KIND,
            path: format_path(path),
        });
    }

    let mut chain = Vec::new();
    for name in names {
        chain.extend(resolve(name, lookup, path)?);
    }
    Ok(chain)
}

/// Renders a resolution path deepest-first, or [`ROOT_PATH`] when empty.
pub fn format_path(path: &[String]) -> String {
    if path.is_empty() {
        return ROOT_PATH.to_string();
    }
    path.iter()
        .rev()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
