//! # Error Handling
//!
//! This module defines the centralized error type for `repoform`. Like the
//! rest of the library it uses `thiserror` to derive `Display` and `Error`
//! implementations for a single [`Error`] enum.
//!
//! ## Taxonomy
//!
//! - **User-input errors**: a repository without a name, an unknown template,
//!   too many templates in one list, too many nested template levels, a
//!   template cycle, or two repositories claiming the same identity. These are
//!   always reported with the path that led to them.
//! - **Context wrapping**: each layer of the computer wraps a child failure in
//!   [`Error::Context`], so a message such as
//!   ``branch `dev`: unknown branch template `x` `` can be reconstructed while
//!   the inner error stays reachable through [`std::error::Error::source`].
//! - **Batch aggregation**: independent repositories never fail fast. Their
//!   failures are gathered into [`BatchFailures`], sorted by key so identical
//!   bad input always yields an identical report.
//! - **Output errors**: two generated resources claiming the same identifier.
//! - **Boundary errors**: I/O, YAML and JSON errors from the loader and the
//!   renderer.
//!
//! Contract violations (a resource mapper invoked without any way to refer to
//! its repository) are not represented here: they panic.

use std::fmt;

use thiserror::Error;

use crate::resource::ResourceKind;
use crate::template::TemplateKind;

/// Main error type for repoform operations
#[derive(Error, Debug)]
pub enum Error {
    /// A repository configuration has no `name`.
    #[error("repository name is missing")]
    MissingName,

    /// A template list references a name missing from the template set.
    #[error("unknown {kind} template `{name}`")]
    UnknownTemplate { kind: TemplateKind, name: String },

    /// A single template list holds more entries than allowed.
    ///
    /// `path` is the arrow-joined resolution path where the list was found,
    /// or `ROOT` for the top-level object's own list.
    #[error("too many {kind} templates at {path}")]
    TooManyTemplates { kind: TemplateKind, path: String },

    /// Template expansion nested deeper than allowed.
    ///
    /// `path` lists the resolution path deepest-first.
    #[error("too many levels of {kind} templates: {path}")]
    TooManyLevels { kind: TemplateKind, path: String },

    /// A template references itself, directly or through its ancestors.
    #[error("cycle detected in {kind} templates: {cycle}")]
    CycleDetected { kind: TemplateKind, cycle: String },

    /// Two repositories in one batch share a name or resource identifier.
    #[error("repository `{name}` collides with repository `{first}` (resource identifier `{id}`)")]
    DuplicateRepository {
        name: String,
        first: String,
        id: String,
    },

    /// Two generated resources of one type share an identifier.
    #[error("duplicate {kind} resource `{id}`")]
    DuplicateResource { kind: ResourceKind, id: String },

    /// A child failure, annotated with the sub-object it happened in.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// Every failure of a batch computation.
    #[error("{0}")]
    Batch(BatchFailures),

    /// The configuration documents could not be assembled.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A directory traversal error, wrapped from `walkdir::Error`.
    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Wraps `self` with the identity of the sub-object it occurred in.
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping any [`Error::Context`] layers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures collected from independent repositories of one batch.
///
/// Entries are kept sorted by key; failures sharing a key keep the order in
/// which they were recorded.
#[derive(Debug)]
pub struct BatchFailures {
    failures: Vec<(String, Error)>,
}

impl BatchFailures {
    /// Builds a report from unordered `(key, error)` pairs.
    pub fn new(mut failures: Vec<(String, Error)>) -> Self {
        failures.sort_by(|a, b| a.0.cmp(&b.0));
        Self { failures }
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.failures.iter().map(|(key, err)| (key.as_str(), err))
    }
}

impl fmt::Display for BatchFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.failures.len() == 1 {
            "error"
        } else {
            "errors"
        };
        write!(
            f,
            "{} {} in repository configuration:",
            self.failures.len(),
            noun
        )?;
        for (key, err) in &self.failures {
            write!(f, "\n  - {}: {}", key, err)?;
        }
        Ok(())
    }
}
