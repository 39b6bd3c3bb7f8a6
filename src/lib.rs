//! # Repository Configuration Library
//!
//! This library turns declarative repository configuration, written as YAML
//! and built from reusable templates, into Terraform resources for the GitHub
//! provider. It backs the `repoform` command-line tool but can be used on its
//! own.
//!
//! ## Quick Example
//!
//! ```
//! use repoform::compute::compute_all;
//! use repoform::linker::{map_all, Links};
//! use repoform::loader;
//! use repoform::render;
//!
//! let config = loader::parse(r#"
//! repositories:
//!   - name: api
//!     templates: [service]
//! templates:
//!   repository:
//!     service:
//!       visibility: private
//!       default_branch:
//!         name: main
//! "#).unwrap();
//!
//! let computed = compute_all(&config).unwrap();
//! let api = &computed["api"];
//! assert_eq!(api.visibility.as_deref(), Some("private"));
//!
//! let resources = map_all(api, Links::ALL);
//! let json = render::to_terraform_json(&resources).unwrap();
//! assert_eq!(
//!     json["resource"]["github_branch_default"]["api"]["repository"],
//!     "${github_repository.api.name}"
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the schema of repositories, branches,
//!   branch protections and their templates.
//! - **Template resolution (`template`)**: expands a template list into an
//!   ordered chain, bounded in depth and fan-out, rejecting cycles.
//! - **Merging (`merge`)**: the field-by-field algebra that layers a chain of
//!   partial configurations into one.
//! - **Computation (`compute`)**: applies templates at every level of a
//!   repository and collapses duplicate protections; `compute_all` does so
//!   for a whole batch in parallel.
//! - **Linking (`linker`, `resource`)**: projects computed repositories into
//!   resource descriptors whose references encode creation order.
//!
//! ## Execution Flow
//!
//! 1.  **Loading**: read every YAML document of a configuration directory.
//! 2.  **Computation**: expand templates per repository, collecting every
//!     failure of the batch.
//! 3.  **Linking**: map each computed repository to resources.
//! 4.  **Rendering**: emit Terraform JSON.

pub mod compute;
pub mod config;
pub mod error;
pub mod linker;
pub mod lint;
pub mod loader;
pub mod merge;
pub mod render;
pub mod resource;
pub mod template;

#[cfg(test)]
mod merge_proptest;
