//! # Configuration Loading
//!
//! Reads YAML configuration documents into a single [`Config`].
//!
//! ## Process
//!
//! 1. Walk the configuration directory with `walkdir`, in file-name order so
//!    the assembled batch does not depend on directory listing order.
//! 2. Decode every `.yaml`/`.yml` file as a [`Config`] document. Empty or
//!    comment-only files are skipped.
//! 3. Concatenate repositories in file order and union the template maps.
//!    A template name defined twice for the same kind is rejected.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::template::TemplateKind;

/// Decodes a single configuration document.
///
/// An empty document yields an empty [`Config`].
pub fn parse(yaml_content: &str) -> Result<Config> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml_content)?;
    if value.is_null() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_value(value)?)
}

/// Loads a single configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse(&content).map_err(|err| Error::ConfigParse {
        message: format!("{}: {}", path.display(), err),
        hint: None,
    })
}

/// Loads every configuration document under `path`.
///
/// `path` may also name a single file.
pub fn load_dir<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if path.is_file() {
        return from_file(path);
    }

    let mut config = Config::default();
    // (kind, name) -> file that defined the template first
    let mut origins: BTreeMap<(TemplateKind, String), PathBuf> = BTreeMap::new();

    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_yaml(entry.path()) {
            continue;
        }
        debug!("loading configuration from {}", entry.path().display());
        let document = from_file(entry.path())?;
        absorb(&mut config, document, entry.path(), &mut origins)?;
    }

    debug!(
        "loaded {} repositories from {}",
        config.repositories.len(),
        path.display()
    );
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

fn absorb(
    config: &mut Config,
    document: Config,
    path: &Path,
    origins: &mut BTreeMap<(TemplateKind, String), PathBuf>,
) -> Result<()> {
    config.repositories.extend(document.repositories);

    let templates = document.templates;
    insert_templates(
        &mut config.templates.repository,
        templates.repository,
        TemplateKind::Repository,
        path,
        origins,
    )?;
    insert_templates(
        &mut config.templates.branch,
        templates.branch,
        TemplateKind::Branch,
        path,
        origins,
    )?;
    insert_templates(
        &mut config.templates.branch_protection,
        templates.branch_protection,
        TemplateKind::BranchProtection,
        path,
        origins,
    )
}

fn insert_templates<T>(
    into: &mut BTreeMap<String, T>,
    from: BTreeMap<String, T>,
    kind: TemplateKind,
    path: &Path,
    origins: &mut BTreeMap<(TemplateKind, String), PathBuf>,
) -> Result<()> {
    for (name, template) in from {
        if let Some(first) = origins.get(&(kind, name.clone())) {
            return Err(Error::ConfigParse {
                message: format!(
                    "{} template `{}` is defined in both {} and {}",
                    kind,
                    name,
                    first.display(),
                    path.display()
                ),
                hint: Some("template names must be unique per kind across all files".to_string()),
            });
        }
        origins.insert((kind, name.clone()), path.to_path_buf());
        into.insert(name, template);
    }
    Ok(())
}
