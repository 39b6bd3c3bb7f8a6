//! Batch computation over independent repositories
//!
//! Every repository of a batch is computed in parallel using rayon. Failures
//! never stop the other repositories: they are collected under the failing
//! repository's key (its name, or `repository #<index>` when it has none) and
//! returned together as [`Error::Batch`], sorted by key.
//!
//! Repository identity is checked across the batch in document order: a
//! repository whose name, or transliterated resource identifier, was already
//! claimed by an earlier one is reported as [`Error::DuplicateRepository`].

use std::collections::{BTreeMap, HashMap};

use log::debug;
use rayon::prelude::*;

use super::compute_repository;
use crate::config::{Config, RepoConfig};
use crate::error::{BatchFailures, Error, Result};
use crate::resource::ident;

/// Computes every repository of `config`, keyed by repository name.
pub fn compute_all(config: &Config) -> Result<BTreeMap<String, RepoConfig>> {
    debug!("computing {} repositories", config.repositories.len());

    let results: Vec<Result<RepoConfig>> = config
        .repositories
        .par_iter()
        .map(|repo| compute_repository(repo, &config.templates))
        .collect();

    let mut computed = BTreeMap::new();
    let mut failures = Vec::new();
    // resource identifier -> name of the repository that claimed it first
    let mut claimed: HashMap<String, String> = HashMap::new();

    for (index, (repo, result)) in config.repositories.iter().zip(results).enumerate() {
        let key = batch_key(repo, index);

        let mut duplicate = false;
        if let Some(name) = &repo.name {
            let id = ident(name);
            match claimed.get(&id) {
                Some(first) => {
                    duplicate = true;
                    failures.push((
                        key.clone(),
                        Error::DuplicateRepository {
                            name: name.clone(),
                            first: first.clone(),
                            id,
                        },
                    ));
                }
                None => {
                    claimed.insert(id, name.clone());
                }
            }
        }

        match result {
            Ok(repo) if !duplicate => {
                debug!("computed repository `{}`", key);
                computed.insert(key, repo);
            }
            Ok(_) => {}
            Err(err) => failures.push((key, err)),
        }
    }

    if failures.is_empty() {
        Ok(computed)
    } else {
        Err(Error::Batch(BatchFailures::new(failures)))
    }
}

/// Key a repository's result or failure is reported under.
fn batch_key(repo: &RepoConfig, index: usize) -> String {
    match &repo.name {
        Some(name) => name.clone(),
        None => format!("repository #{}", index),
    }
}
