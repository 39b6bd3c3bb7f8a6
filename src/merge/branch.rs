//! Branch and default-branch merges

use super::{merge_list, merge_nested, merge_value, Merge};
use crate::config::{BranchConfig, DefaultBranchConfig};

impl Merge for BranchConfig {
    fn merge(&mut self, from: &Self) {
        merge_value(&mut self.source_branch, &from.source_branch);
        merge_value(&mut self.source_sha, &from.source_sha);
        merge_list(&mut self.templates, &from.templates);
        merge_nested(&mut self.protection, &from.protection);
    }
}

impl Merge for DefaultBranchConfig {
    fn merge(&mut self, from: &Self) {
        merge_value(&mut self.name, &from.name);
        merge_value(&mut self.rename, &from.rename);
        merge_list(&mut self.templates, &from.templates);
        merge_nested(&mut self.protection, &from.protection);
    }
}

/// Applies a branch template to a default branch.
///
/// Only the fields the two shapes share carry over: the template list and
/// the protection settings. Source branch and source commit have no meaning
/// for an existing default branch and are ignored.
pub fn merge_branch_into_default(to: &mut DefaultBranchConfig, from: &BranchConfig) {
    merge_list(&mut to.templates, &from.templates);
    merge_nested(&mut to.protection, &from.protection);
}
