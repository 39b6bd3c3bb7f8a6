//! Terraform JSON rendering.
//!
//! Resources are grouped under `resource`, then by type, then by identifier,
//! which is the layout Terraform expects in a `.tf.json` file. References
//! become interpolation strings (`"${github_repository.api.name}"`) and nested
//! blocks become JSON objects.

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};

use crate::error::{Error, Result};
use crate::resource::{Resource, Value};

/// Builds the Terraform JSON document for `resources`.
pub fn to_terraform_json(resources: &[Resource]) -> Result<Json> {
    let mut by_type: BTreeMap<&str, Map<String, Json>> = BTreeMap::new();

    for resource in resources {
        let by_id = by_type.entry(resource.kind.as_str()).or_default();
        if by_id.contains_key(&resource.id) {
            return Err(Error::DuplicateResource {
                kind: resource.kind,
                id: resource.id.clone(),
            });
        }
        let attributes = resource
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), to_json(value)))
            .collect();
        by_id.insert(resource.id.clone(), Json::Object(attributes));
    }

    let by_type = by_type
        .into_iter()
        .map(|(kind, by_id)| (kind.to_string(), Json::Object(by_id)))
        .collect();
    let mut document = Map::new();
    document.insert("resource".to_string(), Json::Object(by_type));
    Ok(Json::Object(document))
}

/// Renders `resources` as pretty-printed Terraform JSON.
pub fn to_string_pretty(resources: &[Resource]) -> Result<String> {
    let document = to_terraform_json(resources)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

fn to_json(value: &Value) -> Json {
    match value {
        Value::String(s) => Json::String(s.clone()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => Json::from(*n),
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Block(attributes) => Json::Object(
            attributes
                .iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        ),
        Value::Reference(reference) => Json::String(format!("${{{}}}", reference)),
    }
}
