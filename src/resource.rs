//! Resource descriptors and value formatting.
//!
//! A [`Resource`] names one Terraform resource and holds its attributes. Each
//! attribute value is either a literal or a [`Reference`] to an attribute of
//! another resource; references are what give the generated resources their
//! creation order.
//!
//! Resource identifiers are derived from user-provided names with [`ident`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static INVALID_IDENT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("identifier pattern is valid"));

/// Transliterates an arbitrary name into a Terraform resource identifier.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`, and the result is
/// prefixed with `_` unless it starts with a letter or underscore.
///
/// # Examples
///
/// ```
/// use repoform::resource::ident;
///
/// assert_eq!(ident("my.repo"), "my_repo");
/// assert_eq!(ident("release/*"), "release__");
/// assert_eq!(ident("1st"), "_1st");
/// ```
pub fn ident(name: &str) -> String {
    let replaced = INVALID_IDENT_CHARS.replace_all(name, "_");
    match replaced.chars().next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => replaced.into_owned(),
        _ => format!("_{}", replaced),
    }
}

/// Terraform resource types produced by the linker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Repository,
    DefaultBranch,
    Branch,
    BranchProtection,
}

impl ResourceKind {
    /// The provider's resource type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Repository => "github_repository",
            ResourceKind::DefaultBranch => "github_branch_default",
            ResourceKind::Branch => "github_branch",
            ResourceKind::BranchProtection => "github_branch_protection",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to an attribute exported by another resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ResourceKind,
    pub id: String,
    pub attribute: String,
}

impl Reference {
    pub fn new(kind: ResourceKind, id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            attribute: attribute.into(),
        }
    }
}

impl fmt::Display for Reference {
    /// Formats the reference as a Terraform expression, `type.id.attribute`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.kind, self.id, self.attribute)
    }
}

/// An attribute value, tagged literal or reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Bool(bool),
    Number(u64),
    List(Vec<Value>),
    /// A nested configuration block.
    Block(BTreeMap<String, Value>),
    Reference(Reference),
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    pub fn strings(values: &[String]) -> Self {
        Value::List(values.iter().cloned().map(Value::String).collect())
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }
}

/// Attributes of a resource or nested block, by name.
pub type Attributes = BTreeMap<String, Value>;

/// One resource descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub id: String,
    pub attributes: Attributes,
}

impl Resource {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Sets `key` to `value`.
    pub fn set(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    /// Sets `key` only when a value is present.
    pub fn set_opt(&mut self, key: &str, value: Option<Value>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Reference to one of this resource's exported attributes.
    pub fn reference(&self, attribute: &str) -> Reference {
        Reference::new(self.kind, self.id.clone(), attribute)
    }
}

/// Builds a nested block, returning `None` when the source object is absent.
pub(crate) fn block<T>(source: &Option<T>, fill: impl FnOnce(&T, &mut Attributes)) -> Option<Value> {
    source.as_ref().map(|inner| {
        let mut attributes = Attributes::new();
        fill(inner, &mut attributes);
        Value::Block(attributes)
    })
}

/// Inserts `value` under `key` when present.
pub(crate) fn insert_opt(attributes: &mut Attributes, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        attributes.insert(key.to_string(), value);
    }
}
