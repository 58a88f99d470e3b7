use serde::{Deserialize, Serialize};

/// Absolute path of one entity instance in the service, e.g. `/SalesOrder(ID=1,IsActiveEntity=false)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn new(path: impl Into<String>) -> Self { DocumentPath(path.into()) }

    pub fn as_str(&self) -> &str { &self.0 }

    /// The entity set segment of the path: everything up to the first key predicate.
    pub fn entity_set(&self) -> EntitySet {
        let trimmed = self.0.split('(').next().unwrap_or_default();
        EntitySet::new(trimmed)
    }
}

impl From<&str> for DocumentPath {
    fn from(val: &str) -> Self { DocumentPath(val.to_string()) }
}

impl From<String> for DocumentPath {
    fn from(val: String) -> Self { DocumentPath(val) }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self { path.0 }
}

impl AsRef<str> for DocumentPath {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// Metadata path of an entity set (`/SalesOrder`). This is what the metamodel is queried with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntitySet(String);

impl EntitySet {
    pub fn new(name: &str) -> Self {
        if name.starts_with('/') {
            EntitySet(name.to_string())
        } else {
            EntitySet(format!("/{}", name))
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// Name without the leading slash, as it appears in bound action names.
    pub fn name(&self) -> &str { self.0.trim_start_matches('/') }
}

impl From<&str> for EntitySet {
    fn from(val: &str) -> Self { EntitySet::new(val) }
}

impl PartialEq<str> for EntitySet {
    fn eq(&self, other: &str) -> bool { self.0 == other || self.name() == other }
}

impl std::fmt::Display for EntitySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}
