use std::sync::Arc;

use async_trait::async_trait;
use docflow_proto::{Data, DocumentPath, EntitySet};
use serde_json::Value;

use crate::{error::BackendError, model::ServiceModel, signal::CreateCompletedHub};

/// One entity instance (draft or active) as the binding layer exposes it.
///
/// The controller never mutates a document's data; it only asks the binding layer to
/// perform operations on it.
#[async_trait]
pub trait TDocument: Send + Sync + 'static {
    fn path(&self) -> DocumentPath;
    fn entity_set(&self) -> EntitySet;
    /// Created on the client but not yet persisted.
    fn is_transient(&self) -> bool;
    /// An inactive row exists only on the client until the user starts filling it.
    fn is_inactive(&self) -> bool { false }
    /// False for draft instances.
    fn is_active_entity(&self) -> bool;
    fn has_pending_changes(&self) -> bool;
    fn is_keep_alive(&self) -> bool;
    fn set_keep_alive(&self, keep_alive: bool);
    fn property(&self, name: &str) -> Option<Value>;
    fn model(&self) -> ServiceModel;

    async fn reset_changes(&self) -> Result<(), BackendError>;
    async fn request_canonical_path(&self) -> Result<DocumentPath, BackendError>;
    async fn refresh(&self) -> Result<(), BackendError>;
    async fn delete(&self, group_id: Option<&str>) -> Result<(), BackendError>;
}

/// Type-erased document handle
#[derive(Clone)]
pub struct Document(Arc<dyn TDocument>);

impl Document {
    pub fn new(inner: impl TDocument) -> Self { Self(Arc::new(inner)) }

    pub fn from_arc(inner: Arc<dyn TDocument>) -> Self { Self(inner) }

    pub fn path(&self) -> DocumentPath { self.0.path() }
    pub fn entity_set(&self) -> EntitySet { self.0.entity_set() }
    pub fn is_transient(&self) -> bool { self.0.is_transient() }
    pub fn is_inactive(&self) -> bool { self.0.is_inactive() }
    pub fn is_active_entity(&self) -> bool { self.0.is_active_entity() }
    pub fn has_pending_changes(&self) -> bool { self.0.has_pending_changes() }
    pub fn is_keep_alive(&self) -> bool { self.0.is_keep_alive() }
    pub fn set_keep_alive(&self, keep_alive: bool) { self.0.set_keep_alive(keep_alive) }
    pub fn property(&self, name: &str) -> Option<Value> { self.0.property(name) }
    pub fn model(&self) -> ServiceModel { self.0.model() }

    pub async fn reset_changes(&self) -> Result<(), BackendError> { self.0.reset_changes().await }
    pub async fn request_canonical_path(&self) -> Result<DocumentPath, BackendError> { self.0.request_canonical_path().await }
    pub async fn refresh(&self) -> Result<(), BackendError> { self.0.refresh().await }
    pub async fn delete(&self, group_id: Option<&str>) -> Result<(), BackendError> { self.0.delete(group_id).await }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "Document({})", self.0.path()) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub at_end: bool,
    pub inactive: bool,
}

/// A collection binding (a table, or the root list of an application).
#[async_trait]
pub trait TDocumentList: Send + Sync + 'static {
    fn path(&self) -> String;
    fn entity_set(&self) -> EntitySet;
    fn model(&self) -> ServiceModel;
    /// The document owning this list, for lists reached through a navigation property.
    fn parent(&self) -> Option<Document> { None }
    fn documents(&self) -> Vec<Document>;
    /// Adds a transient row; the round trip is reported through `create_completed`.
    fn create(&self, data: Data, options: CreateOptions) -> Result<Document, BackendError>;
    fn create_completed(&self) -> &CreateCompletedHub;

    async fn reset_changes(&self) -> Result<(), BackendError>;
}

/// Type-erased list binding
#[derive(Clone)]
pub struct DocumentList(Arc<dyn TDocumentList>);

impl DocumentList {
    pub fn new(inner: impl TDocumentList) -> Self { Self(Arc::new(inner)) }

    pub fn from_arc(inner: Arc<dyn TDocumentList>) -> Self { Self(inner) }

    pub fn path(&self) -> String { self.0.path() }
    pub fn entity_set(&self) -> EntitySet { self.0.entity_set() }
    pub fn model(&self) -> ServiceModel { self.0.model() }
    pub fn parent(&self) -> Option<Document> { self.0.parent() }
    pub fn documents(&self) -> Vec<Document> { self.0.documents() }
    pub fn create(&self, data: Data, options: CreateOptions) -> Result<Document, BackendError> { self.0.create(data, options) }
    pub fn create_completed(&self) -> &CreateCompletedHub { self.0.create_completed() }

    pub async fn reset_changes(&self) -> Result<(), BackendError> { self.0.reset_changes().await }
}

impl std::fmt::Debug for DocumentList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "DocumentList({})", self.0.path()) }
}
