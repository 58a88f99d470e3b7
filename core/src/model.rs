use std::sync::Arc;

use async_trait::async_trait;
use docflow_proto::{ActionName, Data, DocumentPath, DraftAdministrativeData, EntitySet, SideEffects};
use serde_json::Value;

use crate::{document::Document, error::BackendError};

/// One invocation of a backend action, as handed to the service model.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub action: ActionName,
    /// The bound document; `None` for unbound and collection-bound actions.
    pub target: Option<Document>,
    pub parameters: Data,
    /// With strict handling the backend answers 412 instead of applying a change that raises warnings.
    pub strict: bool,
    pub side_effects: Option<SideEffects>,
    pub group_id: Option<String>,
}

impl ActionRequest {
    pub fn new(action: ActionName) -> Self {
        Self { action, target: None, parameters: Data::new(), strict: true, side_effects: None, group_id: None }
    }

    pub fn target(mut self, document: &Document) -> Self {
        self.target = Some(document.clone());
        self
    }

    pub fn parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.to_string(), value.into());
        self
    }

    pub fn parameters(mut self, parameters: Data) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn side_effects(mut self, side_effects: Option<SideEffects>) -> Self {
        self.side_effects = side_effects;
        self
    }
}

#[derive(Debug, Clone)]
pub enum FunctionTarget {
    Document(Document),
    Collection(EntitySet),
}

#[derive(Debug, Clone)]
pub struct FunctionRequest {
    pub name: String,
    pub target: Option<FunctionTarget>,
}

/// The service an entity lives in: the OData model as a capability set.
#[async_trait]
pub trait TServiceModel: Send + Sync + 'static {
    /// Invoke an action. Actions returning an entity yield the bound document for it.
    async fn invoke(&self, request: ActionRequest) -> Result<Option<Document>, BackendError>;
    async fn call_function(&self, request: FunctionRequest) -> Result<Data, BackendError>;
    async fn draft_administrative_data(&self, document: &Document) -> Result<Option<DraftAdministrativeData>, BackendError>;
    /// The active instance for a draft, or the draft for an active instance.
    async fn sibling_entity(&self, document: &Document) -> Result<Option<Document>, BackendError>;
    /// A document bound to an absolute path.
    async fn bind(&self, path: &DocumentPath) -> Result<Document, BackendError>;
    async fn request_side_effects(&self, document: &Document, side_effects: &SideEffects) -> Result<(), BackendError>;
}

/// Type-erased service model
#[derive(Clone)]
pub struct ServiceModel(Arc<dyn TServiceModel>);

impl ServiceModel {
    pub fn new(inner: impl TServiceModel) -> Self { Self(Arc::new(inner)) }

    pub fn from_arc(inner: Arc<dyn TServiceModel>) -> Self { Self(inner) }

    pub async fn invoke(&self, request: ActionRequest) -> Result<Option<Document>, BackendError> { self.0.invoke(request).await }

    pub async fn call_function(&self, request: FunctionRequest) -> Result<Data, BackendError> { self.0.call_function(request).await }

    pub async fn draft_administrative_data(&self, document: &Document) -> Result<Option<DraftAdministrativeData>, BackendError> {
        self.0.draft_administrative_data(document).await
    }

    pub async fn sibling_entity(&self, document: &Document) -> Result<Option<Document>, BackendError> {
        self.0.sibling_entity(document).await
    }

    pub async fn bind(&self, path: &DocumentPath) -> Result<Document, BackendError> { self.0.bind(path).await }

    pub async fn request_side_effects(&self, document: &Document, side_effects: &SideEffects) -> Result<(), BackendError> {
        self.0.request_side_effects(document, side_effects).await
    }
}

impl std::fmt::Debug for ServiceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "ServiceModel") }
}
