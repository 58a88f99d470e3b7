use async_trait::async_trait;
use docflow_proto::{
    ActionMetadata, ActionName, ActionParameterInfo, Data, DefaultValuesFunction, DocumentPath, DraftRoot, EntitySet, Message,
    MessageBatch, SideEffects, StickySession,
};

use crate::document::Document;

/// Read-only view of the service metadata and its annotations.
/// Implementations are plain lookups; they must not block.
pub trait MetaModel: Send + Sync + 'static {
    /// Draft actions, if the entity set is a draft root.
    fn draft_root(&self, entity_set: &EntitySet) -> Option<DraftRoot>;

    /// Session actions, if the entity set supports sticky sessions.
    fn sticky_session(&self, entity_set: &EntitySet) -> Option<StickySession>;

    /// A dedicated action that creates documents of this entity set, for the given startup parameters.
    fn creation_action(&self, _entity_set: &EntitySet, _startup: &Data) -> Option<ActionName> { None }

    fn default_values_function(&self, _entity_set: &EntitySet) -> Option<DefaultValuesFunction> { None }

    /// Key properties that are neither computed nor generated by the backend.
    fn mandatory_key_fields(&self, _entity_set: &EntitySet) -> Vec<String> { Vec::new() }

    fn action(&self, action: &ActionName) -> Option<ActionMetadata>;

    /// Side effects to re-request for documents of this entity set.
    fn entity_side_effects(&self, _entity_set: &EntitySet) -> Option<SideEffects> { None }

    /// Whether deletion of this particular document is restricted.
    fn delete_restricted(&self, _document: &Document) -> bool { false }
}

/// Options for presenting a message batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowMessageOptions {
    /// Also consume transition messages bound to documents.
    pub include_bound: bool,
    /// The batch stems from a concurrent-edit conflict ("someone else is editing").
    pub concurrent_edit: bool,
    /// Present as a dialog even for a single message.
    pub force_dialog: bool,
    pub action_label: Option<String>,
}

/// A question the controller needs the user to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmRequest {
    Discard { document: DocumentPath, text: String },
    Delete { title: Option<String>, text: String, count: usize },
    CriticalAction { action: ActionName, text: String },
    UnsavedChanges { document: DocumentPath, user: String, text: String },
    StrictHandling { action: ActionName, warnings: Vec<Message> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRequest {
    pub action: ActionName,
    pub label: String,
    pub parameters: Vec<ActionParameterInfo>,
    /// Values known upfront, to prefill the dialog.
    pub values: Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntryRequest {
    pub entity_set: EntitySet,
    pub fields: Vec<String>,
    pub values: Data,
    /// Fields the previous attempt left empty.
    pub invalid: Vec<String>,
}

/// Everything the controller asks of the UI layer.
#[async_trait]
pub trait Presenter: Send + Sync + 'static {
    async fn show_messages(&self, batch: &MessageBatch, options: &ShowMessageOptions);

    /// A blocking information box.
    async fn show_message_box(&self, text: &str);

    /// Returns true when the user confirmed.
    async fn confirm(&self, request: ConfirmRequest) -> bool;

    /// Returns `None` when the user cancelled the dialog.
    async fn collect_parameters(&self, request: ParameterRequest) -> Option<Data>;

    /// Returns `None` when the user cancelled the dialog.
    async fn collect_keys(&self, request: KeyEntryRequest) -> Option<Data>;
}
