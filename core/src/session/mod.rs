//! The two session models behind one contract.
//!
//! The controller picks an adapter once, at classification time, and from then on only
//! talks to the [`SessionAdapter`] trait.

mod draft;
mod sticky;

pub use draft::DraftSession;
pub use sticky::StickySession;

use async_trait::async_trait;
use docflow_proto::{Data, SessionModel};

use crate::{
    app::AppContext,
    document::{CreateOptions, Document, DocumentList},
    error::LifecycleError,
};

#[async_trait]
pub trait SessionAdapter: Send + Sync {
    fn session_model(&self) -> SessionModel;

    /// Create a new document in `list`. A transient result still awaits its backend round trip.
    async fn create(&self, list: &DocumentList, data: Data, options: CreateOptions) -> Result<Document, LifecycleError>;

    /// Open `document` for editing and return the handle to edit.
    async fn edit(&self, document: &Document) -> Result<Document, LifecycleError>;

    /// Persist the edited document and return the active document.
    async fn activate(&self, document: &Document) -> Result<Document, LifecycleError>;

    /// Whether the persisted edit state differs from what was there before editing began.
    async fn is_modified(&self, document: &Document) -> bool { document.has_pending_changes() }

    /// Throw away the edit state. Returns the document to show afterwards, if there still is one.
    async fn discard(&self, document: &Document, is_new: bool) -> Result<Option<Document>, LifecycleError>;
}

/// `None` for services that support neither model.
pub fn adapter_for(session_model: SessionModel, app: &AppContext) -> Option<Box<dyn SessionAdapter>> {
    match session_model {
        SessionModel::Draft => Some(Box::new(DraftSession::new(app.clone()))),
        SessionModel::Sticky => Some(Box::new(StickySession::new(app.clone()))),
        SessionModel::NonDraft => None,
    }
}
