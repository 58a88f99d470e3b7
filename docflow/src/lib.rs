//! # Docflow
//!
//! Docflow drives the lifecycle of transactional documents held by a backend service:
//! creating them, opening them for editing, saving, cancelling, deleting and calling actions on them.
//!
//! ## Session models
//!
//! - **Draft**: editing happens on a separate draft instance which activation merges into the
//!   active document. Drafts survive across sessions and may be held by other users.
//! - **Sticky**: editing happens in place, inside a server session that stays pinned to the
//!   client until the document is saved or discarded.
//!
//! Services supporting neither are rejected with [`LifecycleError::UnsupportedSessionModel`].
//!
//! ## Wiring
//!
//! The caller supplies three capabilities:
//!
//! - a [`MetaModel`] answering metadata questions (draft actions, session actions, action metadata)
//! - a [`Presenter`] showing messages and asking the user
//! - the backend itself, as [`TServiceModel`], [`TDocument`] and [`TDocumentList`] implementations
//!
//! ```rust,ignore
//! let app = AppContext::new(Arc::new(metamodel), presenter.clone(), ControllerConfig::default());
//! let controller = DocumentLifecycleController::new(app);
//! let messages = MessageSink::new(MessageModel::new(), presenter);
//!
//! let draft = controller.edit_document(&order, &messages).await?;
//! let active = controller.save_document(&draft, SaveParameters::default(), &messages).await?;
//! ```

pub use docflow_core::{
    action::{ActionInvoker, ActionParameters, ActionResponse},
    app::AppContext,
    busy::{BusyGuard, BusyLocker, BusyStats},
    config::ControllerConfig,
    controller::DocumentLifecycleController,
    delete::{DeleteOutcome, DeleteParameters, DeletionCoordinator},
    document::{CreateOptions, Document, DocumentList, TDocument, TDocumentList},
    error::{BackendError, ConfigError, LifecycleError},
    message::{MessageModel, MessageSink},
    model::{ActionRequest, FunctionRequest, FunctionTarget, ServiceModel, TServiceModel},
    params::{BeforeCancel, BeforeCreate, CancelParameters, CreateParameters, SaveParameters},
    resolver::SessionModelResolver,
    session::{DraftSession, SessionAdapter, StickySession},
    signal::{CreateCompletedHub, CreateCompletedWatch, CreateOutcome},
    text::{keys, TextBundle},
    traits::{ConfirmRequest, KeyEntryRequest, MetaModel, ParameterRequest, Presenter, ShowMessageOptions},
};

pub use docflow_proto as proto;
pub use docflow_proto::{ActionName, BusyMode, BusyParameters, Data, DocumentPath, EntitySet, Message, MessageBatch, MessageType, SessionModel};

// Re-export dependencies needed by trait implementations
pub use async_trait::async_trait;
pub use serde_json;
pub use tracing;
