//! Lifecycle orchestration for transactional documents.
//!
//! [`DocumentLifecycleController`] creates, edits, saves, cancels and deletes documents of
//! services following either the draft or the sticky-session model, and calls their actions.
//! The backend ([`model::TServiceModel`], [`document::TDocument`]), the service metadata
//! ([`traits::MetaModel`]) and the user interface ([`traits::Presenter`]) are supplied by the caller.

pub mod action;
pub mod app;
pub mod busy;
pub mod config;
pub mod controller;
pub mod delete;
pub mod document;
pub mod error;
pub mod message;
pub mod model;
pub mod params;
pub mod resolver;
pub mod session;
pub mod signal;
pub mod text;
pub mod traits;
pub mod util;

pub use action::{ActionInvoker, ActionParameters, ActionResponse};
pub use app::AppContext;
pub use config::ControllerConfig;
pub use controller::DocumentLifecycleController;
pub use delete::{DeleteOutcome, DeleteParameters, DeletionCoordinator};
pub use document::{Document, DocumentList};
pub use error::{BackendError, LifecycleError};
pub use message::{MessageModel, MessageSink};
pub use model::ServiceModel;
pub use params::{CancelParameters, CreateParameters, SaveParameters};
pub use resolver::SessionModelResolver;

pub use docflow_proto as proto;
