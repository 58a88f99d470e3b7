//! Public error types for docflow.
//!
//! `LifecycleError` is what every lifecycle operation returns. Expected business outcomes
//! (`Cancelled`, `CreationFailed`) are variants like any other; unexpected collaborator
//! behaviour is wrapped as `Failure`.

use docflow_proto::{ActionName, DecodeError, EntitySet};
use error_stack::Report;
use thiserror::Error;

/// Marker context for defects that cross the public API boundary.
/// The actual error chain is preserved in the Report via error-stack.
#[derive(Debug, Error)]
#[error("internal error")]
pub struct InternalError;

/// A free-form description of a defect, used as the root of a `Failure` report.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Defect(pub String);

/// Error type for document lifecycle operations.
///
/// Returned from: `DocumentLifecycleController::{create,edit,save,cancel,delete}_document`,
/// `ActionInvoker::call_action`
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The entity set is neither draft enabled nor sticky-session enabled
    #[error("entity set {0} supports neither draft nor sticky sessions")]
    UnsupportedSessionModel(EntitySet),

    /// An operation that needs a document or list was called without one
    #[error("missing binding context")]
    MissingBindingContext,

    /// A bound action without target documents, or an unbound action without a service model
    #[error("action {0} needs either a target document or a service model")]
    MissingModelOrContext(ActionName),

    /// The backend refused the new document
    #[error("creation failed")]
    CreationFailed,

    /// The user dismissed a dialog
    #[error("cancelled by user")]
    Cancelled,

    /// The action failed for every target document
    #[error("action {0} failed")]
    ActionExecutionFailed(ActionName),

    /// The document is locked by another user
    #[error("locked by {holder}")]
    DocumentLocked { holder: String },

    /// The backend rejected the request
    #[error("backend error: {0}")]
    Backend(BackendError),

    /// Internal failure - use `.diagnostic()` for details
    #[error("{0:?}")]
    Failure(Report<InternalError>),
}

impl LifecycleError {
    /// Get diagnostic string if this is a Failure
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Failure(report) => Some(format!("{report:?}")),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool { matches!(self, Self::Cancelled) }

    /// Text for the user when nothing else explains the failure. `None` for outcomes the user
    /// caused or already saw in a dialog.
    pub fn user_text(&self) -> Option<String> {
        match self {
            Self::Backend(err) => Some(err.message.clone()),
            Self::CreationFailed | Self::ActionExecutionFailed(_) => Some(self.to_string()),
            Self::Failure(_) => Some(InternalError.to_string()),
            Self::Cancelled | Self::DocumentLocked { .. } => None,
            Self::UnsupportedSessionModel(_) | Self::MissingBindingContext | Self::MissingModelOrContext(_) => None,
        }
    }

    pub(crate) fn defect(message: impl Into<String>) -> Self {
        LifecycleError::Failure(Report::new(Defect(message.into())).change_context(InternalError))
    }
}

impl From<BackendError> for LifecycleError {
    fn from(err: BackendError) -> Self {
        LifecycleError::Backend(err)
    }
}

impl From<DecodeError> for LifecycleError {
    fn from(err: DecodeError) -> Self {
        LifecycleError::Failure(Report::new(err).change_context(InternalError))
    }
}

/// A failed round trip to the service, normalized from whatever the transport reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{message}", .status.map(|s| format!("[{s}] ")).unwrap_or_default())]
pub struct BackendError {
    pub status: Option<u16>,
    pub message: String,
}

impl BackendError {
    pub fn new(status: u16, message: impl Into<String>) -> Self { Self { status: Some(status), message: message.into() } }

    pub fn other(message: impl Into<String>) -> Self { Self { status: None, message: message.into() } }

    /// Someone else holds the document (409).
    pub fn is_conflict(&self) -> bool { self.status == Some(409) }

    /// The request needs confirmation of its warnings before it may be applied (412).
    pub fn is_precondition_failed(&self) -> bool { self.status == Some(412) }

    pub fn is_not_found(&self) -> bool { self.status == Some(404) }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
