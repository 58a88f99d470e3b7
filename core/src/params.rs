use std::sync::Arc;

use docflow_proto::{BusyParameters, Data};
use futures::future::BoxFuture;

use crate::{
    document::{Document, DocumentList},
    error::LifecycleError,
};

/// Runs before a document is created; may adjust the initial data.
pub type BeforeCreate = Arc<dyn Fn(Data) -> BoxFuture<'static, Result<Data, LifecycleError>> + Send + Sync>;

/// Runs after the user agreed to discard, before anything is discarded.
pub type BeforeCancel = Arc<dyn Fn(Document) -> BoxFuture<'static, Result<(), LifecycleError>> + Send + Sync>;

#[derive(Clone, Default)]
pub struct CreateParameters {
    pub data: Data,
    pub busy: BusyParameters,
    /// Keep the transient row in its list when the backend rejects it.
    pub keep_transient_context_on_failed: bool,
    /// Create an inactive row that is only sent once the user starts editing it.
    pub inactive: bool,
    pub at_end: bool,
    /// Passed on to a dedicated creation action.
    pub skip_parameter_dialog: bool,
    /// The data comes from a paste: no creation action, no key dialog.
    pub from_paste: bool,
    pub before_create: Option<BeforeCreate>,
}

impl CreateParameters {
    pub fn new(data: Data) -> Self { Self { data, ..Default::default() } }

    pub fn busy(mut self, busy: BusyParameters) -> Self {
        self.busy = busy;
        self
    }

    pub fn keep_transient_context_on_failed(mut self, keep: bool) -> Self {
        self.keep_transient_context_on_failed = keep;
        self
    }

    pub fn inactive(mut self, inactive: bool) -> Self {
        self.inactive = inactive;
        self
    }

    pub fn from_paste(mut self, from_paste: bool) -> Self {
        self.from_paste = from_paste;
        self
    }

    pub fn before_create(mut self, callback: BeforeCreate) -> Self {
        self.before_create = Some(callback);
        self
    }
}

#[derive(Clone, Default)]
pub struct SaveParameters {
    pub busy: BusyParameters,
    pub is_new_object: bool,
    /// Re-request side effects for transient table rows if the save fails.
    pub execute_side_effects_on_error: bool,
    pub bindings_for_side_effects: Vec<DocumentList>,
}

impl SaveParameters {
    pub fn new_object(mut self, is_new: bool) -> Self {
        self.is_new_object = is_new;
        self
    }

    pub fn side_effects_on_error(mut self, bindings: Vec<DocumentList>) -> Self {
        self.execute_side_effects_on_error = true;
        self.bindings_for_side_effects = bindings;
        self
    }
}

#[derive(Clone, Default)]
pub struct CancelParameters {
    pub busy: BusyParameters,
    pub is_new_object: bool,
    /// `None` lets the controller find out.
    pub is_object_modified: Option<bool>,
    pub skip_discard_popover: bool,
    pub before_cancel: Option<BeforeCancel>,
}

impl CancelParameters {
    pub fn new_object(mut self, is_new: bool) -> Self {
        self.is_new_object = is_new;
        self
    }

    pub fn modified(mut self, modified: bool) -> Self {
        self.is_object_modified = Some(modified);
        self
    }

    pub fn skip_discard_popover(mut self, skip: bool) -> Self {
        self.skip_discard_popover = skip;
        self
    }

    pub fn before_cancel(mut self, callback: BeforeCancel) -> Self {
        self.before_cancel = Some(callback);
        self
    }
}
