use docflow_proto::{BusyParameters, Data, DefaultValuesFunction, EntitySet, FunctionBinding, Message};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    action::{ActionInvoker, ActionParameters, ActionResponse},
    app::AppContext,
    delete::{DeleteOutcome, DeleteParameters, DeletionCoordinator},
    document::{CreateOptions, Document, DocumentList},
    error::LifecycleError,
    message::MessageSink,
    model::{FunctionRequest, FunctionTarget},
    params::{CancelParameters, CreateParameters, SaveParameters},
    resolver::{ClassifySource, SessionModelResolver},
    session::{adapter_for, SessionAdapter},
    step_debug, step_info, step_warn,
    text::keys,
    traits::{ConfirmRequest, KeyEntryRequest, ShowMessageOptions},
};

/// Entry point for the lifecycle of transactional documents.
///
/// Every operation classifies its target, picks the session adapter for it, holds the busy
/// lock for its whole duration and presents the messages it produced before returning.
#[derive(Clone)]
pub struct DocumentLifecycleController {
    app: AppContext,
    resolver: SessionModelResolver,
    invoker: ActionInvoker,
    deletion: DeletionCoordinator,
}

impl DocumentLifecycleController {
    pub fn new(app: AppContext) -> Self {
        let resolver = SessionModelResolver::new(app.metamodel.clone());
        let invoker = ActionInvoker::new(app.clone());
        let deletion = DeletionCoordinator::new(app.clone());
        Self { app, resolver, invoker, deletion }
    }

    pub fn app(&self) -> &AppContext { &self.app }

    fn adapter<'a>(&self, source: impl Into<ClassifySource<'a>>) -> Result<Box<dyn SessionAdapter>, LifecycleError> {
        let source = source.into();
        let session_model = self.resolver.classify(source);
        adapter_for(session_model, &self.app).ok_or_else(|| LifecycleError::UnsupportedSessionModel(source.entity_set()))
    }

    /// Create a new document in `list`.
    ///
    /// Resolves once the backend confirmed the creation. A transient document rejected by the
    /// backend is rolled back unless `keep_transient_context_on_failed` is set.
    #[cfg_attr(feature = "instrument", tracing::instrument(skip_all, fields(list = %list.path())))]
    pub async fn create_document(&self, list: &DocumentList, params: CreateParameters, messages: &MessageSink) -> Result<Document, LifecycleError> {
        let adapter = self.adapter(list)?;
        let entity_set = list.entity_set();
        let _busy = self.app.busy_guard(&params.busy);

        if !params.from_paste {
            if let Some(action) = self.app.metamodel.creation_action(&entity_set, &self.app.startup) {
                step_info!("Controller", "create", "{} via {}", entity_set, action);
                let action_params = ActionParameters {
                    model: Some(list.model()),
                    values: params.data.clone(),
                    skip_parameter_dialog: params.skip_parameter_dialog,
                    busy: params.busy.clone(),
                    ..Default::default()
                };
                let response = self.invoker.call_action(&action.to_string(), action_params, messages).await?;
                return response.document().cloned().ok_or(LifecycleError::CreationFailed);
            }
        }

        step_info!("Controller", "create", "{} ({})", entity_set, adapter.session_model());
        let result = self.create_in(list, adapter.as_ref(), &params).await;
        messages.report_failure(&result);
        messages.show_messages(ShowMessageOptions::default()).await;
        result
    }

    async fn create_in(&self, list: &DocumentList, adapter: &dyn SessionAdapter, params: &CreateParameters) -> Result<Document, LifecycleError> {
        let entity_set = list.entity_set();
        let mut data = params.data.clone();
        if let Some(before_create) = &params.before_create {
            data = before_create(data).await?;
        }

        if let Some(function) = self.app.metamodel.default_values_function(&entity_set) {
            match self.default_values(list, &function).await {
                Ok(defaults) => {
                    for (name, value) in defaults {
                        data.entry(name).or_insert(value);
                    }
                }
                Err(err) => warn!("default values function {} failed: {}", function.name, err),
            }
        }

        if !params.from_paste {
            data = self.collect_missing_keys(&entity_set, data).await?;
        }

        let options = CreateOptions { inactive: params.inactive, at_end: params.at_end };
        let document = adapter.create(list, data, options).await?;
        if params.inactive || document.is_inactive() || !document.is_transient() {
            return Ok(document);
        }

        let watch = list.create_completed().watch(&document.path());
        let outcome = watch.wait().await;
        drop(watch);
        if outcome.success {
            step_debug!("Controller", "created", "{}", document.path());
            return Ok(document);
        }

        if params.keep_transient_context_on_failed {
            debug!("keeping failed transient {} for correction", document.path());
        } else {
            self.roll_back_transient(list, &document).await;
        }
        Err(LifecycleError::CreationFailed)
    }

    async fn default_values(&self, list: &DocumentList, function: &DefaultValuesFunction) -> Result<Data, LifecycleError> {
        let target = match function.bound_to {
            FunctionBinding::Parent => list.parent().map(FunctionTarget::Document),
            FunctionBinding::Target => Some(FunctionTarget::Collection(list.entity_set())),
        };
        let request = FunctionRequest { name: function.name.clone(), target };
        Ok(list.model().call_function(request).await?)
    }

    /// Ask for key values the backend cannot generate, until all of them are filled in.
    async fn collect_missing_keys(&self, entity_set: &EntitySet, mut data: Data) -> Result<Data, LifecycleError> {
        let fields = self.app.metamodel.mandatory_key_fields(entity_set);
        let mut invalid = Vec::new();
        loop {
            let missing: Vec<String> = fields.iter().filter(|field| is_empty_value(data.get(field.as_str()))).cloned().collect();
            if missing.is_empty() {
                return Ok(data);
            }
            if !invalid.is_empty() {
                debug!("key fields still empty: {:?}", missing);
            }
            invalid = missing;
            let request = KeyEntryRequest { entity_set: entity_set.clone(), fields: fields.clone(), values: data.clone(), invalid: invalid.clone() };
            match self.app.presenter.collect_keys(request).await {
                Some(entered) => data.extend(entered),
                None => return Err(LifecycleError::Cancelled),
            }
        }
    }

    async fn roll_back_transient(&self, list: &DocumentList, document: &Document) {
        step_warn!("Controller", "rollback", "{}", document.path());
        if let Err(err) = document.delete(None).await {
            debug!("removing transient {} failed: {}", document.path(), err);
        }
        if let Err(err) = list.reset_changes().await {
            debug!("resetting {} failed: {}", list.path(), err);
        }
    }

    /// Start editing an active document. Returns the handle to edit (the draft, for draft services).
    #[cfg_attr(feature = "instrument", tracing::instrument(skip_all, fields(document = %document.path())))]
    pub async fn edit_document(&self, document: &Document, messages: &MessageSink) -> Result<Document, LifecycleError> {
        let adapter = self.adapter(document)?;
        let _busy = self.app.busy_guard(&BusyParameters::default());
        messages.remove_bound_transition_messages();

        step_info!("Controller", "edit", "{}", document.path());
        let result = adapter.edit(document).await;
        let concurrent_edit = match &result {
            Err(LifecycleError::Backend(err)) => err.is_conflict(),
            Err(LifecycleError::DocumentLocked { .. }) => true,
            _ => false,
        };
        messages.report_failure(&result);
        let options = ShowMessageOptions { include_bound: result.is_err(), concurrent_edit, ..Default::default() };
        if concurrent_edit {
            messages.show_message_dialog(options).await;
        } else {
            messages.show_messages(options).await;
        }
        result
    }

    /// Persist the edited document. On success exactly one success message is shown.
    #[cfg_attr(feature = "instrument", tracing::instrument(skip_all, fields(document = %document.path())))]
    pub async fn save_document(&self, document: &Document, params: SaveParameters, messages: &MessageSink) -> Result<Document, LifecycleError> {
        let adapter = self.adapter(document)?;
        let _busy = self.app.busy_guard(&params.busy);

        step_info!("Controller", "save", "{}", document.path());
        let save = async {
            let result = adapter.activate(document).await;
            match &result {
                Ok(_) if !messages.has_unbound_transition_success() => {
                    let key = if params.is_new_object { keys::OBJECT_CREATED } else { keys::OBJECT_SAVED };
                    messages.add(Message::success(self.app.text(key, &[])));
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("save of {} failed: {}", document.path(), err);
                    if params.execute_side_effects_on_error {
                        self.refresh_transient_rows(&params.bindings_for_side_effects).await;
                    }
                }
            }
            messages.report_failure(&result);
            result
        };
        messages.with_transition_message_scope(ShowMessageOptions::default(), save).await
    }

    /// Rows created while editing are not persisted by a failed save; their side effects are requested again.
    async fn refresh_transient_rows(&self, lists: &[DocumentList]) {
        for list in lists {
            let Some(side_effects) = self.app.metamodel.entity_side_effects(&list.entity_set()) else {
                continue;
            };
            for row in list.documents().iter().filter(|row| row.is_transient()) {
                if let Err(err) = row.model().request_side_effects(row, &side_effects).await {
                    debug!("side effects for {} failed: {}", row.path(), err);
                }
            }
        }
    }

    /// Leave editing, throwing away what was changed.
    ///
    /// Returns the document to show afterwards: the active document for drafts, the original
    /// document for sticky sessions, `None` for a discarded new document.
    #[cfg_attr(feature = "instrument", tracing::instrument(skip_all, fields(document = %document.path())))]
    pub async fn cancel_document(&self, document: &Document, params: CancelParameters, messages: &MessageSink) -> Result<Option<Document>, LifecycleError> {
        let adapter = self.adapter(document)?;
        let _busy = self.app.busy_guard(&params.busy);

        step_info!("Controller", "cancel", "{}", document.path());
        let result = self.cancel_in(document, adapter.as_ref(), &params).await;

        messages.remove_bound_transition_messages();
        messages.report_failure(&result);
        messages.show_messages(ShowMessageOptions::default()).await;
        result
    }

    async fn cancel_in(&self, document: &Document, adapter: &dyn SessionAdapter, params: &CancelParameters) -> Result<Option<Document>, LifecycleError> {
        let modified = match params.is_object_modified {
            Some(modified) => modified,
            None if document.is_transient() || document.is_inactive() => false,
            None => adapter.is_modified(document).await,
        };

        if modified && !params.skip_discard_popover {
            let request = ConfirmRequest::Discard { document: document.path(), text: self.app.text(keys::DISCARD_CONFIRM, &[]) };
            if !self.app.presenter.confirm(request).await {
                debug!("discard of {} declined", document.path());
                return Err(LifecycleError::Cancelled);
            }
        }

        if document.is_keep_alive() {
            document.set_keep_alive(false);
        }
        if let Some(before_cancel) = &params.before_cancel {
            before_cancel(document.clone()).await?;
        }

        let shown = adapter.discard(document, params.is_new_object).await?;
        step_debug!("Controller", "discarded", "{} ({}) -> {:?}", document.path(), adapter.session_model(), shown.as_ref().map(|d| d.path()));
        Ok(shown)
    }

    /// Delete one or more documents after confirmation.
    pub async fn delete_document(&self, documents: &[Document], params: DeleteParameters, messages: &MessageSink) -> Result<DeleteOutcome, LifecycleError> {
        self.deletion.delete(documents, params, messages).await
    }

    /// Call a bound or unbound backend action.
    pub async fn call_action(&self, action_name: &str, params: ActionParameters, messages: &MessageSink) -> Result<ActionResponse, LifecycleError> {
        self.invoker.call_action(action_name, params, messages).await
    }
}

fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
