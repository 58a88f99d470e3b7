use docflow_proto::{ActionMetadata, ActionName, BusyParameters, Data, DocumentPath, InvocationGrouping, MessageType};
use tracing::{debug, warn};

use crate::{
    app::AppContext,
    document::Document,
    error::LifecycleError,
    message::MessageSink,
    model::{ActionRequest, ServiceModel},
    step_debug, step_info,
    text::keys,
    traits::{ConfirmRequest, ParameterRequest, ShowMessageOptions},
};

#[derive(Debug, Clone, Default)]
pub struct ActionParameters {
    /// Target documents of a bound action.
    pub contexts: Vec<Document>,
    /// Required for unbound and collection-bound actions.
    pub model: Option<ServiceModel>,
    /// Parameter values known upfront.
    pub values: Data,
    pub skip_parameter_dialog: bool,
    /// Overrides the label from metadata.
    pub label: Option<String>,
    pub grouping: InvocationGrouping,
    pub busy: BusyParameters,
}

impl ActionParameters {
    pub fn bound(contexts: Vec<Document>) -> Self { Self { contexts, ..Default::default() } }

    pub fn unbound(model: ServiceModel) -> Self { Self { model: Some(model), ..Default::default() } }

    pub fn values(mut self, values: Data) -> Self {
        self.values = values;
        self
    }

    pub fn skip_parameter_dialog(mut self, skip: bool) -> Self {
        self.skip_parameter_dialog = skip;
        self
    }

    pub fn grouping(mut self, grouping: InvocationGrouping) -> Self {
        self.grouping = grouping;
        self
    }
}

/// Outcome of an action call that did not fail as a whole.
#[derive(Debug, Clone, Default)]
pub struct ActionResponse {
    /// Documents returned by the action, in target order.
    pub documents: Vec<Document>,
    /// Targets the action failed for (isolated invocation only).
    pub failed: Vec<DocumentPath>,
}

impl ActionResponse {
    pub fn document(&self) -> Option<&Document> { self.documents.first() }
}

/// Performs bound and unbound backend actions.
#[derive(Clone)]
pub struct ActionInvoker {
    app: AppContext,
}

impl ActionInvoker {
    pub fn new(app: AppContext) -> Self { Self { app } }

    /// Call `action_name` (`Entity/Namespace.Action` for bound, `Namespace.Action` for unbound actions).
    ///
    /// Messages produced on the way are always routed through `messages`, tagged with the
    /// action's label, whatever the outcome.
    pub async fn call_action(&self, action_name: &str, params: ActionParameters, messages: &MessageSink) -> Result<ActionResponse, LifecycleError> {
        let action = ActionName::parse(action_name)?;
        let model = self.resolve_model(&action, &params)?;
        let metadata = self.app.metamodel.action(&action).unwrap_or_default();
        let label = params.label.clone().or_else(|| metadata.label.clone()).unwrap_or_else(|| action.action().to_string());
        step_info!("ActionInvoker", "call", "{} on {} target(s)", action, params.contexts.len());

        let result = self.execute(&action, &model, &metadata, &label, params, messages).await;

        messages.report_failure(&result);
        messages.tag_transition_messages(&label);
        messages.show_messages(ShowMessageOptions { action_label: Some(label), ..Default::default() }).await;
        result
    }

    fn resolve_model(&self, action: &ActionName, params: &ActionParameters) -> Result<ServiceModel, LifecycleError> {
        match action {
            ActionName::Bound { .. } => match params.contexts.first() {
                Some(context) => Ok(context.model()),
                // collection-bound actions have no target document
                None => params.model.clone().ok_or_else(|| LifecycleError::MissingModelOrContext(action.clone())),
            },
            ActionName::Unbound(_) => params.model.clone().ok_or_else(|| LifecycleError::MissingModelOrContext(action.clone())),
        }
    }

    async fn execute(
        &self,
        action: &ActionName,
        model: &ServiceModel,
        metadata: &ActionMetadata,
        label: &str,
        params: ActionParameters,
        messages: &MessageSink,
    ) -> Result<ActionResponse, LifecycleError> {
        if metadata.critical {
            let text = self.app.text(keys::CRITICAL_ACTION, &[label]);
            if !self.app.presenter.confirm(ConfirmRequest::CriticalAction { action: action.clone(), text }).await {
                return Err(LifecycleError::Cancelled);
            }
        }

        let mut values = params.values.clone();
        if metadata.needs_parameter_dialog() && !params.skip_parameter_dialog {
            let request = ParameterRequest {
                action: action.clone(),
                label: label.to_string(),
                parameters: metadata.parameters.clone(),
                values: values.clone(),
            };
            match self.app.presenter.collect_parameters(request).await {
                Some(entered) => values.extend(entered),
                None => {
                    debug!("parameter dialog for {} cancelled", action);
                    return Err(LifecycleError::Cancelled);
                }
            }
        }

        // onSubmitted: lock and start from a clean slate; onResponse: unlock
        let mut busy = self.app.busy_guard(&params.busy);
        messages.remove_transition_messages();

        let targets: Vec<Option<&Document>> =
            if action.is_bound() && !params.contexts.is_empty() { params.contexts.iter().map(Some).collect() } else { vec![None] };

        let mut response = ActionResponse::default();
        let mut last_error = None;
        for &target in &targets {
            let mut request = ActionRequest::new(action.clone()).parameters(values.clone()).side_effects(metadata.side_effects.clone());
            request.target = target.cloned();

            match self.invoke_with_strict_handling(model, request, messages).await {
                Ok(Some(document)) => response.documents.push(document),
                Ok(None) => {}
                Err(LifecycleError::Backend(err)) => {
                    warn!("action {} failed: {}", action, err);
                    if params.grouping == InvocationGrouping::ChangeSet {
                        return Err(LifecycleError::Backend(err));
                    }
                    if let Some(target) = target {
                        response.failed.push(target.path());
                    }
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        busy.release();

        match last_error {
            Some(err) if targets.len() == 1 => Err(LifecycleError::Backend(err)),
            Some(_) if response.failed.len() == targets.len() => Err(LifecycleError::ActionExecutionFailed(action.clone())),
            _ => {
                step_debug!("ActionInvoker", "done", "{} returned {} document(s)", action, response.documents.len());
                Ok(response)
            }
        }
    }

    /// A 412 answer carries warnings the user may accept; the call is then repeated without strict handling.
    async fn invoke_with_strict_handling(
        &self,
        model: &ServiceModel,
        request: ActionRequest,
        messages: &MessageSink,
    ) -> Result<Option<Document>, LifecycleError> {
        match model.invoke(request.clone()).await {
            Ok(document) => Ok(document),
            Err(err) if err.is_precondition_failed() && request.strict => {
                let warnings = messages.take_transition_messages(MessageType::Warning);
                let action = request.action.clone();
                if !self.app.presenter.confirm(ConfirmRequest::StrictHandling { action, warnings }).await {
                    return Err(LifecycleError::Cancelled);
                }
                let request = ActionRequest { strict: false, ..request };
                model.invoke(request).await.map_err(LifecycleError::from)
            }
            Err(err) => Err(LifecycleError::Backend(err)),
        }
    }
}
