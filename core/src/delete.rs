use docflow_proto::{BusyParameters, DocumentPath, Message, SessionModel};
use tracing::warn;

use crate::{
    app::AppContext,
    document::Document,
    error::{BackendError, LifecycleError},
    message::MessageSink,
    resolver::SessionModelResolver,
    step_info,
    text::keys,
    traits::{ConfirmRequest, ShowMessageOptions},
};

#[derive(Debug, Clone, Default)]
pub struct DeleteParameters {
    /// Delete without asking.
    pub no_dialog: bool,
    /// Title of the object, used in the single-object confirmation.
    pub title: Option<String>,
    pub group_id: Option<String>,
    pub busy: BusyParameters,
}

#[derive(Debug, Default)]
pub struct DeleteOutcome {
    pub deleted: Vec<DocumentPath>,
    pub failed: Vec<(DocumentPath, BackendError)>,
    /// Selected documents whose deletion is restricted.
    pub skipped: Vec<DocumentPath>,
}

/// The selection split by what may happen to each document.
#[derive(Debug, Default)]
struct Selection {
    /// What to actually delete: for a draft with an active sibling, the sibling.
    deletable: Vec<(Document, Document)>,
    skipped: Vec<DocumentPath>,
    locked: Vec<(DocumentPath, String)>,
}

/// Confirms and performs the deletion of one or more documents.
#[derive(Clone)]
pub struct DeletionCoordinator {
    app: AppContext,
    resolver: SessionModelResolver,
}

impl DeletionCoordinator {
    pub fn new(app: AppContext) -> Self {
        let resolver = SessionModelResolver::new(app.metamodel.clone());
        Self { app, resolver }
    }

    /// Every deletable document is attempted; individual failures are reported, not fatal.
    pub async fn delete(&self, documents: &[Document], params: DeleteParameters, messages: &MessageSink) -> Result<DeleteOutcome, LifecycleError> {
        if documents.is_empty() {
            return Err(LifecycleError::MissingBindingContext);
        }
        let _busy = self.app.busy_guard(&params.busy);
        let result = self.run(documents, &params, messages).await;
        messages.report_failure(&result);
        messages.show_messages(ShowMessageOptions::default()).await;
        result
    }

    async fn run(&self, documents: &[Document], params: &DeleteParameters, messages: &MessageSink) -> Result<DeleteOutcome, LifecycleError> {
        let selection = self.classify(documents).await?;

        if let Some((path, holder)) = selection.locked.first() {
            step_info!("DeletionCoordinator", "locked", "{} by {}", path, holder);
            self.app.presenter.show_message_box(&self.app.text(keys::LOCKED_BY, &[holder.as_str()])).await;
            return Err(LifecycleError::DocumentLocked { holder: holder.clone() });
        }

        let mut outcome = DeleteOutcome { skipped: selection.skipped, ..Default::default() };
        if selection.deletable.is_empty() {
            self.app.presenter.show_message_box(&self.app.text(keys::DELETE_NONE_DELETABLE, &[])).await;
            return Ok(outcome);
        }

        if !params.no_dialog {
            let text = self.confirmation_text(selection.deletable.len(), outcome.skipped.len(), params);
            let request = ConfirmRequest::Delete { title: params.title.clone(), text, count: selection.deletable.len() };
            if !self.app.presenter.confirm(request).await {
                return Err(LifecycleError::Cancelled);
            }
        }

        messages.remove_transition_messages();
        for (selected, target) in &selection.deletable {
            match target.delete(params.group_id.as_deref()).await {
                Ok(()) => outcome.deleted.push(selected.path()),
                Err(err) => {
                    warn!("delete of {} failed: {}", target.path(), err);
                    let name = params.title.clone().filter(|_| documents.len() == 1).unwrap_or_else(|| selected.path().to_string());
                    messages.add(Message::error(self.app.text(keys::DELETE_FAILED, &[name.as_str()])).with_target(selected.path()));
                    outcome.failed.push((selected.path(), err));
                }
            }
        }

        match outcome.deleted.len() {
            0 => {}
            1 => messages.add(Message::success(self.app.text(keys::OBJECT_DELETED, &[]))),
            n => messages.add(Message::success(self.app.text(keys::OBJECTS_DELETED, &[n.to_string().as_str()]))),
        }
        Ok(outcome)
    }

    async fn classify(&self, documents: &[Document]) -> Result<Selection, LifecycleError> {
        let mut selection = Selection::default();
        for document in documents {
            if self.app.metamodel.delete_restricted(document) {
                selection.skipped.push(document.path());
                continue;
            }
            if self.resolver.classify(document) != SessionModel::Draft || document.is_transient() {
                selection.deletable.push((document.clone(), document.clone()));
                continue;
            }

            let model = document.model();
            if let Some(admin) = model.draft_administrative_data(document).await? {
                if let Some(holder) = admin.locked_by_other(self.app.current_user()) {
                    selection.locked.push((document.path(), holder));
                    continue;
                }
            }
            let target = if document.is_active_entity() { None } else { model.sibling_entity(document).await? };
            selection.deletable.push((document.clone(), target.unwrap_or_else(|| document.clone())));
        }
        Ok(selection)
    }

    fn confirmation_text(&self, deletable: usize, skipped: usize, params: &DeleteParameters) -> String {
        let mut text = match (deletable, params.title.as_deref()) {
            (1, Some(title)) if skipped == 0 => self.app.text(keys::DELETE_SINGLE_WITH_TITLE, &[title]),
            (1, _) => self.app.text(keys::DELETE_SINGLE, &[]),
            (n, _) => self.app.text(keys::DELETE_MULTIPLE, &[n.to_string().as_str()]),
        };
        if skipped > 0 {
            let total = (deletable + skipped).to_string();
            text = format!("{} {}", self.app.text(keys::DELETE_SOME_NOT_DELETABLE, &[skipped.to_string().as_str(), total.as_str()]), text);
        }
        text
    }
}
