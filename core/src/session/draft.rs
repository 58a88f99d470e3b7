use async_trait::async_trait;
use docflow_proto::{ActionName, Data, DocumentPath, DraftRoot, SessionModel};
use tracing::{debug, warn};

use super::SessionAdapter;
use crate::{
    app::AppContext,
    document::{CreateOptions, Document, DocumentList},
    error::LifecycleError,
    model::ActionRequest,
    step_debug,
    text::keys,
    traits::ConfirmRequest,
};

const PRESERVE_CHANGES: &str = "PreserveChanges";

/// Draft model: edits happen on a separate draft instance that activation merges into the active one.
pub struct DraftSession {
    app: AppContext,
}

impl DraftSession {
    pub fn new(app: AppContext) -> Self { Self { app } }

    fn root(&self, document: &Document) -> DraftRoot { self.app.metamodel.draft_root(&document.entity_set()).unwrap_or_default() }

    /// Create (or take over) the draft for an active document.
    ///
    /// With `preserve_changes`, a draft holding another user's unsaved changes makes the backend
    /// answer 409; the user then decides whether to overwrite those changes.
    pub async fn create_draft_from_active(&self, document: &Document, preserve_changes: bool) -> Result<Document, LifecycleError> {
        let root = self.root(document);
        let action = ActionName::bound(&document.entity_set(), root.edit_action);
        let request = ActionRequest::new(action.clone()).target(document).parameter(PRESERVE_CHANGES, preserve_changes);

        match document.model().invoke(request).await {
            Ok(Some(draft)) => Ok(draft),
            Ok(None) => Err(LifecycleError::defect(format!("{} returned no draft for {}", action, document.path()))),
            Err(err) if err.is_conflict() && preserve_changes => {
                let admin = document.model().draft_administrative_data(document).await?;
                if let Some(holder) = admin.as_ref().and_then(|a| a.locked_by_other(self.app.current_user())) {
                    return Err(LifecycleError::DocumentLocked { holder });
                }
                let Some(user) = admin.and_then(|a| a.unsaved_changes_by()) else {
                    return Err(err.into());
                };
                let text = self.app.text(keys::UNSAVED_CHANGES, &[user.as_str()]);
                let request = ConfirmRequest::UnsavedChanges { document: document.path(), user, text };
                if !self.app.presenter.confirm(request).await {
                    return Err(LifecycleError::Cancelled);
                }
                debug!("overwriting unsaved changes on {}", document.path());
                let request = ActionRequest::new(action.clone()).target(document).parameter(PRESERVE_CHANGES, false);
                document.model().invoke(request).await?.ok_or_else(|| LifecycleError::defect(format!("{} returned no draft", action)))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns false if there was no draft to delete.
    pub async fn delete_draft(&self, document: &Document) -> Result<bool, LifecycleError> {
        if document.is_active_entity() && !document.is_transient() {
            return Ok(false);
        }
        document.delete(None).await?;
        Ok(true)
    }

    /// Canonical path of the active sibling. Must be read while the draft still exists.
    pub async fn sibling_canonical_path(&self, document: &Document) -> Result<DocumentPath, LifecycleError> {
        let sibling = document
            .model()
            .sibling_entity(document)
            .await?
            .ok_or_else(|| LifecycleError::defect(format!("no active sibling for {}", document.path())))?;
        Ok(sibling.request_canonical_path().await?)
    }
}

#[async_trait]
impl SessionAdapter for DraftSession {
    fn session_model(&self) -> SessionModel { SessionModel::Draft }

    async fn create(&self, list: &DocumentList, data: Data, options: CreateOptions) -> Result<Document, LifecycleError> {
        Ok(list.create(data, options)?)
    }

    async fn edit(&self, document: &Document) -> Result<Document, LifecycleError> {
        self.create_draft_from_active(document, self.app.config.preserve_changes_on_edit).await
    }

    async fn activate(&self, document: &Document) -> Result<Document, LifecycleError> {
        let root = self.root(document);
        let entity_set = document.entity_set();
        let model = document.model();

        if let Some(prepare) = root.prepare_action {
            step_debug!("DraftSession", "prepare", "{}", document.path());
            let side_effects = self.app.metamodel.entity_side_effects(&entity_set);
            let request = ActionRequest::new(ActionName::bound(&entity_set, prepare)).target(document).side_effects(side_effects);
            model.invoke(request).await?;
        }

        let action = ActionName::bound(&entity_set, root.activation_action);
        step_debug!("DraftSession", "activate", "{}", document.path());
        model
            .invoke(ActionRequest::new(action.clone()).target(document))
            .await?
            .ok_or_else(|| LifecycleError::defect(format!("{} returned no active document", action)))
    }

    /// Compares the draft's creation and last-change timestamps. Another session may still
    /// change the draft after this check.
    async fn is_modified(&self, document: &Document) -> bool {
        match document.model().draft_administrative_data(document).await {
            Ok(Some(admin)) => admin.is_modified() || document.has_pending_changes(),
            Ok(None) => document.has_pending_changes(),
            Err(err) => {
                warn!("draft administrative data for {} unavailable: {}", document.path(), err);
                true
            }
        }
    }

    async fn discard(&self, document: &Document, is_new: bool) -> Result<Option<Document>, LifecycleError> {
        if is_new {
            document.reset_changes().await?;
            self.delete_draft(document).await?;
            return Ok(None);
        }

        let canonical = self.sibling_canonical_path(document).await?;
        self.delete_draft(document).await?;
        if let Err(err) = document.reset_changes().await {
            // the draft is gone; its pending changes go with it
            warn!("reset of discarded draft {} failed: {}", document.path(), err);
        }
        Ok(Some(document.model().bind(&canonical).await?))
    }
}
