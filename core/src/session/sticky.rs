use async_trait::async_trait;
use docflow_proto::{ActionName, Data, SessionModel, StickySession as StickyActions};

use super::SessionAdapter;
use crate::{
    app::AppContext,
    document::{CreateOptions, Document, DocumentList},
    error::LifecycleError,
    model::ActionRequest,
    step_debug,
};

/// Sticky model: edits happen in place, inside a server session pinned to the client.
pub struct StickySession {
    app: AppContext,
}

impl StickySession {
    pub fn new(app: AppContext) -> Self { Self { app } }

    fn actions(&self, document: &Document) -> StickyActions { self.app.metamodel.sticky_session(&document.entity_set()).unwrap_or_default() }

    pub async fn edit_in_session(&self, document: &Document) -> Result<Document, LifecycleError> {
        let action = ActionName::bound(&document.entity_set(), self.actions(document).edit_action);
        let edited = document.model().invoke(ActionRequest::new(action).target(document)).await?.unwrap_or_else(|| document.clone());
        // the session must survive list refreshes until save or discard
        edited.set_keep_alive(true);
        Ok(edited)
    }

    /// Returns the document the session was discarded for, if the backend still knows it.
    pub async fn discard_document(&self, document: &Document) -> Result<Option<Document>, LifecycleError> {
        if document.is_transient() {
            document.delete(None).await?;
            return Ok(None);
        }
        let action = ActionName::bound(&document.entity_set(), self.actions(document).discard_action);
        let returned = document.model().invoke(ActionRequest::new(action).target(document)).await?;
        document.set_keep_alive(false);
        Ok(returned)
    }
}

#[async_trait]
impl SessionAdapter for StickySession {
    fn session_model(&self) -> SessionModel { SessionModel::Sticky }

    async fn create(&self, list: &DocumentList, data: Data, options: CreateOptions) -> Result<Document, LifecycleError> {
        let entity_set = list.entity_set();
        let Some(new_action) = self.app.metamodel.sticky_session(&entity_set).and_then(|s| s.new_action) else {
            return Ok(list.create(data, options)?);
        };

        step_debug!("StickySession", "new", "{} via {}", entity_set, new_action);
        let action = ActionName::bound(&entity_set, new_action);
        let created = list
            .model()
            .invoke(ActionRequest::new(action.clone()).parameters(data))
            .await?
            .ok_or_else(|| LifecycleError::defect(format!("{} returned no document", action)))?;
        created.set_keep_alive(true);
        Ok(created)
    }

    async fn edit(&self, document: &Document) -> Result<Document, LifecycleError> { self.edit_in_session(document).await }

    async fn activate(&self, document: &Document) -> Result<Document, LifecycleError> {
        let action = ActionName::bound(&document.entity_set(), self.actions(document).save_action);
        step_debug!("StickySession", "save", "{}", document.path());
        let saved = document.model().invoke(ActionRequest::new(action).target(document)).await?.unwrap_or_else(|| document.clone());
        document.set_keep_alive(false);
        saved.set_keep_alive(false);
        Ok(saved)
    }

    async fn discard(&self, document: &Document, is_new: bool) -> Result<Option<Document>, LifecycleError> {
        let returned = self.discard_document(document).await?;
        if is_new {
            return Ok(None);
        }
        // discarding a session does not refresh the document
        let document = returned.unwrap_or_else(|| document.clone());
        document.refresh().await?;
        Ok(Some(document))
    }
}
