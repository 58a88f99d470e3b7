use std::sync::Arc;

use docflow_proto::{EntitySet, SessionModel};

use crate::{
    document::{Document, DocumentList},
    traits::MetaModel,
};

/// What to classify: a single document or a list binding.
#[derive(Debug, Clone, Copy)]
pub enum ClassifySource<'a> {
    Document(&'a Document),
    List(&'a DocumentList),
}

impl<'a> ClassifySource<'a> {
    pub fn entity_set(&self) -> EntitySet {
        match self {
            ClassifySource::Document(document) => document.entity_set(),
            ClassifySource::List(list) => list.entity_set(),
        }
    }
}

impl<'a> From<&'a Document> for ClassifySource<'a> {
    fn from(document: &'a Document) -> Self { ClassifySource::Document(document) }
}

impl<'a> From<&'a DocumentList> for ClassifySource<'a> {
    fn from(list: &'a DocumentList) -> Self { ClassifySource::List(list) }
}

/// Decides which session model the addressed entity set follows.
///
/// Never cached: a collection may mix entity sets, so every operation classifies afresh.
#[derive(Clone)]
pub struct SessionModelResolver {
    metamodel: Arc<dyn MetaModel>,
}

impl SessionModelResolver {
    pub fn new(metamodel: Arc<dyn MetaModel>) -> Self { Self { metamodel } }

    /// Draft wins if metadata (incorrectly) declares both.
    pub fn classify<'a>(&self, source: impl Into<ClassifySource<'a>>) -> SessionModel {
        let entity_set = source.into().entity_set();
        self.classify_entity_set(&entity_set)
    }

    pub fn classify_entity_set(&self, entity_set: &EntitySet) -> SessionModel {
        if self.metamodel.draft_root(entity_set).is_some() {
            SessionModel::Draft
        } else if self.metamodel.sticky_session(entity_set).is_some() {
            SessionModel::Sticky
        } else {
            SessionModel::NonDraft
        }
    }
}
