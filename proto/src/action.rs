use serde::{Deserialize, Serialize};

use crate::{error::DecodeError, path::EntitySet};

/// Qualified name of a backend action or function.
///
/// Bound actions are written `Entity/Namespace.Action`, unbound actions just `Namespace.Action`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionName {
    Bound { entity_set: EntitySet, action: String },
    Unbound(String),
}

impl ActionName {
    pub fn bound(entity_set: &EntitySet, action: impl Into<String>) -> Self {
        ActionName::Bound { entity_set: entity_set.clone(), action: action.into() }
    }

    pub fn unbound(action: impl Into<String>) -> Self { ActionName::Unbound(action.into()) }

    pub fn parse(name: &str) -> Result<Self, DecodeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DecodeError::EmptyName);
        }
        match name.split_once('/') {
            Some((entity, action)) => {
                if entity.is_empty() || action.is_empty() || action.contains('/') {
                    return Err(DecodeError::InvalidFormat(name.to_string()));
                }
                Ok(ActionName::Bound { entity_set: EntitySet::new(entity), action: action.to_string() })
            }
            None => Ok(ActionName::Unbound(name.to_string())),
        }
    }

    pub fn is_bound(&self) -> bool { matches!(self, ActionName::Bound { .. }) }

    /// The action name without its binding entity.
    pub fn action(&self) -> &str {
        match self {
            ActionName::Bound { action, .. } => action,
            ActionName::Unbound(action) => action,
        }
    }
}

impl TryFrom<&str> for ActionName {
    type Error = DecodeError;
    fn try_from(name: &str) -> Result<Self, Self::Error> { Self::parse(name) }
}

impl std::fmt::Display for ActionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionName::Bound { entity_set, action } => write!(f, "{}/{}", entity_set.name(), action),
            ActionName::Unbound(action) => write!(f, "{}", action),
        }
    }
}

/// How a bound action on several documents is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvocationGrouping {
    /// Each document is its own request; failures are reported per document.
    #[default]
    Isolated,
    /// All documents share one change set; the first failure fails the whole call.
    ChangeSet,
}

/// Properties and navigation targets the backend wants re-read after a change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffects {
    pub target_properties: Vec<String>,
    pub target_entities: Vec<String>,
    pub trigger_action: Option<String>,
}

impl SideEffects {
    pub fn is_empty(&self) -> bool { self.target_properties.is_empty() && self.target_entities.is_empty() && self.trigger_action.is_none() }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParameterInfo {
    pub name: String,
    pub label: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMetadata {
    pub label: Option<String>,
    pub critical: bool,
    pub parameters: Vec<ActionParameterInfo>,
    pub side_effects: Option<SideEffects>,
}

impl ActionMetadata {
    pub fn needs_parameter_dialog(&self) -> bool { !self.parameters.is_empty() }
}

/// A function that computes default values for a new document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValuesFunction {
    pub name: String,
    pub bound_to: FunctionBinding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionBinding {
    /// Bound to the document owning the list (e.g. the sales order for its items).
    Parent,
    /// Bound to the collection the new document is created in.
    Target,
}
