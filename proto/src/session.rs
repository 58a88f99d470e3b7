use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The concurrency/session model a service exposes for an entity set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionModel {
    Draft,
    Sticky,
    NonDraft,
}

impl std::fmt::Display for SessionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionModel::Draft => write!(f, "draft"),
            SessionModel::Sticky => write!(f, "sticky"),
            SessionModel::NonDraft => write!(f, "non-draft"),
        }
    }
}

/// Draft actions declared on a draft root entity set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRoot {
    pub edit_action: String,
    pub activation_action: String,
    pub prepare_action: Option<String>,
}

impl Default for DraftRoot {
    fn default() -> Self {
        Self { edit_action: "draftEdit".into(), activation_action: "draftActivate".into(), prepare_action: None }
    }
}

/// Session actions declared on a sticky-session entity set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickySession {
    pub edit_action: String,
    pub save_action: String,
    pub discard_action: String,
    pub new_action: Option<String>,
}

impl Default for StickySession {
    fn default() -> Self {
        Self { edit_action: "EditAction".into(), save_action: "SaveAction".into(), discard_action: "DiscardAction".into(), new_action: None }
    }
}

/// Server-side bookkeeping attached to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAdministrativeData {
    pub created_at: DateTime<Utc>,
    pub last_changed_at: DateTime<Utc>,
    /// User currently holding the draft lock, if any.
    pub in_process_by_user: Option<String>,
    pub in_process_by_user_description: Option<String>,
    /// User whose unsaved (lock-expired) changes are still in the draft.
    pub last_changed_by_user: Option<String>,
    pub last_changed_by_user_description: Option<String>,
    /// Set by the service when the lock holder is the requesting user.
    #[serde(default)]
    pub draft_is_processed_by_me: bool,
}

impl DraftAdministrativeData {
    /// A draft counts as modified once its last change is later than its creation.
    pub fn is_modified(&self) -> bool { self.created_at != self.last_changed_at }

    /// The user locking the draft, unless the service flagged the lock as ours or the holder is `current_user`.
    pub fn locked_by_other(&self, current_user: Option<&str>) -> Option<String> {
        let holder = self.in_process_by_user.as_deref().filter(|u| !u.is_empty())?;
        if self.draft_is_processed_by_me || Some(holder) == current_user {
            return None;
        }
        Some(self.in_process_by_user_description.clone().filter(|d| !d.is_empty()).unwrap_or_else(|| holder.to_string()))
    }

    /// Display name of the user whose unsaved changes would be lost by taking over the draft.
    pub fn unsaved_changes_by(&self) -> Option<String> {
        let user = self.last_changed_by_user.as_deref().filter(|u| !u.is_empty())?;
        Some(self.last_changed_by_user_description.clone().filter(|d| !d.is_empty()).unwrap_or_else(|| user.to_string()))
    }
}
