use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Busy path for operations running in `BusyMode::Global`.
    pub busy_path: String,
    /// Prefix of the busy path for `BusyMode::Local`; the busy id is appended.
    pub local_busy_prefix: String,
    /// Drafts held by this user do not count as locked.
    ///
    /// When unset, only the service's `draft_is_processed_by_me` flag identifies the caller's own
    /// lock. A service that does not send it makes every held draft look locked by someone else.
    pub current_user: Option<String>,
    /// Ask the backend to keep another user's unsaved draft changes when editing.
    pub preserve_changes_on_edit: bool,
    /// Overrides for the built-in texts, by text key.
    pub texts: HashMap<String, String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            busy_path: "/busy".into(),
            local_busy_prefix: "/busyLocal".into(),
            current_user: None,
            preserve_changes_on_edit: true,
            texts: HashMap::new(),
        }
    }
}

impl ControllerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> { Ok(serde_json::from_str(json)?) }
}
