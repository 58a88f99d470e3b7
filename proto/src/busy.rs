use serde::{Deserialize, Serialize};

/// Whether an operation blocks the whole application or only a row/section identified by a busy id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BusyMode {
    #[default]
    Global,
    Local,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyParameters {
    pub busy_mode: BusyMode,
    pub busy_id: Option<String>,
}

impl BusyParameters {
    pub fn local(busy_id: impl Into<String>) -> Self { Self { busy_mode: BusyMode::Local, busy_id: Some(busy_id.into()) } }
}
