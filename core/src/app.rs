use std::sync::Arc;

use docflow_proto::{BusyMode, BusyParameters, Data};
use tracing::warn;

use crate::{
    busy::{BusyGuard, BusyLocker},
    config::ControllerConfig,
    text::TextBundle,
    traits::{MetaModel, Presenter},
};

/// Application-level collaborators shared by every lifecycle operation.
#[derive(Clone)]
pub struct AppContext {
    pub metamodel: Arc<dyn MetaModel>,
    pub presenter: Arc<dyn Presenter>,
    pub busy: BusyLocker,
    pub texts: Arc<TextBundle>,
    pub config: Arc<ControllerConfig>,
    /// Startup parameters of the application (deep-link parameters and the like).
    pub startup: Data,
}

impl AppContext {
    pub fn new(metamodel: Arc<dyn MetaModel>, presenter: Arc<dyn Presenter>, config: ControllerConfig) -> Self {
        let texts = Arc::new(TextBundle::with_overrides(&config.texts));
        if config.current_user.is_none() {
            warn!("no current user configured, own draft locks are only recognized when the service flags them");
        }
        Self { metamodel, presenter, busy: BusyLocker::new(), texts, config: Arc::new(config), startup: Data::new() }
    }

    pub fn with_startup(mut self, startup: Data) -> Self {
        self.startup = startup;
        self
    }

    pub fn busy_path(&self, params: &BusyParameters) -> String {
        match (params.busy_mode, params.busy_id.as_deref()) {
            (BusyMode::Local, Some(id)) => format!("{}/{}", self.config.local_busy_prefix, id),
            _ => self.config.busy_path.clone(),
        }
    }

    pub fn busy_guard(&self, params: &BusyParameters) -> BusyGuard { self.busy.guard(self.busy_path(params)) }

    pub fn current_user(&self) -> Option<&str> { self.config.current_user.as_deref() }

    pub fn text(&self, key: &str, args: &[&str]) -> String { self.texts.get(key, args) }
}
