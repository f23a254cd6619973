use std::sync::Arc;

use axum::extract::FromRef;

use crate::{api::BackendApi, config::Config, session::SessionStore};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub api: Arc<dyn BackendApi>,
}

impl AppState {
    pub fn new(config: Config, api: Arc<dyn BackendApi>) -> Self {
        let sessions = SessionStore::from_config(&config);
        Self {
            config: Arc::new(config),
            sessions,
            api,
        }
    }
}
