use tokio::sync::RwLock;

use crate::{
    config::Config,
    database::{Database, auth::SessionStore},
};

/// Everything the handlers share, passed to them as axum state
pub struct AppState {
    pub db: RwLock<Database>,
    pub sessions: RwLock<SessionStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(db: Database, sessions: SessionStore, config: Config) -> Self {
        Self {
            db: RwLock::new(db),
            sessions: RwLock::new(sessions),
            config,
        }
    }
}
