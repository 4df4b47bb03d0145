use std::sync::Arc;

use time::Duration;

use crate::auth::repo::User;
use crate::config::AppConfig;
use crate::movies::repo::Movie;
use crate::session::SessionStore;
use crate::store::Collection;

/// Shared application state. The stores and the session map are collaborators
/// passed in here, never process globals, so every test can run against its
/// own isolated instance.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<Collection<User>>,
    pub movies: Arc<Collection<Movie>>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        Ok(Self::new(AppConfig::from_env()?))
    }

    pub fn new(config: AppConfig) -> Self {
        let ttl = Duration::minutes(config.session_ttl_minutes);
        Self {
            users: Arc::new(Collection::new()),
            movies: Arc::new(Collection::new()),
            sessions: Arc::new(SessionStore::new(ttl)),
            config: Arc::new(config),
        }
    }

    /// State with test defaults and no environment reads.
    pub fn fake() -> Self {
        Self::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            session_ttl_minutes: 60,
        })
    }
}
