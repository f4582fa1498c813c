//! Shared application state
use chat_identity::IdentityService;
use chat_storage::SqliteUserStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub store: Arc<SqliteUserStore>,
    /// Bearer token for moderation endpoints, if enabled
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(identity: Arc<IdentityService>, store: Arc<SqliteUserStore>) -> Self {
        Self {
            identity,
            store,
            admin_token: None,
        }
    }

    /// Enable moderation endpoints guarded by `token`
    #[must_use]
    pub fn with_admin_token(mut self, token: impl Into<Arc<str>>) -> Self {
        self.admin_token = Some(token.into());
        self
    }
}
