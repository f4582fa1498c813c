//! Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_cache")]
    pub cache: CacheSettings,

    #[serde(default)]
    pub admin: AdminSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Maximum number of cached users, `0` for unbounded
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

/// Moderation endpoints are only mounted when a token is configured
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdminSettings {
    #[serde(default)]
    pub token: Option<String>,
}

impl ServerConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (or `config.toml`) and environment
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (CHAT_STORAGE__DATABASE_URL -> storage.database_url)
        settings = settings.add_source(
            config::Environment::with_prefix("CHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(ServerError::Config(
                "Database URL is required (set CHAT_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(ServerError::Config(
                "storage.max_connections must be at least 1".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ServerError::Config(
                "server.port must be non-zero".to_string(),
            ));
        }

        if matches!(self.admin.token.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(ServerError::Config(
                "admin.token must not be blank when set".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        max_connections: default_max_connections(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/chat.db".to_string()
}

fn default_max_connections() -> u32 {
    chat_storage::DEFAULT_MAX_CONNECTIONS
}

fn default_cache() -> CacheSettings {
    CacheSettings {
        capacity: default_cache_capacity(),
    }
}

fn default_cache_capacity() -> usize {
    chat_identity::cache::DEFAULT_CAPACITY
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            cache: default_cache(),
            admin: AdminSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.capacity, chat_identity::cache::DEFAULT_CAPACITY);
        assert!(config.admin.token.is_none());
    }

    #[test]
    fn rejects_empty_database_url() {
        let mut config = ServerConfig::default();
        config.storage.database_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn rejects_port_zero() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn rejects_blank_admin_token() {
        let mut config = ServerConfig::default();
        config.admin.token = Some(String::new());
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: ServerConfig = serde_json::from_str(r#"{"cache":{"capacity":0}}"#).unwrap();
        assert_eq!(config.cache.capacity, 0);
        assert_eq!(config.storage.database_url, "sqlite://./data/chat.db");
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
