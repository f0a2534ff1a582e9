//! Configuration management for the Cascade system

use crate::error::{CascadeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw configuration structure matching settings.json exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "content_store")]
    pub store: ContentStoreConfig,

    #[serde(default)]
    pub server: ServerConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub webhooks: WebhookSettings,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeConfig {
    pub store: ContentStoreConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub webhooks: WebhookSettings,
}

/// Connection settings for the headless CMS document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentStoreConfig {
    #[serde(alias = "url")] // Accept both 'base_url' and 'url'
    pub base_url: String,

    pub dataset: String,

    #[serde(alias = "api_key")] // Accept both 'token' and 'api_key'
    pub token: String,

    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind_address: default_bind_address(),
        }
    }
}

/// Shared-secret authorization for the service endpoints.
/// Compared by exact string match against the request bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(alias = "secret")]
    pub shared_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSettings {
    #[serde(default = "default_webhook_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_webhook_timeout_secs(),
        }
    }
}

// Default functions
fn default_server_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_store_timeout_secs() -> u64 {
    30
}

fn default_webhook_timeout_secs() -> u64 {
    10
}

impl CascadeConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CascadeError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)
            .map_err(|e| CascadeError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self {
            store: raw.store,
            server: raw.server,
            auth: raw.auth,
            webhooks: raw.webhooks,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.store.base_url.is_empty() {
            return Err(CascadeError::Config(
                "Document store base URL is required".to_string(),
            ));
        }

        if self.store.dataset.is_empty() {
            return Err(CascadeError::Config(
                "Document store dataset is required".to_string(),
            ));
        }

        if self.store.token.is_empty() {
            return Err(CascadeError::Config(
                "Document store write token is required".to_string(),
            ));
        }

        if self.auth.shared_secret.is_empty() {
            return Err(CascadeError::Config(
                "Endpoint shared secret is required".to_string(),
            ));
        }

        Ok(())
    }
}
