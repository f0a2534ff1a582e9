//! Error types for the Cascade system

use thiserror::Error;

/// Main error type for all Cascade operations
#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Document store error: {0}")]
    Store(String),

    #[error("Webhook delivery failed: {0}")]
    Delivery(String),

    #[error("Workflow error: {0}")]
    Workflow(String),
}

/// Result type for Cascade operations
pub type Result<T> = std::result::Result<T, CascadeError>;
