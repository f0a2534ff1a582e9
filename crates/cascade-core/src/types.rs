//! Common types used throughout the Cascade system

use crate::workflow::state::{Workflow, WorkflowState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A content document as stored in the document store
///
/// Only the fields this service acts on are modelled; everything else the
/// editors put on a document is carried opaquely in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_type")]
    pub doc_type: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Scheduled publish instant. Consumed but never cleared by the
    /// reconciler; the state guard in the due-query prevents reprocessing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<DateTime<Utc>>,

    /// Scheduled unpublish instant. Same lifecycle as `publish_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unpublish_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Workflow>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ContentDocument {
    /// Current workflow state; documents that were never routed through the
    /// editorial workflow count as drafts
    pub fn workflow_state(&self) -> WorkflowState {
        self.workflow
            .as_ref()
            .map(|w| w.state)
            .unwrap_or(WorkflowState::Draft)
    }

    /// Due for Transition A: `publishAt` has elapsed (inclusive) and the
    /// document is not yet published
    pub fn due_for_publish(&self, now: DateTime<Utc>) -> bool {
        match self.publish_at {
            Some(at) => at <= now && self.workflow_state() != WorkflowState::Published,
            None => false,
        }
    }

    /// Due for Transition B: `unpublishAt` has elapsed (inclusive) and the
    /// document is currently published
    pub fn due_for_unpublish(&self, now: DateTime<Utc>) -> bool {
        match self.unpublish_at {
            Some(at) => at <= now && self.workflow_state() == WorkflowState::Published,
            None => false,
        }
    }
}

/// Strongly typed webhook configuration id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WebhookId(String);

impl WebhookId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WebhookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document lifecycle events a webhook can subscribe to - no raw strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "document.created")]
    DocumentCreated,
    #[serde(rename = "document.updated")]
    DocumentUpdated,
    #[serde(rename = "document.published")]
    DocumentPublished,
    #[serde(rename = "document.unpublished")]
    DocumentUnpublished,
    #[serde(rename = "document.deleted")]
    DocumentDeleted,
    #[serde(rename = "approval.requested")]
    ApprovalRequested,
    #[serde(rename = "approval.completed")]
    ApprovalCompleted,
    /// Manual verification delivery fired from the test endpoint
    #[serde(rename = "webhook.test")]
    Test,
}

impl WebhookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentCreated => "document.created",
            Self::DocumentUpdated => "document.updated",
            Self::DocumentPublished => "document.published",
            Self::DocumentUnpublished => "document.unpublished",
            Self::DocumentDeleted => "document.deleted",
            Self::ApprovalRequested => "approval.requested",
            Self::ApprovalCompleted => "approval.completed",
            Self::Test => "webhook.test",
        }
    }
}

impl FromStr for WebhookEvent {
    type Err = crate::error::CascadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document.created" => Ok(Self::DocumentCreated),
            "document.updated" => Ok(Self::DocumentUpdated),
            "document.published" => Ok(Self::DocumentPublished),
            "document.unpublished" => Ok(Self::DocumentUnpublished),
            "document.deleted" => Ok(Self::DocumentDeleted),
            "approval.requested" => Ok(Self::ApprovalRequested),
            "approval.completed" => Ok(Self::ApprovalCompleted),
            "webhook.test" => Ok(Self::Test),
            other => Err(crate::error::CascadeError::Validation(format!(
                "Unknown webhook event: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Retry policy carried on a webhook configuration
///
/// This is recorded configuration, not an implemented scheduler: the
/// delivery manager stores the retry intent on each log entry and an
/// external process is expected to act on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    pub enabled: bool,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 1,
        }
    }
}

/// Outbound webhook endpoint configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    #[serde(rename = "_id")]
    pub id: WebhookId,

    pub name: String,

    pub url: String,

    #[serde(default)]
    pub events: Vec<WebhookEvent>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Static headers attached to every delivery to this endpoint
    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_enabled() -> bool {
    true
}

impl WebhookConfig {
    pub fn subscribes_to(&self, event: WebhookEvent) -> bool {
        self.events.contains(&event)
    }
}

/// Append-only audit record of one webhook delivery attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookLogEntry {
    pub webhook_id: WebhookId,
    pub webhook_name: String,
    pub event: WebhookEvent,
    pub document_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    pub payload: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub duration_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempt: u32,
    pub will_retry: bool,
    pub delivered_at: DateTime<Utc>,
}
