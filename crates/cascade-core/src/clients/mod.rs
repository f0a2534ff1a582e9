//! Client modules for external services

pub mod content_store;
pub mod delivery;

use crate::error::Result;
use crate::types::{ContentDocument, WebhookConfig, WebhookEvent, WebhookId, WebhookLogEntry};
use crate::workflow::approval_types::{ApprovalRequest, ApprovalRequestId};
use crate::workflow::state::Workflow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// Re-export all client types
pub use content_store::ContentStoreClient;
pub use delivery::{DeliveryResponse, DeliverySender, HttpDeliverySender};

/// The operations this service needs from the document store
///
/// Each method has explicit, typed parameters - no query strings leak past
/// this boundary. This enables compile-time safety and easy mocking for
/// tests; the production implementation translates every call into the
/// store's query/mutate HTTP API.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents with an elapsed `publishAt` that are not yet published
    async fn due_for_publish(&self, now: DateTime<Utc>) -> Result<Vec<ContentDocument>>;

    /// Published documents with an elapsed `unpublishAt`
    async fn due_for_unpublish(&self, now: DateTime<Utc>) -> Result<Vec<ContentDocument>>;

    /// Replace the embedded workflow object on one document.
    /// Atomic per document at the store; no cross-document guarantee.
    async fn set_workflow(&self, document_id: &str, workflow: &Workflow) -> Result<()>;

    /// Persist a new approval request document
    async fn create_approval_request(&self, request: &ApprovalRequest) -> Result<()>;

    /// Load an approval request by id
    async fn approval_request(&self, id: &ApprovalRequestId) -> Result<Option<ApprovalRequest>>;

    /// Persist an updated approval request
    async fn update_approval_request(&self, request: &ApprovalRequest) -> Result<()>;

    /// Load a single webhook configuration by id
    async fn webhook_config(&self, id: &WebhookId) -> Result<Option<WebhookConfig>>;

    /// Enabled webhook configurations subscribed to `event`
    async fn webhook_configs_for(&self, event: WebhookEvent) -> Result<Vec<WebhookConfig>>;

    /// Append one delivery attempt to the audit trail (append-only)
    async fn append_webhook_log(&self, entry: &WebhookLogEntry) -> Result<()>;
}
