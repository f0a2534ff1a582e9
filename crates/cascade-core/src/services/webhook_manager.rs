//! Webhook delivery management service

use crate::clients::{DeliverySender, DocumentStore};
use crate::error::{CascadeError, Result};
use crate::services::stats::RuntimeStats;
use crate::types::{RetryPolicy, WebhookConfig, WebhookEvent, WebhookId, WebhookLogEntry};
use cascade_types::DeliveryResult;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// A document lifecycle event to notify subscribers about
#[derive(Debug, Clone)]
pub struct DocumentEventContext {
    pub event: WebhookEvent,
    pub document_id: String,
    pub document_type: String,
    pub document_title: String,
    pub document: Option<Value>,
    pub previous_data: Option<Value>,
    pub metadata: Option<Value>,
}

/// Sends outbound HTTP notifications on document lifecycle events and keeps
/// an append-only log of every attempt.
pub struct WebhookManager<S: DocumentStore> {
    store: Arc<S>,
    sender: Arc<dyn DeliverySender>,
    stats: Arc<RuntimeStats>,
}

impl<S: DocumentStore> WebhookManager<S> {
    pub fn new(store: Arc<S>, sender: Arc<dyn DeliverySender>, stats: Arc<RuntimeStats>) -> Self {
        Self {
            store,
            sender,
            stats,
        }
    }

    /// Fire one delivery per enabled endpoint subscribed to the event.
    ///
    /// Endpoints are attempted independently; a failing endpoint never
    /// blocks the others and delivery failures are not surfaced to the
    /// caller - the log trail is where per-endpoint outcomes live.
    /// Returns the number of endpoints attempted.
    pub async fn trigger(&self, ctx: &DocumentEventContext) -> Result<usize> {
        let configs = self.store.webhook_configs_for(ctx.event).await?;

        if configs.is_empty() {
            log::info!("No webhooks subscribed to {}", ctx.event);
            return Ok(0);
        }

        let payload = build_payload(ctx);
        let attempted = configs.len();

        for config in &configs {
            let outcome = self
                .deliver(
                    config,
                    ctx.event,
                    &ctx.document_id,
                    Some(&ctx.document_type),
                    &payload,
                    1,
                )
                .await;

            if outcome.success {
                log::info!("Delivered {} to webhook {} ({})", ctx.event, config.name, config.id);
            } else {
                log::warn!(
                    "Delivery of {} to webhook {} failed: {}",
                    ctx.event,
                    config.name,
                    outcome
                        .error
                        .as_deref()
                        .unwrap_or("non-success status")
                );
            }
        }

        Ok(attempted)
    }

    /// Synchronous single delivery ignoring subscription filters, used for
    /// manual verification of an endpoint
    pub async fn test(&self, webhook_id: &WebhookId) -> Result<DeliveryResult> {
        let config = self
            .store
            .webhook_config(webhook_id)
            .await?
            .ok_or_else(|| CascadeError::NotFound(format!("Webhook {} not found", webhook_id)))?;

        let payload = json!({
            "event": WebhookEvent::Test.as_str(),
            "documentId": "test-document",
            "test": true,
            "message": format!("Manual test delivery for webhook '{}'", config.name),
            "timestamp": Utc::now().to_rfc3339(),
        });

        let outcome = self
            .deliver(&config, WebhookEvent::Test, "test-document", None, &payload, 1)
            .await;

        Ok(outcome)
    }

    /// Perform one delivery attempt and append it to the audit trail.
    ///
    /// `willRetry` is recorded intent only: no retry scheduler exists here,
    /// an external process is expected to act on the flag.
    async fn deliver(
        &self,
        config: &WebhookConfig,
        event: WebhookEvent,
        document_id: &str,
        document_type: Option<&str>,
        payload: &Value,
        attempt: u32,
    ) -> DeliveryResult {
        let started = Instant::now();

        let outcome = match self
            .sender
            .post_json(&config.url, &config.headers, payload)
            .await
        {
            Ok(response) => {
                let success = response.is_success();
                let status = response.status;
                let duration_ms = response.duration.as_millis() as u64;
                DeliveryResult {
                    success,
                    status_code: Some(status),
                    response_body: Some(response.body),
                    error: if success {
                        None
                    } else {
                        Some(format!("Endpoint returned HTTP {}", status))
                    },
                    duration_ms,
                }
            }
            Err(e) => DeliveryResult {
                success: false,
                status_code: None,
                response_body: None,
                error: Some(e.to_string()),
                duration_ms: started.elapsed().as_millis() as u64,
            },
        };

        self.stats.record_webhook_delivery(outcome.success);

        let entry = WebhookLogEntry {
            webhook_id: config.id.clone(),
            webhook_name: config.name.clone(),
            event,
            document_id: document_id.to_string(),
            document_type: document_type.map(|s| s.to_string()),
            payload: payload.clone(),
            status_code: outcome.status_code,
            duration_ms: outcome.duration_ms,
            success: outcome.success,
            error: outcome.error.clone(),
            attempt,
            will_retry: will_retry(&config.retry, attempt, outcome.success),
            delivered_at: Utc::now(),
        };

        // The audit trail is best-effort: a store failure here must not turn
        // a completed delivery attempt into an error for the caller.
        if let Err(e) = self.store.append_webhook_log(&entry).await {
            log::error!("Failed to append webhook log for {}: {}", config.id, e);
        }

        outcome
    }
}

/// Retry intent per the endpoint's configured policy
fn will_retry(policy: &RetryPolicy, attempt: u32, success: bool) -> bool {
    !success && policy.enabled && attempt < policy.max_attempts
}

fn build_payload(ctx: &DocumentEventContext) -> Value {
    let mut payload = serde_json::Map::new();
    payload.insert("event".to_string(), json!(ctx.event.as_str()));
    payload.insert("documentId".to_string(), json!(ctx.document_id));
    payload.insert("documentType".to_string(), json!(ctx.document_type));
    payload.insert("documentTitle".to_string(), json!(ctx.document_title));
    payload.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));

    if let Some(document) = &ctx.document {
        payload.insert("document".to_string(), document.clone());
    }
    if let Some(previous) = &ctx.previous_data {
        payload.insert("previousData".to_string(), previous.clone());
    }
    if let Some(metadata) = &ctx.metadata {
        payload.insert("metadata".to_string(), metadata.clone());
    }

    Value::Object(payload)
}
