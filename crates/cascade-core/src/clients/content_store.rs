//! HTTP client for the headless CMS document store

use crate::clients::DocumentStore;
use crate::config::ContentStoreConfig;
use crate::error::{CascadeError, Result};
use crate::types::{ContentDocument, WebhookConfig, WebhookEvent, WebhookId, WebhookLogEntry};
use crate::workflow::approval_types::{ApprovalRequest, ApprovalRequestId};
use crate::workflow::state::Workflow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

// Due-document queries. The state guard inside each query is what makes the
// reconciler idempotent: once a transition has fired, the document no longer
// matches even though its scheduling timestamp is still set.
const DUE_FOR_PUBLISH_QUERY: &str = "*[defined(publishAt) && publishAt <= $now && workflow.state != \"published\"]";
const DUE_FOR_UNPUBLISH_QUERY: &str = "*[defined(unpublishAt) && unpublishAt <= $now && workflow.state == \"published\"]";

const APPROVAL_BY_ID_QUERY: &str = "*[_type == \"approvalRequest\" && _id == $id][0]";
const WEBHOOK_BY_ID_QUERY: &str = "*[_type == \"webhookConfig\" && _id == $id][0]";
const WEBHOOKS_FOR_EVENT_QUERY: &str =
    "*[_type == \"webhookConfig\" && enabled == true && $event in events]";

pub struct ContentStoreClient {
    config: ContentStoreConfig,
    http_client: HttpClient,
}

impl ContentStoreClient {
    pub fn new(config: ContentStoreConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CascadeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn query_url(&self) -> String {
        format!(
            "{}/v1/data/query/{}",
            self.config.base_url, self.config.dataset
        )
    }

    fn mutate_url(&self) -> String {
        format!(
            "{}/v1/data/mutate/{}",
            self.config.base_url, self.config.dataset
        )
    }

    /// Run a store query. Parameters are passed as `$name` query-string
    /// entries with JSON-encoded values, the store's parameter convention.
    async fn fetch<T: DeserializeOwned>(&self, query: &str, params: &[(&str, Value)]) -> Result<T> {
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            pairs.push((format!("${}", name), value.to_string()));
        }

        let response = self
            .http_client
            .get(self.query_url())
            .header("Authorization", format!("Bearer {}", self.config.token))
            .query(&pairs)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CascadeError::Store(format!(
                "Query failed with {}: {}",
                status, body
            )));
        }

        let envelope: Value = response.json().await?;
        let result = envelope
            .get("result")
            .cloned()
            .unwrap_or(Value::Null);

        serde_json::from_value(result)
            .map_err(|e| CascadeError::Store(format!("Failed to decode query result: {}", e)))
    }

    /// Submit a mutation batch. A batch commits as one transaction at the
    /// store; single-element batches give per-document atomic patches.
    async fn mutate(&self, mutations: Vec<Value>) -> Result<()> {
        let response = self
            .http_client
            .post(self.mutate_url())
            .header("Authorization", format!("Bearer {}", self.config.token))
            .json(&json!({ "mutations": mutations }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CascadeError::Store(format!(
                "Mutation failed with {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for ContentStoreClient {
    async fn due_for_publish(&self, now: DateTime<Utc>) -> Result<Vec<ContentDocument>> {
        self.fetch(
            DUE_FOR_PUBLISH_QUERY,
            &[("now", json!(now.to_rfc3339()))],
        )
        .await
    }

    async fn due_for_unpublish(&self, now: DateTime<Utc>) -> Result<Vec<ContentDocument>> {
        self.fetch(
            DUE_FOR_UNPUBLISH_QUERY,
            &[("now", json!(now.to_rfc3339()))],
        )
        .await
    }

    async fn set_workflow(&self, document_id: &str, workflow: &Workflow) -> Result<()> {
        let workflow_value = serde_json::to_value(workflow)?;

        self.mutate(vec![json!({
            "patch": {
                "id": document_id,
                "set": { "workflow": workflow_value }
            }
        })])
        .await
    }

    async fn create_approval_request(&self, request: &ApprovalRequest) -> Result<()> {
        let doc = serde_json::to_value(request)?;

        self.mutate(vec![json!({ "create": doc })]).await
    }

    async fn approval_request(&self, id: &ApprovalRequestId) -> Result<Option<ApprovalRequest>> {
        self.fetch(APPROVAL_BY_ID_QUERY, &[("id", json!(id.as_str()))])
            .await
    }

    async fn update_approval_request(&self, request: &ApprovalRequest) -> Result<()> {
        let approvers = serde_json::to_value(&request.approvers)?;
        let status = serde_json::to_value(request.status)?;

        self.mutate(vec![json!({
            "patch": {
                "id": request.id.as_str(),
                "set": {
                    "approvers": approvers,
                    "status": status,
                    "updatedAt": request.updated_at.to_rfc3339()
                }
            }
        })])
        .await
    }

    async fn webhook_config(&self, id: &WebhookId) -> Result<Option<WebhookConfig>> {
        self.fetch(WEBHOOK_BY_ID_QUERY, &[("id", json!(id.as_str()))])
            .await
    }

    async fn webhook_configs_for(&self, event: WebhookEvent) -> Result<Vec<WebhookConfig>> {
        self.fetch(
            WEBHOOKS_FOR_EVENT_QUERY,
            &[("event", json!(event.as_str()))],
        )
        .await
    }

    async fn append_webhook_log(&self, entry: &WebhookLogEntry) -> Result<()> {
        let mut doc = serde_json::to_value(entry)?;
        if let Some(obj) = doc.as_object_mut() {
            obj.insert("_type".to_string(), json!("webhookLog"));
        }

        self.mutate(vec![json!({ "create": doc })]).await
    }
}
