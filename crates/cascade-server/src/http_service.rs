//! HTTP surface of the workflow service
//!
//! Every workflow endpoint shares the same conventions: bearer token
//! compared by exact string match (401 on mismatch), missing body fields
//! reported as a 400 with the field names, unexpected failures as a 500.

use crate::dto::{
    CreateApprovalBody, CreateApprovalResponse, DecisionResponse, HealthResponse,
    ReconcileResponse, SubmitDecisionBody, TestWebhookBody, TriggerWebhooksBody,
    TriggerWebhooksResponse,
};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cascade_core::clients::ContentStoreClient;
use cascade_core::services::webhook_manager::DocumentEventContext;
use cascade_core::services::{ApprovalManager, RuntimeStats, WebhookManager};
use cascade_core::types::WebhookId;
use cascade_core::workflow::approval_types::{ApprovalRequestId, ApprovalStatus};
use cascade_core::workflow::ScheduledPublishReconciler;
use cascade_core::CascadeError;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<ScheduledPublishReconciler<ContentStoreClient>>,
    pub approvals: Arc<ApprovalManager<ContentStoreClient>>,
    pub webhooks: Arc<WebhookManager<ContentStoreClient>>,
    pub stats: Arc<RuntimeStats>,
    pub shared_secret: Arc<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/cron/reconcile", get(reconcile))
        .route("/api/approvals", post(create_approval))
        .route("/api/approvals/decision", post(submit_decision))
        .route("/api/webhooks/trigger", post(trigger_webhooks))
        .route("/api/webhooks/test", post(test_webhook))
        .with_state(state)
}

/// Error responses shared by all endpoints
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    MissingFields(Vec<&'static str>),
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<CascadeError> for ApiError {
    fn from(e: CascadeError) -> Self {
        match e {
            CascadeError::Validation(message) => Self::BadRequest(message),
            CascadeError::NotFound(message) => Self::NotFound(message),
            CascadeError::Auth(_) => Self::Unauthorized,
            CascadeError::Workflow(message) => Self::BadRequest(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            Self::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing required fields",
                    "required": fields,
                })),
            )
                .into_response(),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": message })),
            )
                .into_response(),
            Self::Internal(message) => {
                log::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error",
                        "message": message,
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Exact-match comparison of the bearer token against the shared secret.
/// Not cryptographically signed; the secret is the whole credential.
fn authorize(headers: &HeaderMap, shared_secret: &str) -> Result<(), ApiError> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

    if token != shared_secret {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        stats: state.stats.snapshot(),
    })
}

/// Cron entry point. Reports success even when individual documents failed;
/// only a total query failure produces a 500.
async fn reconcile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReconcileResponse>, ApiError> {
    authorize(&headers, &state.shared_secret)?;

    let result = state
        .reconciler
        .reconcile()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(ReconcileResponse {
        success: true,
        timestamp: Utc::now(),
        result,
    }))
}

async fn create_approval(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateApprovalBody>,
) -> Result<Json<CreateApprovalResponse>, ApiError> {
    authorize(&headers, &state.shared_secret)?;

    let params = body.into_params().map_err(ApiError::MissingFields)?;
    let id = state.approvals.create_request(params).await?;

    Ok(Json(CreateApprovalResponse {
        success: true,
        approval_request_id: id.to_string(),
    }))
}

async fn submit_decision(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitDecisionBody>,
) -> Result<Json<DecisionResponse>, ApiError> {
    authorize(&headers, &state.shared_secret)?;

    let missing = body.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    let decision = body.parsed_decision().map_err(ApiError::BadRequest)?;
    let request_id = ApprovalRequestId::from_string(
        body.approval_request_id.as_deref().unwrap_or(""),
    )?;

    let status = state
        .approvals
        .submit_decision(
            &request_id,
            body.user_id.as_deref().unwrap_or(""),
            body.user_name.as_deref(),
            decision,
            body.comment,
        )
        .await?;

    let status_name = match status {
        ApprovalStatus::Pending => "pending",
        ApprovalStatus::Approved => "approved",
        ApprovalStatus::Rejected => "rejected",
    };

    Ok(Json(DecisionResponse {
        success: true,
        message: format!("Decision recorded. Request is now {}", status_name),
    }))
}

async fn trigger_webhooks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<TriggerWebhooksBody>,
) -> Result<Json<TriggerWebhooksResponse>, ApiError> {
    authorize(&headers, &state.shared_secret)?;

    let missing = body.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    let event = body.parsed_event().map_err(ApiError::BadRequest)?;
    let context = DocumentEventContext {
        event,
        document_id: body.document_id.clone().unwrap_or_default(),
        document_type: body.document_type.clone().unwrap_or_default(),
        document_title: body.document_title.clone().unwrap_or_default(),
        document: body.document,
        previous_data: body.previous_data,
        metadata: body.metadata,
    };

    // Per-endpoint outcomes live in the log trail, not in this response
    let attempted = state.webhooks.trigger(&context).await?;

    Ok(Json(TriggerWebhooksResponse {
        success: true,
        message: format!("Triggered {} webhook(s)", attempted),
        event: event.as_str().to_string(),
        document_id: context.document_id,
        document_type: context.document_type,
    }))
}

async fn test_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<TestWebhookBody>,
) -> Result<Json<cascade_types::DeliveryResult>, ApiError> {
    authorize(&headers, &state.shared_secret)?;

    let webhook_id = match body.webhook_id {
        Some(id) if !id.trim().is_empty() => WebhookId::new(id),
        _ => return Err(ApiError::MissingFields(vec!["webhookId"])),
    };

    let result = state.webhooks.test(&webhook_id).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert("authorization", HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn test_authorize_accepts_exact_match_only() {
        assert!(authorize(&headers_with(Some("Bearer s3cret")), "s3cret").is_ok());

        assert!(authorize(&headers_with(None), "s3cret").is_err());
        assert!(authorize(&headers_with(Some("Bearer wrong")), "s3cret").is_err());
        assert!(authorize(&headers_with(Some("s3cret")), "s3cret").is_err());
        // Prefix of the secret is not the secret
        assert!(authorize(&headers_with(Some("Bearer s3cre")), "s3cret").is_err());
    }

    #[test]
    fn test_cascade_error_mapping() {
        let e: ApiError = CascadeError::NotFound("gone".to_string()).into();
        assert!(matches!(e, ApiError::NotFound(_)));

        let e: ApiError = CascadeError::Validation("bad".to_string()).into();
        assert!(matches!(e, ApiError::BadRequest(_)));

        let e: ApiError = CascadeError::Store("down".to_string()).into();
        assert!(matches!(e, ApiError::Internal(_)));
    }
}
