//! Request and response DTOs for the service endpoints
//!
//! Bodies are schema-checked at this boundary: required fields are modelled
//! as options so a missing field produces a 400 listing the field names
//! instead of a generic deserialization error.

use cascade_core::services::approval_manager::{ApproverRef, CreateApprovalParams};
use cascade_core::types::WebhookEvent;
use cascade_core::workflow::approval_types::{Decision, Priority};
use cascade_types::{ProcessResult, StatsSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One approver named in a creation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproverBody {
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApprovalBody {
    pub document_id: Option<String>,
    pub document_title: Option<String>,
    pub document_type: Option<String>,
    pub requested_by: Option<String>,
    pub approvers: Option<Vec<ApproverBody>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateApprovalBody {
    /// Split into validated params or the list of missing field names
    pub fn into_params(self) -> Result<CreateApprovalParams, Vec<&'static str>> {
        let mut missing = Vec::new();

        if self.document_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("documentId");
        }
        if self
            .document_title
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            missing.push("documentTitle");
        }
        if self
            .document_type
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            missing.push("documentType");
        }
        if self
            .requested_by
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            missing.push("requestedBy");
        }
        if self.approvers.as_ref().map_or(true, |a| a.is_empty()) {
            missing.push("approvers");
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(CreateApprovalParams {
            document_id: self.document_id.unwrap(),
            document_title: self.document_title.unwrap(),
            document_type: self.document_type.unwrap(),
            requested_by: self.requested_by.unwrap(),
            approvers: self
                .approvers
                .unwrap()
                .into_iter()
                .map(|a| ApproverRef {
                    user_id: a.user_id,
                    user_name: a.user_name,
                })
                .collect(),
            due_date: self.due_date,
            priority: self.priority,
            tags: self.tags,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDecisionBody {
    pub approval_request_id: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub decision: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl SubmitDecisionBody {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self
            .approval_request_id
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            missing.push("approvalRequestId");
        }
        if self.user_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("userId");
        }
        if self.user_name.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("userName");
        }
        if self.decision.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("decision");
        }
        missing
    }

    /// The endpoint accepts only the two terminal decisions
    pub fn parsed_decision(&self) -> Result<Decision, String> {
        match self.decision.as_deref() {
            Some("approved") => Ok(Decision::Approved),
            Some("rejected") => Ok(Decision::Rejected),
            other => Err(format!(
                "Invalid decision '{}'. Must be 'approved' or 'rejected'",
                other.unwrap_or("")
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerWebhooksBody {
    pub event: Option<String>,
    pub document_id: Option<String>,
    pub document_type: Option<String>,
    pub document_title: Option<String>,
    #[serde(default)]
    pub document: Option<Value>,
    #[serde(default)]
    pub previous_data: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl TriggerWebhooksBody {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.event.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("event");
        }
        if self
            .document_id
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            missing.push("documentId");
        }
        if self
            .document_type
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            missing.push("documentType");
        }
        if self
            .document_title
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            missing.push("documentTitle");
        }
        missing
    }

    pub fn parsed_event(&self) -> Result<WebhookEvent, String> {
        self.event
            .as_deref()
            .unwrap_or("")
            .parse()
            .map_err(|e: cascade_core::CascadeError| e.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestWebhookBody {
    pub webhook_id: Option<String>,
}

// Response bodies

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub result: ProcessResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApprovalResponse {
    pub success: bool,
    pub approval_request_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerWebhooksResponse {
    pub success: bool,
    pub message: String,
    pub event: String,
    pub document_id: String,
    pub document_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub stats: StatsSnapshot,
}
