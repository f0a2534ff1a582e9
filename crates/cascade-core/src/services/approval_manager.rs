//! Approval request management service

use crate::clients::DocumentStore;
use crate::error::{CascadeError, Result};
use crate::services::stats::RuntimeStats;
use crate::workflow::approval_types::{
    ApprovalRequest, ApprovalRequestId, ApprovalStatus, ApproverEntry, Decision, Priority,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One required approver named at request creation time
#[derive(Debug, Clone)]
pub struct ApproverRef {
    pub user_id: String,
    pub user_name: Option<String>,
}

/// Inputs for creating an approval request
#[derive(Debug, Clone)]
pub struct CreateApprovalParams {
    pub document_id: String,
    pub document_title: String,
    pub document_type: String,
    pub requested_by: String,
    pub approvers: Vec<ApproverRef>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
}

impl CreateApprovalParams {
    /// Names of the required fields that are missing or empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.document_id.trim().is_empty() {
            missing.push("documentId");
        }
        if self.document_title.trim().is_empty() {
            missing.push("documentTitle");
        }
        if self.document_type.trim().is_empty() {
            missing.push("documentType");
        }
        if self.requested_by.trim().is_empty() {
            missing.push("requestedBy");
        }
        if self.approvers.is_empty() || self.approvers.iter().any(|a| a.user_id.trim().is_empty())
        {
            missing.push("approvers");
        }

        missing
    }
}

/// Creates and tracks multi-approver sign-off requests against documents.
/// Stateless per invocation; every request lives in the document store.
pub struct ApprovalManager<S: DocumentStore> {
    store: Arc<S>,
    stats: Arc<RuntimeStats>,
}

impl<S: DocumentStore> ApprovalManager<S> {
    pub fn new(store: Arc<S>, stats: Arc<RuntimeStats>) -> Self {
        Self { store, stats }
    }

    /// Create a request with all approver decisions initialized to pending
    pub async fn create_request(&self, params: CreateApprovalParams) -> Result<ApprovalRequestId> {
        let missing = params.missing_fields();
        if !missing.is_empty() {
            return Err(CascadeError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let approvers = params
            .approvers
            .into_iter()
            .map(|a| ApproverEntry::pending(a.user_id, a.user_name))
            .collect();

        let mut request = ApprovalRequest::new(
            params.document_id,
            params.document_type,
            params.document_title,
            params.requested_by,
            approvers,
        );
        request.due_date = params.due_date;
        request.priority = params.priority;
        request.tags = params.tags;

        let id = request.id.clone();
        self.store.create_approval_request(&request).await?;
        self.stats.record_approval_created();

        log::info!(
            "Created approval request {} for document {} with {} approvers",
            id,
            request.document_id,
            request.approvers.len()
        );

        Ok(id)
    }

    /// Record one approver's decision and persist the recomputed status
    pub async fn submit_decision(
        &self,
        request_id: &ApprovalRequestId,
        user_id: &str,
        user_name: Option<&str>,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<ApprovalStatus> {
        let mut request = self
            .store
            .approval_request(request_id)
            .await?
            .ok_or_else(|| {
                CascadeError::NotFound(format!("Approval request {} not found", request_id))
            })?;

        let status = request.record_decision(user_id, user_name, decision, comment, Utc::now())?;

        self.store.update_approval_request(&request).await?;
        self.stats.record_decision();

        log::info!(
            "Recorded {:?} from {} on approval request {} - overall status now {:?}",
            decision,
            user_id,
            request_id,
            status
        );

        Ok(status)
    }
}
