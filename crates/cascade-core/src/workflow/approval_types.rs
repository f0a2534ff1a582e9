//! Strongly typed approval request types
//! No string-based state management - everything is strongly typed

use crate::error::{CascadeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly typed ApprovalRequestId
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalRequestId(String);

impl ApprovalRequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(s: &str) -> Result<Self> {
        uuid::Uuid::parse_str(s)
            .map(|_| Self(s.to_string()))
            .map_err(|e| {
                CascadeError::Validation(format!("Invalid ApprovalRequestId format: {}", e))
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApprovalRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApprovalRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single approver's decision on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Decision {
    Pending,
    Approved,
    Rejected,
}

/// Overall status derived from the constituent decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Terminal requests are immutable; further decisions are refused
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// Editorial priority of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

/// One required approver and their recorded decision
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproverEntry {
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    pub decision: Decision,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl ApproverEntry {
    pub fn pending(user_id: String, user_name: Option<String>) -> Self {
        Self {
            user_id,
            user_name,
            decision: Decision::Pending,
            comment: None,
            decided_at: None,
        }
    }
}

/// Multi-approver sign-off request stored as a document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    #[serde(rename = "_id")]
    pub id: ApprovalRequestId,

    #[serde(rename = "_type", default = "approval_request_doc_type")]
    pub doc_type: String,

    pub document_id: String,
    pub document_type: String,
    pub document_title: String,
    pub requested_by: String,

    pub approvers: Vec<ApproverEntry>,

    pub status: ApprovalStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn approval_request_doc_type() -> String {
    "approvalRequest".to_string()
}

impl ApprovalRequest {
    /// Create a new request with every approver decision initialized to pending
    pub fn new(
        document_id: String,
        document_type: String,
        document_title: String,
        requested_by: String,
        approvers: Vec<ApproverEntry>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ApprovalRequestId::new(),
            doc_type: approval_request_doc_type(),
            document_id,
            document_type,
            document_title,
            requested_by,
            approvers,
            status: ApprovalStatus::Pending,
            due_date: None,
            priority: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Aggregation rule: rejected the moment anyone rejects, approved only
    /// when everyone has approved, pending otherwise
    pub fn aggregate_status(&self) -> ApprovalStatus {
        if self
            .approvers
            .iter()
            .any(|a| a.decision == Decision::Rejected)
        {
            return ApprovalStatus::Rejected;
        }

        if !self.approvers.is_empty()
            && self
                .approvers
                .iter()
                .all(|a| a.decision == Decision::Approved)
        {
            return ApprovalStatus::Approved;
        }

        ApprovalStatus::Pending
    }

    /// Record one approver's decision and recompute the overall status
    ///
    /// Fails on terminal requests, on a pending "decision", and on users
    /// that are not part of the approver set.
    pub fn record_decision(
        &mut self,
        user_id: &str,
        user_name: Option<&str>,
        decision: Decision,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ApprovalStatus> {
        if self.status.is_terminal() {
            return Err(CascadeError::Workflow(format!(
                "Approval request {} is already {:?} and cannot accept further decisions",
                self.id, self.status
            )));
        }

        if decision == Decision::Pending {
            return Err(CascadeError::Validation(
                "Decision must be 'approved' or 'rejected'".to_string(),
            ));
        }

        let entry = self
            .approvers
            .iter_mut()
            .find(|a| a.user_id == user_id)
            .ok_or_else(|| {
                CascadeError::Validation(format!(
                    "User {} is not an approver on request {}",
                    user_id, self.id
                ))
            })?;

        entry.decision = decision;
        entry.comment = comment;
        entry.decided_at = Some(now);
        if let Some(name) = user_name {
            entry.user_name = Some(name.to_string());
        }

        self.status = self.aggregate_status();
        self.updated_at = now;

        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_approvers(ids: &[&str]) -> ApprovalRequest {
        ApprovalRequest::new(
            "page-1".to_string(),
            "landingPage".to_string(),
            "Homepage".to_string(),
            "editor-1".to_string(),
            ids.iter()
                .map(|id| ApproverEntry::pending(id.to_string(), None))
                .collect(),
        )
    }

    #[test]
    fn test_new_request_is_pending() {
        let request = request_with_approvers(&["x", "y", "z"]);

        assert_eq!(request.status, ApprovalStatus::Pending);
        assert!(request
            .approvers
            .iter()
            .all(|a| a.decision == Decision::Pending));
    }

    #[test]
    fn test_pending_until_everyone_decides() {
        let mut request = request_with_approvers(&["x", "y", "z"]);
        let now = Utc::now();

        request
            .record_decision("x", None, Decision::Approved, None, now)
            .unwrap();
        assert_eq!(request.status, ApprovalStatus::Pending);

        request
            .record_decision("y", None, Decision::Approved, None, now)
            .unwrap();
        assert_eq!(request.status, ApprovalStatus::Pending);

        let status = request
            .record_decision("z", None, Decision::Approved, None, now)
            .unwrap();
        assert_eq!(status, ApprovalStatus::Approved);
    }

    #[test]
    fn test_single_rejection_wins_immediately() {
        let mut request = request_with_approvers(&["x", "y", "z"]);
        let now = Utc::now();

        // X rejects while Y and Z are still pending
        let status = request
            .record_decision("x", None, Decision::Rejected, Some("Not ready".to_string()), now)
            .unwrap();

        assert_eq!(status, ApprovalStatus::Rejected);
        assert_eq!(request.status, ApprovalStatus::Rejected);
    }

    #[test]
    fn test_terminal_request_is_immutable() {
        let mut request = request_with_approvers(&["x", "y"]);
        let now = Utc::now();

        request
            .record_decision("x", None, Decision::Rejected, None, now)
            .unwrap();

        let result = request.record_decision("y", None, Decision::Approved, None, now);
        assert!(matches!(result, Err(CascadeError::Workflow(_))));
        assert_eq!(request.status, ApprovalStatus::Rejected);
    }

    #[test]
    fn test_unknown_approver_is_rejected() {
        let mut request = request_with_approvers(&["x"]);
        let result =
            request.record_decision("intruder", None, Decision::Approved, None, Utc::now());

        assert!(matches!(result, Err(CascadeError::Validation(_))));
    }

    #[test]
    fn test_pending_is_not_a_valid_decision() {
        let mut request = request_with_approvers(&["x"]);
        let result = request.record_decision("x", None, Decision::Pending, None, Utc::now());

        assert!(matches!(result, Err(CascadeError::Validation(_))));
    }

    #[test]
    fn test_decision_records_comment_and_timestamp() {
        let mut request = request_with_approvers(&["x"]);
        let now = Utc::now();

        request
            .record_decision(
                "x",
                Some("Xenia"),
                Decision::Approved,
                Some("Looks good".to_string()),
                now,
            )
            .unwrap();

        let entry = &request.approvers[0];
        assert_eq!(entry.decision, Decision::Approved);
        assert_eq!(entry.comment.as_deref(), Some("Looks good"));
        assert_eq!(entry.decided_at, Some(now));
        assert_eq!(entry.user_name.as_deref(), Some("Xenia"));
    }

    #[test]
    fn test_request_wire_format() {
        let request = request_with_approvers(&["x"]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["_type"], "approvalRequest");
        assert_eq!(json["documentId"], "page-1");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["approvers"][0]["decision"], "pending");
    }

    #[test]
    fn test_approval_request_id_format() {
        let id = ApprovalRequestId::new();
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());

        assert!(ApprovalRequestId::from_string("not-a-uuid").is_err());
    }
}
