//! Integration tests for the approval request manager against a mock
//! document store

use async_trait::async_trait;
use cascade_core::clients::DocumentStore;
use cascade_core::error::{CascadeError, Result};
use cascade_core::services::approval_manager::{ApprovalManager, ApproverRef, CreateApprovalParams};
use cascade_core::services::RuntimeStats;
use cascade_core::types::{ContentDocument, WebhookConfig, WebhookEvent, WebhookId, WebhookLogEntry};
use cascade_core::workflow::approval_types::{
    ApprovalRequest, ApprovalRequestId, ApprovalStatus, Decision,
};
use cascade_core::workflow::Workflow;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockStore {
    requests: Mutex<HashMap<String, ApprovalRequest>>,
}

impl MockStore {
    fn request(&self, id: &ApprovalRequestId) -> ApprovalRequest {
        self.requests
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .unwrap()
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn due_for_publish(&self, _now: DateTime<Utc>) -> Result<Vec<ContentDocument>> {
        Ok(Vec::new())
    }

    async fn due_for_unpublish(&self, _now: DateTime<Utc>) -> Result<Vec<ContentDocument>> {
        Ok(Vec::new())
    }

    async fn set_workflow(&self, _document_id: &str, _workflow: &Workflow) -> Result<()> {
        Ok(())
    }

    async fn create_approval_request(&self, request: &ApprovalRequest) -> Result<()> {
        self.requests
            .lock()
            .unwrap()
            .insert(request.id.as_str().to_string(), request.clone());
        Ok(())
    }

    async fn approval_request(&self, id: &ApprovalRequestId) -> Result<Option<ApprovalRequest>> {
        Ok(self.requests.lock().unwrap().get(id.as_str()).cloned())
    }

    async fn update_approval_request(&self, request: &ApprovalRequest) -> Result<()> {
        self.requests
            .lock()
            .unwrap()
            .insert(request.id.as_str().to_string(), request.clone());
        Ok(())
    }

    async fn webhook_config(&self, _id: &WebhookId) -> Result<Option<WebhookConfig>> {
        Ok(None)
    }

    async fn webhook_configs_for(&self, _event: WebhookEvent) -> Result<Vec<WebhookConfig>> {
        Ok(Vec::new())
    }

    async fn append_webhook_log(&self, _entry: &WebhookLogEntry) -> Result<()> {
        Ok(())
    }
}

fn params(approvers: &[&str]) -> CreateApprovalParams {
    CreateApprovalParams {
        document_id: "page-1".to_string(),
        document_title: "Homepage".to_string(),
        document_type: "landingPage".to_string(),
        requested_by: "editor-1".to_string(),
        approvers: approvers
            .iter()
            .map(|id| ApproverRef {
                user_id: id.to_string(),
                user_name: None,
            })
            .collect(),
        due_date: None,
        priority: None,
        tags: Vec::new(),
    }
}

fn manager(store: Arc<MockStore>) -> ApprovalManager<MockStore> {
    ApprovalManager::new(store, Arc::new(RuntimeStats::new()))
}

#[tokio::test]
async fn test_create_initializes_pending_decisions() {
    let store = Arc::new(MockStore::default());
    let manager = manager(store.clone());

    let id = manager.create_request(params(&["x", "y"])).await.unwrap();

    let request = store.request(&id);
    assert_eq!(request.status, ApprovalStatus::Pending);
    assert_eq!(request.approvers.len(), 2);
    assert!(request
        .approvers
        .iter()
        .all(|a| a.decision == Decision::Pending));
    assert_eq!(request.document_id, "page-1");
    assert_eq!(request.requested_by, "editor-1");
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let store = Arc::new(MockStore::default());
    let manager = manager(store);

    let mut bad = params(&["x"]);
    bad.document_id = String::new();
    bad.requested_by = "  ".to_string();

    let err = manager.create_request(bad).await.unwrap_err();
    match err {
        CascadeError::Validation(message) => {
            assert!(message.contains("documentId"));
            assert!(message.contains("requestedBy"));
            assert!(!message.contains("documentTitle"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_rejects_empty_approver_list() {
    let store = Arc::new(MockStore::default());
    let manager = manager(store);

    let err = manager.create_request(params(&[])).await.unwrap_err();
    match err {
        CascadeError::Validation(message) => assert!(message.contains("approvers")),
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejection_is_terminal_immediately() {
    let store = Arc::new(MockStore::default());
    let manager = manager(store.clone());

    let id = manager.create_request(params(&["x", "y", "z"])).await.unwrap();

    // X rejects while Y and Z are still pending
    let status = manager
        .submit_decision(&id, "x", Some("Xenia"), Decision::Rejected, None)
        .await
        .unwrap();

    assert_eq!(status, ApprovalStatus::Rejected);
    assert_eq!(store.request(&id).status, ApprovalStatus::Rejected);
}

#[tokio::test]
async fn test_unanimous_approval_required() {
    let store = Arc::new(MockStore::default());
    let manager = manager(store.clone());

    let id = manager.create_request(params(&["x", "y"])).await.unwrap();

    let status = manager
        .submit_decision(&id, "x", None, Decision::Approved, None)
        .await
        .unwrap();
    assert_eq!(status, ApprovalStatus::Pending);

    let status = manager
        .submit_decision(&id, "y", None, Decision::Approved, Some("Ship it".to_string()))
        .await
        .unwrap();
    assert_eq!(status, ApprovalStatus::Approved);

    let request = store.request(&id);
    assert_eq!(request.approvers[1].comment.as_deref(), Some("Ship it"));
    assert!(request.approvers[1].decided_at.is_some());
}

#[tokio::test]
async fn test_decision_on_unknown_request_is_not_found() {
    let store = Arc::new(MockStore::default());
    let manager = manager(store);

    let missing = ApprovalRequestId::new();
    let err = manager
        .submit_decision(&missing, "x", None, Decision::Approved, None)
        .await
        .unwrap_err();

    assert!(matches!(err, CascadeError::NotFound(_)));
}

#[tokio::test]
async fn test_terminal_request_refuses_further_decisions() {
    let store = Arc::new(MockStore::default());
    let manager = manager(store.clone());

    let id = manager.create_request(params(&["x", "y"])).await.unwrap();
    manager
        .submit_decision(&id, "x", None, Decision::Rejected, None)
        .await
        .unwrap();

    let err = manager
        .submit_decision(&id, "y", None, Decision::Approved, None)
        .await
        .unwrap_err();

    assert!(matches!(err, CascadeError::Workflow(_)));
    // The stored request is unchanged by the refused decision
    let request = store.request(&id);
    assert_eq!(request.status, ApprovalStatus::Rejected);
    assert_eq!(request.approvers[1].decision, Decision::Pending);
}

#[tokio::test]
async fn test_non_approver_cannot_decide() {
    let store = Arc::new(MockStore::default());
    let manager = manager(store);

    let id = manager.create_request(params(&["x"])).await.unwrap();
    let err = manager
        .submit_decision(&id, "stranger", None, Decision::Approved, None)
        .await
        .unwrap_err();

    assert!(matches!(err, CascadeError::Validation(_)));
}
