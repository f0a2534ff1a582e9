//! Shared wire types for the Cascade content workflow service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action recorded for a document processed by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReconcileAction {
    Published,
    Unpublished,
    Error,
}

/// Per-document outcome of a reconciliation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutcome {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub title: Option<String>,
    pub action: ReconcileAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of one reconciliation run
///
/// Every due document appears in `documents`, including the failed ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub published: u32,
    pub unpublished: u32,
    pub errors: u32,
    pub documents: Vec<DocumentOutcome>,
}

impl ProcessResult {
    pub fn record_published(&mut self, id: String, doc_type: String, title: Option<String>) {
        self.published += 1;
        self.documents.push(DocumentOutcome {
            id,
            doc_type,
            title,
            action: ReconcileAction::Published,
            error: None,
        });
    }

    pub fn record_unpublished(&mut self, id: String, doc_type: String, title: Option<String>) {
        self.unpublished += 1;
        self.documents.push(DocumentOutcome {
            id,
            doc_type,
            title,
            action: ReconcileAction::Unpublished,
            error: None,
        });
    }

    pub fn record_error(
        &mut self,
        id: String,
        doc_type: String,
        title: Option<String>,
        error: String,
    ) {
        self.errors += 1;
        self.documents.push(DocumentOutcome {
            id,
            doc_type,
            title,
            action: ReconcileAction::Error,
            error: Some(error),
        });
    }
}

/// Result of a single webhook delivery attempt, as returned by the manual
/// test endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Snapshot of the injected runtime counters, surfaced on /health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub reconcile_runs: u64,
    pub documents_published: u64,
    pub documents_unpublished: u64,
    pub reconcile_errors: u64,
    pub approvals_created: u64,
    pub decisions_recorded: u64,
    pub webhooks_delivered: u64,
    pub webhooks_failed: u64,
    pub since: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_result_counts_and_documents() {
        let mut result = ProcessResult::default();
        result.record_published("a".to_string(), "servicePage".to_string(), None);
        result.record_error(
            "b".to_string(),
            "servicePage".to_string(),
            Some("Broken".to_string()),
            "patch failed".to_string(),
        );
        result.record_unpublished("c".to_string(), "landingPage".to_string(), None);

        assert_eq!(result.published, 1);
        assert_eq!(result.unpublished, 1);
        assert_eq!(result.errors, 1);
        assert_eq!(result.documents.len(), 3);
        assert_eq!(result.documents[1].action, ReconcileAction::Error);
        assert_eq!(result.documents[1].error.as_deref(), Some("patch failed"));
    }

    #[test]
    fn test_process_result_wire_format() {
        let mut result = ProcessResult::default();
        result.record_published(
            "svc1".to_string(),
            "servicePage".to_string(),
            Some("Our Services".to_string()),
        );

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"published\":1"));
        assert!(json.contains("\"unpublished\":0"));
        assert!(json.contains("\"type\":\"servicePage\""));
        assert!(json.contains("\"action\":\"published\""));
        // Successful outcomes carry no error field at all
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_reconcile_action_serialization() {
        assert_eq!(
            serde_json::to_string(&ReconcileAction::Unpublished).unwrap(),
            "\"unpublished\""
        );
        assert_eq!(
            serde_json::to_string(&ReconcileAction::Error).unwrap(),
            "\"error\""
        );
    }
}
