//! Injected runtime counters with explicit lifecycle
//!
//! Created once in main and passed to the components that record into it.
//! Queried on demand by the health endpoint.

use cascade_types::{ProcessResult, StatsSnapshot};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct RuntimeStats {
    started_at: DateTime<Utc>,
    reconcile_runs: AtomicU64,
    documents_published: AtomicU64,
    documents_unpublished: AtomicU64,
    reconcile_errors: AtomicU64,
    approvals_created: AtomicU64,
    decisions_recorded: AtomicU64,
    webhooks_delivered: AtomicU64,
    webhooks_failed: AtomicU64,
}

impl RuntimeStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            reconcile_runs: AtomicU64::new(0),
            documents_published: AtomicU64::new(0),
            documents_unpublished: AtomicU64::new(0),
            reconcile_errors: AtomicU64::new(0),
            approvals_created: AtomicU64::new(0),
            decisions_recorded: AtomicU64::new(0),
            webhooks_delivered: AtomicU64::new(0),
            webhooks_failed: AtomicU64::new(0),
        }
    }

    pub fn record_reconcile_run(&self, result: &ProcessResult) {
        self.reconcile_runs.fetch_add(1, Ordering::Relaxed);
        self.documents_published
            .fetch_add(result.published as u64, Ordering::Relaxed);
        self.documents_unpublished
            .fetch_add(result.unpublished as u64, Ordering::Relaxed);
        self.reconcile_errors
            .fetch_add(result.errors as u64, Ordering::Relaxed);
    }

    pub fn record_approval_created(&self) {
        self.approvals_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decision(&self) {
        self.decisions_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_webhook_delivery(&self, success: bool) {
        if success {
            self.webhooks_delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.webhooks_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reconcile_runs: self.reconcile_runs.load(Ordering::Relaxed),
            documents_published: self.documents_published.load(Ordering::Relaxed),
            documents_unpublished: self.documents_unpublished.load(Ordering::Relaxed),
            reconcile_errors: self.reconcile_errors.load(Ordering::Relaxed),
            approvals_created: self.approvals_created.load(Ordering::Relaxed),
            decisions_recorded: self.decisions_recorded.load(Ordering::Relaxed),
            webhooks_delivered: self.webhooks_delivered.load(Ordering::Relaxed),
            webhooks_failed: self.webhooks_failed.load(Ordering::Relaxed),
            since: self.started_at,
        }
    }
}

impl Default for RuntimeStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_run_accumulates() {
        let stats = RuntimeStats::new();

        let mut result = ProcessResult::default();
        result.record_published("a".to_string(), "page".to_string(), None);
        result.record_error("b".to_string(), "page".to_string(), None, "x".to_string());

        stats.record_reconcile_run(&result);
        stats.record_reconcile_run(&result);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.reconcile_runs, 2);
        assert_eq!(snapshot.documents_published, 2);
        assert_eq!(snapshot.reconcile_errors, 2);
        assert_eq!(snapshot.documents_unpublished, 0);
    }

    #[test]
    fn test_webhook_counters_split_by_outcome() {
        let stats = RuntimeStats::new();
        stats.record_webhook_delivery(true);
        stats.record_webhook_delivery(false);
        stats.record_webhook_delivery(true);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.webhooks_delivered, 2);
        assert_eq!(snapshot.webhooks_failed, 1);
    }
}
