//! Scheduled publish / unpublish reconciliation job

use crate::clients::DocumentStore;
use crate::error::Result;
use crate::services::stats::RuntimeStats;
use crate::types::ContentDocument;
use crate::workflow::state::{Workflow, WorkflowState};
use cascade_types::ProcessResult;
use chrono::Utc;
use std::sync::Arc;

const PUBLISH_NOTES: &str = "Published automatically by scheduled publish";
const UNPUBLISH_NOTES: &str = "Unpublished automatically by scheduled unpublish";

/// Brings each document's workflow state into agreement with its scheduling
/// intent, exactly once per due transition per invocation.
///
/// Overlapping invocations are NOT mutually excluded: two concurrent runs
/// can both observe the same due document and double-apply a transition.
/// That is harmless because the patch is idempotent (setting
/// `state=published` twice yields the same final state); `changedAt`
/// ordering under concurrent runs is last-write-wins at the store. Callers
/// needing exactly-once semantics must add an external lock.
pub struct ScheduledPublishReconciler<S: DocumentStore> {
    store: Arc<S>,
    stats: Arc<RuntimeStats>,
}

impl<S: DocumentStore> ScheduledPublishReconciler<S> {
    pub fn new(store: Arc<S>, stats: Arc<RuntimeStats>) -> Self {
        Self { store, stats }
    }

    /// Run both passes over the store and report per-document outcomes.
    ///
    /// A patch failure is recorded and counted but never aborts the batch;
    /// only a due-query failure is fatal to the invocation. No webhooks are
    /// fired from here - callers that want notifications invoke the webhook
    /// manager separately.
    pub async fn reconcile(&self) -> Result<ProcessResult> {
        let now = Utc::now();
        let mut result = ProcessResult::default();

        log::info!("Starting scheduled publish reconciliation at {}", now);

        // Pass 1: publish. The due-query's state guard keeps this pass from
        // re-firing for documents already transitioned in an earlier run.
        let due_publish = self.store.due_for_publish(now).await?;
        log::info!("{} documents due for publishing", due_publish.len());

        for doc in due_publish {
            self.apply_publish(&doc, &mut result).await;
        }

        // Pass 2: unpublish. Independent of pass 1; a document cannot be due
        // for both within a single run.
        let due_unpublish = self.store.due_for_unpublish(now).await?;
        log::info!("{} documents due for unpublishing", due_unpublish.len());

        for doc in due_unpublish {
            self.apply_unpublish(&doc, &mut result).await;
        }

        self.stats.record_reconcile_run(&result);

        log::info!(
            "Reconciliation complete: {} published, {} unpublished, {} errors",
            result.published,
            result.unpublished,
            result.errors
        );

        Ok(result)
    }

    /// Transition A: pre-publish state with elapsed publishAt -> published
    async fn apply_publish(&self, doc: &ContentDocument, result: &mut ProcessResult) {
        let workflow = Workflow::system_transition(WorkflowState::Published, Utc::now(), PUBLISH_NOTES);

        match self.store.set_workflow(&doc.id, &workflow).await {
            Ok(()) => {
                log::info!("Published {} ({})", doc.id, doc.doc_type);
                result.record_published(doc.id.clone(), doc.doc_type.clone(), doc.title.clone());
            }
            Err(e) => {
                log::error!("Failed to publish {}: {}", doc.id, e);
                result.record_error(
                    doc.id.clone(),
                    doc.doc_type.clone(),
                    doc.title.clone(),
                    e.to_string(),
                );
            }
        }
    }

    /// Transition B: published state with elapsed unpublishAt -> archived
    async fn apply_unpublish(&self, doc: &ContentDocument, result: &mut ProcessResult) {
        let workflow = Workflow::system_transition(WorkflowState::Archived, Utc::now(), UNPUBLISH_NOTES);

        match self.store.set_workflow(&doc.id, &workflow).await {
            Ok(()) => {
                log::info!("Unpublished {} ({})", doc.id, doc.doc_type);
                result.record_unpublished(doc.id.clone(), doc.doc_type.clone(), doc.title.clone());
            }
            Err(e) => {
                log::error!("Failed to unpublish {}: {}", doc.id, e);
                result.record_error(
                    doc.id.clone(),
                    doc.doc_type.clone(),
                    doc.title.clone(),
                    e.to_string(),
                );
            }
        }
    }
}
