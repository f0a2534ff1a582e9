//! Cascade Core Library
//!
//! Consolidated business logic for the Cascade content workflow service.
//! Contains the document store client, workflow state model, scheduled
//! publish reconciler, approval request manager, and webhook delivery
//! manager.

pub mod clients;
pub mod config;
pub mod error;
pub mod services;
pub mod types;
pub mod workflow;

// Re-export main types for easy access
pub use config::CascadeConfig;
pub use error::{CascadeError, Result};

// Re-export all client types
pub use clients::{ContentStoreClient, DeliverySender, DocumentStore, HttpDeliverySender};

// Re-export service types
pub use services::{ApprovalManager, RuntimeStats, WebhookManager};

// Re-export workflow types
pub use workflow::{
    ApprovalRequest,
    ApprovalRequestId,
    ApprovalStatus,
    ApproverEntry,
    Decision,
    Priority,
    ScheduledPublishReconciler,
    Workflow,
    WorkflowState,
    SYSTEM_ACTOR,
};
