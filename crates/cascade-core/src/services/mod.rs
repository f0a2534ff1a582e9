//! Service modules for business logic

pub mod approval_manager;
pub mod stats;
pub mod webhook_manager;

// Re-export service types
pub use approval_manager::{ApprovalManager, ApproverRef, CreateApprovalParams};
pub use stats::RuntimeStats;
pub use webhook_manager::{DocumentEventContext, WebhookManager};
