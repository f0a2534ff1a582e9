//! Workflow management module

pub mod approval_types;
pub mod reconciler;
pub mod state;

pub use approval_types::*;
pub use reconciler::ScheduledPublishReconciler;
pub use state::{Workflow, WorkflowState, SYSTEM_ACTOR};
