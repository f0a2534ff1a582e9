//! Editorial workflow state embedded in content documents
//! No string-based state management - everything is strongly typed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actor recorded on transitions fired by the service itself
pub const SYSTEM_ACTOR: &str = "system";

/// Closed enumeration of document lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowState {
    Draft,
    InReview,
    Approved,
    Published,
    Archived,
}

impl WorkflowState {
    /// Whether a transition from `self` to `next` is a defined forward move.
    ///
    /// The scheduled jobs only ever take the pre-publish -> published and
    /// published -> archived edges; the editorial moves exist for manual
    /// state changes routed through the same model.
    pub fn can_transition_to(self, next: WorkflowState) -> bool {
        use WorkflowState::*;

        matches!(
            (self, next),
            (Draft, InReview)
                | (InReview, Draft)
                | (InReview, Approved)
                | (Draft, Published)
                | (InReview, Published)
                | (Approved, Published)
                | (Published, Archived)
                | (Archived, Draft)
        )
    }

    /// Pre-publish states are everything the publish pass may act on
    pub fn is_pre_publish(self) -> bool {
        !matches!(self, WorkflowState::Published | WorkflowState::Archived)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "draft",
            Self::InReview => "inReview",
            Self::Approved => "approved",
            Self::Published => "published",
            Self::Archived => "archived",
        };
        write!(f, "{}", name)
    }
}

/// The `workflow` object embedded in any content document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub state: WorkflowState,

    pub changed_at: DateTime<Utc>,

    /// Actor id, or [`SYSTEM_ACTOR`] for automated transitions
    pub changed_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Workflow {
    pub fn new(
        state: WorkflowState,
        changed_at: DateTime<Utc>,
        changed_by: String,
        notes: Option<String>,
    ) -> Self {
        Self {
            state,
            changed_at,
            changed_by,
            notes,
        }
    }

    /// Bookkeeping for a transition fired by the scheduled jobs
    pub fn system_transition(state: WorkflowState, now: DateTime<Utc>, notes: &str) -> Self {
        Self {
            state,
            changed_at: now,
            changed_by: SYSTEM_ACTOR.to_string(),
            notes: Some(notes.to_string()),
        }
    }
}
