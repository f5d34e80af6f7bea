//! Outbound events emitted after successful template state transitions.
//!
//! The notification collaborator consumes these asynchronously via
//! [`TemplateStore::take_events`](crate::store::TemplateStore::take_events).
//! Emission is infallible: the engine never blocks on, or fails because of,
//! the consumer's availability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleEventKind {
    TemplateCreated,
    TemplateUpdated,
    TemplateApproved,
    TemplateRejected,
    TemplateDeactivated,
}

/// One state transition, recorded after it committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub kind: ScheduleEventKind,
    pub template_id: Uuid,
    /// The caller responsible for the transition, when one was involved
    /// (approval decisions).
    pub actor: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

impl ScheduleEvent {
    pub fn new(kind: ScheduleEventKind, template_id: Uuid, actor: Option<Uuid>) -> Self {
        Self {
            kind,
            template_id,
            actor,
            occurred_at: Utc::now(),
        }
    }
}
