//! The recurring weekly commitment record and its field invariants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::approval::ApprovalStatus;
use crate::conflict::CandidateSlot;
use crate::error::{Result, ScheduleError};
use crate::time::{DayOfWeek, TimeOfDay, TimeWindow};

/// Upper bound on free-text note length, in characters.
pub const MAX_NOTES_LEN: usize = 500;

/// How often a template repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Every matching weekday.
    #[default]
    Weekly,
    /// Every other matching weekday, counted from the first match on or
    /// after `effective_from` (that first date is kept).
    Biweekly,
    /// Extension point for deployment-specific rules. Behaves as `Weekly`
    /// unless an exception-date list is supplied to the expander.
    Custom,
}

/// A recurring weekly teaching slot for a teacher/course/room combination.
///
/// Owned exclusively by the [`TemplateStore`](crate::store::TemplateStore),
/// which is the sole writer of every field here, approval state included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTemplate {
    pub id: Uuid,
    pub course_id: Uuid,
    pub teacher_id: Uuid,
    /// The logical class this template produces instances for.
    pub group_id: Uuid,
    pub room: Option<String>,
    pub building: Option<String>,
    pub day: DayOfWeek,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub cadence: Cadence,
    /// First date (inclusive) on which the template may produce occurrences.
    pub effective_from: NaiveDate,
    /// Last date (inclusive); `None` leaves the template open-ended.
    pub effective_to: Option<NaiveDate>,
    /// Whether the template is eligible for expansion. Only ever true when
    /// `approval.is_eligible()` holds.
    pub active: bool,
    pub approval: ApprovalStatus,
    pub approved_by: Option<Uuid>,
    pub approval_date: Option<DateTime<Utc>>,
    /// Manager notes recorded with the decision. Required on rejection.
    pub approval_notes: Option<String>,
    /// Soft-delete flag. Deactivated templates are invisible to conflict
    /// scans and generation but keep their history.
    pub deactivated: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ScheduleTemplate {
    /// The weekly time window this template occupies.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.day, self.start, self.end)
    }

    /// The slot to test other templates against.
    pub fn slot(&self) -> CandidateSlot {
        CandidateSlot {
            teacher_id: self.teacher_id,
            room: self.room.clone(),
            window: self.window(),
        }
    }

    /// Whether this template participates in conflict scans: anything not
    /// rejected and not soft-deleted (pending templates included, so two
    /// pending submissions cannot claim the same slot).
    pub fn in_conflict_scope(&self) -> bool {
        !self.deactivated && self.approval != ApprovalStatus::Rejected
    }

    /// Check the field invariants, collecting every violation into one
    /// validation error.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.end <= self.start {
            problems.push(format!(
                "end time {} must be after start time {}",
                self.end, self.start
            ));
        }
        if let Some(to) = self.effective_to {
            if to <= self.effective_from {
                problems.push(format!(
                    "effective_to {} must be after effective_from {}",
                    to, self.effective_from
                ));
            }
        }
        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                problems.push(format!("notes exceed {} characters", MAX_NOTES_LEN));
            }
        }
        if self.active && !self.approval.is_eligible() {
            problems.push(format!(
                "template cannot be active while approval status is {:?}",
                self.approval
            ));
        }
        if self.active && self.deactivated {
            problems.push("template cannot be both active and deactivated".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ScheduleError::Validation(problems.join("; ")))
        }
    }
}

/// Input for creating a template. Room, building, cadence, and the effective
/// window are optional at the boundary; `effective_from` defaults to the
/// creation date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTemplate {
    pub course_id: Uuid,
    pub teacher_id: Uuid,
    pub group_id: Uuid,
    pub day: DayOfWeek,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub cadence: Cadence,
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for an existing template. Every field is set-only; at
/// least one must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatePatch {
    #[serde(default)]
    pub day: Option<DayOfWeek>,
    #[serde(default)]
    pub start: Option<TimeOfDay>,
    #[serde(default)]
    pub end: Option<TimeOfDay>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub cadence: Option<Cadence>,
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TemplatePatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.day.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.room.is_none()
            && self.building.is_none()
            && self.cadence.is_none()
            && self.effective_from.is_none()
            && self.effective_to.is_none()
            && self.notes.is_none()
    }

    /// Apply the patch to a template. Returns true when a slot field
    /// (day, time, or room) changed, meaning the conflict gate must re-run.
    pub fn apply(&self, template: &mut ScheduleTemplate) -> bool {
        let mut slot_changed = false;

        if let Some(day) = self.day {
            slot_changed |= template.day != day;
            template.day = day;
        }
        if let Some(start) = self.start {
            slot_changed |= template.start != start;
            template.start = start;
        }
        if let Some(end) = self.end {
            slot_changed |= template.end != end;
            template.end = end;
        }
        if let Some(room) = &self.room {
            slot_changed |= template.room.as_deref() != Some(room.as_str());
            template.room = Some(room.clone());
        }
        if let Some(building) = &self.building {
            template.building = Some(building.clone());
        }
        if let Some(cadence) = self.cadence {
            template.cadence = cadence;
        }
        if let Some(from) = self.effective_from {
            template.effective_from = from;
        }
        if let Some(to) = self.effective_to {
            template.effective_to = Some(to);
        }
        if let Some(notes) = &self.notes {
            template.notes = Some(notes.clone());
        }

        slot_changed
    }
}
