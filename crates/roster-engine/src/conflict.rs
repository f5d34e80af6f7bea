//! Detect templates that double-book a teacher or a room.
//!
//! The scan is a pure pairwise comparison of weekly time windows. Adjacent
//! windows (one ending exactly when the other starts) are NOT conflicts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::template::ScheduleTemplate;
use crate::time::{DayOfWeek, TimeOfDay, TimeWindow};

/// The slot being tested: who teaches, where, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub teacher_id: Uuid,
    pub room: Option<String>,
    pub window: TimeWindow,
}

/// Which shared resource the collision is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Same teacher, overlapping time, any room.
    Teacher,
    /// Same room, overlapping time, any teacher.
    Room,
}

/// One conflicting template, identified well enough for the caller to
/// resolve the collision (id, day, time range, counterpart teacher/room).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictHit {
    pub template_id: Uuid,
    pub kind: ConflictKind,
    pub day: DayOfWeek,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub teacher_id: Uuid,
    pub room: Option<String>,
    pub overlap_minutes: i64,
}

/// Conflicts found for a candidate slot, reported per conflict class.
///
/// The two classes are independent: a candidate may have zero, one, or both
/// kinds at once, and a single existing template can appear in both lists
/// when it shares the teacher and the room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub teacher: Vec<ConflictHit>,
    pub room: Vec<ConflictHit>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.teacher.is_empty() && self.room.is_empty()
    }

    pub fn total(&self) -> usize {
        self.teacher.len() + self.room.len()
    }

    /// Flatten both classes into one list, teacher conflicts first.
    pub fn into_hits(self) -> Vec<ConflictHit> {
        let mut hits = self.teacher;
        hits.extend(self.room);
        hits
    }
}

/// Find every template whose window collides with the candidate slot.
///
/// `templates` is the scan scope the caller has already narrowed (the store
/// passes everything non-rejected and non-deactivated). `exclude` skips one
/// template id, used when re-checking an existing template being edited.
///
/// Side effects: none. The same scan backs both the pre-flight check and the
/// gate inside template creation/update.
pub fn find_conflicts<'a, I>(
    candidate: &CandidateSlot,
    templates: I,
    exclude: Option<Uuid>,
) -> ConflictReport
where
    I: IntoIterator<Item = &'a ScheduleTemplate>,
{
    let mut report = ConflictReport::default();

    for existing in templates {
        if Some(existing.id) == exclude {
            continue;
        }

        let window = existing.window();
        if !candidate.window.overlaps(&window) {
            continue;
        }
        let overlap_minutes = candidate.window.overlap_minutes(&window);

        let hit = |kind| ConflictHit {
            template_id: existing.id,
            kind,
            day: existing.day,
            start: existing.start,
            end: existing.end,
            teacher_id: existing.teacher_id,
            room: existing.room.clone(),
            overlap_minutes,
        };

        if existing.teacher_id == candidate.teacher_id {
            report.teacher.push(hit(ConflictKind::Teacher));
        }
        if let (Some(a), Some(b)) = (&candidate.room, &existing.room) {
            if !a.is_empty() && a == b {
                report.room.push(hit(ConflictKind::Room));
            }
        }
    }

    report
}
