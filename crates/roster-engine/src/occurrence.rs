//! Concrete dated session instances and the store that owns them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScheduleError};
use crate::template::ScheduleTemplate;
use crate::time::TimeOfDay;

/// Downstream lifecycle state of a session instance. Only `Scheduled` is
/// ever written by this engine; the rest belong to session management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// One dated materialization of a template.
///
/// Course, teacher, room, and times are copied at generation time; later
/// template edits do not retroactively change occurrences already produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOccurrence {
    pub id: Uuid,
    pub template_id: Uuid,
    pub course_id: Uuid,
    pub teacher_id: Uuid,
    pub group_id: Uuid,
    pub room: Option<String>,
    pub building: Option<String>,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub status: OccurrenceStatus,
}

impl SessionOccurrence {
    /// Snapshot a template onto a concrete date.
    pub fn from_template(template: &ScheduleTemplate, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_id: template.id,
            course_id: template.course_id,
            teacher_id: template.teacher_id,
            group_id: template.group_id,
            room: template.room.clone(),
            building: template.building.clone(),
            date,
            start: template.start,
            end: template.end,
            status: OccurrenceStatus::Scheduled,
        }
    }
}

/// Storage collaborator for occurrences.
///
/// The generator is the only writer. Implementations must uphold the
/// uniqueness invariant: at most one occurrence per `(template_id, date)`,
/// with `insert` refusing duplicates.
pub trait OccurrenceStore {
    /// Whether an occurrence already exists for this template and date.
    fn exists(&self, template_id: Uuid, date: NaiveDate) -> bool;

    /// Persist a new occurrence. Fails with [`ScheduleError::Storage`] when
    /// the `(template_id, date)` pair is already taken.
    fn insert(&mut self, occurrence: SessionOccurrence) -> Result<()>;

    /// All stored occurrences for a template, in date order.
    fn occurrences_for(&self, template_id: Uuid) -> Vec<&SessionOccurrence>;
}

/// In-memory occurrence store keyed by `(template_id, date)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryOccurrenceStore {
    by_slot: BTreeMap<(Uuid, NaiveDate), SessionOccurrence>,
}

impl MemoryOccurrenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously persisted occurrences. Fails when the
    /// input violates the `(template_id, date)` uniqueness invariant.
    pub fn load(occurrences: Vec<SessionOccurrence>) -> Result<Self> {
        let mut store = Self::new();
        for occ in occurrences {
            store.insert(occ)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionOccurrence> {
        self.by_slot.values()
    }

    /// Hand the occurrences back for persistence, in (template, date) order.
    pub fn into_occurrences(self) -> Vec<SessionOccurrence> {
        self.by_slot.into_values().collect()
    }
}

impl OccurrenceStore for MemoryOccurrenceStore {
    fn exists(&self, template_id: Uuid, date: NaiveDate) -> bool {
        self.by_slot.contains_key(&(template_id, date))
    }

    fn insert(&mut self, occurrence: SessionOccurrence) -> Result<()> {
        let key = (occurrence.template_id, occurrence.date);
        if self.by_slot.contains_key(&key) {
            return Err(ScheduleError::Storage(format!(
                "occurrence already exists for template {} on {}",
                key.0, key.1
            )));
        }
        self.by_slot.insert(key, occurrence);
        Ok(())
    }

    fn occurrences_for(&self, template_id: Uuid) -> Vec<&SessionOccurrence> {
        self.by_slot
            .range((template_id, NaiveDate::MIN)..=(template_id, NaiveDate::MAX))
            .map(|(_, occ)| occ)
            .collect()
    }
}
