//! Idempotent occurrence generation.
//!
//! Expands a template over a date range and creates only the instances that
//! do not already exist. Processing is per-date and partial-success: one
//! date's storage failure is recorded in the report and the batch carries on,
//! the same contract the bulk attendance collaborator follows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, ScheduleError};
use crate::expander::expand;
use crate::occurrence::{OccurrenceStore, SessionOccurrence};
use crate::store::TemplateStore;

/// A newly created occurrence, by id and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedOccurrence {
    pub id: Uuid,
    pub date: NaiveDate,
}

/// A candidate date whose creation failed. Safe to retry: a later run will
/// simply attempt the date again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedDate {
    pub date: NaiveDate,
    pub reason: String,
}

/// Per-date outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub template_id: Uuid,
    /// Occurrences created by this run.
    pub created: Vec<CreatedOccurrence>,
    /// Candidate dates that already had an occurrence and were left alone.
    pub skipped: Vec<NaiveDate>,
    /// Candidate dates whose storage write failed.
    pub failed: Vec<FailedDate>,
    /// Total candidate dates the expansion produced.
    pub candidates: usize,
}

/// Materialize occurrences for `template_id` over `[range_start, range_end]`.
///
/// The template must exist and be active. Re-running over an overlapping
/// range never duplicates or overwrites existing occurrences: dates that
/// already have one are reported as skipped. Occurrences snapshot the
/// template's current course/teacher/room/time fields.
///
/// # Errors
/// [`ScheduleError::NotFound`] for an unknown template,
/// [`ScheduleError::State`] for an inactive one, and
/// [`ScheduleError::Validation`] for an inverted range (the caller boundary
/// enforces ordering; this is only a defensive check). Per-date storage
/// failures are reported inside the result, never returned as an error.
pub fn generate(
    templates: &TemplateStore,
    occurrences: &mut dyn OccurrenceStore,
    template_id: Uuid,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<GenerationReport> {
    let template = templates.get(template_id)?;
    if template.deactivated || !template.active {
        return Err(ScheduleError::State(format!(
            "template {} is not active",
            template_id
        )));
    }
    if range_end < range_start {
        return Err(ScheduleError::Validation(format!(
            "range end {} is before range start {}",
            range_end, range_start
        )));
    }

    let dates = expand(template, range_start, range_end)?;

    let mut report = GenerationReport {
        template_id,
        created: Vec::new(),
        skipped: Vec::new(),
        failed: Vec::new(),
        candidates: dates.len(),
    };

    for date in dates {
        if occurrences.exists(template_id, date) {
            report.skipped.push(date);
            continue;
        }
        let occurrence = SessionOccurrence::from_template(template, date);
        let id = occurrence.id;
        match occurrences.insert(occurrence) {
            Ok(()) => report.created.push(CreatedOccurrence { id, date }),
            Err(e) => report.failed.push(FailedDate {
                date,
                reason: e.to_string(),
            }),
        }
    }

    info!(
        template_id = %template_id,
        created = report.created.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "occurrence generation finished"
    );
    Ok(report)
}
