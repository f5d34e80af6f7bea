//! Recurrence expansion -- converts a template plus a date range into the
//! concrete calendar dates an occurrence should exist on.
//!
//! Wraps the `rrule` crate (v0.13): the template's cadence is rendered as an
//! RFC 5545 rule anchored at the first weekday match on or after
//! `effective_from`, so biweekly alternation always counts from the
//! template's own effective window rather than from week-start conventions.
//! All datetimes are synthesized at midnight UTC purely as a vehicle for the
//! date arithmetic; the engine's single implicit timezone never changes.

use chrono::{Datelike, NaiveDate, Utc};
use rrule::RRuleSet;

use crate::error::{Result, ScheduleError};
use crate::template::{Cadence, ScheduleTemplate};

/// Expand a template into the ordered candidate dates within
/// `[range_start, range_end]` (both inclusive).
///
/// The requested range is first clamped to the template's effective window;
/// an empty clamp produces an empty sequence, not an error. Every produced
/// date falls on the template's weekday, the sequence is strictly
/// increasing, and no date appears twice.
pub fn expand(
    template: &ScheduleTemplate,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    expand_with_exceptions(template, range_start, range_end, &[])
}

/// Identical to [`expand`] but skips the given exception dates.
///
/// This is the `Custom` cadence extension point: a deployment's
/// exception-date collaborator (holiday calendars, closure days) supplies
/// the list. The dates are rendered as EXDATE entries, so an exception that
/// never matched an instance is simply ignored. Exceptions are honored for
/// every cadence; `Custom` without exceptions behaves exactly as `Weekly`.
pub fn expand_with_exceptions(
    template: &ScheduleTemplate,
    range_start: NaiveDate,
    range_end: NaiveDate,
    exceptions: &[NaiveDate],
) -> Result<Vec<NaiveDate>> {
    // Clamp the requested range to the effective window.
    let clamp_start = range_start.max(template.effective_from);
    let clamp_end = match template.effective_to {
        Some(to) => range_end.min(to),
        None => range_end,
    };
    if clamp_start > clamp_end {
        return Ok(Vec::new());
    }

    // Anchor: first date on/after effective_from that falls on the
    // template's weekday. At most six steps forward.
    let target = template.day.to_weekday();
    let mut anchor = template.effective_from;
    while anchor.weekday() != target {
        anchor = anchor.succ_opt().ok_or_else(|| {
            ScheduleError::Expansion("effective_from is out of the supported calendar range".into())
        })?;
    }
    if anchor > clamp_end {
        return Ok(Vec::new());
    }

    let interval = match template.cadence {
        Cadence::Weekly | Cadence::Custom => 1i64,
        Cadence::Biweekly => 2i64,
    };

    // Build the iCalendar text block. UNTIL shares DTSTART's timezone; for
    // UTC it must carry the trailing "Z".
    let mut rrule_text = format!(
        "DTSTART;TZID=UTC:{}T000000\nRRULE:FREQ=WEEKLY;INTERVAL={};BYDAY={};UNTIL={}T235959Z",
        anchor.format("%Y%m%d"),
        interval,
        template.day.ical_code(),
        clamp_end.format("%Y%m%d"),
    );
    if !exceptions.is_empty() {
        let exdates: Vec<String> = exceptions
            .iter()
            .map(|d| format!("{}T000000", d.format("%Y%m%d")))
            .collect();
        rrule_text.push_str(&format!("\nEXDATE;TZID=UTC:{}", exdates.join(",")));
    }

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| ScheduleError::Expansion(format!("{}", e)))?;

    // Exact instance bound: one instance per `interval` weeks between the
    // anchor and the clamp end. Saturates at the u16 limit the rrule crate
    // takes, which covers several centuries of weekly instances.
    let weeks = (clamp_end - anchor).num_days() / (7 * interval) + 1;
    let max_count = weeks.min(u16::MAX as i64) as u16;

    let instances = rrule_set.all(max_count);

    // Instances run from the anchor, which may precede the clamped range
    // start when the caller asks for a window later than effective_from
    // (the anchor still has to define biweekly parity). Filter back down.
    let dates: Vec<NaiveDate> = instances
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .filter(|d| *d >= clamp_start && *d <= clamp_end)
        .collect();

    Ok(dates)
}
