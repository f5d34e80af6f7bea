//! Tests for the time-window model and the conflict detector.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use roster_engine::{
    find_conflicts, ApprovalStatus, Cadence, CandidateSlot, ConflictKind, DayOfWeek,
    ScheduleTemplate, TimeOfDay, TimeWindow,
};

fn t(s: &str) -> TimeOfDay {
    TimeOfDay::parse(s).expect("valid HH:MM literal")
}

fn window(day: DayOfWeek, start: &str, end: &str) -> TimeWindow {
    TimeWindow::new(day, t(start), t(end))
}

/// Helper to build an approved, active template occupying a slot.
fn template(
    teacher_id: Uuid,
    day: DayOfWeek,
    start: &str,
    end: &str,
    room: Option<&str>,
) -> ScheduleTemplate {
    ScheduleTemplate {
        id: Uuid::new_v4(),
        course_id: Uuid::new_v4(),
        teacher_id,
        group_id: Uuid::new_v4(),
        room: room.map(str::to_string),
        building: None,
        day,
        start: t(start),
        end: t(end),
        cadence: Cadence::Weekly,
        effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        effective_to: None,
        active: true,
        approval: ApprovalStatus::Approved,
        approved_by: Some(Uuid::new_v4()),
        approval_date: Some(Utc::now()),
        approval_notes: None,
        deactivated: false,
        notes: None,
        created_at: Utc::now(),
    }
}

fn slot(teacher_id: Uuid, day: DayOfWeek, start: &str, end: &str, room: Option<&str>) -> CandidateSlot {
    CandidateSlot {
        teacher_id,
        room: room.map(str::to_string),
        window: window(day, start, end),
    }
}

// ---------------------------------------------------------------------------
// Time-window model
// ---------------------------------------------------------------------------

#[test]
fn overlap_is_symmetric() {
    let a = window(DayOfWeek::Monday, "09:00", "10:30");
    let b = window(DayOfWeek::Monday, "10:00", "11:00");

    assert!(a.overlaps(&b));
    assert_eq!(a.overlaps(&b), b.overlaps(&a), "overlap must be symmetric");
}

#[test]
fn adjacent_windows_never_overlap() {
    // One ends exactly when the other starts: strict inequality fails.
    let a = window(DayOfWeek::Monday, "09:00", "10:30");
    let b = window(DayOfWeek::Monday, "10:30", "11:00");

    assert!(!a.overlaps(&b), "back-to-back windows are not a conflict");
    assert!(!b.overlaps(&a));
}

#[test]
fn same_times_different_day_no_overlap() {
    let a = window(DayOfWeek::Monday, "09:00", "10:00");
    let b = window(DayOfWeek::Tuesday, "09:00", "10:00");

    assert!(!a.overlaps(&b));
}

#[test]
fn contained_window_overlaps_with_inner_duration() {
    let outer = window(DayOfWeek::Friday, "09:00", "12:00");
    let inner = window(DayOfWeek::Friday, "10:00", "11:00");

    assert!(outer.overlaps(&inner));
    assert_eq!(outer.overlap_minutes(&inner), 60);
}

#[test]
fn time_of_day_parses_and_formats() {
    let nine = TimeOfDay::parse("09:00").unwrap();
    assert_eq!(nine.minutes(), 540);
    assert_eq!(nine.to_string(), "09:00");

    assert!(TimeOfDay::parse("24:00").is_err());
    assert!(TimeOfDay::parse("09:60").is_err());
    assert!(TimeOfDay::parse("9:00").is_err(), "hours must be zero-padded");
    assert!(TimeOfDay::parse("0900").is_err());
    assert!(TimeOfDay::parse("").is_err());
}

// ---------------------------------------------------------------------------
// Conflict detector: the worked example
// ---------------------------------------------------------------------------

#[test]
fn same_teacher_overlapping_time_is_a_teacher_conflict() {
    // Template A: teacher X, Monday 09:00-10:30, room 101.
    // Candidate B: teacher X, Monday 10:00-11:00, room 102.
    // 10:00 < 10:30 and 09:00 < 11:00, so they overlap.
    let teacher_x = Uuid::new_v4();
    let a = template(teacher_x, DayOfWeek::Monday, "09:00", "10:30", Some("101"));
    let b = slot(teacher_x, DayOfWeek::Monday, "10:00", "11:00", Some("102"));

    let report = find_conflicts(&b, [&a], None);

    assert_eq!(report.teacher.len(), 1, "should report one teacher conflict");
    assert!(report.room.is_empty(), "rooms differ, no room conflict");

    let hit = &report.teacher[0];
    assert_eq!(hit.template_id, a.id);
    assert_eq!(hit.kind, ConflictKind::Teacher);
    assert_eq!(hit.day, DayOfWeek::Monday);
    assert_eq!(hit.start, t("09:00"));
    assert_eq!(hit.end, t("10:30"));
    assert_eq!(hit.overlap_minutes, 30, "overlap is 10:00-10:30");
}

#[test]
fn back_to_back_same_room_is_not_a_conflict() {
    // Template A: teacher X, Monday 09:00-10:30, room 101.
    // Candidate C: teacher Y, Monday 10:30-11:30, room 101.
    let a = template(Uuid::new_v4(), DayOfWeek::Monday, "09:00", "10:30", Some("101"));
    let c = slot(Uuid::new_v4(), DayOfWeek::Monday, "10:30", "11:30", Some("101"));

    let report = find_conflicts(&c, [&a], None);

    assert!(report.is_empty(), "boundary-touching windows never conflict");
}

#[test]
fn same_room_overlapping_time_is_a_room_conflict() {
    let a = template(Uuid::new_v4(), DayOfWeek::Wednesday, "13:00", "15:00", Some("204"));
    let candidate = slot(Uuid::new_v4(), DayOfWeek::Wednesday, "14:00", "16:00", Some("204"));

    let report = find_conflicts(&candidate, [&a], None);

    assert!(report.teacher.is_empty());
    assert_eq!(report.room.len(), 1);
    assert_eq!(report.room[0].kind, ConflictKind::Room);
    assert_eq!(report.room[0].overlap_minutes, 60);
}

#[test]
fn same_teacher_and_room_reported_in_both_classes() {
    let teacher_x = Uuid::new_v4();
    let a = template(teacher_x, DayOfWeek::Monday, "09:00", "11:00", Some("101"));
    let candidate = slot(teacher_x, DayOfWeek::Monday, "10:00", "12:00", Some("101"));

    let report = find_conflicts(&candidate, [&a], None);

    assert_eq!(report.teacher.len(), 1);
    assert_eq!(report.room.len(), 1);
    assert_eq!(report.total(), 2);
    assert_eq!(
        report.teacher[0].template_id, report.room[0].template_id,
        "one template can collide on both resources at once"
    );
}

#[test]
fn different_day_same_slot_no_conflict() {
    let teacher_x = Uuid::new_v4();
    let a = template(teacher_x, DayOfWeek::Monday, "09:00", "10:30", Some("101"));
    let candidate = slot(teacher_x, DayOfWeek::Thursday, "09:00", "10:30", Some("101"));

    let report = find_conflicts(&candidate, [&a], None);

    assert!(report.is_empty());
}

#[test]
fn roomless_templates_never_room_conflict() {
    let a = template(Uuid::new_v4(), DayOfWeek::Monday, "09:00", "10:00", None);
    let candidate = slot(Uuid::new_v4(), DayOfWeek::Monday, "09:30", "10:30", None);

    let report = find_conflicts(&candidate, [&a], None);

    assert!(report.is_empty(), "no room on either side, nothing to collide on");
}

#[test]
fn empty_room_string_never_room_conflicts() {
    let a = template(Uuid::new_v4(), DayOfWeek::Monday, "09:00", "10:00", Some(""));
    let candidate = slot(Uuid::new_v4(), DayOfWeek::Monday, "09:30", "10:30", Some(""));

    let report = find_conflicts(&candidate, [&a], None);

    assert!(report.is_empty());
}

#[test]
fn exclude_skips_the_template_being_edited() {
    let teacher_x = Uuid::new_v4();
    let a = template(teacher_x, DayOfWeek::Monday, "09:00", "10:30", Some("101"));
    // Re-checking A's own slot while editing it: excluding A finds nothing.
    let own_slot = slot(teacher_x, DayOfWeek::Monday, "09:00", "10:30", Some("101"));

    let with_self = find_conflicts(&own_slot, [&a], None);
    let without_self = find_conflicts(&own_slot, [&a], Some(a.id));

    assert_eq!(with_self.total(), 2, "against itself: teacher and room hit");
    assert!(without_self.is_empty(), "excluded template is skipped");
}

#[test]
fn multiple_existing_templates_all_reported() {
    let teacher_x = Uuid::new_v4();
    let a = template(teacher_x, DayOfWeek::Monday, "08:00", "09:30", None);
    let b = template(teacher_x, DayOfWeek::Monday, "09:00", "10:00", None);
    let c = template(teacher_x, DayOfWeek::Monday, "11:00", "12:00", None);

    let candidate = slot(teacher_x, DayOfWeek::Monday, "09:00", "11:00", None);
    let report = find_conflicts(&candidate, [&a, &b, &c], None);

    assert_eq!(report.teacher.len(), 2, "c is adjacent, a and b overlap");
    let ids: Vec<Uuid> = report.teacher.iter().map(|h| h.template_id).collect();
    assert!(ids.contains(&a.id));
    assert!(ids.contains(&b.id));
}
