//! # roster-engine
//!
//! Scheduling engine for recurring weekly teaching slots: conflict
//! detection, recurrence expansion, and idempotent generation of dated
//! session occurrences, gated by a manager-approval workflow.
//!
//! Administrative staff define a template (teacher, course, room, weekday,
//! time window, cadence, effective date range); the engine verifies the slot
//! collides with no other commitment, holds it pending approval where policy
//! demands, and later materializes concrete dated instances over any
//! requested range without ever duplicating one.
//!
//! All times are wall clock in one implicit organizational timezone.
//!
//! ## Modules
//!
//! - [`time`] — day-of-week + time-window value types and the overlap predicate
//! - [`conflict`] — teacher/room double-booking detection
//! - [`template`] — the recurring commitment record and its invariants
//! - [`store`] — owner of template records, conflict gate, policy, outbox
//! - [`expander`] — template + date range → candidate occurrence dates
//! - [`generator`] — idempotent occurrence creation with per-date reporting
//! - [`approval`] — the pending/approved/rejected state machine
//! - [`occurrence`] — dated session instances and their store
//! - [`event`] — outbound events emitted after state transitions
//! - [`access`] — role/capability table for the host's authorization layer
//! - [`error`] — error types
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//! use roster_engine::{
//!     generate, DayOfWeek, MemoryOccurrenceStore, NewTemplate, SchedulingPolicy,
//!     TemplateStore, TimeOfDay,
//! };
//!
//! let mut store = TemplateStore::new(SchedulingPolicy { require_approval: false });
//! let template = store.create(NewTemplate {
//!     course_id: Uuid::new_v4(),
//!     teacher_id: Uuid::new_v4(),
//!     group_id: Uuid::new_v4(),
//!     day: DayOfWeek::Monday,
//!     start: TimeOfDay::parse("09:00")?,
//!     end: TimeOfDay::parse("10:30")?,
//!     room: Some("101".into()),
//!     building: None,
//!     cadence: Default::default(),
//!     effective_from: NaiveDate::from_ymd_opt(2024, 1, 1),
//!     effective_to: None,
//!     notes: None,
//! })?;
//!
//! let mut occurrences = MemoryOccurrenceStore::new();
//! let report = generate(
//!     &store,
//!     &mut occurrences,
//!     template.id,
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//! )?;
//! assert_eq!(report.created.len(), 5); // five Mondays in January 2024
//! # Ok::<(), roster_engine::ScheduleError>(())
//! ```

pub mod access;
pub mod approval;
pub mod conflict;
pub mod error;
pub mod event;
pub mod expander;
pub mod generator;
pub mod occurrence;
pub mod store;
pub mod template;
pub mod time;

pub use access::{Capability, Role};
pub use approval::ApprovalStatus;
pub use conflict::{find_conflicts, CandidateSlot, ConflictHit, ConflictKind, ConflictReport};
pub use error::{Result, ScheduleError};
pub use event::{ScheduleEvent, ScheduleEventKind};
pub use expander::{expand, expand_with_exceptions};
pub use generator::{generate, CreatedOccurrence, FailedDate, GenerationReport};
pub use occurrence::{MemoryOccurrenceStore, OccurrenceStatus, OccurrenceStore, SessionOccurrence};
pub use store::{SchedulingPolicy, TemplateStore};
pub use template::{Cadence, NewTemplate, ScheduleTemplate, TemplatePatch};
pub use time::{DayOfWeek, TimeOfDay, TimeWindow};
