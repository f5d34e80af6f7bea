//! Error types for roster-engine operations.

use thiserror::Error;

use crate::conflict::ConflictHit;

#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Malformed or contradictory input (bad time format, end before start,
    /// effective-to before effective-from, missing required fields).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The candidate slot double-books a teacher or a room. Carries every
    /// conflicting template so the caller can resolve the collision.
    #[error("Schedule conflict with {} existing template(s)", .0.len())]
    Conflict(Vec<ConflictHit>),

    /// Unknown template or occurrence id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The record exists but is in a state that forbids the operation
    /// (e.g. generating from an inactive template, approving twice).
    #[error("Invalid state: {0}")]
    State(String),

    /// Recurrence expansion failed (the assembled rule did not parse or the
    /// calendar arithmetic left the supported date range).
    #[error("Expansion error: {0}")]
    Expansion(String),

    /// A storage-collaborator failure. Inside occurrence generation these are
    /// caught per date and reported, never propagated past the batch.
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
