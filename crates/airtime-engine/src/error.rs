//! Error types for schedule-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid clock value: {0}")]
    InvalidClock(String),

    #[error("Unresolved time slot: {0}")]
    UnresolvedSlot(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
