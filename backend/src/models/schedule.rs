use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::task::Task;
use super::visit::Visit;

/// Lifecycle of a shift. `Missed` is never reached through the API; it is
/// written by seeding or out-of-band tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Upcoming,
    InProgress,
    Completed,
    Missed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Visit already started")]
    AlreadyStarted,

    #[error("Visit already completed")]
    AlreadyCompleted,

    #[error("Visit was missed")]
    Missed,

    #[error("Visit not started yet or already completed")]
    NotInProgress,

    #[error("Visit not properly started")]
    NotStarted,
}

impl ScheduleStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Missed => "missed",
        }
    }

    /// Status after clocking in.
    pub fn start(self) -> Result<Self, TransitionError> {
        match self {
            Self::Upcoming => Ok(Self::InProgress),
            Self::InProgress => Err(TransitionError::AlreadyStarted),
            Self::Completed => Err(TransitionError::AlreadyCompleted),
            Self::Missed => Err(TransitionError::Missed),
        }
    }

    /// Status after clocking out.
    pub fn end(self) -> Result<Self, TransitionError> {
        match self {
            Self::InProgress => Ok(Self::Completed),
            Self::Upcoming | Self::Completed | Self::Missed => Err(TransitionError::NotInProgress),
        }
    }

    /// Tasks are editable only while the caregiver is on site.
    pub const fn allows_task_updates(self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub id: i64,
    pub client_name: String,
    pub shift_start: DateTime<Local>,
    pub shift_end: DateTime<Local>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

/// Schedule detail view: the schedule, its tasks in creation order and its
/// visit log when one exists.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleWithTasks {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub tasks: Vec<Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit: Option<Visit>,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub client_name: String,
    pub shift_start: DateTime<Local>,
    pub shift_end: DateTime<Local>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ScheduleStatus,
    pub tasks: Vec<String>,
}
