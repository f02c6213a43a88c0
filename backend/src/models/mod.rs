pub mod activity;
pub mod schedule;
pub mod stats;
pub mod task;
pub mod visit;

pub use activity::{Activity, ActivityResolution, CreateActivityRequest, NewActivity, UpdateActivityRequest};
pub use schedule::{NewSchedule, Schedule, ScheduleStatus, ScheduleWithTasks, TransitionError};
pub use stats::Stats;
pub use task::{Task, TaskStatus, TaskUpdate, TaskUpdateResponse, UpdateTaskRequest};
pub use visit::{EndVisitResponse, Location, StartVisitResponse, Visit, VisitLocationRequest};

/// Trimmed text, or `None` when nothing but whitespace was supplied.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
