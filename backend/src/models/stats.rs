use serde::Serialize;
use sqlx::FromRow;

/// Dashboard counters. The `_today` counts use the server's local date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Stats {
    pub total_schedules: i64,
    pub missed_schedules: i64,
    pub upcoming_today: i64,
    pub completed_today: i64,
}
