//! Demo data for a fresh database: a handful of shifts around today so the
//! dashboard has something in every bucket, including a missed visit.

use chrono::{Duration, Local, NaiveDate};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppError;
use crate::models::{NewActivity, NewSchedule, ScheduleStatus};
use crate::time::local_at;

use super::{activities, schedules};

const DEMO_TASKS: [&str; 5] = [
    "Assist with morning medication",
    "Help with personal hygiene",
    "Prepare light meal",
    "Check vital signs",
    "Light housekeeping",
];

/// Seed only when `schedules` is empty. Returns whether anything was written.
pub async fn seed_if_empty(db: &SqlitePool) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schedules")
        .fetch_one(db)
        .await?;
    if count > 0 {
        info!("data already exists, skipping seed");
        return Ok(false);
    }

    let demo = demo_schedules(Local::now().date_naive())?;
    let mut tx = db.begin().await?;
    for new in &demo {
        let schedule_id = schedules::insert_schedule(&mut *tx, new).await?;
        for activity in demo_activities() {
            activities::insert_activity(&mut *tx, schedule_id, &activity).await?;
        }
    }
    tx.commit().await?;

    info!(schedules = demo.len(), "seeded demo data");
    Ok(true)
}

fn demo_schedules(today: NaiveDate) -> Result<Vec<NewSchedule>, AppError> {
    let yesterday = today - Duration::days(1);
    let tomorrow = today + Duration::days(1);

    let shift = |client: &str, date: NaiveDate, start: u32, end: u32, lat: f64, lng: f64, status| {
        Ok::<_, AppError>(NewSchedule {
            client_name: client.to_string(),
            shift_start: local_at(date, start, 0)?,
            shift_end: local_at(date, end, 0)?,
            latitude: lat,
            longitude: lng,
            status,
            tasks: DEMO_TASKS.iter().map(|t| t.to_string()).collect(),
        })
    };

    Ok(vec![
        shift("John Smith", today, 9, 11, 40.7128, -74.0060, ScheduleStatus::Upcoming)?,
        shift("Mary Johnson", today, 14, 16, 40.7589, -73.9851, ScheduleStatus::Upcoming)?,
        shift("Robert Davis", yesterday, 10, 12, 40.6892, -74.0445, ScheduleStatus::Missed)?,
        shift("Sarah Wilson", tomorrow, 8, 10, 40.7831, -73.9712, ScheduleStatus::Upcoming)?,
    ])
}

fn demo_activities() -> Vec<NewActivity> {
    vec![
        NewActivity {
            title: "Room Cleaning".to_string(),
            description: "Clean and organize the client's living room and bedroom".to_string(),
            is_resolved: false,
            reason: None,
        },
        NewActivity {
            title: "Medication Check".to_string(),
            description: "Verify medication schedule and ensure proper dosage".to_string(),
            is_resolved: true,
            reason: None,
        },
        NewActivity {
            title: "Meal Preparation".to_string(),
            description: "Prepare healthy lunch according to dietary requirements".to_string(),
            is_resolved: false,
            reason: Some("Client was not hungry at the time".to_string()),
        },
    ]
}
