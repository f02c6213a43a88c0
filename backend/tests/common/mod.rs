#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{Duration, Local};
use sqlx::SqlitePool;
use uuid::Uuid;

use visit_tracker::config::Config;
use visit_tracker::db::{self, in_memory_pool, schedules::create_schedule, tasks::fetch_tasks_for_schedule};
use visit_tracker::models::{NewSchedule, ScheduleStatus};
use visit_tracker::time::local_at;

pub async fn pool() -> SqlitePool {
    in_memory_pool().await.expect("Failed to create database")
}

/// Migrated database in a temp file, so several connections can contend for
/// the same rows. Remove it with [`remove_db_files`].
pub async fn file_pool(max_connections: u32) -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("visit-tracker-{}.db", Uuid::new_v4()));
    let env = HashMap::from([
        ("DATABASE_URL", format!("sqlite://{}", path.display())),
        ("DB_MAX_CONNECTIONS", max_connections.to_string()),
    ]);
    let config = Config::from_lookup(|key| env.get(key).cloned()).expect("valid config");

    let pool = db::connect(&config).await.expect("Failed to open database file");
    db::migrate(&pool).await.expect("Failed to migrate");
    (pool, path)
}

pub async fn remove_db_files(pool: SqlitePool, path: PathBuf) {
    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}

/// A 9:00-11:00 shift `offset_days` from today with two pending tasks.
pub async fn schedule(pool: &SqlitePool, client: &str, offset_days: i64, status: ScheduleStatus) -> i64 {
    let date = Local::now().date_naive() + Duration::days(offset_days);
    let new = NewSchedule {
        client_name: client.to_string(),
        shift_start: local_at(date, 9, 0).expect("valid shift start"),
        shift_end: local_at(date, 11, 0).expect("valid shift end"),
        latitude: 40.7128,
        longitude: -74.0060,
        status,
        tasks: vec!["Check vital signs".to_string(), "Prepare light meal".to_string()],
    };
    create_schedule(pool, &new).await.expect("Failed to create schedule")
}

pub async fn first_task(pool: &SqlitePool, schedule_id: i64) -> i64 {
    fetch_tasks_for_schedule(pool, schedule_id)
        .await
        .expect("Failed to fetch tasks")[0]
        .id
}
