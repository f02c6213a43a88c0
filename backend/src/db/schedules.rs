use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::{NewSchedule, Schedule, ScheduleStatus, ScheduleWithTasks, Stats};
use crate::time::{self, format_db};

use super::rows::{ScheduleRow, convert, convert_all};
use super::{tasks, visits};

const SCHEDULE_COLUMNS: &str =
    "id, client_name, shift_start, shift_end, latitude, longitude, status, created_at, updated_at";

pub async fn fetch_schedules(db: &SqlitePool) -> Result<Vec<Schedule>, AppError> {
    let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules ORDER BY shift_start ASC, id ASC");
    let rows = sqlx::query_as::<_, ScheduleRow>(&sql).fetch_all(db).await?;
    convert_all(rows)
}

/// Schedules whose shift starts on `date` (`YYYY-MM-DD`).
pub async fn fetch_schedules_on(db: &SqlitePool, date: &str) -> Result<Vec<Schedule>, AppError> {
    let sql = format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE DATE(shift_start) = ?1 ORDER BY shift_start ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, ScheduleRow>(&sql)
        .bind(date)
        .fetch_all(db)
        .await?;
    convert_all(rows)
}

pub async fn find_schedule(db: &SqlitePool, id: i64) -> Result<Option<Schedule>, AppError> {
    let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ?1");
    sqlx::query_as::<_, ScheduleRow>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?
        .map(convert)
        .transpose()
}

pub async fn fetch_schedule_with_tasks(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<ScheduleWithTasks>, AppError> {
    let Some(schedule) = find_schedule(db, id).await? else {
        return Ok(None);
    };
    let tasks = tasks::fetch_tasks_for_schedule(db, id).await?;
    let visit = visits::find_visit_by_schedule(db, id).await?;

    Ok(Some(ScheduleWithTasks {
        schedule,
        tasks,
        visit,
    }))
}

pub async fn schedule_exists(db: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schedules WHERE id = ?1")
        .bind(id)
        .fetch_one(db)
        .await?;
    Ok(count > 0)
}

pub async fn status_of(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<ScheduleStatus>, AppError> {
    let status = sqlx::query_scalar::<_, ScheduleStatus>("SELECT status FROM schedules WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(status)
}

/// Move a schedule from `from` to `to` in one conditional write.
///
/// Returns `false` when no row matched, either because the schedule does not
/// exist or because its status is no longer `from`.
pub async fn transition_schedule(
    conn: &mut SqliteConnection,
    id: i64,
    from: ScheduleStatus,
    to: ScheduleStatus,
    updated_at: &str,
) -> Result<bool, AppError> {
    let affected = sqlx::query(
        r#"
        UPDATE schedules
        SET status = ?1,
            updated_at = ?2
        WHERE id = ?3 AND status = ?4
        "#,
    )
    .bind(to)
    .bind(updated_at)
    .bind(id)
    .bind(from)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok(affected == 1)
}

/// Insert a schedule together with its empty visit row and pending tasks.
/// Run inside a transaction so the three land together.
pub async fn insert_schedule(conn: &mut SqliteConnection, new: &NewSchedule) -> Result<i64, AppError> {
    let now = format_db(&time::now());

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO schedules
            (client_name, shift_start, shift_end, latitude, longitude, status,
            created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        RETURNING id
        "#,
    )
    .bind(&new.client_name)
    .bind(format_db(&new.shift_start))
    .bind(format_db(&new.shift_end))
    .bind(new.latitude)
    .bind(new.longitude)
    .bind(new.status)
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    visits::insert_empty_visit(&mut *conn, id, &now).await?;

    for description in &new.tasks {
        tasks::insert_task(&mut *conn, id, description, &now).await?;
    }

    Ok(id)
}

/// Standalone variant of [`insert_schedule`] with its own transaction.
pub async fn create_schedule(db: &SqlitePool, new: &NewSchedule) -> Result<i64, AppError> {
    let mut tx = db.begin().await?;
    let id = insert_schedule(&mut *tx, new).await?;
    tx.commit().await?;
    Ok(id)
}

pub async fn fetch_stats(db: &SqlitePool, today: &str) -> Result<Stats, AppError> {
    let stats = sqlx::query_as::<_, Stats>(
        r#"
        SELECT
            COUNT(*) AS total_schedules,
            COALESCE(SUM(CASE WHEN status = 'missed' THEN 1 ELSE 0 END), 0) AS missed_schedules,
            COALESCE(SUM(CASE WHEN status = 'upcoming' AND DATE(shift_start) = ?1 THEN 1 ELSE 0 END), 0)
                AS upcoming_today,
            COALESCE(SUM(CASE WHEN status = 'completed' AND DATE(shift_start) = ?1 THEN 1 ELSE 0 END), 0)
                AS completed_today
        FROM schedules
        "#,
    )
    .bind(today)
    .fetch_one(db)
    .await?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;
    use chrono::{Duration, Local};

    fn new_schedule(name: &str, offset_days: i64, status: ScheduleStatus) -> NewSchedule {
        let date = Local::now().date_naive() + Duration::days(offset_days);
        NewSchedule {
            client_name: name.to_string(),
            shift_start: time::local_at(date, 9, 0).unwrap(),
            shift_end: time::local_at(date, 11, 0).unwrap(),
            latitude: 40.7128,
            longitude: -74.0060,
            status,
            tasks: vec!["Check vital signs".to_string(), "Prepare light meal".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_schedule_creates_visit_and_tasks() {
        let pool = in_memory_pool().await.expect("pool");

        let id = create_schedule(&pool, &new_schedule("John Smith", 0, ScheduleStatus::Upcoming))
            .await
            .expect("Failed to create schedule");

        let detail = fetch_schedule_with_tasks(&pool, id)
            .await
            .expect("Failed to fetch schedule")
            .expect("Schedule not found");

        assert_eq!(detail.schedule.client_name, "John Smith");
        assert_eq!(detail.schedule.status, ScheduleStatus::Upcoming);
        assert_eq!(detail.tasks.len(), 2);
        assert_eq!(detail.tasks[0].description, "Check vital signs");
        let visit = detail.visit.expect("visit row created with schedule");
        assert!(visit.start_time.is_none());
        assert!(visit.end_lat.is_none());
    }

    #[tokio::test]
    async fn test_fetch_schedule_with_tasks_unknown_id() {
        let pool = in_memory_pool().await.expect("pool");
        assert!(fetch_schedule_with_tasks(&pool, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_today_filter_and_ordering() {
        let pool = in_memory_pool().await.expect("pool");
        create_schedule(&pool, &new_schedule("Tomorrow", 1, ScheduleStatus::Upcoming)).await.unwrap();
        create_schedule(&pool, &new_schedule("Today", 0, ScheduleStatus::Upcoming)).await.unwrap();
        create_schedule(&pool, &new_schedule("Yesterday", -1, ScheduleStatus::Missed)).await.unwrap();

        let all = fetch_schedules(&pool).await.unwrap();
        let names: Vec<_> = all.iter().map(|s| s.client_name.as_str()).collect();
        assert_eq!(names, ["Yesterday", "Today", "Tomorrow"]);

        let today = fetch_schedules_on(&pool, &time::today()).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].client_name, "Today");
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let pool = in_memory_pool().await.expect("pool");
        create_schedule(&pool, &new_schedule("Missed", -1, ScheduleStatus::Missed)).await.unwrap();
        create_schedule(&pool, &new_schedule("Up 1", 0, ScheduleStatus::Upcoming)).await.unwrap();
        create_schedule(&pool, &new_schedule("Up 2", 0, ScheduleStatus::Upcoming)).await.unwrap();
        create_schedule(&pool, &new_schedule("Done", 0, ScheduleStatus::Completed)).await.unwrap();

        let stats = fetch_stats(&pool, &time::today()).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                total_schedules: 4,
                missed_schedules: 1,
                upcoming_today: 2,
                completed_today: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_on_empty_store() {
        let pool = in_memory_pool().await.expect("pool");
        let stats = fetch_stats(&pool, &time::today()).await.unwrap();
        assert_eq!(stats.total_schedules, 0);
        assert_eq!(stats.completed_today, 0);
    }

    #[tokio::test]
    async fn test_transition_is_conditional() {
        let pool = in_memory_pool().await.expect("pool");
        let id = create_schedule(&pool, &new_schedule("CAS", 0, ScheduleStatus::Upcoming)).await.unwrap();
        let now = format_db(&time::now());

        let mut conn = pool.acquire().await.unwrap();
        assert!(
            transition_schedule(&mut conn, id, ScheduleStatus::Upcoming, ScheduleStatus::InProgress, &now)
                .await
                .unwrap()
        );
        assert!(
            !transition_schedule(&mut conn, id, ScheduleStatus::Upcoming, ScheduleStatus::InProgress, &now)
                .await
                .unwrap()
        );
        assert_eq!(status_of(&mut conn, id).await.unwrap(), Some(ScheduleStatus::InProgress));
        assert_eq!(status_of(&mut conn, id + 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_is_reported() {
        let pool = in_memory_pool().await.expect("pool");
        let id = create_schedule(&pool, &new_schedule("Broken", 0, ScheduleStatus::Upcoming)).await.unwrap();
        sqlx::query("UPDATE schedules SET shift_start = 'not a time' WHERE id = ?1")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();

        let err = find_schedule(&pool, id).await.unwrap_err();
        assert!(matches!(err, AppError::Timestamp(_)));
    }
}
