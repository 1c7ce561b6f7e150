use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{DbSchedule, DbScheduleProgress, NewSchedule, Schedule, ScheduleProgress};

#[instrument(skip(pool, new), fields(schedule_id = %new.schedule_id))]
pub async fn create_schedule(pool: &Pool<Sqlite>, new: &NewSchedule) -> Result<Schedule, AppError> {
    info!("Creating schedule");

    let activities = serde_json::to_string(&new.activities)?;
    let self_care_responses = serde_json::to_string(&new.self_care_responses)?;
    let now = Utc::now().naive_utc();
    let total_duration = i64::from(new.total_duration);

    sqlx::query(
        "INSERT INTO schedules
         (schedule_id, activities, self_care_responses, start_time, total_duration,
          first_name, email, phone_number, notifications_enabled, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&new.schedule_id)
    .bind(activities)
    .bind(self_care_responses)
    .bind(&new.start_time)
    .bind(total_duration)
    .bind(&new.first_name)
    .bind(&new.email)
    .bind(&new.phone_number)
    .bind(new.notifications_enabled)
    .bind(now)
    .execute(pool)
    .await?;

    get_schedule(pool, &new.schedule_id).await
}

#[instrument(skip(pool))]
pub async fn get_schedule(pool: &Pool<Sqlite>, schedule_id: &str) -> Result<Schedule, AppError> {
    info!("Fetching schedule");

    let row = sqlx::query_as::<_, DbSchedule>("SELECT * FROM schedules WHERE schedule_id = ?")
        .bind(schedule_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(schedule) => Ok(Schedule::from(schedule)),
        _ => Err(AppError::NotFound(format!(
            "Schedule {} not found",
            schedule_id
        ))),
    }
}

/// Creates or updates the single progress row for (schedule_id, task_id).
/// The completion timestamp is set only while the task is completed; clearing
/// the flag clears it. Uniqueness of the pair is enforced here by lookup,
/// not by a database constraint.
#[instrument(skip(pool))]
pub async fn upsert_progress(
    pool: &Pool<Sqlite>,
    schedule_id: &str,
    task_id: &str,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
) -> Result<ScheduleProgress, AppError> {
    info!("Upserting schedule progress");

    let now = Utc::now().naive_utc();
    let completed_at = if completed {
        Some(completed_at.unwrap_or_else(Utc::now).naive_utc())
    } else {
        None
    };

    let existing = sqlx::query_as::<_, DbScheduleProgress>(
        "SELECT * FROM schedule_progress WHERE schedule_id = ? AND task_id = ?",
    )
    .bind(schedule_id)
    .bind(task_id)
    .fetch_optional(pool)
    .await?;

    let id = match existing {
        Some(row) => {
            let id = row.id.unwrap_or_default();
            sqlx::query(
                "UPDATE schedule_progress
                 SET completed = ?, completed_at = ?, updated_at = ?
                 WHERE id = ?",
            )
            .bind(completed)
            .bind(completed_at)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
            id
        }
        None => {
            let res = sqlx::query(
                "INSERT INTO schedule_progress
                 (schedule_id, task_id, completed, completed_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(schedule_id)
            .bind(task_id)
            .bind(completed)
            .bind(completed_at)
            .bind(now)
            .execute(pool)
            .await?;
            res.last_insert_rowid()
        }
    };

    let row = sqlx::query_as::<_, DbScheduleProgress>(
        "SELECT * FROM schedule_progress WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(ScheduleProgress::from(row))
}

#[instrument(skip(pool))]
pub async fn list_progress(
    pool: &Pool<Sqlite>,
    schedule_id: &str,
) -> Result<Vec<ScheduleProgress>, AppError> {
    info!("Listing schedule progress");

    let rows = sqlx::query_as::<_, DbScheduleProgress>(
        "SELECT * FROM schedule_progress WHERE schedule_id = ?",
    )
    .bind(schedule_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ScheduleProgress::from).collect())
}
