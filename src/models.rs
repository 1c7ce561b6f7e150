use chrono::{DateTime, NaiveDateTime, Utc};
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};

pub const SCHEDULE_ID_LEN: usize = 12;
pub const EVENT_ID_LEN: usize = 8;

pub fn random_id(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// One scheduled task. Ordering within a schedule is significant: the stored
/// sequence is the sequence the user picked, and it drives the computed
/// times. `start_time`/`end_time` are present only after generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Self-care answers from the wizard. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfCareResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub me_time_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wellness: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub schedule_id: String,
    pub activities: Vec<Activity>,
    pub self_care_responses: SelfCareResponse,
    pub start_time: String,
    pub total_duration: u32,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Creation payload for the store. The capability id is assigned by the
/// caller before persistence.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub schedule_id: String,
    pub activities: Vec<Activity>,
    pub self_care_responses: SelfCareResponse,
    pub start_time: String,
    pub total_duration: u32,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub notifications_enabled: bool,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbSchedule {
    pub id: Option<i64>,
    pub schedule_id: Option<String>,
    pub activities: Option<String>,
    pub self_care_responses: Option<String>,
    pub start_time: Option<String>,
    pub total_duration: Option<i64>,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub created_at: Option<NaiveDateTime>,
}

impl From<DbSchedule> for Schedule {
    fn from(db: DbSchedule) -> Self {
        Self {
            id: db.id.unwrap_or_default(),
            schedule_id: db.schedule_id.unwrap_or_default(),
            activities: db
                .activities
                .as_deref()
                .and_then(|json| serde_json::from_str(json).ok())
                .unwrap_or_default(),
            self_care_responses: db
                .self_care_responses
                .as_deref()
                .and_then(|json| serde_json::from_str(json).ok())
                .unwrap_or_default(),
            start_time: db.start_time.unwrap_or_default(),
            total_duration: u32::try_from(db.total_duration.unwrap_or_default())
                .unwrap_or_default(),
            first_name: db.first_name,
            email: db.email,
            phone_number: db.phone_number,
            notifications_enabled: db.notifications_enabled.unwrap_or_default(),
            created_at: db
                .created_at
                .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
                .unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleProgress {
    pub id: i64,
    pub schedule_id: String,
    pub task_id: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone, Default)]
pub struct DbScheduleProgress {
    pub id: Option<i64>,
    pub schedule_id: Option<String>,
    pub task_id: Option<String>,
    pub completed: Option<bool>,
    pub completed_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<DbScheduleProgress> for ScheduleProgress {
    fn from(db: DbScheduleProgress) -> Self {
        Self {
            id: db.id.unwrap_or_default(),
            schedule_id: db.schedule_id.unwrap_or_default(),
            task_id: db.task_id.unwrap_or_default(),
            completed: db.completed.unwrap_or_default(),
            completed_at: db
                .completed_at
                .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc)),
            updated_at: db
                .updated_at
                .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
                .unwrap_or_else(Utc::now),
        }
    }
}
