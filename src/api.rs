use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{Pool, Sqlite};
use std::collections::HashSet;
use validator::{Validate, ValidationError};

use crate::clock::{MINUTES_PER_DAY, minutes_since_midnight, parse_clock_time, with_computed_times};
use crate::db::{create_schedule, get_schedule, list_progress, upsert_progress};
use crate::error::AppError;
use crate::models::{
    Activity, EVENT_ID_LEN, NewSchedule, SCHEDULE_ID_LEN, Schedule, ScheduleProgress,
    SelfCareResponse, random_id,
};
use crate::notify::SharedNotifier;
use crate::status::{TaskStatusEntry, summarize};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse};

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-\(\)]{10,}$").expect("phone pattern"));

fn public_base_url() -> String {
    std::env::var("PLANNER_BASE_URL").unwrap_or_else(|_| "localhost:5000".to_string())
}

fn planner_url(schedule_id: &str) -> String {
    format!("https://{}/schedule/{}", public_base_url(), schedule_id)
}

fn validate_clock_time(value: &str) -> Result<(), ValidationError> {
    parse_clock_time(value).map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("clock_time");
        error.message = Some("Invalid start time".into());
        error
    })
}

#[derive(Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub self_care_responses: SelfCareResponse,
    #[validate(custom(function = validate_clock_time))]
    pub start_time: String,
    pub total_duration: u32,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number format"))]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub notifications_enabled: bool,
}

#[post("/schedules", data = "<schedule>")]
pub async fn api_create_schedule(
    schedule: Json<CreateScheduleRequest>,
    db: &State<Pool<Sqlite>>,
    notifier: &State<SharedNotifier>,
) -> Result<Json<Schedule>, Custom<Json<ValidationResponse>>> {
    let validated = schedule.validate_custom()?;

    let mut seen = HashSet::new();
    if let Some(dup) = validated.activities.iter().find(|a| !seen.insert(a.id.as_str())) {
        return Err(Custom(
            Status::UnprocessableEntity,
            Json(ValidationResponse::with_error(
                "activities",
                &format!("Duplicate activity id: {}", dup.id),
            )),
        ));
    }

    if let Some(bad) = validated
        .activities
        .iter()
        .find(|a| a.duration_minutes > MINUTES_PER_DAY)
    {
        return Err(Custom(
            Status::UnprocessableEntity,
            Json(ValidationResponse::with_error(
                "activities",
                &format!("Activity {} duration exceeds one day", bad.id),
            )),
        ));
    }

    // Overflow collapses to None, which can never match the declared total.
    let duration_sum = validated
        .activities
        .iter()
        .try_fold(0u32, |sum, a| sum.checked_add(a.duration_minutes));
    if duration_sum != Some(validated.total_duration) {
        return Err(Custom(
            Status::UnprocessableEntity,
            Json(ValidationResponse::with_error(
                "totalDuration",
                "totalDuration must equal the sum of activity durations",
            )),
        ));
    }

    // The client sends a draft with locally computed times; recomputing from
    // the same start time is deterministic, so the stored times always agree
    // with the schedule's own arithmetic.
    let activities = with_computed_times(&validated.start_time, validated.activities.clone())
        .map_err(AppError::from)
        .validate_custom()?;

    let new = NewSchedule {
        schedule_id: random_id(SCHEDULE_ID_LEN),
        activities,
        self_care_responses: validated.self_care_responses.clone(),
        start_time: validated.start_time.clone(),
        total_duration: validated.total_duration,
        first_name: validated.first_name.clone(),
        email: validated.email.clone(),
        phone_number: validated.phone_number.clone(),
        notifications_enabled: validated.notifications_enabled,
    };

    let stored = create_schedule(db, &new).await.validate_custom()?;

    notifier.notify(
        "schedule_created",
        json!({
            "scheduleId": stored.schedule_id,
            "firstName": stored.first_name,
            "email": stored.email,
            "phone": stored.phone_number,
            "notificationsEnabled": stored.notifications_enabled,
            "plannerUrl": planner_url(&stored.schedule_id),
        }),
    );

    Ok(Json(stored))
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleWithProgress {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub progress: Vec<ScheduleProgress>,
}

#[get("/schedules/<schedule_id>")]
pub async fn api_get_schedule(
    schedule_id: &str,
    db: &State<Pool<Sqlite>>,
    notifier: &State<SharedNotifier>,
) -> Result<Json<ScheduleWithProgress>, Status> {
    let schedule = get_schedule(db, schedule_id).await?;
    let progress = list_progress(db, schedule_id).await?;

    // Valid link access feeds the follow-up email automation.
    notifier.notify(
        "schedule_accessed",
        json!({
            "scheduleId": schedule.schedule_id,
            "firstName": schedule.first_name,
            "email": schedule.email,
            "phone": schedule.phone_number,
            "plannerUrl": planner_url(&schedule.schedule_id),
        }),
    );

    Ok(Json(ScheduleWithProgress { schedule, progress }))
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub task_id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[post("/schedules/<schedule_id>/progress", data = "<request>")]
pub async fn api_update_progress(
    schedule_id: &str,
    request: Json<UpdateProgressRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<ScheduleProgress>, Status> {
    // Unknown ids get a 404 before any row is written.
    get_schedule(db, schedule_id).await?;

    let progress = upsert_progress(
        db,
        schedule_id,
        &request.task_id,
        request.completed,
        request.completed_at,
    )
    .await?;

    Ok(Json(progress))
}

#[get("/schedules/<schedule_id>/progress")]
pub async fn api_get_progress(
    schedule_id: &str,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<ScheduleProgress>>, Status> {
    let progress = list_progress(db, schedule_id).await?;

    Ok(Json(progress))
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatusResponse {
    pub schedule_id: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub behind_tasks: usize,
    pub is_behind: bool,
    pub next_task: Option<Activity>,
    pub tasks: Vec<TaskStatusEntry>,
}

#[get("/schedules/<schedule_id>/status")]
pub async fn api_get_schedule_status(
    schedule_id: &str,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<ScheduleStatusResponse>, Status> {
    let schedule = get_schedule(db, schedule_id).await?;
    let progress = list_progress(db, schedule_id).await?;

    // Schedules carry naive wall-clock strings, so "now" is the server's
    // local clock reduced the same way.
    let now = minutes_since_midnight(chrono::Local::now().time());
    let summary = summarize(&schedule.activities, &progress, now);

    Ok(Json(ScheduleStatusResponse {
        schedule_id: schedule.schedule_id,
        total_tasks: summary.total_tasks,
        completed_tasks: summary.completed_tasks,
        behind_tasks: summary.behind_tasks,
        is_behind: summary.is_behind(),
        next_task: summary.next_task,
        tasks: summary.tasks,
    }))
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CrmWebhookRequest {
    pub schedule_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub action: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmWebhookResponse {
    pub success: bool,
    pub webhook_id: String,
}

#[post("/crm/webhook", data = "<request>")]
pub async fn api_crm_webhook(
    request: Json<CrmWebhookRequest>,
    notifier: &State<SharedNotifier>,
) -> Json<CrmWebhookResponse> {
    let first_name = request.first_name.clone().or_else(|| request.name.clone());
    let daily_encouragement = request.action.contains("daily_texts");

    notifier.notify(
        &request.action,
        json!({
            "firstName": first_name,
            "email": request.email,
            "phone": request.phone,
            "scheduleId": request.schedule_id,
            "dailyEncouragement": daily_encouragement,
            "plannerUrl": planner_url(&request.schedule_id),
            "timestamp": Utc::now().to_rfc3339(),
        }),
    );

    Json(CrmWebhookResponse {
        success: true,
        webhook_id: random_id(EVENT_ID_LEN),
    })
}

#[derive(Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsRequest {
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number format"))]
    pub phone: String,
    pub message: String,
    #[serde(default)]
    pub schedule_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsResponse {
    pub success: bool,
    pub message_id: String,
    pub phone: String,
    pub message: String,
    pub timestamp: String,
}

#[post("/sms/send", data = "<request>")]
pub async fn api_send_sms(
    request: Json<SendSmsRequest>,
    notifier: &State<SharedNotifier>,
) -> Result<Json<SendSmsResponse>, Custom<Json<ValidationResponse>>> {
    let validated = request.validate_custom()?;

    notifier.notify(
        "sms_requested",
        json!({
            "phone": validated.phone,
            "message": validated.message,
            "scheduleId": validated.schedule_id,
        }),
    );

    Ok(Json(SendSmsResponse {
        success: true,
        message_id: random_id(EVENT_ID_LEN),
        phone: validated.phone,
        message: validated.message,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedCodeResponse {
    pub embed_code: String,
    pub embed_url: String,
}

#[get("/embed-code")]
pub fn api_embed_code() -> Json<EmbedCodeResponse> {
    let embed_url = format!("https://{}/planner", public_base_url());
    let embed_code = format!(
        r#"<iframe src="{}" width="100%" height="800" frameborder="0" style="border-radius: 8px; box-shadow: 0 4px 6px rgba(0,0,0,0.1);"></iframe>"#,
        embed_url
    );

    Json(EmbedCodeResponse {
        embed_code,
        embed_url,
    })
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}
