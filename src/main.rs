#[macro_use]
extern crate rocket;

mod api;
mod clock;
mod db;
mod env;
mod error;
mod models;
mod notify;
mod status;
mod telemetry;
#[cfg(test)]
mod test;
mod validation;

use std::sync::Arc;

use api::{
    api_create_schedule, api_crm_webhook, api_embed_code, api_get_progress, api_get_schedule,
    api_get_schedule_status, api_send_sms, api_update_progress, health,
};
use notify::{LogNotifier, SharedNotifier};
use rocket::{Build, Rocket};
use sqlx::SqlitePool;
use telemetry::{TelemetryFairing, init_tracing};
use tracing::info;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[launch]
async fn rocket() -> _ {
    if let Err(e) = env::load_environment() {
        eprintln!("Failed to load environment files: {}", e);
    }

    init_tracing();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    let pool = SqlitePool::connect(&database_url)
        .await
        .expect("Failed to connect to SQLite database");

    info!("Running database migrations...");
    match MIGRATOR.run(&pool).await {
        Ok(_) => info!("Migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run migrations: {}", e);
            panic!("Database migration failed: {}", e);
        }
    }

    init_rocket(pool, Arc::new(LogNotifier)).await
}

pub async fn init_rocket(pool: SqlitePool, notifier: SharedNotifier) -> Rocket<Build> {
    info!("Starting daily planner");

    rocket::build()
        .manage(pool)
        .manage(notifier)
        .mount(
            "/api",
            routes![
                api_create_schedule,
                api_get_schedule,
                api_update_progress,
                api_get_progress,
                api_get_schedule_status,
                api_crm_webhook,
                api_send_sms,
                api_embed_code,
                health,
            ],
        )
        .attach(TelemetryFairing)
}
