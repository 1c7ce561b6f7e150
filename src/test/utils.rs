#[cfg(test)]
pub mod test_utils {
    use crate::MIGRATOR;
    use crate::clock::with_computed_times;
    use crate::db::{create_schedule, upsert_progress};
    use crate::error::AppError;
    use crate::init_rocket;
    use crate::models::{Activity, NewSchedule, SelfCareResponse};
    use crate::notify::RecordingNotifier;
    use rocket::local::asynchronous::Client;
    use sqlx::{Pool, Sqlite, SqlitePool};
    use std::sync::{Arc, Once};

    static INIT: Once = Once::new();

    pub fn activity(id: &str, kind: &str, label: &str, duration_minutes: u32) -> Activity {
        Activity {
            id: id.to_string(),
            kind: kind.to_string(),
            label: label.to_string(),
            duration_minutes,
            icon: "🍽️".to_string(),
            custom: false,
            start_time: None,
            end_time: None,
        }
    }

    pub struct TestSchedule {
        pub schedule_id: String,
        pub start_time: String,
        pub activities: Vec<Activity>,
        pub completed_tasks: Vec<String>,
    }

    #[derive(Default)]
    pub struct TestDbBuilder {
        schedules: Vec<TestSchedule>,
    }

    impl TestDbBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn schedule(
            mut self,
            schedule_id: &str,
            start_time: &str,
            activities: Vec<Activity>,
        ) -> Self {
            self.schedules.push(TestSchedule {
                schedule_id: schedule_id.to_string(),
                start_time: start_time.to_string(),
                activities,
                completed_tasks: Vec::new(),
            });
            self
        }

        pub fn completed_task(mut self, schedule_id: &str, task_id: &str) -> Self {
            if let Some(schedule) = self
                .schedules
                .iter_mut()
                .find(|s| s.schedule_id == schedule_id)
            {
                schedule.completed_tasks.push(task_id.to_string());
            }
            self
        }

        pub async fn build(self) -> Result<TestDb, AppError> {
            INIT.call_once(|| {
                let _ = env_logger::builder().is_test(true).try_init();
            });

            let pool = SqlitePool::connect("sqlite::memory:").await?;

            MIGRATOR.run(&pool).await?;

            for schedule in &self.schedules {
                let activities =
                    with_computed_times(&schedule.start_time, schedule.activities.clone())?;
                let total_duration: u32 = activities.iter().map(|a| a.duration_minutes).sum();

                create_schedule(
                    &pool,
                    &NewSchedule {
                        schedule_id: schedule.schedule_id.clone(),
                        activities,
                        self_care_responses: SelfCareResponse::default(),
                        start_time: schedule.start_time.clone(),
                        total_duration,
                        first_name: None,
                        email: None,
                        phone_number: None,
                        notifications_enabled: false,
                    },
                )
                .await?;

                for task_id in &schedule.completed_tasks {
                    upsert_progress(&pool, &schedule.schedule_id, task_id, true, None).await?;
                }
            }

            Ok(TestDb { pool })
        }
    }

    pub struct TestDb {
        pub pool: Pool<Sqlite>,
    }

    pub async fn create_standard_test_db() -> TestDb {
        TestDbBuilder::new()
            .schedule(
                "sched_standard",
                "8:00",
                vec![
                    activity("task-1", "dinner-prep", "Dinner Prep", 45),
                    activity("task-2", "cooking", "Cooking", 60),
                ],
            )
            .build()
            .await
            .expect("Failed to build test DB")
    }

    pub async fn setup_test_client(test_db: TestDb) -> (Client, TestDb, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let rocket = init_rocket(test_db.pool.clone(), notifier.clone()).await;
        let client = Client::tracked(rocket)
            .await
            .expect("valid rocket instance");

        (client, test_db, notifier)
    }
}
