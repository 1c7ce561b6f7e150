#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::models::{Activity, ScheduleProgress};
    use crate::status::{TaskStatus, classify_task, summarize};
    use crate::test::test_utils::activity;

    fn scheduled_activity(id: &str, start_time: &str) -> Activity {
        let mut a = activity(id, "me-time", "Me Time", 30);
        a.start_time = Some(start_time.to_string());
        a
    }

    fn progress_row(task_id: &str, completed: bool) -> ScheduleProgress {
        ScheduleProgress {
            id: 0,
            schedule_id: "sched_test".to_string(),
            task_id: task_id.to_string(),
            completed,
            completed_at: completed.then(Utc::now),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_window_boundaries() {
        let start = 480;

        assert_eq!(classify_task(start + 15, start, false), TaskStatus::Current);
        assert_eq!(classify_task(start + 16, start, false), TaskStatus::Behind);
        assert_eq!(classify_task(start - 15, start, false), TaskStatus::Current);
        assert_eq!(classify_task(start - 16, start, false), TaskStatus::Upcoming);
        assert_eq!(classify_task(start, start, false), TaskStatus::Current);
    }

    #[test]
    fn test_completed_short_circuits_timing() {
        assert_eq!(classify_task(1000, 480, true), TaskStatus::Completed);
        assert_eq!(classify_task(0, 480, true), TaskStatus::Completed);
        assert_eq!(classify_task(480, 480, true), TaskStatus::Completed);
    }

    #[test]
    fn test_classification_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(classify_task(500, 480, false), TaskStatus::Behind);
        }
    }

    #[test]
    fn test_summarize_counts_behind_tasks() {
        let activities = vec![
            scheduled_activity("task-1", "8:00 AM"),
            scheduled_activity("task-2", "9:00 AM"),
            scheduled_activity("task-3", "11:00 AM"),
        ];

        // 9:30 AM: task-1 is 90 minutes past start, task-2 is 30 past,
        // task-3 is 90 away.
        let summary = summarize(&activities, &[], 570);

        assert_eq!(summary.total_tasks, 3);
        assert_eq!(summary.completed_tasks, 0);
        assert_eq!(summary.behind_tasks, 2);
        assert!(summary.is_behind());

        assert_eq!(summary.tasks[0].status, TaskStatus::Behind);
        assert_eq!(summary.tasks[1].status, TaskStatus::Behind);
        assert_eq!(summary.tasks[2].status, TaskStatus::Upcoming);
    }

    #[test]
    fn test_summarize_completed_tasks_never_behind() {
        let activities = vec![
            scheduled_activity("task-1", "8:00 AM"),
            scheduled_activity("task-2", "9:00 AM"),
        ];
        let progress = vec![progress_row("task-1", true)];

        let summary = summarize(&activities, &progress, 570);

        assert_eq!(summary.completed_tasks, 1);
        assert_eq!(summary.behind_tasks, 1);
        assert_eq!(summary.tasks[0].status, TaskStatus::Completed);
        assert_eq!(summary.tasks[1].status, TaskStatus::Behind);
    }

    #[test]
    fn test_summarize_next_task_is_first_incomplete() {
        let activities = vec![
            scheduled_activity("task-1", "8:00 AM"),
            scheduled_activity("task-2", "9:00 AM"),
            scheduled_activity("task-3", "10:00 AM"),
        ];
        let progress = vec![
            progress_row("task-1", true),
            progress_row("task-2", false),
        ];

        let summary = summarize(&activities, &progress, 480);

        assert_eq!(summary.next_task.unwrap().id, "task-2");
    }

    #[test]
    fn test_summarize_all_complete_has_no_next_task() {
        let activities = vec![scheduled_activity("task-1", "8:00 AM")];
        let progress = vec![progress_row("task-1", true)];

        let summary = summarize(&activities, &progress, 1200);

        assert_eq!(summary.completed_tasks, 1);
        assert!(summary.next_task.is_none());
        assert!(!summary.is_behind());
    }

    #[test]
    fn test_summarize_ungenerated_times_are_upcoming() {
        // No computed start time yet: the task can never count as behind.
        let activities = vec![activity("task-1", "me-time", "Me Time", 30)];

        let summary = summarize(&activities, &[], 1200);

        assert_eq!(summary.tasks[0].status, TaskStatus::Upcoming);
        assert_eq!(summary.behind_tasks, 0);

        let progress = vec![progress_row("task-1", true)];
        let summary = summarize(&activities, &progress, 1200);
        assert_eq!(summary.tasks[0].status, TaskStatus::Completed);
    }

    #[test]
    fn test_summarize_unparseable_time_is_upcoming() {
        let activities = vec![scheduled_activity("task-1", "whenever")];

        let summary = summarize(&activities, &[], 1200);

        assert_eq!(summary.tasks[0].status, TaskStatus::Upcoming);
        assert_eq!(summary.behind_tasks, 0);
    }
}
