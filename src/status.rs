use serde::{Deserialize, Serialize};

use crate::clock::parse_clock_time;
use crate::models::{Activity, ScheduleProgress};

/// How far "now" may drift from a task's start before it stops counting as
/// current. Inclusive on both sides; one minute past the window is behind.
pub const STATUS_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Behind,
    Current,
    Upcoming,
}

/// Classifies one task against the current wall clock. A completed task is
/// terminal regardless of timing. Both inputs are minutes since midnight on
/// the same day, so the delta is a plain signed difference.
pub fn classify_task(now_minutes: i64, start_minutes: i64, completed: bool) -> TaskStatus {
    if completed {
        return TaskStatus::Completed;
    }

    let delta = now_minutes - start_minutes;

    if delta > STATUS_WINDOW_MINUTES {
        TaskStatus::Behind
    } else if delta.abs() <= STATUS_WINDOW_MINUTES {
        TaskStatus::Current
    } else {
        TaskStatus::Upcoming
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusEntry {
    pub task_id: String,
    pub status: TaskStatus,
}

#[derive(Debug)]
pub struct StatusSummary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub behind_tasks: usize,
    pub next_task: Option<Activity>,
    pub tasks: Vec<TaskStatusEntry>,
}

impl StatusSummary {
    pub fn is_behind(&self) -> bool {
        self.behind_tasks > 0
    }
}

/// Aggregates per-task statuses for a schedule. Activities without a
/// generated start time (or with one that fails to parse) are never counted
/// as behind. `next_task` is the first activity with no completed progress
/// row, in schedule order.
pub fn summarize(
    activities: &[Activity],
    progress: &[ScheduleProgress],
    now_minutes: i64,
) -> StatusSummary {
    let is_completed =
        |task_id: &str| progress.iter().any(|p| p.task_id == task_id && p.completed);

    let tasks: Vec<TaskStatusEntry> = activities
        .iter()
        .map(|activity| {
            let completed = is_completed(&activity.id);
            let status = match activity.start_time.as_deref().map(parse_clock_time) {
                Some(Ok(start)) => classify_task(now_minutes, i64::from(start), completed),
                _ if completed => TaskStatus::Completed,
                _ => TaskStatus::Upcoming,
            };
            TaskStatusEntry {
                task_id: activity.id.clone(),
                status,
            }
        })
        .collect();

    let behind_tasks = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Behind)
        .count();

    let next_task = activities
        .iter()
        .find(|activity| !is_completed(&activity.id))
        .cloned();

    StatusSummary {
        total_tasks: activities.len(),
        completed_tasks: progress.iter().filter(|p| p.completed).count(),
        behind_tasks,
        next_task,
        tasks,
    }
}
