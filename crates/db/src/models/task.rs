//! Task entity model and DTOs.

use buildline_core::list_view::{Listable, SortValue};
use buildline_core::timeline::TaskPriority;
use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub timeline_id: DbId,
    pub milestone_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub task_type: String,
    pub planned_start: Timestamp,
    pub planned_end: Timestamp,
    pub duration: Option<i32>,
    pub progress: i32,
    pub status: String,
    pub priority: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listable for Task {
    const SORT_KEYS: &'static [&'static str] = &[
        "name",
        "planned_start",
        "planned_end",
        "priority",
        "progress",
        "status",
        "task_type",
    ];

    fn search_fields(&self) -> Vec<&str> {
        [Some(self.name.as_str()), self.description.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "planned_start" => SortValue::time(self.planned_start),
            "planned_end" => SortValue::time(self.planned_end),
            // By severity, LOW first.
            "priority" => SortValue::opt_number(
                TaskPriority::VALUES
                    .iter()
                    .position(|p| *p == self.priority)
                    .map(|rank| rank as f64),
            ),
            "progress" => SortValue::number(self.progress),
            "status" => SortValue::text(&self.status),
            "task_type" => SortValue::text(&self.task_type),
            _ => SortValue::text(&self.name),
        }
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }

    /// Tasks are categorised by priority, so `?category=HIGH` narrows a list.
    fn category(&self) -> Option<&str> {
        Some(&self.priority)
    }
}

/// DTO for creating a task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    pub milestone_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `GENERAL`.
    pub task_type: Option<String>,
    pub planned_start: Timestamp,
    pub planned_end: Timestamp,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
    /// Defaults to `NOT_STARTED`.
    pub status: Option<String>,
    /// Defaults to `MEDIUM`.
    pub priority: Option<String>,
}

/// PUT replaces the full record.
pub type UpdateTask = CreateTask;
