//! Milestone entity model and DTOs.

use buildline_core::list_view::{Listable, SortValue};
use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub timeline_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Timestamp,
    pub status: String,
    pub progress: i32,
    pub depends_on: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listable for Milestone {
    const SORT_KEYS: &'static [&'static str] = &["name", "due_date", "progress", "status"];

    fn search_fields(&self) -> Vec<&str> {
        [Some(self.name.as_str()), self.description.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "due_date" => SortValue::time(self.due_date),
            "progress" => SortValue::number(self.progress),
            "status" => SortValue::text(&self.status),
            _ => SortValue::text(&self.name),
        }
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }
}

/// DTO for creating a milestone.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMilestone {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub due_date: Timestamp,
    /// Defaults to `PENDING`.
    pub status: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
    pub depends_on: Option<DbId>,
}

/// PUT replaces the full record.
pub type UpdateMilestone = CreateMilestone;
