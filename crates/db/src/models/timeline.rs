//! Timeline entity model and DTOs.

use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::milestone::Milestone;
use super::task::Task;

/// A row from the `timelines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Timeline {
    pub id: DbId,
    pub project_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub duration: Option<i32>,
    pub progress: i32,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project's timeline.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTimeline {
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    /// Computed from the dates when omitted.
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
    /// Defaults to `PLANNING`.
    pub status: Option<String>,
}

/// PUT replaces the full record.
pub type UpdateTimeline = CreateTimeline;

/// A timeline with everything hanging off it.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineDetail {
    #[serde(flatten)]
    pub timeline: Timeline,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
    /// Mean task progress; the stored `progress` is left untouched.
    pub derived_progress: i32,
}
