//! Gantt chart view models.
//!
//! [`GanttTimeline`] is the row the repository reads; the remaining types are
//! the positioned response assembled by the API.

use buildline_core::gantt::{AxisLabel, BarPosition, ViewWindow};
use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A timeline joined with its project's name.
#[derive(Debug, Clone, FromRow)]
pub struct GanttTimeline {
    pub timeline_id: DbId,
    pub project_id: DbId,
    pub project_name: String,
    pub status: String,
    pub progress: i32,
}

/// Query string of `GET /gantt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GanttQuery {
    pub view_start: Option<Timestamp>,
    pub view_end: Option<Timestamp>,
    pub zoom: Option<f64>,
    pub project_id: Option<DbId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttTaskBar {
    pub task_id: DbId,
    pub milestone_id: Option<DbId>,
    pub name: String,
    pub status: String,
    pub priority: String,
    pub progress: i32,
    pub planned_start: Timestamp,
    pub planned_end: Timestamp,
    #[serde(flatten)]
    pub position: BarPosition,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttMilestoneMarker {
    pub milestone_id: DbId,
    pub name: String,
    pub status: String,
    pub due_date: Timestamp,
    pub left_percent: f64,
}

/// One project's timeline on the chart.
#[derive(Debug, Clone, Serialize)]
pub struct GanttRow {
    pub project_id: DbId,
    pub project_name: String,
    pub timeline_id: DbId,
    pub status: String,
    pub progress: i32,
    pub tasks: Vec<GanttTaskBar>,
    pub milestones: Vec<GanttMilestoneMarker>,
}

/// Response of `GET /gantt`.
#[derive(Debug, Clone, Serialize)]
pub struct GanttChart {
    pub window: ViewWindow,
    pub zoom: f64,
    pub axis: Vec<AxisLabel>,
    pub rows: Vec<GanttRow>,
}
