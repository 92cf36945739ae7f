//! Handler for `GET /gantt`.
//!
//! Loads every timeline (or one project's), then lays tasks and milestones
//! out against a single view window shared by all rows.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use buildline_core::error::CoreError;
use buildline_core::gantt::{
    auto_fit_zoom, axis_labels, clamp_zoom, milestone_position, task_position, ViewWindow,
};
use buildline_core::types::DbId;
use buildline_db::models::gantt::{
    GanttChart, GanttMilestoneMarker, GanttQuery, GanttRow, GanttTaskBar,
};
use buildline_db::models::milestone::Milestone;
use buildline_db::models::task::Task;
use buildline_db::repositories::{GanttRepo, MilestoneRepo, ProjectRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/gantt
pub async fn get_chart(
    State(state): State<AppState>,
    Query(query): Query<GanttQuery>,
) -> AppResult<Json<GanttChart>> {
    if let Some(project_id) = query.project_id {
        ProjectRepo::find_by_id(&state.pool, project_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))?;
    }

    let timelines = GanttRepo::list_timelines(&state.pool, query.project_id).await?;
    let ids: Vec<DbId> = timelines.iter().map(|t| t.timeline_id).collect();
    let tasks = TaskRepo::list_by_timelines(&state.pool, &ids).await?;
    let milestones = MilestoneRepo::list_by_timelines(&state.pool, &ids).await?;

    let window = resolve_window(&query, &tasks, &milestones)?;
    let zoom = query
        .zoom
        .map(clamp_zoom)
        .unwrap_or_else(|| auto_fit_zoom(&window));

    let mut tasks_by_timeline: HashMap<DbId, Vec<GanttTaskBar>> = HashMap::new();
    for task in tasks
        .into_iter()
        .filter(|t| t.planned_end >= window.start && t.planned_start <= window.end)
    {
        let position = task_position(&window, task.planned_start, task.planned_end, zoom);
        tasks_by_timeline
            .entry(task.timeline_id)
            .or_default()
            .push(GanttTaskBar {
                task_id: task.id,
                milestone_id: task.milestone_id,
                name: task.name,
                status: task.status,
                priority: task.priority,
                progress: task.progress,
                planned_start: task.planned_start,
                planned_end: task.planned_end,
                position,
            });
    }

    let mut milestones_by_timeline: HashMap<DbId, Vec<GanttMilestoneMarker>> = HashMap::new();
    for milestone in milestones
        .into_iter()
        .filter(|m| m.due_date >= window.start && m.due_date <= window.end)
    {
        milestones_by_timeline
            .entry(milestone.timeline_id)
            .or_default()
            .push(GanttMilestoneMarker {
                milestone_id: milestone.id,
                left_percent: milestone_position(&window, milestone.due_date),
                name: milestone.name,
                status: milestone.status,
                due_date: milestone.due_date,
            });
    }

    let rows = timelines
        .into_iter()
        .map(|t| GanttRow {
            tasks: tasks_by_timeline.remove(&t.timeline_id).unwrap_or_default(),
            milestones: milestones_by_timeline
                .remove(&t.timeline_id)
                .unwrap_or_default(),
            project_id: t.project_id,
            project_name: t.project_name,
            timeline_id: t.timeline_id,
            status: t.status,
            progress: t.progress,
        })
        .collect();

    Ok(Json(GanttChart {
        axis: axis_labels(&window, zoom),
        window,
        zoom,
        rows,
    }))
}

/// Explicit window when both bounds are given, otherwise the span of the
/// data, otherwise 30 days from now.
fn resolve_window(
    query: &GanttQuery,
    tasks: &[Task],
    milestones: &[Milestone],
) -> AppResult<ViewWindow> {
    match (query.view_start, query.view_end) {
        (Some(start), Some(end)) => Ok(ViewWindow::new(start, end)?),
        (None, None) => {
            let dates = tasks
                .iter()
                .flat_map(|t| [t.planned_start, t.planned_end])
                .chain(milestones.iter().map(|m| m.due_date));
            Ok(ViewWindow::covering(dates).unwrap_or_else(|| ViewWindow::empty_from(Utc::now())))
        }
        _ => Err(AppError::BadRequest(
            "view_start and view_end must be given together".to_string(),
        )),
    }
}
