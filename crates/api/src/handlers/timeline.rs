//! Handlers for `/projects/{project_id}/timeline`.
//!
//! A project has at most one timeline; every operation here addresses it
//! through the project id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::error::CoreError;
use buildline_core::timeline::{rollup_progress, validate_date_order, TimelineStatus};
use buildline_core::types::DbId;
use buildline_core::vocab::resolve_or_default;
use buildline_db::models::timeline::{CreateTimeline, Timeline, TimelineDetail, UpdateTimeline};
use buildline_db::repositories::{MilestoneRepo, ProjectRepo, TaskRepo, TimelineRepo};
use buildline_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/timeline
pub async fn get(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<TimelineDetail>> {
    ensure_project_exists(&state.pool, project_id).await?;
    let timeline = find_for_project(&state.pool, project_id).await?;

    let milestones = MilestoneRepo::list_by_timeline(&state.pool, timeline.id).await?;
    let tasks = TaskRepo::list_by_timeline(&state.pool, timeline.id).await?;
    let progress: Vec<i32> = tasks.iter().map(|t| t.progress).collect();

    Ok(Json(TimelineDetail {
        derived_progress: rollup_progress(&progress),
        timeline,
        milestones,
        tasks,
    }))
}

/// POST /api/v1/projects/{project_id}/timeline
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<CreateTimeline>,
) -> AppResult<(StatusCode, Json<Timeline>)> {
    normalize(&mut input)?;
    ensure_project_exists(&state.pool, project_id).await?;

    if TimelineRepo::find_by_project(&state.pool, project_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Project {project_id} already has a timeline"
        ))));
    }

    let timeline = TimelineRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(project_id, timeline_id = timeline.id, "Timeline created");
    Ok((StatusCode::CREATED, Json(timeline)))
}

/// PUT /api/v1/projects/{project_id}/timeline
pub async fn update(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<UpdateTimeline>,
) -> AppResult<Json<Timeline>> {
    normalize(&mut input)?;
    ensure_project_exists(&state.pool, project_id).await?;

    let timeline = TimelineRepo::update_by_project(&state.pool, project_id, &input)
        .await?
        .ok_or(missing_timeline(project_id))?;
    tracing::info!(project_id, timeline_id = timeline.id, "Timeline updated");
    Ok(Json(timeline))
}

/// DELETE /api/v1/projects/{project_id}/timeline
pub async fn delete(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_project_exists(&state.pool, project_id).await?;
    if !TimelineRepo::delete_by_project(&state.pool, project_id).await? {
        return Err(missing_timeline(project_id));
    }
    tracing::info!(project_id, "Timeline deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn normalize(input: &mut CreateTimeline) -> AppResult<()> {
    input.validate()?;
    if let Some(end) = input.end_date {
        validate_date_order(input.start_date, end, "start_date", "end_date")?;
    }
    let status = resolve_or_default(
        input.status.as_deref(),
        TimelineStatus::Planning,
        TimelineStatus::from_str_value,
    )?;
    input.status = Some(status.as_str().to_string());
    Ok(())
}

async fn ensure_project_exists(pool: &DbPool, project_id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    Ok(())
}

async fn find_for_project(pool: &DbPool, project_id: DbId) -> AppResult<Timeline> {
    TimelineRepo::find_by_project(pool, project_id)
        .await?
        .ok_or(missing_timeline(project_id))
}

fn missing_timeline(project_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Timeline for project",
        id: project_id,
    })
}

/// Resolve a timeline addressed by its own id, as the milestone and task
/// routes do.
pub(crate) async fn find_timeline(pool: &DbPool, timeline_id: DbId) -> AppResult<Timeline> {
    TimelineRepo::find_by_id(pool, timeline_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Timeline",
            id: timeline_id,
        }))
}
