//! Handlers for `/timeline/{id}/tasks`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::error::CoreError;
use buildline_core::timeline::{validate_date_order, TaskPriority, TaskStatus, TaskType};
use buildline_core::list_view::{apply_list_query, ListQuery};
use buildline_core::types::DbId;
use buildline_core::vocab::resolve_or_default;
use buildline_db::models::task::{CreateTask, Task, UpdateTask};
use buildline_db::repositories::{MilestoneRepo, TaskRepo};
use buildline_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::timeline::find_timeline;
use crate::response::ListResponse;
use crate::state::AppState;

/// GET /api/v1/timeline/{id}/tasks
pub async fn list(
    State(state): State<AppState>,
    Path(timeline_id): Path<DbId>,
    Query(query): Query<ListQuery>,
) -> AppResult<ListResponse<Task>> {
    find_timeline(&state.pool, timeline_id).await?;
    let tasks = TaskRepo::list_by_timeline(&state.pool, timeline_id).await?;
    Ok(ListResponse(apply_list_query(tasks, &query)?))
}

/// POST /api/v1/timeline/{id}/tasks
pub async fn create(
    State(state): State<AppState>,
    Path(timeline_id): Path<DbId>,
    Json(mut input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    find_timeline(&state.pool, timeline_id).await?;
    normalize(&state.pool, timeline_id, &mut input).await?;

    let task = TaskRepo::create(&state.pool, timeline_id, &input).await?;
    tracing::info!(timeline_id, task_id = task.id, milestone_id = ?task.milestone_id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/v1/timeline/{id}/tasks/{task_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((timeline_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Task>> {
    find_timeline(&state.pool, timeline_id).await?;
    let task = TaskRepo::find_by_id(&state.pool, timeline_id, task_id)
        .await?
        .ok_or(not_found(task_id))?;
    Ok(Json(task))
}

/// PUT /api/v1/timeline/{id}/tasks/{task_id}
pub async fn update(
    State(state): State<AppState>,
    Path((timeline_id, task_id)): Path<(DbId, DbId)>,
    Json(mut input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    find_timeline(&state.pool, timeline_id).await?;
    normalize(&state.pool, timeline_id, &mut input).await?;

    let task = TaskRepo::update(&state.pool, timeline_id, task_id, &input)
        .await?
        .ok_or(not_found(task_id))?;
    tracing::info!(timeline_id, task_id, status = %task.status, "Task updated");
    Ok(Json(task))
}

/// DELETE /api/v1/timeline/{id}/tasks/{task_id}
pub async fn delete(
    State(state): State<AppState>,
    Path((timeline_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_timeline(&state.pool, timeline_id).await?;
    if !TaskRepo::delete(&state.pool, timeline_id, task_id).await? {
        return Err(not_found(task_id));
    }
    tracing::info!(timeline_id, task_id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn normalize(pool: &DbPool, timeline_id: DbId, input: &mut CreateTask) -> AppResult<()> {
    input.validate()?;
    validate_date_order(
        input.planned_start,
        input.planned_end,
        "planned_start",
        "planned_end",
    )?;

    let task_type = resolve_or_default(
        input.task_type.as_deref(),
        TaskType::General,
        TaskType::from_str_value,
    )?;
    let status = resolve_or_default(
        input.status.as_deref(),
        TaskStatus::NotStarted,
        TaskStatus::from_str_value,
    )?;
    let priority = resolve_or_default(
        input.priority.as_deref(),
        TaskPriority::Medium,
        TaskPriority::from_str_value,
    )?;
    input.task_type = Some(task_type.as_str().to_string());
    input.status = Some(status.as_str().to_string());
    input.priority = Some(priority.as_str().to_string());

    if let Some(milestone_id) = input.milestone_id {
        if MilestoneRepo::find_by_id(pool, timeline_id, milestone_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::Validation(format!(
                "milestone {milestone_id} does not belong to timeline {timeline_id}"
            ))));
        }
    }
    Ok(())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}
