//! Handlers for `/timeline/{id}/milestones`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::error::CoreError;
use buildline_core::timeline::{validate_milestone_dependency, MilestoneStatus};
use buildline_core::list_view::{apply_list_query, ListQuery};
use buildline_core::types::DbId;
use buildline_core::vocab::resolve_or_default;
use buildline_db::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};
use buildline_db::repositories::{MilestoneRepo, TaskRepo};
use buildline_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::timeline::find_timeline;
use crate::response::ListResponse;
use crate::state::AppState;

/// GET /api/v1/timeline/{id}/milestones
pub async fn list(
    State(state): State<AppState>,
    Path(timeline_id): Path<DbId>,
    Query(query): Query<ListQuery>,
) -> AppResult<ListResponse<Milestone>> {
    find_timeline(&state.pool, timeline_id).await?;
    let milestones = MilestoneRepo::list_by_timeline(&state.pool, timeline_id).await?;
    Ok(ListResponse(apply_list_query(milestones, &query)?))
}

/// POST /api/v1/timeline/{id}/milestones
pub async fn create(
    State(state): State<AppState>,
    Path(timeline_id): Path<DbId>,
    Json(mut input): Json<CreateMilestone>,
) -> AppResult<(StatusCode, Json<Milestone>)> {
    find_timeline(&state.pool, timeline_id).await?;
    normalize(&state.pool, timeline_id, None, &mut input).await?;

    let milestone = MilestoneRepo::create(&state.pool, timeline_id, &input).await?;
    tracing::info!(timeline_id, milestone_id = milestone.id, "Milestone created");
    Ok((StatusCode::CREATED, Json(milestone)))
}

/// GET /api/v1/timeline/{id}/milestones/{milestone_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((timeline_id, milestone_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Milestone>> {
    find_timeline(&state.pool, timeline_id).await?;
    let milestone = MilestoneRepo::find_by_id(&state.pool, timeline_id, milestone_id)
        .await?
        .ok_or(not_found(milestone_id))?;
    Ok(Json(milestone))
}

/// PUT /api/v1/timeline/{id}/milestones/{milestone_id}
pub async fn update(
    State(state): State<AppState>,
    Path((timeline_id, milestone_id)): Path<(DbId, DbId)>,
    Json(mut input): Json<UpdateMilestone>,
) -> AppResult<Json<Milestone>> {
    find_timeline(&state.pool, timeline_id).await?;
    normalize(&state.pool, timeline_id, Some(milestone_id), &mut input).await?;

    let milestone = MilestoneRepo::update(&state.pool, timeline_id, milestone_id, &input)
        .await?
        .ok_or(not_found(milestone_id))?;
    tracing::info!(timeline_id, milestone_id, status = %milestone.status, "Milestone updated");
    Ok(Json(milestone))
}

/// DELETE /api/v1/timeline/{id}/milestones/{milestone_id}
///
/// Tasks attached to the milestone are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    Path((timeline_id, milestone_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_timeline(&state.pool, timeline_id).await?;
    let task_count = TaskRepo::count_by_milestone(&state.pool, milestone_id).await?;
    if !MilestoneRepo::delete(&state.pool, timeline_id, milestone_id).await? {
        return Err(not_found(milestone_id));
    }
    tracing::info!(timeline_id, milestone_id, task_count, "Milestone deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn normalize(
    pool: &DbPool,
    timeline_id: DbId,
    milestone_id: Option<DbId>,
    input: &mut CreateMilestone,
) -> AppResult<()> {
    input.validate()?;
    let status = resolve_or_default(
        input.status.as_deref(),
        MilestoneStatus::Pending,
        MilestoneStatus::from_str_value,
    )?;
    input.status = Some(status.as_str().to_string());

    let dependency_timeline = match input.depends_on {
        Some(dep) => MilestoneRepo::timeline_of(pool, dep).await?,
        None => None,
    };
    validate_milestone_dependency(milestone_id, input.depends_on, dependency_timeline, timeline_id)?;
    Ok(())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Milestone",
        id,
    })
}
