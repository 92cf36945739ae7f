//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::error::CoreError;
use buildline_core::list_view::{apply_list_query, filter_and_sort, ListQuery};
use buildline_core::projects::ProjectStatus;
use buildline_core::timeline::validate_date_order;
use buildline_core::types::DbId;
use buildline_core::vocab::resolve_or_default;
use buildline_db::models::project::{CreateProject, Project, UpdateProject};
use buildline_db::repositories::{ClientRepo, ProjectRepo};
use buildline_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::{CsvResponse, ListResponse};
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    normalize(&state.pool, &mut input).await?;
    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, client_id = ?project.client_id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ListResponse<Project>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(ListResponse(apply_list_query(projects, &query)?))
}

/// GET /api/v1/projects/export
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<CsvResponse> {
    let projects = filter_and_sort(ProjectRepo::list(&state.pool).await?, &query)?;
    Ok(CsvResponse::from_records("projects", &projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    normalize(&state.pool, &mut input).await?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    tracing::info!(project_id = id, status = %project.status, "Project updated");
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// The project's timeline, milestones and tasks go with it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }
    tracing::info!(project_id = id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn normalize(pool: &DbPool, input: &mut CreateProject) -> AppResult<()> {
    input.validate()?;
    let status = resolve_or_default(
        input.status.as_deref(),
        ProjectStatus::Planning,
        ProjectStatus::from_str_value,
    )?;
    input.status = Some(status.as_str().to_string());

    if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
        validate_date_order(start, end, "start_date", "end_date")?;
    }

    if let Some(client_id) = input.client_id {
        if ClientRepo::find_by_id(pool, client_id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "client {client_id} does not exist"
            ))));
        }
    }
    Ok(())
}
