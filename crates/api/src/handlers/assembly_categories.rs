//! Handlers for the `/assembly-categories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::error::CoreError;
use buildline_core::list_view::{apply_list_query, ListQuery};
use buildline_core::types::DbId;
use buildline_db::models::assembly_category::{
    AssemblyCategory, CreateAssemblyCategory, UpdateAssemblyCategory,
};
use buildline_db::repositories::AssemblyCategoryRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::ListResponse;
use crate::state::AppState;

/// POST /api/v1/assembly-categories
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateAssemblyCategory>,
) -> AppResult<(StatusCode, Json<AssemblyCategory>)> {
    input.validate()?;
    let category = AssemblyCategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(category_id = category.id, name = %category.name, "Assembly category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/v1/assembly-categories
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ListResponse<AssemblyCategory>> {
    let categories = AssemblyCategoryRepo::list(&state.pool).await?;
    Ok(ListResponse(apply_list_query(categories, &query)?))
}

/// GET /api/v1/assembly-categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AssemblyCategory>> {
    let category = AssemblyCategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssemblyCategory",
            id,
        }))?;
    Ok(Json(category))
}

/// PUT /api/v1/assembly-categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssemblyCategory>,
) -> AppResult<Json<AssemblyCategory>> {
    input.validate()?;
    let category = AssemblyCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssemblyCategory",
            id,
        }))?;
    tracing::info!(category_id = id, "Assembly category updated");
    Ok(Json(category))
}

/// DELETE /api/v1/assembly-categories/{id}
///
/// Refused while the category still owns assemblies.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let category = AssemblyCategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssemblyCategory",
            id,
        }))?;
    if category.assembly_count > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Assembly category {id} still has {} assemblies",
            category.assembly_count
        ))));
    }

    AssemblyCategoryRepo::delete(&state.pool, id).await?;
    tracing::info!(category_id = id, "Assembly category deleted");
    Ok(StatusCode::NO_CONTENT)
}
