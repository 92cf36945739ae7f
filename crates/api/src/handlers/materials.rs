//! Handlers for the `/materials` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::bulk::{BulkDeleteReport, BulkDeleteRequest};
use buildline_core::error::CoreError;
use buildline_core::list_view::{apply_list_query, filter_and_sort, ListQuery};
use buildline_core::types::DbId;
use buildline_db::models::material::{CreateMaterial, Material, UpdateMaterial};
use buildline_db::repositories::MaterialRepo;
use buildline_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::bulk::run_bulk_delete;
use crate::response::{CsvResponse, ListResponse};
use crate::state::AppState;

/// POST /api/v1/materials
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateMaterial>,
) -> AppResult<(StatusCode, Json<Material>)> {
    input.validate()?;
    let material = MaterialRepo::create(&state.pool, &input).await?;
    tracing::info!(material_id = material.id, name = %material.name, "Material created");
    Ok((StatusCode::CREATED, Json(material)))
}

/// GET /api/v1/materials
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ListResponse<Material>> {
    let materials = MaterialRepo::list(&state.pool).await?;
    Ok(ListResponse(apply_list_query(materials, &query)?))
}

/// GET /api/v1/materials/export
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<CsvResponse> {
    let materials = filter_and_sort(MaterialRepo::list(&state.pool).await?, &query)?;
    Ok(CsvResponse::from_records("materials", &materials))
}

/// GET /api/v1/materials/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Material>> {
    let material = MaterialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }))?;
    Ok(Json(material))
}

/// PUT /api/v1/materials/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMaterial>,
) -> AppResult<Json<Material>> {
    input.validate()?;
    let material = MaterialRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }))?;
    tracing::info!(material_id = id, "Material updated");
    Ok(Json(material))
}

/// DELETE /api/v1/materials/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    delete_material(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/materials/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteReport>> {
    let pool = &state.pool;
    let report = run_bulk_delete("Material", &request, |id| delete_material(pool, id)).await?;
    Ok(Json(report))
}

/// A material listed by any assembly stays put.
async fn delete_material(pool: &DbPool, id: DbId) -> AppResult<()> {
    let usages = MaterialRepo::count_assembly_usages(pool, id).await?;
    if usages > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Material {id} is used by {usages} assembly line(s)"
        ))));
    }
    if !MaterialRepo::delete(pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Material",
            id,
        }));
    }
    tracing::info!(material_id = id, "Material deleted");
    Ok(())
}
