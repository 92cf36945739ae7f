//! Handlers for the `/assemblies` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::bulk::{BulkDeleteReport, BulkDeleteRequest};
use buildline_core::error::CoreError;
use buildline_core::list_view::{apply_list_query, filter_and_sort, ListQuery};
use buildline_core::types::DbId;
use buildline_db::models::assembly::{
    Assembly, AssemblyWithMaterials, CreateAssembly, UpdateAssembly,
};
use buildline_db::repositories::{AssemblyCategoryRepo, AssemblyRepo, MaterialRepo};
use buildline_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::bulk::run_bulk_delete;
use crate::response::{CsvResponse, ListResponse};
use crate::state::AppState;

/// POST /api/v1/assemblies
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateAssembly>,
) -> AppResult<(StatusCode, Json<AssemblyWithMaterials>)> {
    check_input(&state.pool, &input).await?;
    let assembly = AssemblyRepo::create(&state.pool, &input).await?;
    tracing::info!(
        assembly_id = assembly.assembly.id,
        materials = assembly.materials.len(),
        "Assembly created"
    );
    Ok((StatusCode::CREATED, Json(assembly)))
}

/// GET /api/v1/assemblies
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ListResponse<Assembly>> {
    let assemblies = AssemblyRepo::list(&state.pool).await?;
    Ok(ListResponse(apply_list_query(assemblies, &query)?))
}

/// GET /api/v1/assemblies/export
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<CsvResponse> {
    let assemblies = filter_and_sort(AssemblyRepo::list(&state.pool).await?, &query)?;
    Ok(CsvResponse::from_records("assemblies", &assemblies))
}

/// GET /api/v1/assemblies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AssemblyWithMaterials>> {
    let assembly = AssemblyRepo::find_with_materials(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assembly",
            id,
        }))?;
    Ok(Json(assembly))
}

/// PUT /api/v1/assemblies/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssembly>,
) -> AppResult<Json<AssemblyWithMaterials>> {
    check_input(&state.pool, &input).await?;
    let assembly = AssemblyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assembly",
            id,
        }))?;
    tracing::info!(assembly_id = id, "Assembly updated");
    Ok(Json(assembly))
}

/// DELETE /api/v1/assemblies/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    delete_assembly(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assemblies/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteReport>> {
    let pool = &state.pool;
    let report = run_bulk_delete("Assembly", &request, |id| delete_assembly(pool, id)).await?;
    Ok(Json(report))
}

/// Field rules plus existence of the category and every listed material.
async fn check_input(pool: &DbPool, input: &CreateAssembly) -> AppResult<()> {
    input.validate()?;

    let dupes = input.duplicate_material_ids();
    if !dupes.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "materials listed more than once: {dupes:?}"
        ))));
    }

    if AssemblyCategoryRepo::find_by_id(pool, input.category_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "assembly category {} does not exist",
            input.category_id
        ))));
    }

    for line in &input.materials {
        if MaterialRepo::find_by_id(pool, line.material_id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "material {} does not exist",
                line.material_id
            ))));
        }
    }

    Ok(())
}

/// An assembly used by any assembly group stays put.
async fn delete_assembly(pool: &DbPool, id: DbId) -> AppResult<()> {
    let usages = AssemblyRepo::count_group_usages(pool, id).await?;
    if usages > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Assembly {id} is used by {usages} assembly group item(s)"
        ))));
    }
    if !AssemblyRepo::delete(pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Assembly",
            id,
        }));
    }
    tracing::info!(assembly_id = id, "Assembly deleted");
    Ok(())
}
