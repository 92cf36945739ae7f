//! Handlers for the `/users` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::bulk::{BulkDeleteReport, BulkDeleteRequest};
use buildline_core::error::CoreError;
use buildline_core::list_view::{apply_list_query, filter_and_sort, ListQuery};
use buildline_core::types::DbId;
use buildline_core::users::{UserRole, UserStatus};
use buildline_core::vocab::resolve_or_default;
use buildline_db::models::user::{CreateUser, UpdateUser, User};
use buildline_db::repositories::UserRepo;
use buildline_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::bulk::run_bulk_delete;
use crate::response::{CsvResponse, ListResponse};
use crate::state::AppState;

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    normalize(&mut input)?;
    let user = UserRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, name = %user.full_name(), role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ListResponse<User>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(ListResponse(apply_list_query(users, &query)?))
}

/// GET /api/v1/users/export
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<CsvResponse> {
    let users = filter_and_sort(UserRepo::list(&state.pool).await?, &query)?;
    Ok(CsvResponse::from_records("users", &users))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    normalize(&mut input)?;
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    tracing::info!(user_id = id, "User updated");
    Ok(Json(user))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    delete_user(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteReport>> {
    let pool = &state.pool;
    let report = run_bulk_delete("User", &request, |id| delete_user(pool, id)).await?;
    Ok(Json(report))
}

fn normalize(input: &mut CreateUser) -> AppResult<()> {
    input.validate()?;
    let role = resolve_or_default(input.role.as_deref(), UserRole::Viewer, UserRole::from_str_value)?;
    let status = resolve_or_default(
        input.status.as_deref(),
        UserStatus::Active,
        UserStatus::from_str_value,
    )?;
    input.role = Some(role.as_str().to_string());
    input.status = Some(status.as_str().to_string());
    Ok(())
}

async fn delete_user(pool: &DbPool, id: DbId) -> AppResult<()> {
    if !UserRepo::delete(pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    tracing::info!(user_id = id, "User deleted");
    Ok(())
}
