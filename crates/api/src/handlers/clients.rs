//! Handlers for the `/clients` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::bulk::{BulkDeleteReport, BulkDeleteRequest};
use buildline_core::clients::{ClientStatus, ClientType};
use buildline_core::error::CoreError;
use buildline_core::list_view::{apply_list_query, filter_and_sort, ListQuery};
use buildline_core::types::DbId;
use buildline_core::vocab::resolve_or_default;
use buildline_db::models::client::{Client, CreateClient, UpdateClient};
use buildline_db::repositories::ClientRepo;
use buildline_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::bulk::run_bulk_delete;
use crate::response::{CsvResponse, ListResponse};
use crate::state::AppState;

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    normalize(&mut input)?;
    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client_id = client.id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/v1/clients
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ListResponse<Client>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(ListResponse(apply_list_query(clients, &query)?))
}

/// GET /api/v1/clients/export
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<CsvResponse> {
    let clients = filter_and_sort(ClientRepo::list(&state.pool).await?, &query)?;
    Ok(CsvResponse::from_records("clients", &clients))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(client))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    normalize(&mut input)?;
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    tracing::info!(client_id = id, "Client updated");
    Ok(Json(client))
}

/// DELETE /api/v1/clients/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    delete_client(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/clients/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteReport>> {
    let pool = &state.pool;
    let report = run_bulk_delete("Client", &request, |id| delete_client(pool, id)).await?;
    Ok(Json(report))
}

/// Validate fields and replace omitted vocabulary values with their defaults.
fn normalize(input: &mut CreateClient) -> AppResult<()> {
    input.validate()?;
    let client_type = resolve_or_default(
        input.client_type.as_deref(),
        ClientType::Residential,
        ClientType::from_str_value,
    )?;
    let status = resolve_or_default(
        input.status.as_deref(),
        ClientStatus::Active,
        ClientStatus::from_str_value,
    )?;
    input.client_type = Some(client_type.as_str().to_string());
    input.status = Some(status.as_str().to_string());
    Ok(())
}

/// A client with projects stays put.
async fn delete_client(pool: &DbPool, id: DbId) -> AppResult<()> {
    let client = ClientRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    if client.project_count > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Client '{}' still has {} project(s)",
            client.display_name(),
            client.project_count
        ))));
    }
    ClientRepo::delete(pool, id).await?;
    tracing::info!(client_id = id, "Client deleted");
    Ok(())
}
