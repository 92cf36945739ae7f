//! Handlers for the `/assembly-groups` resource and its items.
//!
//! Group writes run the structural checks from
//! [`buildline_core::assembly_group`]; selections are only ever evaluated,
//! never stored.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use buildline_core::assembly_group::{
    default_selection, selection_total, validate_group_items, validate_quantity,
    validate_selection, GroupRule, GroupType, SelectionViolation,
};
use buildline_core::error::CoreError;
use buildline_core::list_view::{apply_list_query, ListQuery};
use buildline_core::types::DbId;
use buildline_db::models::assembly_group::{
    AssemblyGroupItem, AssemblyGroupWithItems, CreateAssemblyGroup, CreateGroupItem,
    PatchItemQuantity, UpdateAssemblyGroup, ValidateSelectionRequest,
};
use buildline_db::repositories::{AssemblyCategoryRepo, AssemblyGroupRepo, AssemblyRepo};
use buildline_db::DbPool;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::ListResponse;
use crate::state::AppState;

/// Outcome of evaluating a selection against a group.
#[derive(Debug, Serialize)]
pub struct SelectionResult {
    pub valid: bool,
    /// The assembly ids that were evaluated.
    pub selection: Vec<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<SelectionViolation>,
    /// Sum of assembly price times item quantity over the selected items.
    pub total_price: f64,
}

/// POST /api/v1/assembly-groups
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateAssemblyGroup>,
) -> AppResult<(StatusCode, Json<AssemblyGroupWithItems>)> {
    let group_type = check_group_input(&state.pool, &input).await?;
    input.group_type = group_type.as_str().to_string();

    let group = AssemblyGroupRepo::create(&state.pool, &input).await?;
    tracing::info!(
        group_id = group.group.id,
        group_type = %group_type,
        items = group.items.len(),
        "Assembly group created"
    );
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /api/v1/assembly-groups
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ListResponse<AssemblyGroupWithItems>> {
    let groups = AssemblyGroupRepo::list_with_items(&state.pool).await?;
    Ok(ListResponse(apply_list_query(groups, &query)?))
}

/// GET /api/v1/assembly-groups/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AssemblyGroupWithItems>> {
    Ok(Json(find_group(&state.pool, id).await?))
}

/// PUT /api/v1/assembly-groups/{id}
///
/// Replaces the group and its whole item list.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAssemblyGroup>,
) -> AppResult<Json<AssemblyGroupWithItems>> {
    let group_type = check_group_input(&state.pool, &input).await?;
    input.group_type = group_type.as_str().to_string();

    let group = AssemblyGroupRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssemblyGroup",
            id,
        }))?;
    tracing::info!(group_id = id, items = group.items.len(), "Assembly group updated");
    Ok(Json(group))
}

/// DELETE /api/v1/assembly-groups/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !AssemblyGroupRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "AssemblyGroup",
            id,
        }));
    }
    tracing::info!(group_id = id, "Assembly group deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assembly-groups/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateGroupItem>,
) -> AppResult<(StatusCode, Json<AssemblyGroupItem>)> {
    let group = find_group(&state.pool, id).await?;
    let group_type = GroupType::from_str_value(&group.group.group_type)?;

    let mut specs: Vec<_> = group.items.iter().map(AssemblyGroupItem::spec).collect();
    specs.push(input.spec());
    validate_group_items(group_type, &specs)?;
    ensure_assembly_exists(&state.pool, input.assembly_id).await?;

    let item = AssemblyGroupRepo::add_item(&state.pool, id, &input).await?;
    tracing::info!(group_id = id, assembly_id = item.assembly_id, "Assembly group item added");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/v1/assembly-groups/{id}/items/{assembly_id}
///
/// Sets the quantity directly; concurrent patches are last-write-wins.
pub async fn patch_item(
    State(state): State<AppState>,
    Path((id, assembly_id)): Path<(DbId, DbId)>,
    Json(input): Json<PatchItemQuantity>,
) -> AppResult<Json<AssemblyGroupItem>> {
    validate_quantity(input.quantity)?;
    find_group(&state.pool, id).await?;

    let item = AssemblyGroupRepo::update_item_quantity(&state.pool, id, assembly_id, input.quantity)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssemblyGroupItem",
            id: assembly_id,
        }))?;
    tracing::info!(group_id = id, assembly_id, quantity = item.quantity, "Item quantity set");
    Ok(Json(item))
}

/// DELETE /api/v1/assembly-groups/{id}/items/{assembly_id}
pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, assembly_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_group(&state.pool, id).await?;
    if !AssemblyGroupRepo::remove_item(&state.pool, id, assembly_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "AssemblyGroupItem",
            id: assembly_id,
        }));
    }
    tracing::info!(group_id = id, assembly_id, "Assembly group item removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assembly-groups/{id}/validate-selection
///
/// Without `assembly_ids` the group's default selection is evaluated. An
/// invalid selection is still a 200; the verdict is in the body.
pub async fn evaluate_selection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ValidateSelectionRequest>,
) -> AppResult<Json<SelectionResult>> {
    let group = find_group(&state.pool, id).await?;
    let group_type = GroupType::from_str_value(&group.group.group_type)?;
    let specs: Vec<_> = group.items.iter().map(AssemblyGroupItem::spec).collect();
    let rule = GroupRule::from_items(group_type, &specs);

    let selection = input
        .assembly_ids
        .unwrap_or_else(|| default_selection(&rule));
    let violation = validate_selection(&rule, &selection).err();

    let lines: Vec<(f64, i32)> = group
        .items
        .iter()
        .filter(|item| selection.contains(&item.assembly_id))
        .map(|item| (item.assembly_price, item.quantity))
        .collect();

    Ok(Json(SelectionResult {
        valid: violation.is_none(),
        selection,
        violation,
        total_price: selection_total(&lines),
    }))
}

async fn find_group(pool: &DbPool, id: DbId) -> AppResult<AssemblyGroupWithItems> {
    AssemblyGroupRepo::find_with_items(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssemblyGroup",
            id,
        }))
}

async fn ensure_assembly_exists(pool: &DbPool, assembly_id: DbId) -> AppResult<()> {
    if AssemblyRepo::find_by_id(pool, assembly_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "assembly {assembly_id} does not exist"
        ))));
    }
    Ok(())
}

/// Field rules, group shape, and existence of the category and assemblies.
async fn check_group_input(pool: &DbPool, input: &CreateAssemblyGroup) -> AppResult<GroupType> {
    input.validate()?;
    let group_type = GroupType::from_str_value(&input.group_type)?;
    validate_group_items(group_type, &input.item_specs())?;

    if let Some(category_id) = input.category_id {
        if AssemblyCategoryRepo::find_by_id(pool, category_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::Validation(format!(
                "assembly category {category_id} does not exist"
            ))));
        }
    }

    for item in &input.items {
        ensure_assembly_exists(pool, item.assembly_id).await?;
    }

    Ok(group_type)
}
