//! Route definitions for the `/assembly-groups` resource and its items.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::assembly_groups;
use crate::state::AppState;

/// Routes mounted at `/assembly-groups`.
///
/// ```text
/// GET    /                                 -> list
/// POST   /                                 -> create (with items)
/// GET    /{id}                             -> get_by_id (with items)
/// PUT    /{id}                             -> update (replaces items)
/// DELETE /{id}                             -> delete
/// POST   /{id}/items                       -> add_item
/// PATCH  /{id}/items/{assembly_id}         -> patch_item (quantity)
/// DELETE /{id}/items/{assembly_id}         -> remove_item
/// POST   /{id}/validate-selection          -> evaluate_selection
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assembly_groups::list).post(assembly_groups::create))
        .route(
            "/{id}",
            get(assembly_groups::get_by_id)
                .put(assembly_groups::update)
                .delete(assembly_groups::delete),
        )
        .route("/{id}/items", post(assembly_groups::add_item))
        .route(
            "/{id}/items/{assembly_id}",
            patch(assembly_groups::patch_item).delete(assembly_groups::remove_item),
        )
        .route(
            "/{id}/validate-selection",
            post(assembly_groups::evaluate_selection),
        )
}
