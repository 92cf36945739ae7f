//! Route definitions for the `/assembly-categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::assembly_categories;
use crate::state::AppState;

/// Routes mounted at `/assembly-categories`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assembly_categories::list).post(assembly_categories::create),
        )
        .route(
            "/{id}",
            get(assembly_categories::get_by_id)
                .put(assembly_categories::update)
                .delete(assembly_categories::delete),
        )
}
