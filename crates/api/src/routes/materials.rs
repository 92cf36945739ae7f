//! Route definitions for the `/materials` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::materials;
use crate::state::AppState;

/// Routes mounted at `/materials`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /export          -> export (CSV)
/// POST   /bulk-delete     -> bulk_delete
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(materials::list).post(materials::create))
        .route("/export", get(materials::export))
        .route("/bulk-delete", post(materials::bulk_delete))
        .route(
            "/{id}",
            get(materials::get_by_id)
                .put(materials::update)
                .delete(materials::delete),
        )
}
