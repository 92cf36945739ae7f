//! Route definitions for the `/assemblies` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assemblies;
use crate::state::AppState;

/// Routes mounted at `/assemblies`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create (with material lines)
/// GET    /export          -> export (CSV)
/// POST   /bulk-delete     -> bulk_delete
/// GET    /{id}            -> get_by_id (with material lines)
/// PUT    /{id}            -> update (replaces material lines)
/// DELETE /{id}            -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assemblies::list).post(assemblies::create))
        .route("/export", get(assemblies::export))
        .route("/bulk-delete", post(assemblies::bulk_delete))
        .route(
            "/{id}",
            get(assemblies::get_by_id)
                .put(assemblies::update)
                .delete(assemblies::delete),
        )
}
