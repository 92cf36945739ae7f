//! Route definitions for the `/clients` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clients`.
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
        .route("/", get(clients::list).post(clients::create))
        .route("/export", get(clients::export))
        .route("/bulk-delete", post(clients::bulk_delete))
        .route(
            "/{id}",
            get(clients::get_by_id)
                .put(clients::update)
                .delete(clients::delete),
        )
}
