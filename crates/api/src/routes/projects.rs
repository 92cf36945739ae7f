//! Route definitions for the `/projects` resource.
//!
//! Also mounts the project's single timeline at `/projects/{id}/timeline`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{projects, timeline};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /export                    -> export (CSV)
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete (cascades to the timeline)
///
/// GET    /{id}/timeline             -> timeline::get (with milestones, tasks)
/// POST   /{id}/timeline             -> timeline::create
/// PUT    /{id}/timeline             -> timeline::update
/// DELETE /{id}/timeline             -> timeline::delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/export", get(projects::export))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/{id}/timeline",
            get(timeline::get)
                .post(timeline::create)
                .put(timeline::update)
                .delete(timeline::delete),
        )
}
