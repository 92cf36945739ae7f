//! Route definitions for timeline-scoped milestones and tasks.

use axum::routing::get;
use axum::Router;

use crate::handlers::{milestones, tasks};
use crate::state::AppState;

/// Routes mounted at `/timeline`.
///
/// ```text
/// GET    /{id}/milestones                  -> milestones::list
/// POST   /{id}/milestones                  -> milestones::create
/// GET    /{id}/milestones/{milestone_id}   -> milestones::get_by_id
/// PUT    /{id}/milestones/{milestone_id}   -> milestones::update
/// DELETE /{id}/milestones/{milestone_id}   -> milestones::delete (and its tasks)
///
/// GET    /{id}/tasks                       -> tasks::list
/// POST   /{id}/tasks                       -> tasks::create
/// GET    /{id}/tasks/{task_id}             -> tasks::get_by_id
/// PUT    /{id}/tasks/{task_id}             -> tasks::update
/// DELETE /{id}/tasks/{task_id}             -> tasks::delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/milestones",
            get(milestones::list).post(milestones::create),
        )
        .route(
            "/{id}/milestones/{milestone_id}",
            get(milestones::get_by_id)
                .put(milestones::update)
                .delete(milestones::delete),
        )
        .route("/{id}/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/{id}/tasks/{task_id}",
            get(tasks::get_by_id)
                .put(tasks::update)
                .delete(tasks::delete),
        )
}
