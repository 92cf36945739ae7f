pub mod assemblies;
pub mod assembly_categories;
pub mod assembly_groups;
pub mod clients;
pub mod health;
pub mod materials;
pub mod projects;
pub mod timeline;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /materials                                       list, create, export, bulk-delete
/// /materials/{id}                                  get, update, delete
///
/// /assembly-categories                             list, create
/// /assembly-categories/{id}                        get, update, delete
///
/// /assemblies                                      list, create, export, bulk-delete
/// /assemblies/{id}                                 get, update, delete
///
/// /assembly-groups                                 list, create
/// /assembly-groups/{id}                            get, update, delete
/// /assembly-groups/{id}/items                      add item (POST)
/// /assembly-groups/{id}/items/{assembly_id}        set quantity (PATCH), remove (DELETE)
/// /assembly-groups/{id}/validate-selection         check a selection (POST)
///
/// /clients                                         list, create, export, bulk-delete
/// /clients/{id}                                    get, update, delete
///
/// /users                                           list, create, export, bulk-delete
/// /users/{id}                                      get, update, delete
///
/// /projects                                        list, create, export
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/timeline                          get, create, update, delete
///
/// /timeline/{id}/milestones                        list, create
/// /timeline/{id}/milestones/{milestone_id}         get, update, delete
/// /timeline/{id}/tasks                             list, create
/// /timeline/{id}/tasks/{task_id}                   get, update, delete
///
/// /gantt                                           chart (GET)
/// /pdf                                             PDF tools (POST, 501)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog.
        .nest("/materials", materials::router())
        .nest("/assembly-categories", assembly_categories::router())
        .nest("/assemblies", assemblies::router())
        .nest("/assembly-groups", assembly_groups::router())
        // People.
        .nest("/clients", clients::router())
        .nest("/users", users::router())
        // Projects and scheduling.
        .nest("/projects", projects::router())
        .nest("/timeline", timeline::router())
        .route("/gantt", get(handlers::gantt::get_chart))
        .route("/pdf", post(handlers::pdf::run_operation))
}
