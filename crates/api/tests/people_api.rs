//! HTTP tests for clients, users and projects.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_id, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_vocabulary_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/clients",
        json!({"contact_name": "Ada Reyes", "email": "ada@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["client_type"], "RESIDENTIAL");
    assert_eq!(json["status"], "ACTIVE");
    assert_eq!(json["project_count"], 0);
    assert_eq!(json["total_contract_value"], 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_field_errors_return_400(pool: PgPool) {
    for body in [
        json!({"contact_name": ""}),
        json!({"contact_name": "Bo", "email": "not-an-email"}),
        json!({"contact_name": "Bo", "status": "DORMANT"}),
        json!({"contact_name": "Bo", "client_type": "alien"}),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/clients", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_contract_value_follows_projects(pool: PgPool) {
    let client_id = create_id(
        &pool,
        "/api/v1/clients",
        json!({"contact_name": "Cy Park", "company_name": "Park Builders", "client_type": "COMMERCIAL"}),
    )
    .await;
    for value in [100_000.0, 25_000.0] {
        create_id(
            &pool,
            "/api/v1/projects",
            json!({"name": format!("Job {value}"), "client_id": client_id, "contract_value": value}),
        )
        .await;
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/clients/{client_id}")).await).await;
    assert_eq!(json["project_count"], 2);
    assert_eq!(json["total_contract_value"], 125_000.0);

    let app = common::build_test_app(pool);
    let projects = body_json(get(app, "/api/v1/projects?sort=contract_value").await).await;
    assert_eq!(projects[0]["client_name"], "Park Builders");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_with_projects_cannot_be_deleted(pool: PgPool) {
    let client_id = create_id(&pool, "/api/v1/clients", json!({"contact_name": "Dee"})).await;
    let spare_id = create_id(&pool, "/api/v1/clients", json!({"contact_name": "Eli"})).await;
    create_id(
        &pool,
        "/api/v1/projects",
        json!({"name": "Porch", "client_id": client_id}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/clients/{client_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let report = body_json(
        post_json(
            app,
            "/api/v1/clients/bulk-delete",
            json!({"ids": [client_id, spare_id]}),
        )
        .await,
    )
    .await;
    assert_eq!(report["deleted"], json!([spare_id]));
    assert_eq!(report["constraint_errors"][0]["id"], client_id);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_crud(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/users",
        json!({
            "email": "fay@example.com",
            "first_name": "Fay",
            "last_name": "Moss",
            "role": "ESTIMATOR",
            "hire_date": "2024-02-12",
            "hourly_rate": 48.0
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["status"], "ACTIVE");
    assert_eq!(created["hire_date"], "2024-02-12");

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/users/{id}"),
        json!({
            "email": "fay@example.com",
            "first_name": "Fay",
            "last_name": "Moss",
            "role": "PROJECT_MANAGER",
            "status": "SUSPENDED"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "PROJECT_MANAGER");
    assert_eq!(json["status"], "SUSPENDED");

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/users?category=PROJECT_MANAGER").await;
    assert_eq!(response.headers().get("x-total-count").unwrap(), "1");

    let app = common::build_test_app(pool.clone());
    assert_eq!(
        delete(app, &format!("/api/v1/users/{id}")).await.status(),
        StatusCode::NO_CONTENT
    );

    let app = common::build_test_app(pool);
    assert_eq!(
        get(app, &format!("/api/v1/users/{id}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_user_email_returns_409(pool: PgPool) {
    let body = json!({"email": "gus@example.com", "first_name": "Gus", "last_name": "Lind"});
    create_id(&pool, "/api/v1/users", body.clone()).await;

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/users", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_user_role_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users",
        json!({"email": "hal@example.com", "first_name": "Hal", "last_name": "Ito", "role": "OWNER"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_defaults_and_checks(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/projects", json!({"name": "Garage"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "PLANNING");
    assert!(json["client_name"].is_null());

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects",
        json!({"name": "Orphan", "client_id": 999999}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        json!({
            "name": "Backwards",
            "start_date": "2026-05-01T00:00:00Z",
            "end_date": "2026-04-01T00:00:00Z"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_status_may_move_freely(pool: PgPool) {
    let id = create_id(&pool, "/api/v1/projects", json!({"name": "Deck", "status": "COMPLETED"})).await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/projects/{id}"),
        json!({"name": "Deck", "status": "PLANNING"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "PLANNING");
}
