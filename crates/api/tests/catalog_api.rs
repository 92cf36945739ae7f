//! HTTP tests for materials, assembly categories and assemblies.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_id, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

async fn create_material(pool: &PgPool, name: &str, price: f64) -> i64 {
    create_id(
        pool,
        "/api/v1/materials",
        json!({"name": name, "unit": "ft", "price": price}),
    )
    .await
}

async fn create_category(pool: &PgPool, name: &str) -> i64 {
    create_id(pool, "/api/v1/assembly-categories", json!({"name": name})).await
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_material_applies_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/materials", json!({"name": "Anchor Bolt"})).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Anchor Bolt");
    assert_eq!(json["unit"], "each");
    assert_eq!(json["price"], 0.0);
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_material_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/materials", json!({"name": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/materials",
        json!({"name": "Pipe", "price": -1.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_material_name_returns_409(pool: PgPool) {
    create_material(&pool, "Copper Pipe", 12.0).await;

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/materials", json!({"name": "Copper Pipe"})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "A material with this name already exists"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_material_replaces_the_record(pool: PgPool) {
    let id = create_material(&pool, "Rebar", 4.0).await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/materials/{id}"),
        json!({"name": "Rebar #4", "price": 4.5}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Rebar #4");
    assert_eq!(json["price"], 4.5);
    // Omitted on a full replace, so back to the default.
    assert_eq!(json["unit"], "each");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_material_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    assert_eq!(
        get(app, "/api/v1/materials/999999").await.status(),
        StatusCode::NOT_FOUND
    );

    let app = common::build_test_app(pool);
    assert_eq!(
        delete(app, "/api/v1/materials/999999").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn material_used_by_assembly_cannot_be_deleted(pool: PgPool) {
    let material_id = create_material(&pool, "Drywall Sheet", 11.0).await;
    let category_id = create_category(&pool, "Walls").await;
    create_id(
        &pool,
        "/api/v1/assemblies",
        json!({
            "name": "Interior Wall",
            "category_id": category_id,
            "materials": [{"material_id": material_id, "quantity": 8.0}]
        }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/materials/{material_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/materials/{material_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Assembly categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_reports_assembly_count_and_blocks_delete(pool: PgPool) {
    let category_id = create_id(
        &pool,
        "/api/v1/assembly-categories",
        json!({"name": "Framing", "color": "#aa5500"}),
    )
    .await;
    create_id(
        &pool,
        "/api/v1/assemblies",
        json!({"name": "Stud Wall", "category_id": category_id}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/assembly-categories/{category_id}")).await).await;
    assert_eq!(json["assembly_count"], 1);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/assembly-categories/{category_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Assemblies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn assembly_is_returned_with_material_lines(pool: PgPool) {
    let pipe = create_material(&pool, "PVC Pipe", 3.0).await;
    let glue = create_material(&pool, "PVC Cement", 9.0).await;
    let category_id = create_category(&pool, "Plumbing").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/assemblies",
        json!({
            "name": "Drain Line",
            "category_id": category_id,
            "price": 120.0,
            "materials": [
                {"material_id": pipe, "quantity": 10.0},
                {"material_id": glue, "quantity": 1.0}
            ]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["materials"].as_array().unwrap().len(), 2);

    // PUT replaces the material lines wholesale.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/assemblies/{id}"),
        json!({
            "name": "Drain Line",
            "category_id": category_id,
            "price": 130.0,
            "materials": [{"material_id": glue, "quantity": 2.0}]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/assemblies/{id}")).await).await;
    let lines = json["materials"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["material_name"], "PVC Cement");
    assert_eq!(lines[0]["quantity"], 2.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assembly_with_unknown_material_is_rejected(pool: PgPool) {
    let category_id = create_category(&pool, "Misc").await;
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/assemblies",
        json!({
            "name": "Ghost",
            "category_id": category_id,
            "materials": [{"material_id": 999999, "quantity": 1.0}]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was written.
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/assemblies").await;
    assert_eq!(response.headers().get("x-total-count").unwrap(), "0");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assembly_with_duplicate_material_lines_is_rejected(pool: PgPool) {
    let pipe = create_material(&pool, "Steel Pipe", 20.0).await;
    let category_id = create_category(&pool, "Gas").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/assemblies",
        json!({
            "name": "Gas Line",
            "category_id": category_id,
            "materials": [
                {"material_id": pipe, "quantity": 1.0},
                {"material_id": pipe, "quantity": 2.0}
            ]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
