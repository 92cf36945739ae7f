//! HTTP tests for the shared list view, CSV export and bulk delete.

mod common;

use axum::http::StatusCode;
use buildline_core::export::parse_csv;
use common::{body_json, body_text, create_id, get, post_json};
use serde_json::json;
use sqlx::PgPool;

async fn seed_materials(pool: &PgPool) -> Vec<i64> {
    let mut ids = Vec::new();
    for (name, manufacturer, price) in [
        ("Copper Pipe 1/2\"", "Mueller", 12.5),
        ("Copper Elbow", "Mueller", 1.75),
        ("Drywall, 4x8", "USG", 11.0),
        ("Anchor Bolt", "Simpson", 0.5),
    ] {
        ids.push(
            create_id(
                pool,
                "/api/v1/materials",
                json!({"name": name, "manufacturer": manufacturer, "price": price}),
            )
            .await,
        );
    }
    ids
}

fn names(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_sort_and_total_header(pool: PgPool) {
    seed_materials(&pool).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/materials?q=copper&sort=price&dir=desc").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-total-count").unwrap(), "2");

    let json = body_json(response).await;
    assert_eq!(names(&json), vec!["Copper Pipe 1/2\"", "Copper Elbow"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pagination_keeps_the_filtered_total(pool: PgPool) {
    seed_materials(&pool).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/materials?sort=name&page=2&page_size=3").await;
    assert_eq!(response.headers().get("x-total-count").unwrap(), "4");

    let json = body_json(response).await;
    assert_eq!(names(&json), vec!["Drywall, 4x8"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_sort_key_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/materials?sort=colour").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/materials/export?sort=colour").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_row_count_matches_list_total(pool: PgPool) {
    seed_materials(&pool).await;

    let app = common::build_test_app(pool.clone());
    let listed = get(app, "/api/v1/materials?page_size=1").await;
    let total: usize = listed
        .headers()
        .get("x-total-count")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/materials/export").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("materials.csv"));

    let rows = parse_csv(&body_text(response).await);
    assert_eq!(rows[0][1], "name");
    assert_eq!(rows.len() - 1, total);
    // Embedded quotes and commas survive the round trip.
    let csv_names: Vec<&str> = rows[1..].iter().map(|r| r[1].as_str()).collect();
    assert!(csv_names.contains(&"Copper Pipe 1/2\""));
    assert!(csv_names.contains(&"Drywall, 4x8"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_without_records_is_header_only(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/clients/export").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_csv(&body_text(response).await).len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_filter_on_clients(pool: PgPool) {
    create_id(&pool, "/api/v1/clients", json!({"contact_name": "Ada Reyes"})).await;
    create_id(
        &pool,
        "/api/v1/clients",
        json!({"contact_name": "Ben Ochoa", "status": "PROSPECT"}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/clients?status=PROSPECT").await;
    assert_eq!(response.headers().get("x-total-count").unwrap(), "1");
    let json = body_json(response).await;
    assert_eq!(json[0]["contact_name"], "Ben Ochoa");
}

// ---------------------------------------------------------------------------
// Bulk delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_delete_partitions_outcomes(pool: PgPool) {
    let ids = seed_materials(&pool).await;
    let category_id = create_id(&pool, "/api/v1/assembly-categories", json!({"name": "Plumbing"})).await;
    create_id(
        &pool,
        "/api/v1/assemblies",
        json!({
            "name": "Supply Line",
            "category_id": category_id,
            "materials": [{"material_id": ids[0], "quantity": 5.0}]
        }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/materials/bulk-delete",
        json!({"ids": [ids[0], ids[1], 999999, ids[3]]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    assert_eq!(report["deleted"], json!([ids[1], ids[3]]));
    assert_eq!(report["deleted_count"], 2);
    assert_eq!(report["constraint_errors"][0]["id"], ids[0]);
    assert_eq!(report["constraint_error_count"], 1);
    assert_eq!(report["other_errors"][0]["id"], 999999);
    assert_eq!(report["other_error_count"], 1);

    // Nothing rolled back: two of the four materials remain.
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/materials").await;
    assert_eq!(response.headers().get("x-total-count").unwrap(), "2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_delete_requires_ids(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/users/bulk-delete", json!({"ids": []})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
