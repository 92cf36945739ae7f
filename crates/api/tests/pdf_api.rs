//! HTTP tests for the PDF tools endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn known_operations_answer_not_implemented(pool: PgPool) {
    for operation in ["split", "compress", "rotate", "protect", "organize", "merge"] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/pdf", json!({"operation": operation})).await;
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED, "{operation}");

        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_IMPLEMENTED");
        assert!(json["error"].as_str().unwrap().contains(operation));
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_operation_is_a_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/pdf", json!({"operation": "ocr"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
