//! Handler for `POST /pdf`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use buildline_core::pdf::{unavailable_message, PdfOperation};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct PdfRequest {
    pub operation: String,
}

/// POST /api/v1/pdf
///
/// Unknown operations are a 400. Known ones answer 501: no processing
/// backend is wired in, so nothing is produced.
pub async fn run_operation(Json(request): Json<PdfRequest>) -> AppResult<Response> {
    let operation = PdfOperation::from_str_value(&request.operation)?;
    tracing::warn!(%operation, "PDF operation requested but unavailable");
    Ok((
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({
            "error": unavailable_message(operation),
            "code": "NOT_IMPLEMENTED",
        })),
    )
        .into_response())
}
