//! Shared response types for API handlers.
//!
//! List endpoints return the page of records as a bare JSON array and report
//! the filtered total in the `x-total-count` header. Exports return CSV.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderName;
use axum::response::{IntoResponse, Response};
use axum::Json;
use buildline_core::export::{build_csv, CsvRow};
use buildline_core::list_view::ListPage;
use serde::Serialize;

/// Header carrying the filtered record count of a list response.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// One page of a list endpoint.
#[derive(Debug)]
pub struct ListResponse<T>(pub ListPage<T>);

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        let ListPage { items, total, .. } = self.0;
        (
            [(HeaderName::from_static(TOTAL_COUNT_HEADER), total.to_string())],
            Json(items),
        )
            .into_response()
    }
}

/// A `text/csv` attachment named `{filename}.csv`.
#[derive(Debug)]
pub struct CsvResponse {
    pub filename: &'static str,
    pub body: String,
}

impl CsvResponse {
    pub fn from_records<T: CsvRow>(filename: &'static str, records: &[T]) -> Self {
        Self {
            filename,
            body: build_csv(records),
        }
    }
}

impl IntoResponse for CsvResponse {
    fn into_response(self) -> Response {
        (
            [
                (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.csv\"", self.filename),
                ),
            ],
            self.body,
        )
            .into_response()
    }
}
