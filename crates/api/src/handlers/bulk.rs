//! Shared driver for `POST /{resource}/bulk-delete`.

use std::future::Future;

use axum::http::StatusCode;
use buildline_core::bulk::{BulkDeleteReport, BulkDeleteRequest, BulkOutcome};
use buildline_core::types::DbId;

use crate::error::{AppError, AppResult};

/// Delete `request.ids` one at a time, in order, through the same path as
/// the single-record DELETE. Nothing is rolled back when an id fails.
pub async fn run_bulk_delete<F, Fut>(
    entity: &'static str,
    request: &BulkDeleteRequest,
    mut delete_one: F,
) -> AppResult<BulkDeleteReport>
where
    F: FnMut(DbId) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    request.validate()?;

    let mut report = BulkDeleteReport::default();
    for &id in &request.ids {
        let outcome = match delete_one(id).await {
            Ok(()) => BulkOutcome::Deleted,
            Err(err) => classify(&err),
        };
        report.record(id, outcome);
    }

    tracing::info!(
        entity,
        attempted = report.attempted(),
        deleted = report.deleted_count,
        constraint_errors = report.constraint_error_count,
        other_errors = report.other_error_count,
        "Bulk delete finished"
    );
    Ok(report)
}

fn classify(err: &AppError) -> BulkOutcome {
    let (status, _, message) = err.parts();
    if status == StatusCode::CONFLICT {
        BulkOutcome::ConstraintError(message)
    } else {
        BulkOutcome::OtherError(message)
    }
}

#[cfg(test)]
mod tests {
    use buildline_core::error::CoreError;

    use super::*;

    #[tokio::test]
    async fn failures_are_partitioned_and_processing_continues() {
        let request = BulkDeleteRequest { ids: vec![1, 2, 3, 4] };
        let report = run_bulk_delete("Widget", &request, |id| async move {
            match id {
                2 => Err(AppError::Core(CoreError::Conflict("in use".into()))),
                3 => Err(AppError::Core(CoreError::NotFound { entity: "Widget", id })),
                _ => Ok(()),
            }
        })
        .await
        .unwrap();

        assert_eq!(report.deleted, vec![1, 4]);
        assert_eq!(report.constraint_errors.len(), 1);
        assert_eq!(report.constraint_errors[0].id, 2);
        assert_eq!(report.other_errors[0].message, "Widget with id 3 not found");
    }

    #[tokio::test]
    async fn empty_request_is_rejected() {
        let request = BulkDeleteRequest { ids: vec![] };
        let result = run_bulk_delete("Widget", &request, |_| async { Ok(()) }).await;
        assert!(result.is_err());
    }
}
