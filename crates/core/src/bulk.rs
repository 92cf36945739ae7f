//! Bulk delete accounting.
//!
//! Bulk deletes run one id at a time and never roll back: each id lands in
//! exactly one bucket of the [`BulkDeleteReport`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum ids accepted by one bulk request.
pub const MAX_BULK_IDS: usize = 500;

/// Request body for `POST /{resource}/bulk-delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

impl BulkDeleteRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.ids.is_empty() {
            return Err(CoreError::Validation("ids must not be empty".to_string()));
        }
        if self.ids.len() > MAX_BULK_IDS {
            return Err(CoreError::Validation(format!(
                "at most {MAX_BULK_IDS} ids per request, got {}",
                self.ids.len()
            )));
        }
        Ok(())
    }
}

/// Result of deleting one id.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOutcome {
    Deleted,
    /// Blocked by a dependent row or constraint (409-class).
    ConstraintError(String),
    /// Anything else: missing row, unexpected database failure.
    OtherError(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkFailure {
    pub id: DbId,
    pub message: String,
}

/// Partitioned outcome of a bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkDeleteReport {
    pub deleted: Vec<DbId>,
    pub constraint_errors: Vec<BulkFailure>,
    pub other_errors: Vec<BulkFailure>,
    pub deleted_count: usize,
    pub constraint_error_count: usize,
    pub other_error_count: usize,
}

impl BulkDeleteReport {
    pub fn record(&mut self, id: DbId, outcome: BulkOutcome) {
        match outcome {
            BulkOutcome::Deleted => {
                self.deleted.push(id);
                self.deleted_count += 1;
            }
            BulkOutcome::ConstraintError(message) => {
                self.constraint_errors.push(BulkFailure { id, message });
                self.constraint_error_count += 1;
            }
            BulkOutcome::OtherError(message) => {
                self.other_errors.push(BulkFailure { id, message });
                self.other_error_count += 1;
            }
        }
    }

    pub fn attempted(&self) -> usize {
        self.deleted_count + self.constraint_error_count + self.other_error_count
    }
}
