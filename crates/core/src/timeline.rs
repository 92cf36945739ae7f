//! Timeline, milestone and task vocabularies plus the small amount of date
//! arithmetic the timeline endpoints need.
//!
//! Statuses carry no transition rules: any value may replace any other on a
//! full-record update. Stored progress fields are never reconciled with each
//! other; [`rollup_progress`] only produces a read-time figure.

use crate::define_str_enum;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

define_str_enum! {
    /// Timeline status.
    TimelineStatus("timeline status") {
        Planning = "PLANNING",
        InProgress = "IN_PROGRESS",
        OnHold = "ON_HOLD",
        Completed = "COMPLETED",
        Cancelled = "CANCELLED",
    }
}

define_str_enum! {
    /// Milestone status.
    MilestoneStatus("milestone status") {
        Pending = "PENDING",
        InProgress = "IN_PROGRESS",
        Completed = "COMPLETED",
        Delayed = "DELAYED",
        Cancelled = "CANCELLED",
    }
}

define_str_enum! {
    /// Task status.
    TaskStatus("task status") {
        NotStarted = "NOT_STARTED",
        InProgress = "IN_PROGRESS",
        Completed = "COMPLETED",
        Blocked = "BLOCKED",
        Cancelled = "CANCELLED",
    }
}

define_str_enum! {
    /// Kind of work a task represents.
    TaskType("task type") {
        General = "GENERAL",
        Construction = "CONSTRUCTION",
        Inspection = "INSPECTION",
        Delivery = "DELIVERY",
        Permit = "PERMIT",
        Meeting = "MEETING",
    }
}

define_str_enum! {
    /// Task priority.
    TaskPriority("task priority") {
        Low = "LOW",
        Medium = "MEDIUM",
        High = "HIGH",
        Critical = "CRITICAL",
    }
}

/// Whole days between two instants, never negative.
pub fn duration_days(start: Timestamp, end: Timestamp) -> i32 {
    let days = (end - start).num_days();
    days.clamp(0, i32::MAX as i64) as i32
}

/// Use the caller's duration when given, otherwise derive it from the dates.
///
/// Returns `None` when neither is available (open-ended timeline).
pub fn resolve_duration(
    explicit: Option<i32>,
    start: Timestamp,
    end: Option<Timestamp>,
) -> Option<i32> {
    explicit.or_else(|| end.map(|e| duration_days(start, e)))
}

/// Reject a range whose end precedes its start.
pub fn validate_date_order(
    start: Timestamp,
    end: Timestamp,
    start_field: &str,
    end_field: &str,
) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "{end_field} must not be before {start_field}"
        )));
    }
    Ok(())
}

/// A milestone may depend on another milestone of the same timeline, never
/// on itself.
pub fn validate_milestone_dependency(
    milestone_id: Option<DbId>,
    depends_on: Option<DbId>,
    dependency_timeline_id: Option<DbId>,
    timeline_id: DbId,
) -> Result<(), CoreError> {
    let Some(dep) = depends_on else {
        return Ok(());
    };
    if milestone_id == Some(dep) {
        return Err(CoreError::Validation(
            "A milestone cannot depend on itself".to_string(),
        ));
    }
    match dependency_timeline_id {
        Some(tl) if tl == timeline_id => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "depends_on milestone {dep} does not belong to timeline {timeline_id}"
        ))),
    }
}

/// Mean task progress rounded to the nearest integer; 0 without tasks.
pub fn rollup_progress(task_progress: &[i32]) -> i32 {
    if task_progress.is_empty() {
        return 0;
    }
    let sum: i64 = task_progress.iter().map(|&p| p as i64).sum();
    let mean = sum as f64 / task_progress.len() as f64;
    mean.round().clamp(0.0, 100.0) as i32
}
