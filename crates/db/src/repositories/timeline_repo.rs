//! Repository for the `timelines` table.

use buildline_core::timeline::resolve_duration;
use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::timeline::{CreateTimeline, Timeline, UpdateTimeline};

const COLUMNS: &str =
    "id, project_id, start_date, end_date, duration, progress, status, created_at, updated_at";

/// Provides CRUD operations for project timelines.
pub struct TimelineRepo;

impl TimelineRepo {
    /// Insert the timeline of a project. A second timeline for the same
    /// project violates `uq_timelines_project_id`.
    ///
    /// `duration` is derived from the dates when the caller leaves it out.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTimeline,
    ) -> Result<Timeline, sqlx::Error> {
        let query = format!(
            "INSERT INTO timelines (project_id, start_date, end_date, duration, progress, status)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, 'PLANNING'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Timeline>(&query)
            .bind(project_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(resolve_duration(input.duration, input.start_date, input.end_date))
            .bind(input.progress)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Timeline>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM timelines WHERE id = $1");
        sqlx::query_as::<_, Timeline>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<Timeline>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM timelines WHERE project_id = $1");
        sqlx::query_as::<_, Timeline>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the timeline of a project. Returns `None` if it has none.
    pub async fn update_by_project(
        pool: &PgPool,
        project_id: DbId,
        input: &UpdateTimeline,
    ) -> Result<Option<Timeline>, sqlx::Error> {
        let query = format!(
            "UPDATE timelines SET
                start_date = $2,
                end_date = $3,
                duration = $4,
                progress = COALESCE($5, 0),
                status = COALESCE($6, 'PLANNING')
             WHERE project_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Timeline>(&query)
            .bind(project_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(resolve_duration(input.duration, input.start_date, input.end_date))
            .bind(input.progress)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete the timeline of a project; milestones and tasks cascade.
    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM timelines WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
