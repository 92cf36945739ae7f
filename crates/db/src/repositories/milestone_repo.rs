//! Repository for the `milestones` table.

use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};

const COLUMNS: &str = "id, timeline_id, name, description, due_date, status, progress, \
     depends_on, created_at, updated_at";

/// Provides CRUD operations for milestones. Every lookup is scoped to a
/// timeline so ids from another timeline behave as missing.
pub struct MilestoneRepo;

impl MilestoneRepo {
    pub async fn create(
        pool: &PgPool,
        timeline_id: DbId,
        input: &CreateMilestone,
    ) -> Result<Milestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO milestones
                (timeline_id, name, description, due_date, status, progress, depends_on)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'PENDING'), COALESCE($6, 0), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(timeline_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(&input.status)
            .bind(input.progress)
            .bind(input.depends_on)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        timeline_id: DbId,
        id: DbId,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE id = $1 AND timeline_id = $2");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(timeline_id)
            .fetch_optional(pool)
            .await
    }

    /// Timeline a milestone belongs to, regardless of scope.
    pub async fn timeline_of(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT timeline_id FROM milestones WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Milestones of one timeline ordered by due date.
    pub async fn list_by_timeline(
        pool: &PgPool,
        timeline_id: DbId,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones WHERE timeline_id = $1 ORDER BY due_date, id"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(timeline_id)
            .fetch_all(pool)
            .await
    }

    /// Milestones of several timelines ordered by due date.
    pub async fn list_by_timelines(
        pool: &PgPool,
        timeline_ids: &[DbId],
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones WHERE timeline_id = ANY($1) ORDER BY due_date, id"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(timeline_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        timeline_id: DbId,
        id: DbId,
        input: &UpdateMilestone,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                name = $3,
                description = $4,
                due_date = $5,
                status = COALESCE($6, 'PENDING'),
                progress = COALESCE($7, 0),
                depends_on = $8
             WHERE id = $1 AND timeline_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(timeline_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(&input.status)
            .bind(input.progress)
            .bind(input.depends_on)
            .fetch_optional(pool)
            .await
    }

    /// Delete a milestone; its tasks cascade and dependants lose their
    /// `depends_on`.
    pub async fn delete(pool: &PgPool, timeline_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM milestones WHERE id = $1 AND timeline_id = $2")
            .bind(id)
            .bind(timeline_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
