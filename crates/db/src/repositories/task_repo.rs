//! Repository for the `tasks` table.

use buildline_core::timeline::resolve_duration;
use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

const COLUMNS: &str = "id, timeline_id, milestone_id, name, description, task_type, \
     planned_start, planned_end, duration, progress, status, priority, created_at, updated_at";

/// Provides CRUD operations for tasks, scoped to a timeline.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task. `duration` is derived from the planned dates when the
    /// caller leaves it out.
    pub async fn create(
        pool: &PgPool,
        timeline_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (timeline_id, milestone_id, name, description, task_type, planned_start,
                 planned_end, duration, progress, status, priority)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'GENERAL'), $6, $7, $8, COALESCE($9, 0),
                     COALESCE($10, 'NOT_STARTED'), COALESCE($11, 'MEDIUM'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(timeline_id)
            .bind(input.milestone_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.task_type)
            .bind(input.planned_start)
            .bind(input.planned_end)
            .bind(resolve_duration(input.duration, input.planned_start, Some(input.planned_end)))
            .bind(input.progress)
            .bind(&input.status)
            .bind(&input.priority)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        timeline_id: DbId,
        id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND timeline_id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(timeline_id)
            .fetch_optional(pool)
            .await
    }

    /// Tasks of one timeline ordered by planned start.
    pub async fn list_by_timeline(pool: &PgPool, timeline_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE timeline_id = $1 ORDER BY planned_start, id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(timeline_id)
            .fetch_all(pool)
            .await
    }

    /// Tasks of several timelines ordered by planned start.
    pub async fn list_by_timelines(
        pool: &PgPool,
        timeline_ids: &[DbId],
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE timeline_id = ANY($1) ORDER BY planned_start, id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(timeline_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_milestone(pool: &PgPool, milestone_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE milestone_id = $1")
            .bind(milestone_id)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        timeline_id: DbId,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                milestone_id = $3,
                name = $4,
                description = $5,
                task_type = COALESCE($6, 'GENERAL'),
                planned_start = $7,
                planned_end = $8,
                duration = $9,
                progress = COALESCE($10, 0),
                status = COALESCE($11, 'NOT_STARTED'),
                priority = COALESCE($12, 'MEDIUM')
             WHERE id = $1 AND timeline_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(timeline_id)
            .bind(input.milestone_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.task_type)
            .bind(input.planned_start)
            .bind(input.planned_end)
            .bind(resolve_duration(input.duration, input.planned_start, Some(input.planned_end)))
            .bind(input.progress)
            .bind(&input.status)
            .bind(&input.priority)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, timeline_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND timeline_id = $2")
            .bind(id)
            .bind(timeline_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
