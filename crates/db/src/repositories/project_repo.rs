//! Repository for the `projects` table.

use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Selected from `projects p` with the client's display name.
const COLUMNS: &str = "p.id, p.name, p.description, p.client_id, \
     (SELECT COALESCE(cl.company_name, cl.contact_name) FROM clients cl WHERE cl.id = p.client_id) \
        AS client_name, \
     p.status, p.contract_value, p.start_date, p.end_date, p.created_at, p.updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project. `status` defaults to `PLANNING`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "WITH p AS (
                INSERT INTO projects
                    (name, description, client_id, status, contract_value, start_date, end_date)
                VALUES ($1, $2, $3, COALESCE($4, 'PLANNING'), COALESCE($5, 0), $6, $7)
                RETURNING *
             )
             SELECT {COLUMNS} FROM p"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.client_id)
            .bind(&input.status)
            .bind(input.contract_value)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects p WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects p ORDER BY p.created_at DESC, p.id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "WITH p AS (
                UPDATE projects SET
                    name = $2,
                    description = $3,
                    client_id = $4,
                    status = COALESCE($5, 'PLANNING'),
                    contract_value = COALESCE($6, 0),
                    start_date = $7,
                    end_date = $8
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM p"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.client_id)
            .bind(&input.status)
            .bind(input.contract_value)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project; its timeline, milestones and tasks cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
