//! Repository for the `users` table.

use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

const COLUMNS: &str = "id, email, first_name, last_name, role, status, phone, job_title, \
     department, hire_date, hourly_rate, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user. `role` defaults to `VIEWER` and `status` to `ACTIVE`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (email, first_name, last_name, role, status, phone, job_title, department,
                 hire_date, hourly_rate)
             VALUES ($1, $2, $3, COALESCE($4, 'VIEWER'), COALESCE($5, 'ACTIVE'), $6, $7, $8,
                     $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .bind(&input.status)
            .bind(&input.phone)
            .bind(&input.job_title)
            .bind(&input.department)
            .bind(input.hire_date)
            .bind(input.hourly_rate)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY last_name, first_name, id");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = $2,
                first_name = $3,
                last_name = $4,
                role = COALESCE($5, 'VIEWER'),
                status = COALESCE($6, 'ACTIVE'),
                phone = $7,
                job_title = $8,
                department = $9,
                hire_date = $10,
                hourly_rate = $11
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .bind(&input.status)
            .bind(&input.phone)
            .bind(&input.job_title)
            .bind(&input.department)
            .bind(input.hire_date)
            .bind(input.hourly_rate)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
