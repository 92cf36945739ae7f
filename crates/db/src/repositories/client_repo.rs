//! Repository for the `clients` table.

use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, CreateClient, UpdateClient};

/// Selected from `clients c`; the project aggregates are derived on read.
const COLUMNS: &str = "c.id, c.client_type, c.category, c.status, c.company_name, \
     c.contact_name, c.email, c.phone, c.address, c.city, c.state, c.postal_code, c.notes, \
     c.outstanding_balance, \
     COALESCE((SELECT SUM(p.contract_value) FROM projects p WHERE p.client_id = c.id), 0) \
        AS total_contract_value, \
     (SELECT COUNT(*) FROM projects p WHERE p.client_id = c.id) AS project_count, \
     c.created_at, c.updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO clients
                    (client_type, category, status, company_name, contact_name, email, phone,
                     address, city, state, postal_code, notes, outstanding_balance)
                VALUES (COALESCE($1, 'RESIDENTIAL'), $2, COALESCE($3, 'ACTIVE'), $4, $5, $6, $7,
                        $8, $9, $10, $11, $12, COALESCE($13, 0))
                RETURNING *
             )
             SELECT {COLUMNS} FROM c"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.client_type)
            .bind(&input.category)
            .bind(&input.status)
            .bind(&input.company_name)
            .bind(&input.contact_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.postal_code)
            .bind(&input.notes)
            .bind(input.outstanding_balance)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients c WHERE c.id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Match on email, case-insensitively. Used by the seeder to skip
    /// clients that already exist.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Client>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM clients c WHERE lower(c.email) = lower($1) LIMIT 1");
        sqlx::query_as::<_, Client>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients c ORDER BY c.contact_name, c.id");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE clients SET
                    client_type = COALESCE($2, 'RESIDENTIAL'),
                    category = $3,
                    status = COALESCE($4, 'ACTIVE'),
                    company_name = $5,
                    contact_name = $6,
                    email = $7,
                    phone = $8,
                    address = $9,
                    city = $10,
                    state = $11,
                    postal_code = $12,
                    notes = $13,
                    outstanding_balance = COALESCE($14, 0)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM c"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.client_type)
            .bind(&input.category)
            .bind(&input.status)
            .bind(&input.company_name)
            .bind(&input.contact_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.postal_code)
            .bind(&input.notes)
            .bind(input.outstanding_balance)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client. Fails with a foreign-key violation while it still
    /// has projects.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
