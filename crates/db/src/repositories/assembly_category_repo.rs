//! Repository for the `assembly_categories` table.

use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::assembly_category::{
    AssemblyCategory, CreateAssemblyCategory, UpdateAssemblyCategory,
};

/// Selected from `assembly_categories c`; `assembly_count` is derived.
const COLUMNS: &str = "c.id, c.name, c.description, c.color, c.icon, \
     (SELECT COUNT(*) FROM assemblies a WHERE a.category_id = c.id) AS assembly_count, \
     c.created_at, c.updated_at";

/// Provides CRUD operations for assembly categories.
pub struct AssemblyCategoryRepo;

impl AssemblyCategoryRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssemblyCategory,
    ) -> Result<AssemblyCategory, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO assembly_categories (name, description, color, icon)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {COLUMNS} FROM c"
        );
        sqlx::query_as::<_, AssemblyCategory>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(&input.icon)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssemblyCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assembly_categories c WHERE c.id = $1");
        sqlx::query_as::<_, AssemblyCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<AssemblyCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assembly_categories c WHERE c.name = $1");
        sqlx::query_as::<_, AssemblyCategory>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<AssemblyCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assembly_categories c ORDER BY c.name, c.id");
        sqlx::query_as::<_, AssemblyCategory>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssemblyCategory,
    ) -> Result<Option<AssemblyCategory>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE assembly_categories SET
                    name = $2, description = $3, color = $4, icon = $5
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM c"
        );
        sqlx::query_as::<_, AssemblyCategory>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(&input.icon)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Fails with a foreign-key violation while it still
    /// owns assemblies.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assembly_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
