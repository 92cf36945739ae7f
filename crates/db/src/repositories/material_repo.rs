//! Repository for the `materials` table.

use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::material::{CreateMaterial, Material, UpdateMaterial};

const COLUMNS: &str = "id, name, part_number, manufacturer, unit, price, purchase_url, \
     datasheet_file, created_at, updated_at";

/// Provides CRUD operations for materials.
pub struct MaterialRepo;

impl MaterialRepo {
    /// Insert a new material. `unit` defaults to `each` and `price` to 0.
    pub async fn create(pool: &PgPool, input: &CreateMaterial) -> Result<Material, sqlx::Error> {
        let query = format!(
            "INSERT INTO materials
                (name, part_number, manufacturer, unit, price, purchase_url, datasheet_file)
             VALUES ($1, $2, $3, COALESCE($4, 'each'), COALESCE($5, 0), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(&input.name)
            .bind(&input.part_number)
            .bind(&input.manufacturer)
            .bind(&input.unit)
            .bind(input.price)
            .bind(&input.purchase_url)
            .bind(&input.datasheet_file)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Material>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM materials WHERE id = $1");
        sqlx::query_as::<_, Material>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Material>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM materials WHERE name = $1");
        sqlx::query_as::<_, Material>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all materials ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Material>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM materials ORDER BY name, id");
        sqlx::query_as::<_, Material>(&query).fetch_all(pool).await
    }

    /// Replace every field of a material. Returns `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMaterial,
    ) -> Result<Option<Material>, sqlx::Error> {
        let query = format!(
            "UPDATE materials SET
                name = $2,
                part_number = $3,
                manufacturer = $4,
                unit = COALESCE($5, 'each'),
                price = COALESCE($6, 0),
                purchase_url = $7,
                datasheet_file = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Material>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.part_number)
            .bind(&input.manufacturer)
            .bind(&input.unit)
            .bind(input.price)
            .bind(&input.purchase_url)
            .bind(&input.datasheet_file)
            .fetch_optional(pool)
            .await
    }

    /// Delete a material. Fails with a foreign-key violation while any
    /// assembly still lists it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of assemblies that list this material.
    pub async fn count_assembly_usages(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM assembly_materials WHERE material_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
