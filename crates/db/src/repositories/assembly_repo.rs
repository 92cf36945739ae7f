//! Repository for the `assemblies` table and its `assembly_materials` lines.

use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::assembly::{
    Assembly, AssemblyMaterialInput, AssemblyMaterialLine, AssemblyWithMaterials, CreateAssembly,
    UpdateAssembly,
};

/// Selected from `assemblies a JOIN assembly_categories cat`.
const COLUMNS: &str = "a.id, a.name, a.description, a.part_number, a.manufacturer, a.unit, \
     a.price, a.category_id, cat.name AS category_name, a.created_at, a.updated_at";

const FROM: &str = "assemblies a JOIN assembly_categories cat ON cat.id = a.category_id";

/// Provides CRUD operations for assemblies. The materials list is always
/// written in the same transaction as the assembly row.
pub struct AssemblyRepo;

impl AssemblyRepo {
    /// Insert an assembly and its materials.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssembly,
    ) -> Result<AssemblyWithMaterials, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO assemblies
                (name, description, part_number, manufacturer, unit, price, category_id)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'each'), COALESCE($6, 0), $7)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.part_number)
        .bind(&input.manufacturer)
        .bind(&input.unit)
        .bind(input.price)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_materials_inner(&mut tx, id, &input.materials).await?;
        tx.commit().await?;

        Self::find_with_materials(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Assembly>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE a.id = $1");
        sqlx::query_as::<_, Assembly>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Assembly>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE a.name = $1 ORDER BY a.id LIMIT 1");
        sqlx::query_as::<_, Assembly>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Find an assembly together with its material lines.
    pub async fn find_with_materials(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssemblyWithMaterials>, sqlx::Error> {
        let Some(assembly) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let materials = Self::list_materials(pool, id).await?;
        Ok(Some(AssemblyWithMaterials {
            assembly,
            materials,
        }))
    }

    /// Material lines of one assembly, ordered by material name.
    pub async fn list_materials(
        pool: &PgPool,
        assembly_id: DbId,
    ) -> Result<Vec<AssemblyMaterialLine>, sqlx::Error> {
        sqlx::query_as::<_, AssemblyMaterialLine>(
            "SELECT am.material_id, m.name AS material_name, m.unit, m.price, am.quantity
             FROM assembly_materials am
             JOIN materials m ON m.id = am.material_id
             WHERE am.assembly_id = $1
             ORDER BY m.name, am.material_id",
        )
        .bind(assembly_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Assembly>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} ORDER BY a.name, a.id");
        sqlx::query_as::<_, Assembly>(&query).fetch_all(pool).await
    }

    /// Replace an assembly and its full materials list.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssembly,
    ) -> Result<Option<AssemblyWithMaterials>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE assemblies SET
                name = $2,
                description = $3,
                part_number = $4,
                manufacturer = $5,
                unit = COALESCE($6, 'each'),
                price = COALESCE($7, 0),
                category_id = $8
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.part_number)
        .bind(&input.manufacturer)
        .bind(&input.unit)
        .bind(input.price)
        .bind(input.category_id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        Self::set_materials_inner(&mut tx, id, &input.materials).await?;
        tx.commit().await?;

        Self::find_with_materials(pool, id).await
    }

    /// Delete an assembly; its material lines cascade. Fails with a
    /// foreign-key violation while an assembly group uses it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assemblies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of assembly-group items that use this assembly.
    pub async fn count_group_usages(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM assembly_group_items WHERE assembly_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    async fn set_materials_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        assembly_id: DbId,
        materials: &[AssemblyMaterialInput],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM assembly_materials WHERE assembly_id = $1")
            .bind(assembly_id)
            .execute(&mut **tx)
            .await?;

        for line in materials {
            sqlx::query(
                "INSERT INTO assembly_materials (assembly_id, material_id, quantity)
                 VALUES ($1, $2, $3)",
            )
            .bind(assembly_id)
            .bind(line.material_id)
            .bind(line.quantity)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
