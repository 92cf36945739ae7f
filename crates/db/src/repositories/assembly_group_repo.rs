//! Repository for the `assembly_groups` and `assembly_group_items` tables.

use std::collections::HashMap;

use buildline_core::types::DbId;
use sqlx::PgPool;

use crate::models::assembly_group::{
    AssemblyGroup, AssemblyGroupItem, AssemblyGroupWithItems, CreateAssemblyGroup,
    CreateGroupItem, UpdateAssemblyGroup,
};

const COLUMNS: &str =
    "id, name, description, group_type, category_id, sort_order, created_at, updated_at";

/// Selected from `assembly_group_items i JOIN assemblies a`.
const ITEM_COLUMNS: &str = "i.id, i.group_id, i.assembly_id, a.name AS assembly_name, \
     a.price AS assembly_price, i.quantity, i.conflicts_with, i.is_default, i.sort_order, \
     i.created_at, i.updated_at";

const ITEM_FROM: &str = "assembly_group_items i JOIN assemblies a ON a.id = i.assembly_id";

/// Same join over a data-modifying CTE named `i`, so RETURNING rows are read.
const CTE_ITEM_FROM: &str = "i JOIN assemblies a ON a.id = i.assembly_id";

/// Provides CRUD operations for assembly groups and their items.
pub struct AssemblyGroupRepo;

impl AssemblyGroupRepo {
    /// Insert a group and its items in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssemblyGroup,
    ) -> Result<AssemblyGroupWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO assembly_groups (name, description, group_type, category_id, sort_order)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0))
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.group_type)
        .bind(input.category_id)
        .bind(input.sort_order)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_items_inner(&mut tx, id, &input.items).await?;
        tx.commit().await?;

        Self::find_with_items(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssemblyGroup>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assembly_groups WHERE id = $1");
        sqlx::query_as::<_, AssemblyGroup>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<AssemblyGroup>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM assembly_groups WHERE name = $1 ORDER BY id LIMIT 1");
        sqlx::query_as::<_, AssemblyGroup>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssemblyGroupWithItems>, sqlx::Error> {
        let Some(group) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let items = Self::list_items(pool, id).await?;
        Ok(Some(AssemblyGroupWithItems { group, items }))
    }

    /// Items of one group ordered by `sort_order`.
    pub async fn list_items(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<AssemblyGroupItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM {ITEM_FROM}
             WHERE i.group_id = $1
             ORDER BY i.sort_order, i.id"
        );
        sqlx::query_as::<_, AssemblyGroupItem>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    /// Every group with its items, ordered by `sort_order` then name.
    pub async fn list_with_items(pool: &PgPool) -> Result<Vec<AssemblyGroupWithItems>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assembly_groups ORDER BY sort_order, name, id");
        let groups = sqlx::query_as::<_, AssemblyGroup>(&query)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = groups.iter().map(|g| g.id).collect();
        let item_query = format!(
            "SELECT {ITEM_COLUMNS} FROM {ITEM_FROM}
             WHERE i.group_id = ANY($1)
             ORDER BY i.sort_order, i.id"
        );
        let items = sqlx::query_as::<_, AssemblyGroupItem>(&item_query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_group: HashMap<DbId, Vec<AssemblyGroupItem>> = HashMap::new();
        for item in items {
            by_group.entry(item.group_id).or_default().push(item);
        }

        Ok(groups
            .into_iter()
            .map(|group| {
                let items = by_group.remove(&group.id).unwrap_or_default();
                AssemblyGroupWithItems { group, items }
            })
            .collect())
    }

    /// Replace a group and its full item list.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssemblyGroup,
    ) -> Result<Option<AssemblyGroupWithItems>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE assembly_groups SET
                name = $2,
                description = $3,
                group_type = $4,
                category_id = $5,
                sort_order = COALESCE($6, 0)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.group_type)
        .bind(input.category_id)
        .bind(input.sort_order)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        Self::set_items_inner(&mut tx, id, &input.items).await?;
        tx.commit().await?;

        Self::find_with_items(pool, id).await
    }

    /// Delete a group; its items cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assembly_groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append one item to a group. A duplicate assembly violates
    /// `uq_assembly_group_items_group_assembly`.
    pub async fn add_item(
        pool: &PgPool,
        group_id: DbId,
        input: &CreateGroupItem,
    ) -> Result<AssemblyGroupItem, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                INSERT INTO assembly_group_items
                    (group_id, assembly_id, quantity, conflicts_with, is_default, sort_order)
                VALUES ($1, $2, $3, $4, $5,
                    COALESCE($6, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                                  FROM assembly_group_items WHERE group_id = $1)))
                RETURNING *
             )
             SELECT {ITEM_COLUMNS} FROM {CTE_ITEM_FROM}"
        );
        sqlx::query_as::<_, AssemblyGroupItem>(&query)
            .bind(group_id)
            .bind(input.assembly_id)
            .bind(input.quantity())
            .bind(&input.conflicts_with)
            .bind(input.is_default)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Set an item's quantity directly. Last write wins.
    ///
    /// Returns `None` if the group has no item for `assembly_id`.
    pub async fn update_item_quantity(
        pool: &PgPool,
        group_id: DbId,
        assembly_id: DbId,
        quantity: i32,
    ) -> Result<Option<AssemblyGroupItem>, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                UPDATE assembly_group_items SET quantity = $3
                WHERE group_id = $1 AND assembly_id = $2
                RETURNING *
             )
             SELECT {ITEM_COLUMNS} FROM {CTE_ITEM_FROM}"
        );
        sqlx::query_as::<_, AssemblyGroupItem>(&query)
            .bind(group_id)
            .bind(assembly_id)
            .bind(quantity)
            .fetch_optional(pool)
            .await
    }

    /// Remove one item from a group and strip it from its siblings'
    /// `conflicts_with` lists.
    pub async fn remove_item(
        pool: &PgPool,
        group_id: DbId,
        assembly_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result =
            sqlx::query("DELETE FROM assembly_group_items WHERE group_id = $1 AND assembly_id = $2")
                .bind(group_id)
                .bind(assembly_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() > 0 {
            sqlx::query(
                "UPDATE assembly_group_items
                 SET conflicts_with = array_remove(conflicts_with, $2)
                 WHERE group_id = $1 AND $2 = ANY(conflicts_with)",
            )
            .bind(group_id)
            .bind(assembly_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_items_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        group_id: DbId,
        items: &[CreateGroupItem],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM assembly_group_items WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut **tx)
            .await?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO assembly_group_items
                    (group_id, assembly_id, quantity, conflicts_with, is_default, sort_order)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(group_id)
            .bind(item.assembly_id)
            .bind(item.quantity())
            .bind(&item.conflicts_with)
            .bind(item.is_default)
            .bind(item.sort_order.unwrap_or(position as i32))
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
