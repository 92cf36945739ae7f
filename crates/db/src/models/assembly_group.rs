//! Assembly group entity model and DTOs.

use buildline_core::assembly_group::{GroupItemSpec, MIN_ITEM_QUANTITY};
use buildline_core::list_view::{Listable, SortValue};
use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `assembly_groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssemblyGroup {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub group_type: String,
    pub category_id: Option<DbId>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `assembly_group_items` joined with the assembly's name and price.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssemblyGroupItem {
    pub id: DbId,
    pub group_id: DbId,
    pub assembly_id: DbId,
    pub assembly_name: String,
    pub assembly_price: f64,
    pub quantity: i32,
    pub conflicts_with: Vec<DbId>,
    pub is_default: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AssemblyGroupItem {
    pub fn spec(&self) -> GroupItemSpec {
        GroupItemSpec {
            assembly_id: self.assembly_id,
            quantity: self.quantity,
            is_default: self.is_default,
            conflicts_with: self.conflicts_with.clone(),
        }
    }
}

/// A group with its items, ordered by `sort_order`.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyGroupWithItems {
    #[serde(flatten)]
    pub group: AssemblyGroup,
    pub items: Vec<AssemblyGroupItem>,
}

/// Item supplied when writing a group or adding to one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupItem {
    pub assembly_id: DbId,
    /// Defaults to 1.
    pub quantity: Option<i32>,
    #[serde(default)]
    pub conflicts_with: Vec<DbId>,
    #[serde(default)]
    pub is_default: bool,
    pub sort_order: Option<i32>,
}

impl CreateGroupItem {
    pub fn quantity(&self) -> i32 {
        self.quantity.unwrap_or(MIN_ITEM_QUANTITY)
    }

    pub fn spec(&self) -> GroupItemSpec {
        GroupItemSpec {
            assembly_id: self.assembly_id,
            quantity: self.quantity(),
            is_default: self.is_default,
            conflicts_with: self.conflicts_with.clone(),
        }
    }
}

/// DTO for creating a group together with its items.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssemblyGroup {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub group_type: String,
    pub category_id: Option<DbId>,
    pub sort_order: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<CreateGroupItem>,
}

/// PUT replaces the full record, including the item list.
pub type UpdateAssemblyGroup = CreateAssemblyGroup;

impl CreateAssemblyGroup {
    pub fn item_specs(&self) -> Vec<GroupItemSpec> {
        self.items.iter().map(CreateGroupItem::spec).collect()
    }
}

/// Body of `PATCH /assembly-groups/{id}/items/{assembly_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchItemQuantity {
    pub quantity: i32,
}

/// Body of `POST /assembly-groups/{id}/validate-selection`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateSelectionRequest {
    /// Omitted means "evaluate the group's default selection".
    pub assembly_ids: Option<Vec<DbId>>,
}

impl Listable for AssemblyGroupWithItems {
    const SORT_KEYS: &'static [&'static str] =
        &["name", "group_type", "sort_order", "item_count", "created_at"];

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.group.name.as_str()];
        fields.extend(self.group.description.as_deref());
        fields.extend(self.items.iter().map(|i| i.assembly_name.as_str()));
        fields
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "group_type" => SortValue::text(&self.group.group_type),
            "sort_order" => SortValue::number(self.group.sort_order),
            "item_count" => SortValue::Number(self.items.len() as f64),
            "created_at" => SortValue::time(self.group.created_at),
            _ => SortValue::text(&self.group.name),
        }
    }

    /// The group type doubles as the filterable category.
    fn category(&self) -> Option<&str> {
        Some(&self.group.group_type)
    }
}
