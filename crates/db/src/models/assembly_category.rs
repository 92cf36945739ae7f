//! Assembly category entity model and DTOs.

use buildline_core::list_view::{Listable, SortValue};
use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `assembly_categories` table plus its derived assembly count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssemblyCategory {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub assembly_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an assembly category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssemblyCategory {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
    #[validate(length(max = 64))]
    pub icon: Option<String>,
}

/// PUT replaces the full record.
pub type UpdateAssemblyCategory = CreateAssemblyCategory;

impl Listable for AssemblyCategory {
    const SORT_KEYS: &'static [&'static str] = &["name", "assembly_count", "created_at"];

    fn search_fields(&self) -> Vec<&str> {
        [Some(self.name.as_str()), self.description.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "assembly_count" => SortValue::Number(self.assembly_count as f64),
            "created_at" => SortValue::time(self.created_at),
            _ => SortValue::text(&self.name),
        }
    }
}
