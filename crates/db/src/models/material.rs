//! Material entity model and DTOs.

use buildline_core::export::{opt_field, CsvRow};
use buildline_core::list_view::{Listable, SortValue};
use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `materials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Material {
    pub id: DbId,
    pub name: String,
    pub part_number: Option<String>,
    pub manufacturer: Option<String>,
    pub unit: String,
    pub price: f64,
    pub purchase_url: Option<String>,
    pub datasheet_file: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a material.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaterial {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub part_number: Option<String>,
    pub manufacturer: Option<String>,
    /// Defaults to `each`.
    #[validate(length(min = 1, max = 32))]
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(url)]
    pub purchase_url: Option<String>,
    pub datasheet_file: Option<String>,
}

/// PUT replaces the full record.
pub type UpdateMaterial = CreateMaterial;

impl Listable for Material {
    const SORT_KEYS: &'static [&'static str] =
        &["name", "part_number", "manufacturer", "unit", "price", "created_at"];

    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.name.as_str()),
            self.part_number.as_deref(),
            self.manufacturer.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "part_number" => SortValue::opt_text(self.part_number.as_deref()),
            "manufacturer" => SortValue::opt_text(self.manufacturer.as_deref()),
            "unit" => SortValue::text(&self.unit),
            "price" => SortValue::number(self.price),
            "created_at" => SortValue::time(self.created_at),
            _ => SortValue::text(&self.name),
        }
    }
}

impl CsvRow for Material {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "part_number",
        "manufacturer",
        "unit",
        "price",
        "purchase_url",
        "datasheet_file",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            opt_field(&self.part_number),
            opt_field(&self.manufacturer),
            self.unit.clone(),
            format!("{:.2}", self.price),
            opt_field(&self.purchase_url),
            opt_field(&self.datasheet_file),
        ]
    }
}
