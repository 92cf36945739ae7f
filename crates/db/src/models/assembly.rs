//! Assembly entity model, its bill of materials, and DTOs.

use buildline_core::export::{opt_field, CsvRow};
use buildline_core::list_view::{Listable, SortValue};
use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `assemblies` table joined with its category name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assembly {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub part_number: Option<String>,
    pub manufacturer: Option<String>,
    pub unit: String,
    pub price: f64,
    pub category_id: DbId,
    pub category_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One material line of an assembly, joined with the material's details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssemblyMaterialLine {
    pub material_id: DbId,
    pub material_name: String,
    pub unit: String,
    pub price: f64,
    pub quantity: f64,
}

/// An assembly with its bill of materials.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyWithMaterials {
    #[serde(flatten)]
    pub assembly: Assembly,
    pub materials: Vec<AssemblyMaterialLine>,
}

/// Material quantity supplied when writing an assembly.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssemblyMaterialInput {
    pub material_id: DbId,
    #[validate(range(exclusive_min = 0.0))]
    pub quantity: f64,
}

/// DTO for creating an assembly together with its materials.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssembly {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub part_number: Option<String>,
    pub manufacturer: Option<String>,
    /// Defaults to `each`.
    #[validate(length(min = 1, max = 32))]
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub category_id: DbId,
    #[serde(default)]
    #[validate(nested)]
    pub materials: Vec<AssemblyMaterialInput>,
}

/// PUT replaces the full record, including the materials list.
pub type UpdateAssembly = CreateAssembly;

impl CreateAssembly {
    /// Material ids listed more than once.
    pub fn duplicate_material_ids(&self) -> Vec<DbId> {
        let mut seen = std::collections::BTreeSet::new();
        let mut dupes: Vec<DbId> = self
            .materials
            .iter()
            .filter(|m| !seen.insert(m.material_id))
            .map(|m| m.material_id)
            .collect();
        dupes.dedup();
        dupes
    }
}

impl Listable for Assembly {
    const SORT_KEYS: &'static [&'static str] = &[
        "name",
        "part_number",
        "manufacturer",
        "price",
        "category_name",
        "created_at",
    ];

    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.name.as_str()),
            self.description.as_deref(),
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
            "price" => SortValue::number(self.price),
            "category_name" => SortValue::text(&self.category_name),
            "created_at" => SortValue::time(self.created_at),
            _ => SortValue::text(&self.name),
        }
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category_name)
    }
}

impl CsvRow for Assembly {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "part_number",
        "manufacturer",
        "unit",
        "price",
        "category",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            opt_field(&self.description),
            opt_field(&self.part_number),
            opt_field(&self.manufacturer),
            self.unit.clone(),
            format!("{:.2}", self.price),
            self.category_name.clone(),
        ]
    }
}
