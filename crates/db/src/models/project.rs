//! Project entity model and DTOs.

use buildline_core::export::{opt_field, CsvRow};
use buildline_core::list_view::{Listable, SortValue};
use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table joined with the client's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub client_id: Option<DbId>,
    pub client_name: Option<String>,
    pub status: String,
    pub contract_value: f64,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub client_id: Option<DbId>,
    /// Defaults to `PLANNING`.
    pub status: Option<String>,
    #[validate(range(min = 0.0))]
    pub contract_value: Option<f64>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// PUT replaces the full record.
pub type UpdateProject = CreateProject;

impl Listable for Project {
    const SORT_KEYS: &'static [&'static str] = &[
        "name",
        "client_name",
        "status",
        "contract_value",
        "start_date",
        "end_date",
        "created_at",
    ];

    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.name.as_str()),
            self.description.as_deref(),
            self.client_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "client_name" => SortValue::opt_text(self.client_name.as_deref()),
            "status" => SortValue::text(&self.status),
            "contract_value" => SortValue::number(self.contract_value),
            "start_date" => self.start_date.map(SortValue::time).unwrap_or(SortValue::Missing),
            "end_date" => self.end_date.map(SortValue::time).unwrap_or(SortValue::Missing),
            "created_at" => SortValue::time(self.created_at),
            _ => SortValue::text(&self.name),
        }
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }
}

impl CsvRow for Project {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "client",
        "status",
        "contract_value",
        "start_date",
        "end_date",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            opt_field(&self.client_name),
            self.status.clone(),
            format!("{:.2}", self.contract_value),
            self.start_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            self.end_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
        ]
    }
}
