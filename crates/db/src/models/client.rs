//! Client entity model and DTOs.

use buildline_core::export::{opt_field, CsvRow};
use buildline_core::list_view::{Listable, SortValue};
use buildline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `clients` table plus values derived from its projects.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub client_type: String,
    pub category: Option<String>,
    pub status: String,
    pub company_name: Option<String>,
    pub contact_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
    pub outstanding_balance: f64,
    /// Sum of the client's project contract values.
    pub total_contract_value: f64,
    pub project_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Client {
    /// Company name when present, otherwise the contact.
    pub fn display_name(&self) -> &str {
        self.company_name.as_deref().unwrap_or(&self.contact_name)
    }
}

/// DTO for creating a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    /// Defaults to `RESIDENTIAL`.
    pub client_type: Option<String>,
    pub category: Option<String>,
    /// Defaults to `ACTIVE`.
    pub status: Option<String>,
    pub company_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub contact_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
    pub outstanding_balance: Option<f64>,
}

/// PUT replaces the full record.
pub type UpdateClient = CreateClient;

impl Listable for Client {
    const SORT_KEYS: &'static [&'static str] = &[
        "contact_name",
        "company_name",
        "client_type",
        "status",
        "city",
        "outstanding_balance",
        "total_contract_value",
        "created_at",
    ];

    fn search_fields(&self) -> Vec<&str> {
        [
            self.company_name.as_deref(),
            Some(self.contact_name.as_str()),
            self.email.as_deref(),
            self.phone.as_deref(),
            self.city.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "company_name" => SortValue::opt_text(self.company_name.as_deref()),
            "client_type" => SortValue::text(&self.client_type),
            "status" => SortValue::text(&self.status),
            "city" => SortValue::opt_text(self.city.as_deref()),
            "outstanding_balance" => SortValue::number(self.outstanding_balance),
            "total_contract_value" => SortValue::number(self.total_contract_value),
            "created_at" => SortValue::time(self.created_at),
            _ => SortValue::text(&self.contact_name),
        }
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl CsvRow for Client {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "client_type",
        "category",
        "status",
        "company_name",
        "contact_name",
        "email",
        "phone",
        "address",
        "city",
        "state",
        "postal_code",
        "outstanding_balance",
        "total_contract_value",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.client_type.clone(),
            opt_field(&self.category),
            self.status.clone(),
            opt_field(&self.company_name),
            self.contact_name.clone(),
            opt_field(&self.email),
            opt_field(&self.phone),
            opt_field(&self.address),
            opt_field(&self.city),
            opt_field(&self.state),
            opt_field(&self.postal_code),
            format!("{:.2}", self.outstanding_balance),
            format!("{:.2}", self.total_contract_value),
        ]
    }
}
