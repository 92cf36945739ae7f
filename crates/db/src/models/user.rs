//! User entity model and DTOs.

use buildline_core::export::{opt_field, CsvRow};
use buildline_core::list_view::{Listable, SortValue};
use buildline_core::types::{Date, DbId, Timestamp};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<Date>,
    pub hourly_rate: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for creating a user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    /// Defaults to `VIEWER`.
    pub role: Option<String>,
    /// Defaults to `ACTIVE`.
    pub status: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<Date>,
    #[validate(range(min = 0.0))]
    pub hourly_rate: Option<f64>,
}

/// PUT replaces the full record.
pub type UpdateUser = CreateUser;

impl Listable for User {
    const SORT_KEYS: &'static [&'static str] = &[
        "email",
        "first_name",
        "last_name",
        "role",
        "status",
        "department",
        "hire_date",
        "hourly_rate",
        "created_at",
    ];

    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.email.as_str()),
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            self.job_title.as_deref(),
            self.department.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "email" => SortValue::text(&self.email),
            "first_name" => SortValue::text(&self.first_name),
            "role" => SortValue::text(&self.role),
            "status" => SortValue::text(&self.status),
            "department" => SortValue::opt_text(self.department.as_deref()),
            "hire_date" => self
                .hire_date
                .map(|d| SortValue::Number(d.num_days_from_ce() as f64))
                .unwrap_or(SortValue::Missing),
            "hourly_rate" => SortValue::opt_number(self.hourly_rate),
            "created_at" => SortValue::time(self.created_at),
            _ => SortValue::text(&self.last_name),
        }
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }

    /// Users are categorised by role.
    fn category(&self) -> Option<&str> {
        Some(&self.role)
    }
}

impl CsvRow for User {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "email",
        "first_name",
        "last_name",
        "role",
        "status",
        "phone",
        "job_title",
        "department",
        "hire_date",
        "hourly_rate",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.email.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.role.clone(),
            self.status.clone(),
            opt_field(&self.phone),
            opt_field(&self.job_title),
            opt_field(&self.department),
            opt_field(&self.hire_date),
            self.hourly_rate.map(|r| format!("{r:.2}")).unwrap_or_default(),
        ]
    }
}
