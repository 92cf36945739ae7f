//! Fixture files and their loaders.

use std::path::{Path, PathBuf};

use buildline_core::assembly_group::{validate_group_items, GroupType};
use buildline_core::clients::{ClientStatus, ClientType};
use buildline_core::error::{describe_validation_errors, CoreError};
use buildline_core::types::DbId;
use buildline_core::users::{UserRole, UserStatus};
use buildline_db::models::assembly::{AssemblyMaterialInput, CreateAssembly};
use buildline_db::models::assembly_category::CreateAssemblyCategory;
use buildline_db::models::assembly_group::{CreateAssemblyGroup, CreateGroupItem};
use buildline_db::models::client::CreateClient;
use buildline_db::models::material::CreateMaterial;
use buildline_db::models::user::CreateUser;
use buildline_db::repositories::{
    AssemblyCategoryRepo, AssemblyGroupRepo, AssemblyRepo, ClientRepo, MaterialRepo, UserRepo,
};
use buildline_db::DbPool;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::Validate;

pub const MATERIALS: &str = "materials.json";
pub const ASSEMBLY_CATEGORIES: &str = "assembly_categories.json";
pub const ASSEMBLIES: &str = "assemblies.json";
pub const ASSEMBLY_GROUPS: &str = "assembly_groups.json";
pub const CLIENTS: &str = "clients.json";
pub const USERS: &str = "users.json";

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{file}: record '{key}' is invalid: {reason}")]
    Invalid {
        file: &'static str,
        key: String,
        reason: String,
    },

    #[error("{file}: record '{key}' references unknown {entity} '{name}'")]
    UnknownReference {
        file: &'static str,
        key: String,
        entity: &'static str,
        name: String,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Per-file outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: &'static str,
    pub inserted: usize,
    /// Records whose name or email already existed.
    pub skipped: usize,
}

impl FileReport {
    fn new(file: &'static str) -> Self {
        Self {
            file,
            inserted: 0,
            skipped: 0,
        }
    }

    fn log(&self) {
        tracing::info!(
            file = self.file,
            inserted = self.inserted,
            skipped = self.skipped,
            "Fixture file loaded"
        );
    }
}

/// An assembly as written in `assemblies.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssemblyFixture {
    pub name: String,
    pub description: Option<String>,
    pub part_number: Option<String>,
    pub manufacturer: Option<String>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    /// Category name.
    pub category: String,
    #[serde(default)]
    pub materials: Vec<MaterialLineFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialLineFixture {
    /// Material name.
    pub material: String,
    pub quantity: f64,
}

/// An assembly group as written in `assembly_groups.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupFixture {
    pub name: String,
    pub description: Option<String>,
    pub group_type: String,
    /// Category name.
    pub category: Option<String>,
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub items: Vec<GroupItemFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupItemFixture {
    /// Assembly name.
    pub assembly: String,
    pub quantity: Option<i32>,
    #[serde(default)]
    pub is_default: bool,
    /// Names of sibling assemblies that may not be chosen with this one.
    #[serde(default)]
    pub conflicts_with: Vec<String>,
}

/// Load every fixture file in dependency order.
///
/// A missing file counts as empty. The first invalid record aborts the run;
/// records inserted before it stay.
pub async fn load_all(pool: &DbPool, dir: &Path) -> Result<Vec<FileReport>, FixtureError> {
    Ok(vec![
        load_materials(pool, dir).await?,
        load_assembly_categories(pool, dir).await?,
        load_assemblies(pool, dir).await?,
        load_assembly_groups(pool, dir).await?,
        load_clients(pool, dir).await?,
        load_users(pool, dir).await?,
    ])
}

pub async fn load_materials(pool: &DbPool, dir: &Path) -> Result<FileReport, FixtureError> {
    let mut report = FileReport::new(MATERIALS);
    for record in read_records::<CreateMaterial>(dir, MATERIALS)? {
        check_fields(MATERIALS, &record.name, &record)?;
        if MaterialRepo::find_by_name(pool, &record.name).await?.is_some() {
            report.skipped += 1;
            continue;
        }
        MaterialRepo::create(pool, &record).await?;
        report.inserted += 1;
    }
    report.log();
    Ok(report)
}

pub async fn load_assembly_categories(
    pool: &DbPool,
    dir: &Path,
) -> Result<FileReport, FixtureError> {
    let mut report = FileReport::new(ASSEMBLY_CATEGORIES);
    for record in read_records::<CreateAssemblyCategory>(dir, ASSEMBLY_CATEGORIES)? {
        check_fields(ASSEMBLY_CATEGORIES, &record.name, &record)?;
        if AssemblyCategoryRepo::find_by_name(pool, &record.name)
            .await?
            .is_some()
        {
            report.skipped += 1;
            continue;
        }
        AssemblyCategoryRepo::create(pool, &record).await?;
        report.inserted += 1;
    }
    report.log();
    Ok(report)
}

pub async fn load_assemblies(pool: &DbPool, dir: &Path) -> Result<FileReport, FixtureError> {
    let mut report = FileReport::new(ASSEMBLIES);
    for record in read_records::<AssemblyFixture>(dir, ASSEMBLIES)? {
        if AssemblyRepo::find_by_name(pool, &record.name).await?.is_some() {
            report.skipped += 1;
            continue;
        }

        let category_id = AssemblyCategoryRepo::find_by_name(pool, &record.category)
            .await?
            .map(|c| c.id)
            .ok_or_else(|| unknown(ASSEMBLIES, &record.name, "assembly category", &record.category))?;

        let mut materials = Vec::with_capacity(record.materials.len());
        for line in &record.materials {
            let material_id = MaterialRepo::find_by_name(pool, &line.material)
                .await?
                .map(|m| m.id)
                .ok_or_else(|| unknown(ASSEMBLIES, &record.name, "material", &line.material))?;
            materials.push(AssemblyMaterialInput {
                material_id,
                quantity: line.quantity,
            });
        }

        let input = CreateAssembly {
            name: record.name,
            description: record.description,
            part_number: record.part_number,
            manufacturer: record.manufacturer,
            unit: record.unit,
            price: record.price,
            category_id,
            materials,
        };
        check_fields(ASSEMBLIES, &input.name, &input)?;
        if !input.duplicate_material_ids().is_empty() {
            return Err(invalid(
                ASSEMBLIES,
                &input.name,
                "a material is listed more than once".to_string(),
            ));
        }

        AssemblyRepo::create(pool, &input).await?;
        report.inserted += 1;
    }
    report.log();
    Ok(report)
}

pub async fn load_assembly_groups(pool: &DbPool, dir: &Path) -> Result<FileReport, FixtureError> {
    let mut report = FileReport::new(ASSEMBLY_GROUPS);
    for record in read_records::<GroupFixture>(dir, ASSEMBLY_GROUPS)? {
        if AssemblyGroupRepo::find_by_name(pool, &record.name)
            .await?
            .is_some()
        {
            report.skipped += 1;
            continue;
        }

        let group_type = GroupType::from_str_value(&record.group_type)
            .map_err(|e| core_invalid(ASSEMBLY_GROUPS, &record.name, e))?;

        let category_id = match &record.category {
            Some(name) => Some(
                AssemblyCategoryRepo::find_by_name(pool, name)
                    .await?
                    .map(|c| c.id)
                    .ok_or_else(|| unknown(ASSEMBLY_GROUPS, &record.name, "assembly category", name))?,
            ),
            None => None,
        };

        let mut items = Vec::with_capacity(record.items.len());
        for item in &record.items {
            let assembly_id = assembly_id_for(pool, &record.name, &item.assembly).await?;
            let mut conflicts_with = Vec::with_capacity(item.conflicts_with.len());
            for other in &item.conflicts_with {
                conflicts_with.push(assembly_id_for(pool, &record.name, other).await?);
            }
            items.push(CreateGroupItem {
                assembly_id,
                quantity: item.quantity,
                conflicts_with,
                is_default: item.is_default,
                sort_order: None,
            });
        }

        let input = CreateAssemblyGroup {
            name: record.name,
            description: record.description,
            group_type: group_type.as_str().to_string(),
            category_id,
            sort_order: record.sort_order,
            items,
        };
        check_fields(ASSEMBLY_GROUPS, &input.name, &input)?;
        validate_group_items(group_type, &input.item_specs())
            .map_err(|e| core_invalid(ASSEMBLY_GROUPS, &input.name, e))?;

        AssemblyGroupRepo::create(pool, &input).await?;
        report.inserted += 1;
    }
    report.log();
    Ok(report)
}

/// Clients are matched on email; a client without one is always inserted.
pub async fn load_clients(pool: &DbPool, dir: &Path) -> Result<FileReport, FixtureError> {
    let mut report = FileReport::new(CLIENTS);
    for record in read_records::<CreateClient>(dir, CLIENTS)? {
        let key = record.contact_name.clone();
        check_fields(CLIENTS, &key, &record)?;
        if let Some(value) = record.client_type.as_deref() {
            ClientType::from_str_value(value).map_err(|e| core_invalid(CLIENTS, &key, e))?;
        }
        if let Some(value) = record.status.as_deref() {
            ClientStatus::from_str_value(value).map_err(|e| core_invalid(CLIENTS, &key, e))?;
        }

        if let Some(email) = record.email.as_deref() {
            if ClientRepo::find_by_email(pool, email).await?.is_some() {
                report.skipped += 1;
                continue;
            }
        }
        ClientRepo::create(pool, &record).await?;
        report.inserted += 1;
    }
    report.log();
    Ok(report)
}

pub async fn load_users(pool: &DbPool, dir: &Path) -> Result<FileReport, FixtureError> {
    let mut report = FileReport::new(USERS);
    for record in read_records::<CreateUser>(dir, USERS)? {
        let key = record.email.clone();
        check_fields(USERS, &key, &record)?;
        if let Some(value) = record.role.as_deref() {
            UserRole::from_str_value(value).map_err(|e| core_invalid(USERS, &key, e))?;
        }
        if let Some(value) = record.status.as_deref() {
            UserStatus::from_str_value(value).map_err(|e| core_invalid(USERS, &key, e))?;
        }

        if UserRepo::find_by_email(pool, &record.email).await?.is_some() {
            report.skipped += 1;
            continue;
        }
        UserRepo::create(pool, &record).await?;
        report.inserted += 1;
    }
    report.log();
    Ok(report)
}

/// Parse `dir/file` as a JSON array. A missing file yields no records.
pub fn read_records<T: DeserializeOwned>(
    dir: &Path,
    file: &'static str,
) -> Result<Vec<T>, FixtureError> {
    let path = dir.join(file);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Fixture file missing, skipping");
            return Ok(Vec::new());
        }
        Err(source) => return Err(FixtureError::Io { path, source }),
    };
    serde_json::from_str(&raw).map_err(|source| FixtureError::Parse { path, source })
}

async fn assembly_id_for(pool: &DbPool, group: &str, name: &str) -> Result<DbId, FixtureError> {
    AssemblyRepo::find_by_name(pool, name)
        .await?
        .map(|a| a.id)
        .ok_or_else(|| unknown(ASSEMBLY_GROUPS, group, "assembly", name))
}

fn check_fields<T: Validate>(file: &'static str, key: &str, record: &T) -> Result<(), FixtureError> {
    record
        .validate()
        .map_err(|e| invalid(file, key, describe_validation_errors(&e)))
}

fn invalid(file: &'static str, key: &str, reason: String) -> FixtureError {
    FixtureError::Invalid {
        file,
        key: key.to_string(),
        reason,
    }
}

fn core_invalid(file: &'static str, key: &str, err: CoreError) -> FixtureError {
    invalid(file, key, err.to_string())
}

fn unknown(file: &'static str, key: &str, entity: &'static str, name: &str) -> FixtureError {
    FixtureError::UnknownReference {
        file,
        key: key.to_string(),
        entity,
        name: name.to_string(),
    }
}
