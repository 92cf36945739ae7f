//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - An update DTO; PUT replaces the whole record, so it has the create shape
//!
//! List-capable entities also implement [`Listable`](buildline_core::list_view::Listable)
//! and, when exportable, [`CsvRow`](buildline_core::export::CsvRow).

pub mod assembly;
pub mod assembly_category;
pub mod assembly_group;
pub mod client;
pub mod gantt;
pub mod material;
pub mod milestone;
pub mod project;
pub mod task;
pub mod timeline;
pub mod user;
