//! Pure domain logic for the Buildline back office.
//!
//! Nothing in this crate touches the database or the network, so the
//! repository layer, the HTTP layer and the seed tool all share it.

pub mod assembly_group;
pub mod bulk;
pub mod clients;
pub mod error;
pub mod export;
pub mod gantt;
pub mod list_view;
pub mod pdf;
pub mod projects;
pub mod timeline;
pub mod types;
pub mod users;
pub mod vocab;
