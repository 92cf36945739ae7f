//! HTTP handlers, one module per resource.

pub mod assemblies;
pub mod assembly_categories;
pub mod assembly_groups;
pub mod bulk;
pub mod clients;
pub mod gantt;
pub mod materials;
pub mod milestones;
pub mod pdf;
pub mod projects;
pub mod tasks;
pub mod timeline;
pub mod users;
