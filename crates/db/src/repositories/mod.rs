//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod assembly_category_repo;
pub mod assembly_group_repo;
pub mod assembly_repo;
pub mod client_repo;
pub mod gantt_repo;
pub mod material_repo;
pub mod milestone_repo;
pub mod project_repo;
pub mod task_repo;
pub mod timeline_repo;
pub mod user_repo;

pub use assembly_category_repo::AssemblyCategoryRepo;
pub use assembly_group_repo::AssemblyGroupRepo;
pub use assembly_repo::AssemblyRepo;
pub use client_repo::ClientRepo;
pub use gantt_repo::GanttRepo;
pub use material_repo::MaterialRepo;
pub use milestone_repo::MilestoneRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use timeline_repo::TimelineRepo;
pub use user_repo::UserRepo;
