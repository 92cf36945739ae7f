//! User vocabularies.

use crate::define_str_enum;

define_str_enum! {
    /// Back-office role of a user.
    UserRole("user role") {
        Admin = "ADMIN",
        ProjectManager = "PROJECT_MANAGER",
        Estimator = "ESTIMATOR",
        FieldWorker = "FIELD_WORKER",
        Viewer = "VIEWER",
    }
}

define_str_enum! {
    /// Employment status of a user.
    UserStatus("user status") {
        Active = "ACTIVE",
        Inactive = "INACTIVE",
        Suspended = "SUSPENDED",
    }
}
