//! Project vocabularies.

use crate::define_str_enum;

define_str_enum! {
    /// Project lifecycle status. Any status may be replaced by any other.
    ProjectStatus("project status") {
        Planning = "PLANNING",
        Active = "ACTIVE",
        OnHold = "ON_HOLD",
        Completed = "COMPLETED",
        Cancelled = "CANCELLED",
    }
}
