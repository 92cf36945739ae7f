//! Client vocabularies.

use crate::define_str_enum;

define_str_enum! {
    /// What kind of customer a client is.
    ClientType("client type") {
        Residential = "RESIDENTIAL",
        Commercial = "COMMERCIAL",
        Industrial = "INDUSTRIAL",
        Government = "GOVERNMENT",
    }
}

define_str_enum! {
    /// Client relationship status.
    ClientStatus("client status") {
        Active = "ACTIVE",
        Inactive = "INACTIVE",
        Prospect = "PROSPECT",
        Archived = "ARCHIVED",
    }
}
