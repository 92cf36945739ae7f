//! Fixture loader for the Buildline catalog and people tables.
//!
//! Reads one JSON array per table from a fixtures directory and inserts the
//! records whose natural key (name or email) is not already present.
//! Assemblies name their materials and category; groups name their
//! assemblies. Names are resolved to ids at load time.

pub mod fixtures;
