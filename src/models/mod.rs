//! Core data models for archived objects and their restore lifecycle.
//!
//! Objects are read-only views materialized from listing or head responses.
//! Restore requests have no local representation beyond their parameters;
//! their progress is always re-read from the storage service.

pub mod object;
pub mod restore;
