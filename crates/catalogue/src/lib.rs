//! Catalogue wire/boundary support for the body-map engine.
//!
//! This crate provides the **wire model** and **translation helpers** for the YAML file that
//! configures the engine:
//! - anatomical zones and the part identifiers they own
//! - optional display names for parts
//! - the symptom catalogue with its applicability tags and search keywords
//!
//! The engine meaning (zone lookup, matching, selection) lives in `bodymap-core`. This crate
//! only handles the file format and validates its structure.

pub mod applicability;
pub mod catalogue;

pub use applicability::ApplicabilityTag;
pub use catalogue::{Catalogue, CatalogueData, SymptomData, ZoneData};

/// Errors returned by the `bodymap-catalogue` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`CatalogueError`].
pub type CatalogueResult<T> = Result<T, CatalogueError>;
