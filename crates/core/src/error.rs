use bodymap_types::{IntensityError, SymptomId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("catalogue error: {0}")]
    Catalogue(#[from] bodymap_catalogue::CatalogueError),

    #[error("symptom '{0}' is not in the catalogue")]
    UnknownSymptom(SymptomId),

    #[error("validation failed: {0}")]
    Validation(#[from] IntensityError),

    #[error("session lock was poisoned by a panicking writer")]
    SessionPoisoned,

    #[error("failed to serialize report: {0}")]
    Serialization(serde_json::Error),

    #[error("failed to deserialize report: {0}")]
    Deserialization(serde_json::Error),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
