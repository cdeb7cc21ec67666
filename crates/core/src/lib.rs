//! # Body-map core
//!
//! Anatomical selection and symptom correlation engine.
//!
//! This crate turns part-identifier events coming from a body-model renderer into a structured,
//! per-part, intensity-scored symptom report:
//! - [`registry`]: zones, part → zone lookup and display names
//! - [`taxonomy`]: the symptom catalogue and its applicability tags
//! - [`matcher`]: candidate selection and free-text search
//! - [`selection`]: the selection/report state machine
//! - [`session`]: the in-process API used by the renderer and the symptom panel
//!
//! **No presentation concerns**: rendering, hit-testing and report transmission belong to the
//! callers. This crate never computes or suggests a diagnosis.

pub mod config;
pub mod constants;
pub mod error;
pub mod matcher;
pub mod registry;
pub mod report;
pub mod selection;
pub mod session;
pub mod shared;
pub mod taxonomy;

pub use config::{CoreConfig, DeselectPolicy};
pub use error::{EngineError, EngineResult};
pub use matcher::{RelevanceMatcher, Target};
pub use registry::{AnatomicalRegistry, Zone};
pub use report::{ReportPart, ReportSymptom, SymptomReport};
pub use selection::{Ignored, Outcome, Phase, SelectedSymptom, SelectionState, Toggle};
pub use session::{Highlight, PartInfo, RenderFrame, Renderer, Session};
pub use shared::SharedSession;
pub use taxonomy::{Symptom, SymptomTaxonomy};

pub use bodymap_types::{Intensity, NonEmptyText, PartId, SymptomId, ZoneKey};
