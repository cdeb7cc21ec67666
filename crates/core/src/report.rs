//! Serialisable symptom report.
//!
//! The report is the hand-off payload for anything downstream of the engine. It resolves each
//! part's display name and zone so consumers never need the registry.

use crate::registry::AnatomicalRegistry;
use crate::selection::SelectionState;
use crate::{EngineError, EngineResult};
use bodymap_types::{Intensity, PartId, SymptomId, ZoneKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSymptom {
    pub symptom_id: SymptomId,
    pub label: String,
    pub intensity: Intensity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPart {
    pub part_id: PartId,
    pub display_name: String,
    pub zone_key: ZoneKey,
    pub zone_label: String,
    /// Whether the part was still selected when the report was built.
    pub selected: bool,
    pub active: bool,
    pub symptoms: Vec<ReportSymptom>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomReport {
    pub report_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Selected parts in selection order, then unselected parts with recorded symptoms.
    pub parts: Vec<ReportPart>,
    pub total_symptoms: usize,
}

impl SymptomReport {
    /// Build a report from the current selection.
    ///
    /// # Arguments
    ///
    /// * `state` - Reducer state to snapshot.
    /// * `registry` - Used to resolve display names, zone keys and zone labels.
    ///
    /// # Returns
    ///
    /// A report with a fresh UUID v4 `report_id` and `created_at` set to now.
    pub fn build(state: &SelectionState, registry: &AnatomicalRegistry) -> Self {
        let part_entry = |part: &PartId| {
            let zone_key = registry.zone_of(part).clone();
            ReportPart {
                part_id: part.clone(),
                display_name: registry.display_name(part),
                zone_label: registry.zone_label(&zone_key).to_string(),
                zone_key,
                selected: state.is_selected(part),
                active: state.active() == Some(part),
                symptoms: state
                    .symptoms_for(part)
                    .iter()
                    .map(|s| ReportSymptom {
                        symptom_id: s.symptom_id.clone(),
                        label: s.label.clone(),
                        intensity: s.intensity,
                    })
                    .collect(),
            }
        };

        let mut parts: Vec<ReportPart> = state.selected().iter().map(&part_entry).collect();
        parts.extend(
            state
                .recorded()
                .filter(|(part, _)| !state.is_selected(part))
                .map(|(part, _)| part_entry(part)),
        );

        Self {
            report_id: Uuid::new_v4(),
            created_at: Utc::now(),
            total_symptoms: state.total_symptom_count(),
            parts,
        }
    }

    /// Entry for `part`, if the report lists it.
    pub fn part(&self, part: &PartId) -> Option<&ReportPart> {
        self.parts.iter().find(|p| &p.part_id == part)
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Serialization`] if JSON encoding fails.
    pub fn to_json_pretty(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(EngineError::Serialization)
    }

    /// Parse a report previously produced by [`SymptomReport::to_json_pretty`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Deserialization`] for malformed JSON or an intensity outside 1–10.
    pub fn from_json(text: &str) -> EngineResult<Self> {
        serde_json::from_str(text).map_err(EngineError::Deserialization)
    }
}
