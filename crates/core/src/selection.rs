//! Selection and report state machine.
//!
//! [`SelectionState`] is a pure reducer: every transition mutates the state and reports what
//! happened through an [`Outcome`]. Identifiers are opaque, so unknown or untracked ids never
//! fail; they come back as [`Outcome::Ignored`].
//!
//! Invariants held after every transition:
//! - the selection list has no duplicates and keeps insertion order,
//! - `active` is `None` if and only if nothing is selected, and otherwise names a selected part,
//! - symptom ids are unique within each part's list.

use crate::config::DeselectPolicy;
use crate::taxonomy::Symptom;
use bodymap_types::{Intensity, PartId, SymptomId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A symptom recorded against a part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSymptom {
    pub symptom_id: SymptomId,
    /// Copy of the catalogue label at the time the symptom was added.
    pub label: String,
    pub intensity: Intensity,
}

/// Result of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The state changed.
    Applied,
    /// The requested state was already true (for example a duplicate add).
    Unchanged,
    /// The transition referenced something not currently tracked.
    Ignored(Ignored),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    PartNotSelected,
    SymptomNotRecorded,
}

impl Outcome {
    pub fn changed(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// What a toggle did to the part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
}

/// Coarse state of the machine, derived from the selection list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Selecting,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Vec<PartId>,
    active: Option<PartId>,
    symptoms: BTreeMap<PartId, Vec<SelectedSymptom>>,
    policy: DeselectPolicy,
}

impl SelectionState {
    /// Empty state that deselects parts according to `policy`.
    pub fn new(policy: DeselectPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Selected parts in selection order.
    pub fn selected(&self) -> &[PartId] {
        &self.selected
    }

    pub fn active(&self) -> Option<&PartId> {
        self.active.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.selected.is_empty() {
            Phase::Empty
        } else {
            Phase::Selecting
        }
    }

    pub fn is_selected(&self, part: &PartId) -> bool {
        self.selected.contains(part)
    }

    pub fn policy(&self) -> DeselectPolicy {
        self.policy
    }

    /// Symptoms recorded against `part`; empty when none are.
    pub fn symptoms_for(&self, part: &PartId) -> &[SelectedSymptom] {
        self.symptoms.get(part).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every part with at least one recorded symptom, ordered by part id.
    pub fn recorded(&self) -> impl Iterator<Item = (&PartId, &[SelectedSymptom])> {
        self.symptoms
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(part, list)| (part, list.as_slice()))
    }

    pub fn total_symptom_count(&self) -> usize {
        self.symptoms.values().map(Vec::len).sum()
    }

    /// Select `part` (appending it and making it active) or deselect it.
    ///
    /// Deselecting the active part moves `active` to the first remaining selection.
    pub fn toggle_part(&mut self, part: &PartId) -> Toggle {
        match self.selected.iter().position(|p| p == part) {
            Some(index) => {
                self.selected.remove(index);
                if self.active.as_ref() == Some(part) {
                    self.active = self.selected.first().cloned();
                }
                if self.policy == DeselectPolicy::Purge {
                    self.symptoms.remove(part);
                }
                Toggle::Deselected
            }
            None => {
                self.selected.push(part.clone());
                self.active = Some(part.clone());
                Toggle::Selected
            }
        }
    }

    /// Drop every selection and every recorded symptom.
    pub fn clear_all(&mut self) {
        self.selected.clear();
        self.active = None;
        self.symptoms.clear();
    }

    /// Make a selected part the active one.
    ///
    /// # Returns
    ///
    /// `Ignored(PartNotSelected)` when `part` is not selected, `Unchanged` when it is already
    /// active.
    pub fn set_active(&mut self, part: &PartId) -> Outcome {
        if !self.is_selected(part) {
            return Outcome::Ignored(Ignored::PartNotSelected);
        }
        if self.active.as_ref() == Some(part) {
            return Outcome::Unchanged;
        }
        self.active = Some(part.clone());
        Outcome::Applied
    }

    /// Record `symptom` against `part` at the default intensity.
    ///
    /// The part does not have to be selected or active.
    pub fn add_symptom(&mut self, part: &PartId, symptom: &Symptom) -> Outcome {
        let list = self.symptoms.entry(part.clone()).or_default();
        if list.iter().any(|s| &s.symptom_id == symptom.id()) {
            return Outcome::Unchanged;
        }
        list.push(SelectedSymptom {
            symptom_id: symptom.id().clone(),
            label: symptom.label().to_string(),
            intensity: Intensity::DEFAULT,
        });
        Outcome::Applied
    }

    /// Drop a recorded symptom. A part whose list becomes empty leaves the recorded set.
    pub fn remove_symptom(&mut self, part: &PartId, symptom_id: &SymptomId) -> Outcome {
        let Some(list) = self.symptoms.get_mut(part) else {
            return Outcome::Ignored(Ignored::SymptomNotRecorded);
        };
        let Some(index) = list.iter().position(|s| &s.symptom_id == symptom_id) else {
            return Outcome::Ignored(Ignored::SymptomNotRecorded);
        };
        list.remove(index);
        if list.is_empty() {
            self.symptoms.remove(part);
        }
        Outcome::Applied
    }

    /// Replace the intensity of a recorded symptom.
    ///
    /// # Arguments
    ///
    /// * `part` - Part the symptom is recorded against.
    /// * `symptom_id` - Recorded symptom to update.
    /// * `intensity` - Already validated value on the 1–10 scale.
    pub fn set_intensity(
        &mut self,
        part: &PartId,
        symptom_id: &SymptomId,
        intensity: Intensity,
    ) -> Outcome {
        let entry = self
            .symptoms
            .get_mut(part)
            .and_then(|list| list.iter_mut().find(|s| &s.symptom_id == symptom_id));
        match entry {
            None => Outcome::Ignored(Ignored::SymptomNotRecorded),
            Some(entry) if entry.intensity == intensity => Outcome::Unchanged,
            Some(entry) => {
                entry.intensity = intensity;
                Outcome::Applied
            }
        }
    }
}
