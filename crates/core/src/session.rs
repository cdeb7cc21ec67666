//! Engine session.
//!
//! A [`Session`] is the in-process boundary the presentation layer talks to. It is fed part
//! events by the Renderer, driven by the symptom panel, and owns one [`SelectionState`].
//!
//! Unlike the bare reducer, the session validates what it can: symptom ids must exist in the
//! catalogue and intensities must be on the 1–10 scale. Part ids stay opaque.

use crate::matcher::{RelevanceMatcher, Target};
use crate::registry::AnatomicalRegistry;
use crate::report::SymptomReport;
use crate::selection::{Outcome, SelectionState, Toggle};
use crate::taxonomy::{Symptom, SymptomTaxonomy};
use crate::{CoreConfig, EngineError, EngineResult};
use bodymap_catalogue::CatalogueData;
use bodymap_types::{Intensity, PartId, SymptomId, ZoneKey};
use std::collections::HashMap;
use std::sync::Arc;

/// Display metadata for a part, resolved on first interaction and cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartInfo {
    pub id: PartId,
    pub display_name: String,
    pub zone_key: ZoneKey,
    pub zone_label: String,
}

/// How the Renderer should style a part. Colours are the Renderer's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    Selected,
    Hovered,
    Default,
}

/// Read-only snapshot handed to the Renderer after each change.
#[derive(Clone, Copy, Debug)]
pub struct RenderFrame<'a> {
    pub selected: &'a [PartId],
    pub active: Option<&'a PartId>,
    pub hovered: Option<&'a PartId>,
}

/// Presentation layer that restyles the body model.
pub trait Renderer {
    fn apply(&mut self, frame: RenderFrame<'_>);
}

/// One patient's body-map interaction: selection, hover and recorded symptoms.
#[derive(Clone, Debug)]
pub struct Session {
    registry: Arc<AnatomicalRegistry>,
    taxonomy: Arc<SymptomTaxonomy>,
    cfg: Arc<CoreConfig>,
    state: SelectionState,
    hovered: Option<PartId>,
    parts: HashMap<PartId, PartInfo>,
}

impl Session {
    /// Open a session over an already built registry and taxonomy.
    ///
    /// # Arguments
    ///
    /// * `registry` - Zone table and part names.
    /// * `taxonomy` - Symptom catalogue.
    /// * `cfg` - Search settings and deselect policy.
    pub fn new(
        registry: Arc<AnatomicalRegistry>,
        taxonomy: Arc<SymptomTaxonomy>,
        cfg: Arc<CoreConfig>,
    ) -> Self {
        let state = SelectionState::new(cfg.deselect_policy());
        Self {
            registry,
            taxonomy,
            cfg,
            state,
            hovered: None,
            parts: HashMap::new(),
        }
    }

    /// Build the registry and taxonomy from catalogue data and open a session over them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if a symptom record is malformed.
    pub fn from_catalogue(data: &CatalogueData, cfg: CoreConfig) -> EngineResult<Self> {
        let registry = AnatomicalRegistry::from_catalogue(data);
        let taxonomy = SymptomTaxonomy::from_catalogue(data)?;
        tracing::debug!(
            "session catalogue: {} zones, {} symptoms",
            registry.zones().len(),
            taxonomy.len()
        );
        Ok(Self::new(Arc::new(registry), Arc::new(taxonomy), Arc::new(cfg)))
    }

    /// Zones and part names this session resolves against.
    pub fn registry(&self) -> &AnatomicalRegistry {
        &self.registry
    }

    pub fn taxonomy(&self) -> &SymptomTaxonomy {
        &self.taxonomy
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Read-only view of the reducer state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    fn matcher(&self) -> RelevanceMatcher<'_> {
        RelevanceMatcher::new(&self.taxonomy, &self.cfg)
    }

    fn target_for(&self, part: &PartId) -> Target {
        Target::part(part.clone(), self.registry.zone_of(part).clone())
    }

    /// Display metadata for `part`, computed once and cached.
    ///
    /// Every clicked or hovered id gets a cache entry. [`Session::clear_all`] drops every entry
    /// except the hovered part's, so the cache stays bounded by what the current report can
    /// reference.
    pub fn part_info(&mut self, part: &PartId) -> &PartInfo {
        let registry = &self.registry;
        self.parts.entry(part.clone()).or_insert_with(|| {
            let zone_key = registry.zone_of(part).clone();
            PartInfo {
                id: part.clone(),
                display_name: registry.display_name(part),
                zone_label: registry.zone_label(&zone_key).to_string(),
                zone_key,
            }
        })
    }

    // ------------------------------------------------------------------------
    // Renderer events
    // ------------------------------------------------------------------------

    /// Click from the Renderer: toggles the part and caches its metadata.
    ///
    /// # Returns
    ///
    /// Whether the part ended up selected or deselected.
    pub fn on_part_clicked(&mut self, part: &PartId) -> Toggle {
        self.part_info(part);
        self.toggle_part(part)
    }

    /// Hover only touches tooltip metadata, never the selection.
    pub fn on_part_hovered(&mut self, part: &PartId) -> &PartInfo {
        self.hovered = Some(part.clone());
        self.part_info(part)
    }

    pub fn on_part_unhovered(&mut self) {
        self.hovered = None;
    }

    /// Tooltip metadata for the hovered part, if any.
    pub fn hovered(&self) -> Option<&PartInfo> {
        self.hovered.as_ref().and_then(|part| self.parts.get(part))
    }

    // ------------------------------------------------------------------------
    // Renderer snapshot
    // ------------------------------------------------------------------------

    /// Parts the Renderer should paint as selected, in selection order.
    pub fn selected_part_ids(&self) -> &[PartId] {
        self.state.selected()
    }

    pub fn active_part(&self) -> Option<&PartId> {
        self.state.active()
    }

    /// Selection wins over hover.
    pub fn highlight(&self, part: &PartId) -> Highlight {
        if self.state.is_selected(part) {
            Highlight::Selected
        } else if self.hovered.as_ref() == Some(part) {
            Highlight::Hovered
        } else {
            Highlight::Default
        }
    }

    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            selected: self.state.selected(),
            active: self.state.active(),
            hovered: self.hovered.as_ref(),
        }
    }

    /// Push the current [`RenderFrame`] to `renderer`.
    pub fn sync_renderer(&self, renderer: &mut impl Renderer) {
        renderer.apply(self.render_frame());
    }

    // ------------------------------------------------------------------------
    // Panel transitions
    // ------------------------------------------------------------------------

    pub fn toggle_part(&mut self, part: &PartId) -> Toggle {
        let toggle = self.state.toggle_part(part);
        tracing::debug!(
            "toggle '{}': {:?} (active: {:?})",
            part,
            toggle,
            self.state.active().map(PartId::as_str)
        );
        toggle
    }

    /// Focus another selected part. Unselected parts are ignored.
    pub fn set_active(&mut self, part: &PartId) -> Outcome {
        let outcome = self.state.set_active(part);
        if let Outcome::Ignored(reason) = outcome {
            tracing::debug!("set_active '{}' ignored: {:?}", part, reason);
        }
        outcome
    }

    pub fn clear_all(&mut self) {
        tracing::debug!(
            "clearing {} selected parts and {} symptoms",
            self.state.selected().len(),
            self.state.total_symptom_count()
        );
        self.state.clear_all();
        let hovered = self.hovered.as_ref();
        self.parts.retain(|id, _| Some(id) == hovered);
    }

    /// Record a catalogue symptom against `part` at the default intensity.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSymptom`] if the id is not in the catalogue. Adding a
    /// symptom that is already recorded is `Ok(Outcome::Unchanged)`.
    pub fn add_symptom(&mut self, part: &PartId, symptom_id: &SymptomId) -> EngineResult<Outcome> {
        let symptom = catalogue_symptom(&self.taxonomy, symptom_id)?;
        let outcome = self.state.add_symptom(part, symptom);
        tracing::debug!("add '{}' to '{}': {:?}", symptom_id, part, outcome);
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSymptom`] if the id is not in the catalogue. Removing a
    /// symptom that is not recorded is `Ok(Outcome::Ignored(..))`.
    pub fn remove_symptom(
        &mut self,
        part: &PartId,
        symptom_id: &SymptomId,
    ) -> EngineResult<Outcome> {
        catalogue_symptom(&self.taxonomy, symptom_id)?;
        let outcome = self.state.remove_symptom(part, symptom_id);
        tracing::debug!("remove '{}' from '{}': {:?}", symptom_id, part, outcome);
        Ok(outcome)
    }

    /// Set the intensity of a recorded symptom from a raw slider value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for values outside 1–10 (nothing is stored) and
    /// [`EngineError::UnknownSymptom`] for ids not in the catalogue.
    pub fn set_intensity(
        &mut self,
        part: &PartId,
        symptom_id: &SymptomId,
        value: i64,
    ) -> EngineResult<Outcome> {
        let intensity = Intensity::new(value)?;
        catalogue_symptom(&self.taxonomy, symptom_id)?;
        let outcome = self.state.set_intensity(part, symptom_id, intensity);
        tracing::debug!(
            "intensity of '{}' on '{}' -> {}: {:?}",
            symptom_id,
            part,
            intensity,
            outcome
        );
        Ok(outcome)
    }

    /// Number of symptoms recorded across every part.
    pub fn total_symptom_count(&self) -> usize {
        self.state.total_symptom_count()
    }

    // ------------------------------------------------------------------------
    // Suggestions and search
    // ------------------------------------------------------------------------

    /// Suggestions for the active part, or nothing when no part is selected.
    pub fn suggestions(&self) -> Vec<&Symptom> {
        match self.state.active() {
            Some(part) => self.suggestions_for(part, ""),
            None => Vec::new(),
        }
    }

    /// Scoped search for `part` and its zone.
    pub fn suggestions_for(&self, part: &PartId, query: &str) -> Vec<&Symptom> {
        self.matcher()
            .search(query, &self.target_for(part), self.cfg.search_limit())
    }

    /// Panel search box: scoped to the active part when there is one, otherwise a free search
    /// over the whole catalogue.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<&Symptom> {
        match self.state.active() {
            Some(part) => self.search_target(query, &self.target_for(part), limit),
            None => self
                .matcher()
                .search_catalogue(query, limit.unwrap_or(self.cfg.search_limit())),
        }
    }

    /// Search against an explicit target.
    ///
    /// # Arguments
    ///
    /// * `query` - Free text; an empty query lists the target's suggestions.
    /// * `target` - Part and/or zone to scope the search to.
    /// * `limit` - Maximum number of results, or the configured default when `None`.
    pub fn search_target(
        &self,
        query: &str,
        target: &Target,
        limit: Option<usize>,
    ) -> Vec<&Symptom> {
        let limit = limit.unwrap_or(self.cfg.search_limit());
        self.matcher().search(query, target, limit)
    }

    /// Snapshot the current selection as a serialisable report.
    pub fn report(&self) -> SymptomReport {
        SymptomReport::build(&self.state, &self.registry)
    }
}

fn catalogue_symptom<'t>(
    taxonomy: &'t SymptomTaxonomy,
    symptom_id: &SymptomId,
) -> EngineResult<&'t Symptom> {
    taxonomy
        .get(symptom_id)
        .ok_or_else(|| EngineError::UnknownSymptom(symptom_id.clone()))
}
