//! Relevance matcher and search.
//!
//! Narrows the taxonomy to the symptoms that apply to a target, then optionally filters them by
//! a free-text query. Results are always in catalogue order, and the taxonomy guarantees one
//! record per symptom id; there is no relevance scoring.
//!
//! [`RelevanceMatcher::search`] serves two paths:
//! - a *scoped* search (part and/or zone given) returns suggestions even for an empty query,
//! - an *unscoped* search ignores queries shorter than the configured minimum length and
//!   returns nothing for them.
//!
//! [`RelevanceMatcher::search_catalogue`] is the free search box used before any part is
//! chosen: it looks at every record, not only the global ones, under the same minimum length.

use crate::taxonomy::{Symptom, SymptomTaxonomy};
use crate::CoreConfig;
use bodymap_types::{PartId, ZoneKey};

/// What a search is about: a part, a zone, both, or nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Target {
    pub part: Option<PartId>,
    pub zone: Option<ZoneKey>,
}

impl Target {
    /// No part and no zone: only global symptoms are candidates.
    pub fn unscoped() -> Self {
        Self::default()
    }

    /// Target a part together with the zone that owns it.
    ///
    /// # Arguments
    ///
    /// * `part` - Part identifier as emitted by the Renderer.
    /// * `zone` - Zone key, normally `AnatomicalRegistry::zone_of(&part)`.
    pub fn part(part: PartId, zone: ZoneKey) -> Self {
        Self {
            part: Some(part),
            zone: Some(zone),
        }
    }

    /// Target a whole zone with no particular part.
    pub fn zone(zone: ZoneKey) -> Self {
        Self {
            part: None,
            zone: Some(zone),
        }
    }

    pub fn is_unscoped(&self) -> bool {
        self.part.is_none() && self.zone.is_none()
    }
}

/// Borrowed view over a taxonomy with the search settings of one [`CoreConfig`].
#[derive(Clone, Copy, Debug)]
pub struct RelevanceMatcher<'a> {
    taxonomy: &'a SymptomTaxonomy,
    min_query_len: usize,
    search_keywords: bool,
}

impl<'a> RelevanceMatcher<'a> {
    pub fn new(taxonomy: &'a SymptomTaxonomy, cfg: &CoreConfig) -> Self {
        Self {
            taxonomy,
            min_query_len: cfg.min_query_len(),
            search_keywords: cfg.search_keywords(),
        }
    }

    /// Every symptom applicable to `target`, in catalogue order.
    ///
    /// Global (`ALL`) symptoms are always included; an unscoped target yields only those.
    pub fn candidates_for(&self, target: &Target) -> Vec<&'a Symptom> {
        let taxonomy: &'a SymptomTaxonomy = self.taxonomy;
        taxonomy
            .symptoms()
            .iter()
            .filter(|s| s.applies(target.part.as_ref(), target.zone.as_ref()))
            .collect()
    }

    /// Candidates for `target` whose label (or keywords) contains `query`, at most `limit`.
    pub fn search(&self, query: &str, target: &Target, limit: usize) -> Vec<&'a Symptom> {
        let needle = query.trim().to_lowercase();

        if target.is_unscoped() && needle.chars().count() < self.min_query_len {
            return Vec::new();
        }

        let candidates = self.candidates_for(target).into_iter();
        if needle.is_empty() {
            return candidates.take(limit).collect();
        }

        candidates
            .filter(|s| s.matches_folded(&needle, self.search_keywords))
            .take(limit)
            .collect()
    }

    /// Every record whose label (or keywords) contains `query`, at most `limit`.
    ///
    /// Queries shorter than the minimum length return nothing.
    pub fn search_catalogue(&self, query: &str, limit: usize) -> Vec<&'a Symptom> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || needle.chars().count() < self.min_query_len {
            return Vec::new();
        }

        let taxonomy: &'a SymptomTaxonomy = self.taxonomy;
        taxonomy
            .symptoms()
            .iter()
            .filter(|s| s.matches_folded(&needle, self.search_keywords))
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeselectPolicy;
    use bodymap_catalogue::ApplicabilityTag;
    use bodymap_types::{NonEmptyText, SymptomId};

    fn symptom(id: &str, label: &str, tags: &[&str], keywords: &[&str]) -> Symptom {
        Symptom::new(
            SymptomId::from(id),
            NonEmptyText::new(label).expect("label"),
            tags.iter()
                .map(|t| ApplicabilityTag::parse(t).expect("tag"))
                .collect(),
            keywords.iter().map(|k| k.to_string()).collect(),
        )
        .expect("symptom")
    }

    fn taxonomy() -> SymptomTaxonomy {
        SymptomTaxonomy::new(vec![
            symptom("fievre", "Fièvre", &["ALL"], &["température"]),
            symptom("douleur_thoracique", "Douleur thoracique", &["zone:chest"], &["poitrine"]),
            symptom("mal_de_dents", "Mal de dents", &["ALL", "part:Teeth"], &["carie"]),
            symptom("toux", "Toux", &["zone:chest", "part:Throat"], &[]),
            symptom("fatigue", "Fatigue", &["ALL"], &[]),
            symptom("genou", "Douleur au genou", &["Left_Knee"], &[]),
        ])
        .expect("taxonomy")
    }

    fn ids(symptoms: &[&Symptom]) -> Vec<String> {
        symptoms.iter().map(|s| s.id().to_string()).collect()
    }

    fn chest() -> Target {
        Target::part(PartId::from("Pecs"), ZoneKey::from("chest"))
    }

    #[test]
    fn unscoped_candidates_are_global_only() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        assert_eq!(
            ids(&matcher.candidates_for(&Target::unscoped())),
            vec!["fievre", "mal_de_dents", "fatigue"]
        );
    }

    #[test]
    fn scoped_candidates_keep_catalogue_order() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        let result = matcher.candidates_for(&chest());
        assert_eq!(
            ids(&result),
            vec!["fievre", "douleur_thoracique", "mal_de_dents", "toux", "fatigue"]
        );
        assert_eq!(result[3].label(), "Toux");
    }

    #[test]
    fn candidates_always_include_global_symptoms() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        let targets = [
            Target::unscoped(),
            chest(),
            Target::zone(ZoneKey::from("nowhere")),
            Target::part(PartId::from("Unknown"), ZoneKey::from("other")),
        ];
        for target in &targets {
            let found = ids(&matcher.candidates_for(target));
            for global in ["fievre", "mal_de_dents", "fatigue"] {
                assert!(found.iter().any(|id| id == global), "{global} missing for {target:?}");
            }
        }
    }

    #[test]
    fn legacy_raw_tags_match_part_id() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        let knee = Target::part(PartId::from("Left_Knee"), ZoneKey::from("legs"));
        assert!(ids(&matcher.candidates_for(&knee)).contains(&"genou".to_string()));
    }

    #[test]
    fn search_filters_by_label_substring() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        assert_eq!(ids(&matcher.search("dent", &Target::unscoped(), 8)), vec!["mal_de_dents"]);
        assert!(matcher.search("xyzxyz", &Target::unscoped(), 8).is_empty());
        assert!(matcher.search("xyzxyz", &chest(), 8).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_uses_keywords() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        assert_eq!(ids(&matcher.search("THORAC", &chest(), 8)), vec!["douleur_thoracique"]);
        assert_eq!(ids(&matcher.search("poitrine", &chest(), 8)), vec!["douleur_thoracique"]);
    }

    #[test]
    fn keyword_search_can_be_disabled() {
        let tax = taxonomy();
        let cfg = CoreConfig::new(8, 2, false, DeselectPolicy::Retain).expect("config");
        let matcher = RelevanceMatcher::new(&tax, &cfg);
        assert!(matcher.search("poitrine", &chest(), 8).is_empty());
    }

    #[test]
    fn search_respects_limit_and_is_subset_of_candidates() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        for target in [Target::unscoped(), chest()] {
            let candidates = ids(&matcher.candidates_for(&target));
            for query in ["", "a", "ou", "douleur", "fatigue", "zz"] {
                for limit in 0..6 {
                    let found = ids(&matcher.search(query, &target, limit));
                    assert!(found.len() <= limit);
                    assert!(found.iter().all(|id| candidates.contains(id)));
                }
            }
        }
    }

    #[test]
    fn scoped_empty_query_returns_truncated_suggestions() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        assert_eq!(ids(&matcher.search("", &chest(), 2)), vec!["fievre", "douleur_thoracique"]);
        assert_eq!(ids(&matcher.search("  ", &chest(), 8)).len(), 5);
    }

    #[test]
    fn unscoped_short_query_returns_nothing() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        assert!(matcher.search("", &Target::unscoped(), 8).is_empty());
        assert!(matcher.search("f", &Target::unscoped(), 8).is_empty());
        assert_eq!(ids(&matcher.search("fa", &Target::unscoped(), 8)), vec!["fatigue"]);
    }

    #[test]
    fn scoped_search_ignores_minimum_length() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        assert_eq!(ids(&matcher.search("x", &chest(), 8)), vec!["toux"]);
    }

    #[test]
    fn catalogue_search_covers_scoped_records() {
        let tax = taxonomy();
        let matcher = RelevanceMatcher::new(&tax, &CoreConfig::default());
        assert_eq!(ids(&matcher.search_catalogue("toux", 8)), vec!["toux"]);
        assert_eq!(ids(&matcher.search_catalogue("genou", 8)), vec!["genou"]);
        assert_eq!(ids(&matcher.search_catalogue("douleur", 1)), vec!["douleur_thoracique"]);
        assert!(matcher.search_catalogue("t", 8).is_empty());
        assert!(matcher.search_catalogue("", 8).is_empty());
    }

    #[test]
    fn minimum_length_is_configurable() {
        let tax = taxonomy();
        let cfg = CoreConfig::new(8, 0, true, DeselectPolicy::Retain).expect("config");
        let matcher = RelevanceMatcher::new(&tax, &cfg);
        assert_eq!(matcher.search("", &Target::unscoped(), 8).len(), 3);

        let cfg = CoreConfig::new(8, 5, true, DeselectPolicy::Retain).expect("config");
        let matcher = RelevanceMatcher::new(&tax, &cfg);
        assert!(matcher.search("dent", &Target::unscoped(), 8).is_empty());
        assert_eq!(matcher.search("dents", &Target::unscoped(), 8).len(), 1);
    }
}
