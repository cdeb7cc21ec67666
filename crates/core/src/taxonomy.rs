//! Symptom taxonomy.
//!
//! The catalogue of symptom records, in catalogue order. Records are immutable once the
//! taxonomy is built; matching and searching live in [`crate::matcher`].

use crate::{EngineError, EngineResult};
use bodymap_catalogue::{ApplicabilityTag, CatalogueData};
use bodymap_types::{NonEmptyText, PartId, SymptomId, ZoneKey};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symptom {
    id: SymptomId,
    label: NonEmptyText,
    applies_to: Vec<ApplicabilityTag>,
    keywords: Vec<String>,
    // Lowercased copies used by substring search.
    folded_label: String,
    folded_keywords: Vec<String>,
}

impl Symptom {
    /// Create a symptom record.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `applies_to` is empty.
    pub fn new(
        id: SymptomId,
        label: NonEmptyText,
        applies_to: Vec<ApplicabilityTag>,
        keywords: Vec<String>,
    ) -> EngineResult<Self> {
        if applies_to.is_empty() {
            return Err(EngineError::InvalidConfig(format!(
                "symptom '{id}' has no applicability tag"
            )));
        }

        let folded_label = label.as_str().to_lowercase();
        let folded_keywords = keywords.iter().map(|k| k.to_lowercase()).collect();
        Ok(Self {
            id,
            label,
            applies_to,
            keywords,
            folded_label,
            folded_keywords,
        })
    }

    pub fn id(&self) -> &SymptomId {
        &self.id
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub fn applies_to(&self) -> &[ApplicabilityTag] {
        &self.applies_to
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_global(&self) -> bool {
        self.applies_to.iter().any(ApplicabilityTag::is_global)
    }

    /// Whether any applicability tag matches the given part or zone.
    ///
    /// Raw legacy tags match when they equal either identifier.
    pub fn applies(&self, part: Option<&PartId>, zone: Option<&ZoneKey>) -> bool {
        self.applies_to.iter().any(|tag| match tag {
            ApplicabilityTag::All => true,
            ApplicabilityTag::Zone(key) => zone == Some(key),
            ApplicabilityTag::Part(id) => part == Some(id),
            ApplicabilityTag::Raw(raw) => {
                part.is_some_and(|p| p.as_str() == raw) || zone.is_some_and(|z| z.as_str() == raw)
            }
        })
    }

    /// Case-insensitive substring match. `needle` must already be lowercased.
    pub(crate) fn matches_folded(&self, needle: &str, include_keywords: bool) -> bool {
        self.folded_label.contains(needle)
            || (include_keywords && self.folded_keywords.iter().any(|k| k.contains(needle)))
    }
}

#[derive(Clone, Debug, Default)]
pub struct SymptomTaxonomy {
    symptoms: Vec<Symptom>,
    index: HashMap<SymptomId, usize>,
}

impl SymptomTaxonomy {
    /// Build a taxonomy from records in catalogue order.
    ///
    /// # Arguments
    ///
    /// * `symptoms` - Records in the order the panel should list them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if two records share an id.
    pub fn new(symptoms: Vec<Symptom>) -> EngineResult<Self> {
        let mut index = HashMap::with_capacity(symptoms.len());
        for (position, symptom) in symptoms.iter().enumerate() {
            if index.insert(symptom.id().clone(), position).is_some() {
                return Err(EngineError::InvalidConfig(format!(
                    "symptom '{}' is declared more than once",
                    symptom.id()
                )));
            }
        }
        Ok(Self { symptoms, index })
    }

    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if a record has no applicability tag or an id is
    /// repeated.
    pub fn from_catalogue(data: &CatalogueData) -> EngineResult<Self> {
        let symptoms = data
            .symptoms
            .iter()
            .map(|s| {
                Symptom::new(
                    s.id.clone(),
                    s.label.clone(),
                    s.applies_to.clone(),
                    s.keywords.clone(),
                )
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Self::new(symptoms)
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn get(&self, id: &SymptomId) -> Option<&Symptom> {
        self.index.get(id).map(|&position| &self.symptoms[position])
    }

    pub fn contains(&self, id: &SymptomId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symptom(id: &str, label: &str, tags: &[&str]) -> Symptom {
        Symptom::new(
            SymptomId::from(id),
            NonEmptyText::new(label).expect("label"),
            tags.iter()
                .map(|t| ApplicabilityTag::parse(t).expect("tag"))
                .collect(),
            Vec::new(),
        )
        .expect("symptom")
    }

    #[test]
    fn rejects_symptom_without_tags() {
        let err = Symptom::new(
            SymptomId::from("orphan"),
            NonEmptyText::new("Orphan").expect("label"),
            Vec::new(),
            Vec::new(),
        )
        .expect_err("no applicability");
        assert!(matches!(err, EngineError::InvalidConfig(msg) if msg.contains("'orphan'")));
    }

    #[test]
    fn applies_follows_tags() {
        let chest = symptom("toux", "Toux", &["zone:chest", "part:Throat"]);
        let pecs = PartId::from("Pecs");
        let throat = PartId::from("Throat");
        let chest_zone = ZoneKey::from("chest");
        let neck_zone = ZoneKey::from("neck");

        assert!(chest.applies(Some(&pecs), Some(&chest_zone)));
        assert!(chest.applies(Some(&throat), Some(&neck_zone)));
        assert!(!chest.applies(Some(&pecs), Some(&neck_zone)));
        assert!(!chest.applies(None, None));
    }

    #[test]
    fn raw_tags_match_part_or_zone() {
        let knee = symptom("genou", "Douleur au genou", &["Left_Knee"]);
        let legs = symptom("lourdes", "Jambes lourdes", &["legs"]);
        let left_knee = PartId::from("Left_Knee");
        let legs_zone = ZoneKey::from("legs");

        assert!(knee.applies(Some(&left_knee), None));
        assert!(!knee.applies(None, Some(&legs_zone)));
        assert!(legs.applies(None, Some(&legs_zone)));
        assert!(!legs.applies(Some(&left_knee), None));
    }

    #[test]
    fn global_symptoms_apply_everywhere() {
        let fever = symptom("fievre", "Fièvre", &["ALL"]);
        assert!(fever.is_global());
        assert!(fever.applies(None, None));
        assert!(fever.applies(Some(&PartId::from("Anything")), None));
    }

    #[test]
    fn get_finds_records_by_id() {
        let taxonomy = SymptomTaxonomy::new(vec![
            symptom("a", "First", &["ALL"]),
            symptom("b", "Second", &["zone:chest"]),
        ])
        .expect("taxonomy");
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(
            taxonomy.get(&SymptomId::from("b")).map(Symptom::label),
            Some("Second")
        );
        assert!(!taxonomy.contains(&SymptomId::from("c")));
    }

    #[test]
    fn rejects_repeated_symptom_id() {
        let err = SymptomTaxonomy::new(vec![
            symptom("toux", "Toux grasse", &["part:Throat"]),
            symptom("toux", "Toux sèche", &["zone:chest"]),
        ])
        .expect_err("repeated id");
        assert!(matches!(err, EngineError::InvalidConfig(msg) if msg.contains("'toux'")));
    }

    #[test]
    fn matches_folded_is_case_insensitive() {
        let s = Symptom::new(
            SymptomId::from("mal_de_dents"),
            NonEmptyText::new("Mal de Dents").expect("label"),
            vec![ApplicabilityTag::All],
            vec!["Carie".into()],
        )
        .expect("symptom");
        assert!(s.matches_folded("dent", false));
        assert!(s.matches_folded("carie", true));
        assert!(!s.matches_folded("carie", false));
    }
}
