//! Catalogue wire model and translation helpers.
//!
//! Responsibilities:
//! - Define public domain-level carriers for zones, part names and symptoms
//! - Define a strict wire model for serialisation/deserialisation
//! - Translate between the two, validating required fields
//!
//! Notes:
//! - The catalogue is configuration: it is read once at startup and never mutated
//! - Zone order and symptom order are significant and preserved

use crate::{ApplicabilityTag, CatalogueError, CatalogueResult};
use bodymap_types::{NonEmptyText, PartId, SymptomId, ZoneKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const BUILTIN_CATALOGUE_YAML: &str = include_str!("../data/default.yaml");

// ============================================================================
// Public domain-level types
// ============================================================================

/// Domain-level carrier for one anatomical zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneData {
    pub key: ZoneKey,
    pub label: NonEmptyText,
    /// Part identifiers in declaration order.
    pub parts: Vec<PartId>,
}

/// Domain-level carrier for one symptom record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymptomData {
    pub id: SymptomId,
    pub label: NonEmptyText,
    /// Never empty once translated.
    pub applies_to: Vec<ApplicabilityTag>,
    pub keywords: Vec<String>,
}

/// Everything a catalogue file declares, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogueData {
    pub zones: Vec<ZoneData>,
    pub part_names: BTreeMap<PartId, NonEmptyText>,
    pub symptoms: Vec<SymptomData>,
}

impl CatalogueData {
    /// Zone keys referenced by `zone:` tags that no zone declares.
    pub fn unknown_zone_references(&self) -> Vec<ZoneKey> {
        let declared: HashSet<&ZoneKey> = self.zones.iter().map(|z| &z.key).collect();
        let mut unknown = Vec::new();
        for symptom in &self.symptoms {
            for tag in &symptom.applies_to {
                if let ApplicabilityTag::Zone(key) = tag {
                    if !declared.contains(key) && !unknown.contains(key) {
                        unknown.push(key.clone());
                    }
                }
            }
        }
        unknown
    }
}

// ============================================================================
// Public Catalogue operations
// ============================================================================

/// Catalogue file operations.
///
/// Zero-sized namespace type; all methods are associated functions.
pub struct Catalogue;

impl Catalogue {
    /// Parse a catalogue from YAML text.
    ///
    /// Uses `serde_path_to_error` so schema mismatches name the failing field
    /// (for example `symptoms[3].applies_to`).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if:
    /// - the YAML does not match the wire schema or has unknown keys,
    /// - a zone key, symptom id or label is blank,
    /// - two zones share a key or two symptoms share an id,
    /// - a symptom has no applicability tag or a malformed one.
    pub fn parse(yaml_text: &str) -> CatalogueResult<CatalogueData> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, CatalogueWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(CatalogueError::Translation(format!(
                    "Catalogue schema mismatch at {path}: {source}"
                )));
            }
        };

        wire_to_domain(wire)
    }

    /// Render catalogue data back to YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if serialisation fails.
    pub fn render(data: &CatalogueData) -> CatalogueResult<String> {
        let wire = domain_to_wire(data);
        serde_yaml::to_string(&wire)
            .map_err(|e| CatalogueError::Translation(format!("Failed to serialize catalogue: {e}")))
    }

    /// Read and parse a catalogue file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::InvalidInput`] if `path` is not a file, [`CatalogueError::Io`]
    /// if it cannot be read, or any [`Catalogue::parse`] error.
    pub fn load(path: &Path) -> CatalogueResult<CatalogueData> {
        if !path.is_file() {
            return Err(CatalogueError::InvalidInput(format!(
                "catalogue path is not a file: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// The catalogue compiled into the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded file is malformed, which the crate tests rule out.
    pub fn builtin() -> CatalogueResult<CatalogueData> {
        Self::parse(BUILTIN_CATALOGUE_YAML)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct CatalogueWire {
    zones: Vec<ZoneWire>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parts: BTreeMap<String, String>,
    symptoms: Vec<SymptomWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ZoneWire {
    key: String,
    label: String,
    #[serde(default)]
    parts: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct SymptomWire {
    id: String,
    label: String,
    applies_to: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    keywords: Vec<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn required_label(value: &str, what: &str) -> CatalogueResult<NonEmptyText> {
    NonEmptyText::new(value)
        .map_err(|_| CatalogueError::Translation(format!("{what} label cannot be empty")))
}

fn wire_to_domain(wire: CatalogueWire) -> CatalogueResult<CatalogueData> {
    let mut seen_zones = HashSet::new();
    let mut zones = Vec::with_capacity(wire.zones.len());
    for zone in wire.zones {
        let key = zone.key.trim();
        if key.is_empty() {
            return Err(CatalogueError::Translation("zone key cannot be empty".into()));
        }
        if !seen_zones.insert(key.to_owned()) {
            return Err(CatalogueError::Translation(format!(
                "zone '{key}' is declared more than once"
            )));
        }
        zones.push(ZoneData {
            key: ZoneKey::from(key),
            label: required_label(&zone.label, &format!("zone '{key}'"))?,
            parts: zone.parts.into_iter().map(PartId::from).collect(),
        });
    }

    let mut part_names = BTreeMap::new();
    for (part, name) in wire.parts {
        let label = required_label(&name, &format!("part '{part}'"))?;
        part_names.insert(PartId::from(part), label);
    }

    let mut seen_symptoms = HashSet::new();
    let mut symptoms = Vec::with_capacity(wire.symptoms.len());
    for symptom in wire.symptoms {
        let id = symptom.id.trim();
        if id.is_empty() {
            return Err(CatalogueError::Translation("symptom id cannot be empty".into()));
        }
        if !seen_symptoms.insert(id.to_owned()) {
            return Err(CatalogueError::Translation(format!(
                "symptom '{id}' is declared more than once"
            )));
        }
        if symptom.applies_to.is_empty() {
            return Err(CatalogueError::Translation(format!(
                "symptom '{id}' must declare at least one applicability tag"
            )));
        }
        let applies_to = symptom
            .applies_to
            .iter()
            .map(|tag| ApplicabilityTag::parse(tag))
            .collect::<CatalogueResult<Vec<_>>>()?;
        let keywords = symptom
            .keywords
            .into_iter()
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty())
            .collect();

        symptoms.push(SymptomData {
            id: SymptomId::from(id),
            label: required_label(&symptom.label, &format!("symptom '{id}'"))?,
            applies_to,
            keywords,
        });
    }

    Ok(CatalogueData {
        zones,
        part_names,
        symptoms,
    })
}

fn domain_to_wire(data: &CatalogueData) -> CatalogueWire {
    CatalogueWire {
        zones: data
            .zones
            .iter()
            .map(|zone| ZoneWire {
                key: zone.key.to_string(),
                label: zone.label.to_string(),
                parts: zone.parts.iter().map(ToString::to_string).collect(),
            })
            .collect(),
        parts: data
            .part_names
            .iter()
            .map(|(part, name)| (part.to_string(), name.to_string()))
            .collect(),
        symptoms: data
            .symptoms
            .iter()
            .map(|symptom| SymptomWire {
                id: symptom.id.to_string(),
                label: symptom.label.to_string(),
                applies_to: symptom.applies_to.iter().map(ToString::to_string).collect(),
                keywords: symptom.keywords.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"zones:
  - key: chest
    label: Thorax
    parts: [Pecs, Sternum]
  - key: other
    label: Autre
parts:
  Pecs: Pectoraux
symptoms:
  - id: douleur_thoracique
    label: Douleur thoracique
    applies_to: ["zone:chest"]
    keywords: [poitrine]
  - id: fievre
    label: Fièvre
    applies_to: [ALL]
"#;

    #[test]
    fn parses_sample_catalogue() {
        let data = Catalogue::parse(SAMPLE).expect("parse yaml");
        assert_eq!(data.zones.len(), 2);
        assert_eq!(data.zones[0].key.as_str(), "chest");
        assert_eq!(data.zones[0].parts, vec![PartId::from("Pecs"), PartId::from("Sternum")]);
        assert!(data.zones[1].parts.is_empty());
        assert_eq!(
            data.part_names.get("Pecs").map(NonEmptyText::as_str),
            Some("Pectoraux")
        );
        assert_eq!(data.symptoms[0].keywords, vec!["poitrine".to_string()]);
        assert_eq!(data.symptoms[1].applies_to, vec![ApplicabilityTag::All]);
    }

    #[test]
    fn round_trips_sample_yaml() {
        let data = Catalogue::parse(SAMPLE).expect("parse yaml");
        let output = Catalogue::render(&data).expect("render catalogue");
        let reparsed = Catalogue::parse(&output).expect("reparse yaml");
        assert_eq!(data, reparsed);
    }

    #[test]
    fn strict_validation_rejects_unknown_keys() {
        let input = SAMPLE.replace("    keywords: [poitrine]", "    severity: high");
        let err = Catalogue::parse(&input).expect_err("should reject unknown key");
        match err {
            CatalogueError::Translation(msg) => assert!(msg.contains("severity")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn schema_errors_report_field_path() {
        let input = SAMPLE.replace("applies_to: [ALL]", "applies_to: ALL");
        let err = Catalogue::parse(&input).expect_err("should reject scalar applies_to");
        match err {
            CatalogueError::Translation(msg) => assert!(msg.contains("symptoms[1].applies_to")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_symptom_without_applicability() {
        let input = SAMPLE.replace("applies_to: [ALL]", "applies_to: []");
        let err = Catalogue::parse(&input).expect_err("should reject empty applicability");
        assert!(matches!(
            err,
            CatalogueError::Translation(msg)
                if msg.contains("'fievre'") && msg.contains("applicability")
        ));
    }

    #[test]
    fn rejects_duplicate_zone_keys() {
        let input = SAMPLE.replace("key: other", "key: chest");
        let err = Catalogue::parse(&input).expect_err("should reject duplicate zone");
        assert!(
            matches!(err, CatalogueError::Translation(msg) if msg.contains("more than once"))
        );
    }

    #[test]
    fn rejects_duplicate_symptom_ids() {
        let input = SAMPLE.replace("id: fievre", "id: douleur_thoracique");
        let err = Catalogue::parse(&input).expect_err("should reject duplicate symptom id");
        assert!(matches!(
            err,
            CatalogueError::Translation(msg)
                if msg == "symptom 'douleur_thoracique' is declared more than once"
        ));
    }

    #[test]
    fn rejects_blank_labels() {
        let input = SAMPLE.replace("label: Thorax", "label: \"  \"");
        let err = Catalogue::parse(&input).expect_err("should reject blank label");
        assert!(
            matches!(err, CatalogueError::Translation(msg) if msg.contains("zone 'chest' label"))
        );
    }

    #[test]
    fn reports_unknown_zone_references() {
        let input = SAMPLE.replace("\"zone:chest\"", "\"zone:thorax\"");
        let data = Catalogue::parse(&input).expect("parse yaml");
        assert_eq!(data.unknown_zone_references(), vec![ZoneKey::from("thorax")]);
    }

    #[test]
    fn loads_catalogue_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write catalogue");

        let data = Catalogue::load(file.path()).expect("load catalogue");
        assert_eq!(data.symptoms.len(), 2);
    }

    #[test]
    fn load_rejects_missing_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = Catalogue::load(&dir.path().join("missing.yaml")).expect_err("missing file");
        assert!(matches!(err, CatalogueError::InvalidInput(msg) if msg.contains("not a file")));
    }

    #[test]
    fn builtin_catalogue_is_valid() {
        let data = Catalogue::builtin().expect("builtin catalogue parses");
        assert!(data.zones.iter().any(|z| z.key.as_str() == "other"));
        assert!(data.unknown_zone_references().is_empty());
        assert!(data
            .symptoms
            .iter()
            .any(|s| s.id.as_str() == "douleur_thoracique"));
        assert!(data.symptoms.iter().any(|s| s.label.as_str() == "Mal de dents"));
    }
}
