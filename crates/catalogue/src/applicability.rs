//! Symptom applicability tags.
//!
//! On disk a tag is a plain string:
//! - `ALL` for symptoms that apply everywhere
//! - `zone:<zoneKey>` for zone-scoped symptoms
//! - `part:<partId>` for part-scoped symptoms
//!
//! Any other string is kept as a legacy raw value, compared for equality against both the part
//! id and the zone key of a target.

use crate::CatalogueError;
use bodymap_types::{PartId, ZoneKey};

const ALL_TAG: &str = "ALL";
const ZONE_PREFIX: &str = "zone:";
const PART_PREFIX: &str = "part:";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApplicabilityTag {
    /// Always a match candidate, whatever the target.
    All,
    Zone(ZoneKey),
    Part(PartId),
    /// Untagged legacy value.
    Raw(String),
}

impl ApplicabilityTag {
    /// Parse a tag from its on-disk string form.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Translation`] if the value is blank or a `zone:`/`part:` prefix
    /// has nothing after it.
    pub fn parse(value: &str) -> Result<Self, CatalogueError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CatalogueError::Translation(
                "applicability tag cannot be empty".into(),
            ));
        }

        if value == ALL_TAG {
            return Ok(Self::All);
        }

        if let Some(zone) = value.strip_prefix(ZONE_PREFIX) {
            return non_blank(zone, value).map(|zone| Self::Zone(ZoneKey::from(zone)));
        }

        if let Some(part) = value.strip_prefix(PART_PREFIX) {
            return non_blank(part, value).map(|part| Self::Part(PartId::from(part)));
        }

        Ok(Self::Raw(value.to_owned()))
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::All)
    }
}

fn non_blank<'a>(suffix: &'a str, tag: &str) -> Result<&'a str, CatalogueError> {
    let suffix = suffix.trim();
    if suffix.is_empty() {
        return Err(CatalogueError::Translation(format!(
            "applicability tag '{tag}' is missing its target"
        )));
    }
    Ok(suffix)
}

impl std::fmt::Display for ApplicabilityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_TAG),
            Self::Zone(zone) => write!(f, "{ZONE_PREFIX}{zone}"),
            Self::Part(part) => write!(f, "{PART_PREFIX}{part}"),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_forms() {
        assert_eq!(ApplicabilityTag::parse("ALL").expect("all"), ApplicabilityTag::All);
        assert_eq!(
            ApplicabilityTag::parse("zone:chest").expect("zone"),
            ApplicabilityTag::Zone(ZoneKey::from("chest"))
        );
        assert_eq!(
            ApplicabilityTag::parse(" part:Left_Knee ").expect("part"),
            ApplicabilityTag::Part(PartId::from("Left_Knee"))
        );
    }

    #[test]
    fn untagged_values_are_kept_raw() {
        assert_eq!(
            ApplicabilityTag::parse("Teeth").expect("raw"),
            ApplicabilityTag::Raw("Teeth".into())
        );
        // Lowercase "all" is not the global tag.
        assert_eq!(
            ApplicabilityTag::parse("all").expect("raw"),
            ApplicabilityTag::Raw("all".into())
        );
    }

    #[test]
    fn rejects_prefix_without_target() {
        let err = ApplicabilityTag::parse("zone:").expect_err("missing zone");
        assert!(matches!(err, CatalogueError::Translation(msg) if msg.contains("zone:")));

        let err = ApplicabilityTag::parse("  ").expect_err("blank tag");
        assert!(matches!(err, CatalogueError::Translation(msg) if msg.contains("empty")));
    }

    #[test]
    fn display_matches_wire_form() {
        for raw in ["ALL", "zone:head", "part:Pecs", "legs"] {
            let tag = ApplicabilityTag::parse(raw).expect("parse tag");
            assert_eq!(tag.to_string(), raw);
        }
    }
}
