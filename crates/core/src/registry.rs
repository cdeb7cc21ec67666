//! Anatomical registry.
//!
//! Owns the immutable zone table and answers three questions about opaque part identifiers:
//! which zone owns them, what to call them, and what a zone is called. Every lookup is total.
//!
//! Zone membership is resolved by declaration order: when a part is listed under more than one
//! zone, the first declared zone owns it and the later assignments are recorded in
//! [`AnatomicalRegistry::duplicate_parts`].

use crate::constants::{FALLBACK_ZONE_KEY, FALLBACK_ZONE_LABEL};
use bodymap_catalogue::{CatalogueData, ZoneData};
use bodymap_types::{NonEmptyText, PartId, ZoneKey};
use std::collections::{BTreeMap, HashMap};

/// An anatomical zone and the parts it owns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    key: ZoneKey,
    label: String,
    parts: Vec<PartId>,
}

impl Zone {
    pub fn key(&self) -> &ZoneKey {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parts in declaration order, including any that an earlier zone already owns.
    pub fn parts(&self) -> &[PartId] {
        &self.parts
    }

    pub fn is_fallback(&self) -> bool {
        self.key.as_str() == FALLBACK_ZONE_KEY
    }
}

/// A part listed under more than one zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicatePart {
    pub part: PartId,
    /// Zone that owns the part (declared first).
    pub owner: ZoneKey,
    /// Later zone whose listing was ignored.
    pub ignored: ZoneKey,
}

#[derive(Clone, Debug)]
pub struct AnatomicalRegistry {
    zones: Vec<Zone>,
    zone_index: HashMap<ZoneKey, usize>,
    part_zone: HashMap<PartId, usize>,
    part_names: HashMap<PartId, NonEmptyText>,
    duplicates: Vec<DuplicatePart>,
    fallback: usize,
}

impl AnatomicalRegistry {
    /// Build the registry, inverting the zone table into a part lookup.
    ///
    /// The fallback zone `other` is appended when the zones do not declare it.
    pub fn new(zones: Vec<ZoneData>, part_names: BTreeMap<PartId, NonEmptyText>) -> Self {
        let mut zones: Vec<Zone> = zones
            .into_iter()
            .map(|z| Zone {
                key: z.key,
                label: z.label.into_string(),
                parts: z.parts,
            })
            .collect();

        let fallback = match zones.iter().position(Zone::is_fallback) {
            Some(index) => index,
            None => {
                zones.push(Zone {
                    key: ZoneKey::from(FALLBACK_ZONE_KEY),
                    label: FALLBACK_ZONE_LABEL.to_string(),
                    parts: Vec::new(),
                });
                zones.len() - 1
            }
        };

        let mut zone_index = HashMap::with_capacity(zones.len());
        let mut part_zone = HashMap::new();
        let mut duplicates = Vec::new();
        for (index, zone) in zones.iter().enumerate() {
            zone_index.entry(zone.key.clone()).or_insert(index);
            for part in &zone.parts {
                match part_zone.get(part) {
                    Some(&owner) if owner != index => {
                        let owner: &Zone = &zones[owner];
                        tracing::warn!(
                            "part '{}' is listed under '{}' and '{}'; '{}' takes precedence",
                            part,
                            owner.key,
                            zone.key,
                            owner.key
                        );
                        duplicates.push(DuplicatePart {
                            part: part.clone(),
                            owner: owner.key.clone(),
                            ignored: zone.key.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        part_zone.insert(part.clone(), index);
                    }
                }
            }
        }

        Self {
            zones,
            zone_index,
            part_zone,
            part_names: part_names.into_iter().collect(),
            duplicates,
            fallback,
        }
    }

    /// Build the registry from parsed catalogue data.
    pub fn from_catalogue(data: &CatalogueData) -> Self {
        Self::new(data.zones.clone(), data.part_names.clone())
    }

    /// Key of the zone owning `part`, or the fallback zone key.
    pub fn zone_of(&self, part: &PartId) -> &ZoneKey {
        let index = self.part_zone.get(part).copied().unwrap_or(self.fallback);
        &self.zones[index].key
    }

    pub fn zone(&self, key: &ZoneKey) -> Option<&Zone> {
        self.zone_index.get(key).map(|&index| &self.zones[index])
    }

    /// Zones in declaration order, fallback included.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Zone that owns every undeclared part.
    pub fn fallback_zone(&self) -> &Zone {
        &self.zones[self.fallback]
    }

    /// Registered display name for `part`, or one derived from the identifier.
    pub fn display_name(&self, part: &PartId) -> String {
        match self.part_names.get(part) {
            Some(name) => name.to_string(),
            None => humanize_part_id(part.as_str()),
        }
    }

    /// Configured label for `key`, or the key itself when the zone is unknown.
    pub fn zone_label<'a>(&'a self, key: &'a ZoneKey) -> &'a str {
        self.zone(key).map(Zone::label).unwrap_or(key.as_str())
    }

    pub fn duplicate_parts(&self) -> &[DuplicatePart] {
        &self.duplicates
    }
}

/// Derive a readable name from a mesh identifier.
///
/// `LeftForearm` and `Left_Forearm` both become `Left Forearm`. Acronyms stay together
/// (`ACLKnee` becomes `ACL Knee`). An identifier made only of separators is returned unchanged
/// so the result is never empty for a non-empty input.
pub fn humanize_part_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let mut spaced = String::with_capacity(id.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let acronym_end = prev.is_uppercase() && next_is_lower;
            if prev.is_lowercase() || prev.is_ascii_digit() || acronym_end {
                spaced.push(' ');
            }
        }
        spaced.push(if c == '_' { ' ' } else { c });
    }

    let name = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        id.to_string()
    } else {
        name
    }
}
