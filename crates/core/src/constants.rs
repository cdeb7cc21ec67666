//! Constants used throughout the body-map core crate.

/// Key of the catch-all zone that owns every part not listed elsewhere.
pub const FALLBACK_ZONE_KEY: &str = "other";

/// Label used for the fallback zone when a catalogue does not declare it.
pub const FALLBACK_ZONE_LABEL: &str = "Autre";

/// Maximum number of symptoms returned by a search when the caller gives no limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 8;

/// Shortest free-text query accepted by an unscoped search.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;
