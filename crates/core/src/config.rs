//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the engine. Nothing
//! in this crate reads environment variables; the `*_from_env_value` helpers only parse values
//! the binary has already read.

use crate::constants::{DEFAULT_MIN_QUERY_LEN, DEFAULT_SEARCH_LIMIT};
use crate::{EngineError, EngineResult};
use bodymap_catalogue::{Catalogue, CatalogueData};
use std::path::PathBuf;

/// What happens to a part's recorded symptoms when the part is toggled off.
///
/// `clear_all` always discards everything, whatever the policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeselectPolicy {
    /// Keep the list; re-selecting the part shows it again.
    #[default]
    Retain,
    /// Discard the list as soon as the part is deselected.
    Purge,
}

impl std::str::FromStr for DeselectPolicy {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "purge" => Ok(Self::Purge),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown deselect policy '{other}' (expected 'retain' or 'purge')"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    search_limit: usize,
    min_query_len: usize,
    search_keywords: bool,
    deselect_policy: DeselectPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `search_limit` is zero.
    pub fn new(
        search_limit: usize,
        min_query_len: usize,
        search_keywords: bool,
        deselect_policy: DeselectPolicy,
    ) -> EngineResult<Self> {
        if search_limit == 0 {
            return Err(EngineError::InvalidConfig(
                "search_limit must be at least 1".into(),
            ));
        }

        Ok(Self {
            search_limit,
            min_query_len,
            search_keywords,
            deselect_policy,
        })
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }

    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }

    pub fn search_keywords(&self) -> bool {
        self.search_keywords
    }

    pub fn deselect_policy(&self) -> DeselectPolicy {
        self.deselect_policy
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            search_keywords: true,
            deselect_policy: DeselectPolicy::default(),
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_count(name: &str, value: Option<String>, default: usize) -> EngineResult<usize> {
    match trimmed(value) {
        None => Ok(default),
        Some(v) => v.parse::<usize>().map_err(|_| {
            EngineError::InvalidConfig(format!("{name} must be a non-negative integer, got '{v}'"))
        }),
    }
}

/// Parse the default search limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_SEARCH_LIMIT`].
pub fn search_limit_from_env_value(value: Option<String>) -> EngineResult<usize> {
    parse_count("search limit", value, DEFAULT_SEARCH_LIMIT)
}

/// Parse the minimum unscoped query length from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_MIN_QUERY_LEN`].
pub fn min_query_len_from_env_value(value: Option<String>) -> EngineResult<usize> {
    parse_count("minimum query length", value, DEFAULT_MIN_QUERY_LEN)
}

/// Parse the deselect policy from an optional string value, defaulting to `retain`.
pub fn deselect_policy_from_env_value(value: Option<String>) -> EngineResult<DeselectPolicy> {
    let parsed = trimmed(value).map(|v| v.parse::<DeselectPolicy>()).transpose()?;
    Ok(parsed.unwrap_or_default())
}

/// Resolve the catalogue to load at startup.
///
/// If `override_path` is provided the file must exist and parse; otherwise the catalogue
/// compiled into `bodymap-catalogue` is used.
pub fn resolve_catalogue(override_path: Option<PathBuf>) -> EngineResult<CatalogueData> {
    let data = match override_path {
        Some(path) => {
            tracing::info!("loading catalogue from {}", path.display());
            Catalogue::load(&path)?
        }
        None => Catalogue::builtin()?,
    };

    for key in data.unknown_zone_references() {
        tracing::warn!("catalogue references undeclared zone '{}'", key);
    }

    Ok(data)
}
