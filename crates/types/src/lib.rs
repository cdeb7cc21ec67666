//! Shared value types for the body-map engine.
//!
//! These types are used by both the catalogue boundary crate and the engine core, so they live
//! in a leaf crate with no engine dependencies:
//! - opaque identifiers ([`PartId`], [`ZoneKey`], [`SymptomId`])
//! - validated text ([`NonEmptyText`])
//! - the validated 1–10 symptom [`Intensity`] scale

use serde::{Deserialize, Serialize};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating an [`Intensity`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntensityError {
    #[error("intensity {value} is outside the range {min}..={max}")]
    OutOfRange { value: i64, min: u8, max: u8 },
}

/// A label that is guaranteed to contain at least one non-whitespace character.
///
/// Leading and trailing whitespace is trimmed during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, trimming the input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Symptom intensity on the integer 1–10 scale.
///
/// Construction through [`Intensity::new`] rejects out-of-range values; nothing in the engine
/// clamps silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    /// Intensity given to a symptom when it is first recorded.
    pub const DEFAULT: Intensity = Intensity(5);

    /// Validates `value` against the 1–10 scale.
    ///
    /// # Errors
    ///
    /// Returns [`IntensityError::OutOfRange`] for any value outside `MIN..=MAX`.
    pub fn new(value: i64) -> Result<Self, IntensityError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(IntensityError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        // Range checked above, so the narrowing cannot truncate.
        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

impl<'de> Deserialize<'de> for Intensity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Intensity::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Declares an opaque string identifier.
///
/// Identifiers are never validated against live geometry; any string is a legal value.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a body part, matching an externally defined mesh/region name.
    PartId
);

opaque_id!(
    /// Stable key of an anatomical zone (for example `chest` or `other`).
    ZoneKey
);

opaque_id!(
    /// Stable identifier of a catalogue symptom.
    SymptomId
);
