//! Load and save options.
//!
//! Both option structs deserialize with every field optional, so they can be
//! embedded in a larger configuration file and only override what they name.

use serde::{Deserialize, Serialize};

/// What to do with a component entry whose type tag the factory does not
/// know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTypePolicy {
    /// Drop the entry, log a warning, and keep loading.
    #[default]
    Skip,
    /// Abort the load with [`ObjectError::UnknownType`](crate::ObjectError::UnknownType).
    Error,
}

/// Options for writing documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    /// Indent the JSON text.
    pub pretty: bool,
}

impl Default for SaveOptions {
    /// Defaults to pretty-printed output.
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl SaveOptions {
    /// Single-line output.
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

/// Options for reading documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Handling of unregistered component types. Defaults to
    /// [`UnknownTypePolicy::Skip`].
    pub unknown_types: UnknownTypePolicy,
}

impl LoadOptions {
    /// Options that fail the load on unregistered component types.
    pub fn strict() -> Self {
        Self {
            unknown_types: UnknownTypePolicy::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_tolerant_and_pretty() {
        assert_eq!(LoadOptions::default().unknown_types, UnknownTypePolicy::Skip);
        assert!(SaveOptions::default().pretty);
    }

    #[test]
    fn options_read_from_partial_config() {
        let load: LoadOptions = serde_json::from_str(r#"{ "unknown_types": "error" }"#).unwrap();
        assert_eq!(load, LoadOptions::strict());

        let save: SaveOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(save, SaveOptions::default());
    }
}
