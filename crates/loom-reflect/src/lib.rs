//! Loom Reflect -- named, typed properties walked over a JSON document tree.
//!
//! This crate provides the field-level half of Loom's object serialization.
//! A type declares its serializable fields as [`Property`] values (or plain
//! fields implementing [`Reflect`]) and exposes them through a
//! [`PropertyMap`]: an ordered, name-keyed, borrow-checked view that writes
//! every field into a [`serde_json::Value`] object in one pass, and reads them
//! back the same way.
//!
//! Reading is tolerant: keys missing from the
//! document leave the field at its current value, unknown keys are ignored.
//! Only structural mismatches (an object where a number was expected, an
//! integer out of range) are reported, as [`ReflectError::Malformed`] with the
//! dotted path of the offending field.
//!
//! # Quick Start
//!
//! ```
//! use loom_reflect::prelude::*;
//!
//! struct Stats {
//!     life: Property<i32>,
//!     is_dead: Property<bool>,
//! }
//!
//! impl Stats {
//!     fn properties(&self) -> PropertyMap<'_> {
//!         PropertyMap::new().with(&self.life).with(&self.is_dead)
//!     }
//!     fn properties_mut(&mut self) -> PropertyMapMut<'_> {
//!         PropertyMapMut::new().with(&mut self.life).with(&mut self.is_dead)
//!     }
//! }
//!
//! let stats = Stats {
//!     life: Property::new("life", 10),
//!     is_dead: Property::new("isDead", true),
//! };
//! let node = stats.properties().to_node();
//! assert_eq!(node, serde_json::json!({ "life": 10, "isDead": true }));
//!
//! let mut fresh = Stats {
//!     life: Property::new("life", 0),
//!     is_dead: Property::new("isDead", false),
//! };
//! fresh.properties_mut().deserialize_from(&node).unwrap();
//! assert_eq!(*fresh.life.get(), 10);
//! ```

#![deny(unsafe_code)]

pub mod document;
pub mod property;
pub mod property_map;
pub mod reflect;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while registering or reading properties.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    /// A property name was registered twice in the same map.
    #[error("property '{name}' is already registered in this property map")]
    DuplicateProperty { name: String },

    /// A default-constructed (unnamed) property was registered.
    #[error("cannot register a property without a name")]
    UnnamedProperty,

    /// The document does not have the shape the reader expected.
    #[error("malformed document at '{}': {details}", display_path(.path))]
    Malformed { path: String, details: String },
}

impl ReflectError {
    /// A malformed-document error located at the current node.
    ///
    /// Callers walking up the tree attach their key with [`within`](Self::within).
    pub fn malformed(details: impl Into<String>) -> Self {
        Self::Malformed {
            path: String::new(),
            details: details.into(),
        }
    }

    /// Prefix the error's document path with `segment`.
    ///
    /// Segments starting with `[` are array indices and are appended without a
    /// separating dot, so `within("comps")` on `[2].local` yields
    /// `comps[2].local`. Non-path variants are returned unchanged.
    pub fn within(self, segment: &str) -> Self {
        match self {
            Self::Malformed { path, details } => {
                let path = if path.is_empty() {
                    segment.to_owned()
                } else if path.starts_with('[') {
                    format!("{segment}{path}")
                } else {
                    format!("{segment}.{path}")
                };
                Self::Malformed { path, details }
            }
            other => other,
        }
    }

    /// The document path of a [`Malformed`](Self::Malformed) error.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Malformed { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::document::Node;
    pub use crate::property::Property;
    pub use crate::property_map::{PropertyMap, PropertyMapMut};
    pub use crate::reflect::Reflect;
    pub use crate::ReflectError;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_builds_dotted_and_indexed_paths() {
        let err = ReflectError::malformed("expected f32, found string")
            .within("x")
            .within("pos")
            .within("local")
            .within("[2]")
            .within("comps");
        assert_eq!(err.path(), Some("comps[2].local.pos.x"));
    }

    #[test]
    fn root_path_is_displayed_explicitly() {
        let err = ReflectError::malformed("expected object, found number");
        assert_eq!(
            err.to_string(),
            "malformed document at '<root>': expected object, found number"
        );
    }

    #[test]
    fn within_leaves_registration_errors_alone() {
        let err = ReflectError::UnnamedProperty.within("life");
        assert_eq!(err, ReflectError::UnnamedProperty);
        assert_eq!(err.path(), None);
    }
}
