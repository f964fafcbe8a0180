//! Loom Object -- polymorphic components, a type factory, and composite
//! objects that round-trip through JSON.
//!
//! A [`GameObject`](game_object::GameObject) owns an ordered list of boxed
//! [`Component`](component::Component)s and is itself a component, so objects
//! nest. Saving writes the object's name and one entry per component tagged
//! with the component's type name:
//!
//! ```json
//! { "name": "player", "comps": [ { "__type": "TransformComp", "local": { ... } } ] }
//! ```
//!
//! Loading replaces the object's components with fresh ones created through a
//! [`Factory`](factory::Factory) by that type name. Entries whose type is not
//! registered are skipped (and reported), fields missing from an entry keep
//! the component's defaults.
//!
//! # Quick Start
//!
//! ```
//! use loom_object::prelude::*;
//!
//! let factory = Factory::with_builtins();
//!
//! let mut ship = GameObject::new("ship");
//! let transform = ship.new_comp::<TransformComp>();
//! ship.comp_mut(transform)
//!     .and_then(|c| c.downcast_mut::<TransformComp>())
//!     .unwrap()
//!     .set_position(Vec2::new(4.0, 2.0));
//!
//! let text = ship.to_json_string(&SaveOptions::default()).unwrap();
//!
//! let (loaded, report) =
//!     GameObject::from_json_str(&text, &factory, &LoadOptions::default()).unwrap();
//! assert_eq!(loaded.name(), "ship");
//! assert_eq!(report.loaded_count, 1);
//! assert_eq!(
//!     loaded.get::<TransformComp>().unwrap().position(),
//!     Vec2::new(4.0, 2.0)
//! );
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod context;
pub mod factory;
pub mod game_object;
pub mod options;
pub mod persist;
pub mod transform;

use std::path::PathBuf;

pub use loom_reflect;
use loom_reflect::ReflectError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by factory registration and object load/save.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// The document did not have the expected shape, or a field failed to
    /// read.
    #[error(transparent)]
    Reflect(#[from] ReflectError),

    /// A creator was registered for a type tag that already has one.
    #[error("component type '{tag}' is already registered")]
    DuplicateType { tag: String },

    /// A document entry named a type the factory cannot create, and the load
    /// options ask for unknown types to be fatal.
    #[error("component type '{tag}' not registered. Registered types: [{registered}]")]
    UnknownType { tag: String, registered: String },

    /// The document text is not valid JSON.
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading or writing a document file failed.
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ObjectError {
    /// Prefix the document path of a malformed-document error with `segment`.
    ///
    /// Other variants are returned unchanged.
    pub fn within(self, segment: &str) -> Self {
        match self {
            Self::Reflect(e) => Self::Reflect(e.within(segment)),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use loom_reflect::prelude::*;

    pub use crate::component::{AsAny, Component, TypeDescriptor};
    pub use crate::context::{LoadContext, LoadReport};
    pub use crate::factory::Factory;
    pub use crate::game_object::{CompHandle, GameObject, ObjectId, ObjectState};
    pub use crate::options::{LoadOptions, SaveOptions, UnknownTypePolicy};
    pub use crate::transform::{Transform, TransformComp, Vec2};
    pub use crate::ObjectError;
}
