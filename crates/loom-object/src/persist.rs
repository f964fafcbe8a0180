//! Whole-object save and load entry points.
//!
//! These wrap [`GameObject::serialize_to`] / [`GameObject::deserialize_from`]
//! with JSON text and file handling. Every load builds a fresh
//! [`LoadContext`] and returns its [`LoadReport`].
//!
//! A failed load leaves the target object as it was before the call.

use std::fs;
use std::path::Path;

use loom_reflect::prelude::*;

use crate::context::{LoadContext, LoadReport};
use crate::factory::Factory;
use crate::game_object::GameObject;
use crate::options::{LoadOptions, SaveOptions};
use crate::ObjectError;

impl GameObject {
    // -- save -----------------------------------------------------------------

    /// Serialize into a fresh document tree.
    pub fn to_document(&self) -> Node {
        let mut node = Node::Null;
        self.serialize_to(&mut node);
        node
    }

    /// Serialize to JSON text.
    pub fn to_json_string(&self, options: &SaveOptions) -> Result<String, ObjectError> {
        let document = self.to_document();
        let text = if options.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(text)
    }

    /// Serialize to a JSON file, replacing it if it exists.
    pub fn save_to_file(
        &self,
        path: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> Result<(), ObjectError> {
        let path = path.as_ref();
        let text = self.to_json_string(options)?;
        fs::write(path, text).map_err(|source| ObjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(object = %self.name(), path = %path.display(), "saved object");
        Ok(())
    }

    // -- load -----------------------------------------------------------------

    /// Replace this object's name and components with the ones in `document`.
    ///
    /// # Errors
    ///
    /// [`ObjectError::Reflect`] for a structurally malformed document,
    /// [`ObjectError::UnknownType`] for an unregistered type under
    /// [`UnknownTypePolicy::Error`](crate::options::UnknownTypePolicy::Error).
    pub fn load_document(
        &mut self,
        document: &Node,
        factory: &Factory,
        options: &LoadOptions,
    ) -> Result<LoadReport, ObjectError> {
        let mut ctx = LoadContext::new(factory, options);
        self.deserialize_from(document, &mut ctx)?;
        let report = ctx.into_report();
        tracing::debug!(
            object = %self.name(),
            loaded = report.loaded_count,
            skipped = report.skipped_count(),
            "loaded object"
        );
        Ok(report)
    }

    /// Parse JSON text and load it into this object.
    pub fn load_json_str(
        &mut self,
        text: &str,
        factory: &Factory,
        options: &LoadOptions,
    ) -> Result<LoadReport, ObjectError> {
        let document: Node = serde_json::from_str(text)?;
        self.load_document(&document, factory, options)
    }

    /// Read a JSON file and load it into this object.
    pub fn load_from_file(
        &mut self,
        path: impl AsRef<Path>,
        factory: &Factory,
        options: &LoadOptions,
    ) -> Result<LoadReport, ObjectError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ObjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_json_str(&text, factory, options)
    }

    /// Build a new object from JSON text.
    pub fn from_json_str(
        text: &str,
        factory: &Factory,
        options: &LoadOptions,
    ) -> Result<(Self, LoadReport), ObjectError> {
        let mut object = Self::default();
        let report = object.load_json_str(text, factory, options)?;
        Ok((object, report))
    }
}
