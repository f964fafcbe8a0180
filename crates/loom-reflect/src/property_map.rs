//! Ordered, name-keyed views over an owner's properties.
//!
//! A property map owns nothing: it borrows the owner's fields for as long as
//! the map is alive. [`PropertyMap`] borrows them shared and writes them out;
//! [`PropertyMapMut`] borrows them mutably and reads them back. Owners
//! typically build both in a pair of methods that list the same fields in the
//! same order:
//!
//! ```
//! use loom_reflect::prelude::*;
//!
//! #[derive(Default)]
//! struct Vec2 { x: f32, y: f32 }
//!
//! impl Vec2 {
//!     fn properties(&self) -> PropertyMap<'_> {
//!         PropertyMap::new().with_field("x", &self.x).with_field("y", &self.y)
//!     }
//!     fn properties_mut(&mut self) -> PropertyMapMut<'_> {
//!         PropertyMapMut::new().with_field("x", &mut self.x).with_field("y", &mut self.y)
//!     }
//! }
//!
//! let mut v = Vec2::default();
//! v.properties_mut().deserialize_from(&serde_json::json!({ "x": 3.0 })).unwrap();
//! assert_eq!((v.x, v.y), (3.0, 0.0));
//! ```
//!
//! Registration order is kept for iteration. On the wire the fields form a
//! JSON object, so their order there is irrelevant.

use crate::document::{self, Node};
use crate::property::Property;
use crate::reflect::Reflect;
use crate::ReflectError;

/// Validate `name` against the names already registered.
fn check_name<'n>(
    mut existing: impl Iterator<Item = &'n str>,
    name: &str,
) -> Result<(), ReflectError> {
    if name.is_empty() {
        return Err(ReflectError::UnnamedProperty);
    }
    if existing.any(|registered| registered == name) {
        return Err(ReflectError::DuplicateProperty {
            name: name.to_owned(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// PropertyMap
// ---------------------------------------------------------------------------

/// Shared view over an owner's properties, used to write them out.
#[derive(Default)]
pub struct PropertyMap<'a> {
    entries: Vec<(&'a str, &'a dyn Reflect)>,
}

impl<'a> PropertyMap<'a> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `value` under `name`.
    ///
    /// Returns [`ReflectError::DuplicateProperty`] if `name` is taken (the
    /// first registration stays) and [`ReflectError::UnnamedProperty`] if it
    /// is empty.
    pub fn register(&mut self, name: &'a str, value: &'a dyn Reflect) -> Result<(), ReflectError> {
        check_name(self.names(), name)?;
        self.entries.push((name, value));
        Ok(())
    }

    /// Builder form of [`register`](Self::register) for a [`Property`].
    ///
    /// # Panics
    ///
    /// Panics if the property is unnamed or its name is already registered.
    /// Both are mistakes in the owner's field list, not in the data.
    pub fn with<T: Reflect>(self, property: &'a Property<T>) -> Self {
        self.with_field(property.name(), property.get())
    }

    /// Builder form of [`register`](Self::register) for a plain field.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or already registered.
    pub fn with_field(mut self, name: &'a str, value: &'a dyn Reflect) -> Self {
        if let Err(e) = self.register(name, value) {
            panic!("invalid property list: {e}");
        }
        self
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&'a dyn Reflect> {
        self.entries
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every property into `node` as `node[name]`.
    ///
    /// A non-object `node` is replaced by an object; keys already present in
    /// an object node are kept unless a property overwrites them.
    pub fn serialize_to(&self, node: &mut Node) {
        let object = document::ensure_object(node);
        for (name, value) in &self.entries {
            object.insert((*name).to_owned(), value.to_node());
        }
    }

    /// Serialize into a fresh object node.
    pub fn to_node(&self) -> Node {
        let mut node = Node::Null;
        self.serialize_to(&mut node);
        node
    }
}

impl std::fmt::Debug for PropertyMap<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// ---------------------------------------------------------------------------
// PropertyMapMut
// ---------------------------------------------------------------------------

/// Mutable view over an owner's properties, used to read them back.
#[derive(Default)]
pub struct PropertyMapMut<'a> {
    entries: Vec<(&'a str, &'a mut dyn Reflect)>,
}

impl<'a> PropertyMapMut<'a> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `value` under `name`. Same rules as [`PropertyMap::register`].
    pub fn register(
        &mut self,
        name: &'a str,
        value: &'a mut dyn Reflect,
    ) -> Result<(), ReflectError> {
        check_name(self.names(), name)?;
        self.entries.push((name, value));
        Ok(())
    }

    /// Builder form of [`register`](Self::register) for a [`Property`].
    ///
    /// # Panics
    ///
    /// Panics if the property is unnamed or its name is already registered.
    pub fn with<T: Reflect>(self, property: &'a mut Property<T>) -> Self {
        let name = property.name();
        self.with_field(name, property.get_mut())
    }

    /// Builder form of [`register`](Self::register) for a plain field.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or already registered.
    pub fn with_field(mut self, name: &'a str, value: &'a mut dyn Reflect) -> Self {
        if let Err(e) = self.register(name, value) {
            panic!("invalid property list: {e}");
        }
        self
    }

    /// Look up a property by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        self.entries
            .iter_mut()
            .find(|(registered, _)| *registered == name)
            .map(|(_, value)| &mut **value as &mut dyn Reflect)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(registered, _)| *registered == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read every property present in `node`.
    ///
    /// `node` must be an object. Properties whose key is missing keep their
    /// current value; keys with no matching property are ignored. Errors are
    /// prefixed with the failing property's name.
    pub fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        let object = document::expect_object(node)?;
        for (name, value) in &mut self.entries {
            match object.get(*name) {
                Some(child) => value.deserialize_from(child).map_err(|e| e.within(name))?,
                None => {
                    tracing::trace!(property = %name, "property missing from document, keeping current value");
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for PropertyMapMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
