//! Named, typed field values.
//!
//! A [`Property`] owns one value together with the literal field name it is
//! stored under in the document. Owners list their properties in a
//! [`PropertyMap`](crate::property_map::PropertyMap); the map borrows them, so
//! a map can never outlive the properties it walks.

use crate::document::Node;
use crate::reflect::Reflect;
use crate::ReflectError;

/// A named value holder.
///
/// Access is explicit through [`get`](Self::get) / [`set`](Self::set); there
/// is no implicit conversion to `T`. A default-constructed property has an
/// empty name: it works as a bare value holder but is rejected by
/// [`PropertyMap::register`](crate::property_map::PropertyMap::register).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property<T> {
    name: &'static str,
    value: T,
}

impl<T> Property<T> {
    /// Create a property stored under `name` with an initial value.
    pub const fn new(name: &'static str, value: T) -> Self {
        Self { name, value }
    }

    /// The key this property is stored under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the property has a name and can be registered.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Replace the stored value and return a reference to the new one.
    pub fn set(&mut self, value: T) -> &T {
        self.value = value;
        &self.value
    }

    /// Replace the stored value and return the previous one.
    pub fn replace(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Reflect> Reflect for Property<T> {
    fn serialize_to(&self, node: &mut Node) {
        self.value.serialize_to(node);
    }

    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        self.value.deserialize_from(node)
    }
}
