//! The [`Component`] trait and runtime type identity.
//!
//! Components are stored as `Box<dyn Component>`. Each concrete type has a
//! stable type tag ([`TypeDescriptor::TYPE_TAG`]) that is written next to its
//! data and used by the [`Factory`](crate::factory::Factory) to recreate it.

use std::any::Any;

use loom_reflect::prelude::*;

use crate::context::LoadContext;
use crate::ObjectError;

// ---------------------------------------------------------------------------
// Type identity
// ---------------------------------------------------------------------------

/// Static type descriptor of a concrete component type.
///
/// The tag is the serialized discriminator and the factory key. It must be
/// unique per type and must not change between versions, or saved documents
/// stop loading.
pub trait TypeDescriptor {
    const TYPE_TAG: &'static str;
}

/// Access to `Any` through a trait object, for exact-type downcasts.
///
/// Implemented for every `'static` type; component authors never implement it.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A polymorphic unit of data and behavior attached to a
/// [`GameObject`](crate::game_object::GameObject).
///
/// Most components only list their fields in [`properties`](Self::properties)
/// and [`properties_mut`](Self::properties_mut); the default
/// [`serialize_to`](Self::serialize_to) / [`deserialize_from`](Self::deserialize_from)
/// walk those maps.
pub trait Component: AsAny {
    /// Runtime type tag, normally `<Self as TypeDescriptor>::TYPE_TAG`.
    fn type_tag(&self) -> &'static str;

    /// Called when the owning object starts its lifecycle.
    fn initialize(&mut self) {}

    /// Called when the owning object shuts down or before it reloads.
    fn shutdown(&mut self) {}

    /// Called when the owning object is enabled or disabled.
    fn set_enabled(&mut self, _enabled: bool) {}

    /// Serializable fields, in declaration order.
    fn properties(&self) -> PropertyMap<'_> {
        PropertyMap::new()
    }

    /// Mutable view of the same fields as [`properties`](Self::properties).
    fn properties_mut(&mut self) -> PropertyMapMut<'_> {
        PropertyMapMut::new()
    }

    /// Write this component's data into its entry node.
    ///
    /// The node already holds the type tag; implementations add keys next
    /// to it.
    fn serialize_to(&self, node: &mut Node) {
        self.properties().serialize_to(node);
    }

    /// Read this component's data from its entry node.
    ///
    /// `ctx` gives access to the factory for components that own other
    /// components.
    fn deserialize_from(
        &mut self,
        node: &Node,
        _ctx: &mut LoadContext<'_>,
    ) -> Result<(), ObjectError> {
        self.properties_mut().deserialize_from(node)?;
        Ok(())
    }
}

impl dyn Component {
    /// Whether the concrete type is exactly `T`.
    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Convert a boxed component into its concrete type.
    ///
    /// Returns `None` (dropping the component) if it is not a `T`.
    pub fn downcast<T: Component>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}
