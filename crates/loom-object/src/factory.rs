//! Creating components by type tag.
//!
//! A [`Factory`] maps each registered type tag to a zero-argument creator.
//! Loading uses it to turn the `__type` of a document entry back into a fresh
//! component. Factories are plain values: build one at startup, pass it by
//! reference to every load, and build separate ones where isolation matters
//! (tests, tools that read foreign documents).

use std::any::TypeId;
use std::collections::HashMap;

use crate::component::{Component, TypeDescriptor};
use crate::game_object::GameObject;
use crate::transform::TransformComp;
use crate::ObjectError;

/// Type-erased constructor for a registered component type.
pub type CreateFn = Box<dyn Fn() -> Box<dyn Component> + Send + Sync>;

struct Creator {
    create: CreateFn,
    /// Rust type produced by `create`, when known at registration time.
    type_id: Option<TypeId>,
}

impl Creator {
    fn of<T: Component + Default>() -> Self {
        Self {
            create: Box::new(|| Box::new(T::default()) as Box<dyn Component>),
            type_id: Some(TypeId::of::<T>()),
        }
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Registry of component creators keyed by type tag.
///
/// A tag can be registered once. Later registrations of the same tag are
/// rejected with [`ObjectError::DuplicateType`] and the first creator stays
/// in place.
pub struct Factory {
    creators: HashMap<String, Creator>,
}

impl Factory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            creators: HashMap::new(),
        }
    }

    /// Create a factory that already knows the built-in component types:
    /// [`GameObject`] (for nested objects) and [`TransformComp`].
    pub fn with_builtins() -> Self {
        let mut creators = HashMap::new();
        creators.insert(GameObject::TYPE_TAG.to_owned(), Creator::of::<GameObject>());
        creators.insert(
            TransformComp::TYPE_TAG.to_owned(),
            Creator::of::<TransformComp>(),
        );
        Self { creators }
    }

    /// Register a creator under `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::DuplicateType`] if `tag` already has a creator.
    /// The existing creator is kept.
    pub fn register<F>(&mut self, tag: &str, create: F) -> Result<(), ObjectError>
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        self.insert(
            tag,
            Creator {
                create: Box::new(create),
                type_id: None,
            },
        )
    }

    /// Register `T` under its [`TypeDescriptor::TYPE_TAG`], created with
    /// `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::DuplicateType`] if the tag already has a
    /// creator.
    pub fn register_type<T>(&mut self) -> Result<(), ObjectError>
    where
        T: Component + TypeDescriptor + Default,
    {
        self.insert(T::TYPE_TAG, Creator::of::<T>())
    }

    fn insert(&mut self, tag: &str, creator: Creator) -> Result<(), ObjectError> {
        if self.creators.contains_key(tag) {
            tracing::warn!(
                type_tag = %tag,
                "component type already registered, keeping the first creator"
            );
            return Err(ObjectError::DuplicateType {
                tag: tag.to_owned(),
            });
        }
        tracing::debug!(type_tag = %tag, "registered component type");
        self.creators.insert(tag.to_owned(), creator);
        Ok(())
    }

    /// Create a component by type tag.
    ///
    /// Returns `None` if no creator is registered for `tag`.
    pub fn create(&self, tag: &str) -> Option<Box<dyn Component>> {
        self.creators.get(tag).map(|creator| (creator.create)())
    }

    /// Create a `T` through the creator registered under `T`'s tag.
    ///
    /// Returns `None` if the tag is unknown, was registered for a different
    /// Rust type, or the creator produced something other than a `T`.
    pub fn create_type<T>(&self) -> Option<Box<T>>
    where
        T: Component + TypeDescriptor,
    {
        let creator = self.creators.get(T::TYPE_TAG)?;
        if creator
            .type_id
            .is_some_and(|registered| registered != TypeId::of::<T>())
        {
            return None;
        }
        (creator.create)().downcast::<T>()
    }

    /// Whether a creator is registered for `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.creators.contains_key(tag)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }

    /// Returns all registered type tags, sorted.
    pub fn registered_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.creators.keys().map(|s| s.as_str()).collect();
        tags.sort();
        tags
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("types", &self.registered_tags())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
