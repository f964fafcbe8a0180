//! Composite objects: an ordered list of owned components.
//!
//! A [`GameObject`] owns its components exclusively. Adding a component moves
//! the box in and returns a [`CompHandle`] that names the owning object and
//! the component's slot; a handle from another object never resolves. Because
//! a `GameObject` is itself a [`Component`], objects nest.
//!
//! # Document layout
//!
//! ```json
//! {
//!   "name": "player",
//!   "comps": [
//!     { "__type": "TransformComp", "local": { "pos": { "x": 0, "y": 0 }, ... } },
//!     { "__type": "TransformComp", "__name": "muzzle", "local": { ... } },
//!     { "__type": "GameObject", "name": "weapon", "comps": [] }
//!   ]
//! }
//! ```
//!
//! Components can carry a name (`__name`, written only when set) so that
//! several components of one type can be told apart.
//!
//! Reading replaces all components (it is not a merge): every entry is created
//! through the factory by its `__type` and read in document order. Only when
//! the whole document has been read is the object shut down and its
//! components swapped for the new ones, so a failed load leaves it untouched.

use std::sync::atomic::{AtomicU64, Ordering};

use loom_reflect::document;
use loom_reflect::prelude::*;

use crate::component::{Component, TypeDescriptor};
use crate::context::LoadContext;
use crate::options::UnknownTypePolicy;
use crate::ObjectError;

/// Key of the object name.
pub const NAME_KEY: &str = "name";
/// Key of the component entry array.
pub const COMPS_KEY: &str = "comps";
/// Key of the type tag inside each component entry.
pub const TYPE_KEY: &str = "__type";
/// Key of the optional component name inside each component entry.
pub const COMP_NAME_KEY: &str = "__name";

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Process-unique identifier of a [`GameObject`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Handle to a component owned by a [`GameObject`].
///
/// Stays valid until the component is removed; slots are never reused within
/// one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompHandle {
    owner: ObjectId,
    slot: u32,
}

impl CompHandle {
    /// The object that owns the component.
    pub fn owner(self) -> ObjectId {
        self.owner
    }
}

/// Lifecycle state of a [`GameObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Freshly constructed, no component added yet.
    Uninitialized,
    /// Has been populated (by `add_comp` or a load) but not initialized.
    Populated,
    /// `initialize` ran on every component.
    Initialized,
    /// `shutdown` ran on every component.
    Shutdown,
}

struct CompSlot {
    slot: u32,
    name: String,
    enabled: bool,
    comp: Box<dyn Component>,
}

impl CompSlot {
    /// Named `name` and, when `tag` is given, of that type.
    fn matches_name(&self, name: &str, tag: Option<&str>) -> bool {
        self.name == name && tag.map_or(true, |tag| self.comp.type_tag() == tag)
    }
}

// ---------------------------------------------------------------------------
// GameObject
// ---------------------------------------------------------------------------

/// A named, ordered collection of components.
pub struct GameObject {
    id: ObjectId,
    name: String,
    enabled: bool,
    state: ObjectState,
    slots: Vec<CompSlot>,
    next_slot: u32,
}

impl TypeDescriptor for GameObject {
    const TYPE_TAG: &'static str = "GameObject";
}

impl GameObject {
    /// Create an empty object.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::next(),
            name: name.into(),
            enabled: true,
            state: ObjectState::Uninitialized,
            slots: Vec::new(),
            next_slot: 0,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // -- component management -------------------------------------------------

    /// Take ownership of `comp` and append it.
    ///
    /// The component is moved in, so one instance can never be present twice
    /// (here or in another object). A component added to a disabled object is
    /// disabled too.
    pub fn add_comp(&mut self, comp: Box<dyn Component>) -> CompHandle {
        self.add_named_comp(String::new(), comp)
    }

    /// Append `comp` under a component name, for lookups with
    /// [`get_comp_name`](Self::get_comp_name).
    pub fn add_named_comp(
        &mut self,
        name: impl Into<String>,
        mut comp: Box<dyn Component>,
    ) -> CompHandle {
        let slot = self.next_slot;
        self.next_slot += 1;
        let name = name.into();
        tracing::trace!(
            object = %self.name,
            type_tag = comp.type_tag(),
            comp_name = %name,
            slot,
            "component added"
        );
        if !self.enabled {
            comp.set_enabled(false);
        }
        self.slots.push(CompSlot {
            slot,
            name,
            enabled: self.enabled,
            comp,
        });
        if matches!(
            self.state,
            ObjectState::Uninitialized | ObjectState::Shutdown
        ) {
            self.state = ObjectState::Populated;
        }
        CompHandle {
            owner: self.id,
            slot,
        }
    }

    /// Append a default-constructed `T`.
    pub fn new_comp<T: Component + Default>(&mut self) -> CompHandle {
        self.add_comp(Box::new(T::default()))
    }

    fn position(&self, handle: CompHandle) -> Option<usize> {
        if handle.owner != self.id {
            return None;
        }
        self.slots.iter().position(|s| s.slot == handle.slot)
    }

    /// Remove and drop the component behind `handle`.
    ///
    /// Returns `false` if the handle does not resolve in this object.
    pub fn remove_comp(&mut self, handle: CompHandle) -> bool {
        self.take_comp(handle).is_some()
    }

    /// Remove the component behind `handle` and hand ownership back.
    pub fn take_comp(&mut self, handle: CompHandle) -> Option<Box<dyn Component>> {
        let index = self.position(handle)?;
        Some(self.slots.remove(index).comp)
    }

    /// Name of the component behind `handle`. Unnamed components have an
    /// empty name.
    pub fn comp_name(&self, handle: CompHandle) -> Option<&str> {
        let index = self.position(handle)?;
        Some(&self.slots[index].name)
    }

    /// Rename the component behind `handle`. Returns `false` if the handle
    /// does not resolve.
    pub fn set_comp_name(&mut self, handle: CompHandle, name: impl Into<String>) -> bool {
        let Some(index) = self.position(handle) else {
            return false;
        };
        self.slots[index].name = name.into();
        true
    }

    fn position_named(&self, name: &str, tag: Option<&str>) -> Option<usize> {
        self.slots.iter().position(|s| s.matches_name(name, tag))
    }

    /// First component named `name`, optionally restricted to type tag `tag`.
    pub fn get_comp_name(&self, name: &str, tag: Option<&str>) -> Option<&dyn Component> {
        let index = self.position_named(name, tag)?;
        Some(&*self.slots[index].comp)
    }

    pub fn get_comp_name_mut(
        &mut self,
        name: &str,
        tag: Option<&str>,
    ) -> Option<&mut dyn Component> {
        let index = self.position_named(name, tag)?;
        Some(&mut *self.slots[index].comp)
    }

    /// First component named `name` whose concrete type is exactly `T`.
    pub fn get_named<T: Component>(&self, name: &str) -> Option<&T> {
        self.slots
            .iter()
            .filter(|s| s.name == name)
            .find_map(|s| s.comp.downcast_ref::<T>())
    }

    /// Remove the first component named `name` (and of type `tag`, if given).
    pub fn remove_comp_name(&mut self, name: &str, tag: Option<&str>) -> bool {
        match self.position_named(name, tag) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every component named `name` (and of type `tag`, if given).
    /// Returns how many were removed.
    pub fn remove_all_comp_name(&mut self, name: &str, tag: Option<&str>) -> usize {
        let before = self.slots.len();
        self.slots.retain(|s| !s.matches_name(name, tag));
        before - self.slots.len()
    }

    /// Remove the first component whose type tag is `tag`.
    pub fn remove_comp_type(&mut self, tag: &str) -> bool {
        match self.slots.iter().position(|s| s.comp.type_tag() == tag) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every component whose type tag is `tag`. Returns how many were
    /// removed.
    pub fn remove_all_comp_type(&mut self, tag: &str) -> usize {
        let before = self.slots.len();
        self.slots.retain(|s| s.comp.type_tag() != tag);
        before - self.slots.len()
    }

    /// Drop every component.
    pub fn clear_comps(&mut self) {
        self.slots.clear();
    }

    pub fn comp(&self, handle: CompHandle) -> Option<&dyn Component> {
        let index = self.position(handle)?;
        Some(&*self.slots[index].comp)
    }

    pub fn comp_mut(&mut self, handle: CompHandle) -> Option<&mut dyn Component> {
        let index = self.position(handle)?;
        Some(&mut *self.slots[index].comp)
    }

    /// Component at `index` in insertion order.
    pub fn comp_at(&self, index: usize) -> Option<&dyn Component> {
        self.slots.get(index).map(|s| &*s.comp)
    }

    /// Handle of the component at `index` in insertion order.
    pub fn handle_at(&self, index: usize) -> Option<CompHandle> {
        self.slots.get(index).map(|s| CompHandle {
            owner: self.id,
            slot: s.slot,
        })
    }

    pub fn comp_count(&self) -> usize {
        self.slots.len()
    }

    /// Components in insertion order.
    pub fn comps(&self) -> impl Iterator<Item = &dyn Component> + '_ {
        self.slots.iter().map(|s| &*s.comp)
    }

    /// First component whose type tag is `tag`.
    pub fn get_comp(&self, tag: &str) -> Option<&dyn Component> {
        self.comps().find(|c| c.type_tag() == tag)
    }

    pub fn get_comp_mut(&mut self, tag: &str) -> Option<&mut dyn Component> {
        self.slots
            .iter_mut()
            .find(|s| s.comp.type_tag() == tag)
            .map(|s| &mut *s.comp)
    }

    /// First component whose concrete type is exactly `T`.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.comps().find_map(|c| c.downcast_ref::<T>())
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .find_map(|s| s.comp.downcast_mut::<T>())
    }

    /// Whether the component behind `handle` is enabled.
    pub fn is_comp_enabled(&self, handle: CompHandle) -> Option<bool> {
        let index = self.position(handle)?;
        Some(self.slots[index].enabled)
    }

    /// Enable or disable one component. Returns `false` if the handle does
    /// not resolve.
    pub fn set_comp_enabled(&mut self, handle: CompHandle, enabled: bool) -> bool {
        let Some(index) = self.position(handle) else {
            return false;
        };
        let slot = &mut self.slots[index];
        slot.enabled = enabled;
        slot.comp.set_enabled(enabled);
        true
    }

    // -- lifecycle --------------------------------------------------------------

    /// Initialize every component in order.
    pub fn initialize(&mut self) {
        for slot in &mut self.slots {
            slot.comp.initialize();
        }
        self.state = ObjectState::Initialized;
    }

    /// Shut down every component in order. Components stay attached.
    pub fn shutdown(&mut self) {
        for slot in &mut self.slots {
            slot.comp.shutdown();
        }
        self.state = ObjectState::Shutdown;
    }

    /// Enable or disable the object and every component.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        for slot in &mut self.slots {
            slot.enabled = enabled;
            slot.comp.set_enabled(enabled);
        }
    }

    // -- serialization ----------------------------------------------------------

    /// Write the name and one tagged entry per component into `node`.
    pub fn serialize_to(&self, node: &mut Node) {
        let entries = self
            .slots
            .iter()
            .map(|slot| {
                let mut entry = Node::Null;
                let object = document::ensure_object(&mut entry);
                object.insert(
                    TYPE_KEY.to_owned(),
                    Node::String(slot.comp.type_tag().to_owned()),
                );
                if !slot.name.is_empty() {
                    object.insert(COMP_NAME_KEY.to_owned(), Node::String(slot.name.clone()));
                }
                slot.comp.serialize_to(&mut entry);
                entry
            })
            .collect();

        let object = document::ensure_object(node);
        object.insert(NAME_KEY.to_owned(), Node::String(self.name.clone()));
        object.insert(COMPS_KEY.to_owned(), Node::Array(entries));
    }

    /// Replace this object's name and components with the ones in `node`.
    ///
    /// A missing `name` keeps the current name, a missing `comps` leaves the
    /// object empty. Entries with an unregistered `__type` are skipped and
    /// recorded in the context's report, or fail the load under
    /// [`UnknownTypePolicy::Error`]. The current components are shut down and
    /// dropped only once every entry has been read.
    ///
    /// # Errors
    ///
    /// [`ObjectError::Reflect`] if `node` or an entry has the wrong shape, or
    /// a component fails to read its fields. The error path locates the
    /// entry, e.g. `comps[1].local.rot`. On error the object is unchanged.
    pub fn deserialize_from(
        &mut self,
        node: &Node,
        ctx: &mut LoadContext<'_>,
    ) -> Result<(), ObjectError> {
        let object = document::expect_object(node)?;

        let name = match object.get(NAME_KEY) {
            Some(name) => document::expect_str(name).map_err(|e| e.within(NAME_KEY))?,
            None => self.name.as_str(),
        };

        let mut comps = Vec::new();
        if let Some(entries) = object.get(COMPS_KEY) {
            let entries = document::expect_array(entries).map_err(|e| e.within(COMPS_KEY))?;
            comps.reserve(entries.len());
            for (index, entry) in entries.iter().enumerate() {
                let segment = format!("{COMPS_KEY}[{index}]");
                let (tag, comp_name) = entry_header(entry).map_err(|e| e.within(&segment))?;

                let Some(mut comp) = ctx.factory().create(tag) else {
                    match ctx.options().unknown_types {
                        UnknownTypePolicy::Skip => {
                            tracing::warn!(
                                object = %name,
                                type_tag = %tag,
                                index,
                                "unknown component type, skipping entry"
                            );
                            ctx.record_skipped(tag);
                            continue;
                        }
                        UnknownTypePolicy::Error => {
                            return Err(ObjectError::UnknownType {
                                tag: tag.to_owned(),
                                registered: ctx.factory().registered_tags().join(", "),
                            });
                        }
                    }
                };

                comp.deserialize_from(entry, ctx)
                    .map_err(|e| e.within(&segment))?;
                ctx.record_loaded();
                comps.push((comp_name.to_owned(), comp));
            }
        }

        let name = name.to_owned();
        self.shutdown();
        self.clear_comps();
        self.name = name;
        for (comp_name, comp) in comps {
            self.add_named_comp(comp_name, comp);
        }
        self.state = ObjectState::Populated;
        Ok(())
    }
}

/// The `__type` and optional `__name` strings of a component entry.
fn entry_header(entry: &Node) -> Result<(&str, &str), ReflectError> {
    let object = document::expect_object(entry)?;
    let tag = object
        .get(TYPE_KEY)
        .ok_or_else(|| ReflectError::malformed(format!("missing '{TYPE_KEY}' key")))?;
    let tag = document::expect_str(tag).map_err(|e| e.within(TYPE_KEY))?;
    let name = match object.get(COMP_NAME_KEY) {
        Some(name) => document::expect_str(name).map_err(|e| e.within(COMP_NAME_KEY))?,
        None => "",
    };
    Ok((tag, name))
}

impl Default for GameObject {
    fn default() -> Self {
        Self::new("")
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field(
                "comps",
                &self.comps().map(|c| c.type_tag()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Component for GameObject {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn initialize(&mut self) {
        GameObject::initialize(self);
    }

    fn shutdown(&mut self) {
        GameObject::shutdown(self);
    }

    fn set_enabled(&mut self, enabled: bool) {
        GameObject::set_enabled(self, enabled);
    }

    fn serialize_to(&self, node: &mut Node) {
        GameObject::serialize_to(self, node);
    }

    fn deserialize_from(
        &mut self,
        node: &Node,
        ctx: &mut LoadContext<'_>,
    ) -> Result<(), ObjectError> {
        GameObject::deserialize_from(self, node, ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
