//! Built-in 2D transform types.
//!
//! [`Vec2`] and [`Transform`] are plain aggregates that implement
//! [`Reflect`] through their own property maps; [`TransformComp`] is the
//! component that attaches a local transform to a
//! [`GameObject`](crate::game_object::GameObject).

use loom_reflect::prelude::*;

use crate::component::{Component, TypeDescriptor};

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D vector, serialized as `{ "x": .., "y": .. }`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    fn properties(&self) -> PropertyMap<'_> {
        PropertyMap::new()
            .with_field("x", &self.x)
            .with_field("y", &self.y)
    }

    fn properties_mut(&mut self) -> PropertyMapMut<'_> {
        PropertyMapMut::new()
            .with_field("x", &mut self.x)
            .with_field("y", &mut self.y)
    }
}

impl Reflect for Vec2 {
    fn serialize_to(&self, node: &mut Node) {
        self.properties().serialize_to(node);
    }

    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        self.properties_mut().deserialize_from(node)
    }
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// Position, depth, scale and rotation (radians).
///
/// Serialized as `{ "pos": {..}, "posZ": .., "sca": {..}, "rot": .. }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub pos: Vec2,
    /// Depth used for draw ordering.
    pub pos_z: f32,
    pub sca: Vec2,
    pub rot: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            pos_z: 0.0,
            sca: Vec2::ONE,
            rot: 0.0,
        }
    }
}

impl Transform {
    fn properties(&self) -> PropertyMap<'_> {
        PropertyMap::new()
            .with_field("pos", &self.pos)
            .with_field("posZ", &self.pos_z)
            .with_field("sca", &self.sca)
            .with_field("rot", &self.rot)
    }

    fn properties_mut(&mut self) -> PropertyMapMut<'_> {
        PropertyMapMut::new()
            .with_field("pos", &mut self.pos)
            .with_field("posZ", &mut self.pos_z)
            .with_field("sca", &mut self.sca)
            .with_field("rot", &mut self.rot)
    }
}

impl Reflect for Transform {
    fn serialize_to(&self, node: &mut Node) {
        self.properties().serialize_to(node);
    }

    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        self.properties_mut().deserialize_from(node)
    }
}

// ---------------------------------------------------------------------------
// TransformComp
// ---------------------------------------------------------------------------

/// Component holding an object's local [`Transform`] under the `"local"` key.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComp {
    local: Property<Transform>,
}

impl TypeDescriptor for TransformComp {
    const TYPE_TAG: &'static str = "TransformComp";
}

impl Default for TransformComp {
    fn default() -> Self {
        Self {
            local: Property::new("local", Transform::default()),
        }
    }
}

impl TransformComp {
    pub fn local(&self) -> &Transform {
        self.local.get()
    }

    pub fn local_mut(&mut self) -> &mut Transform {
        self.local.get_mut()
    }

    pub fn position(&self) -> Vec2 {
        self.local().pos
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.local_mut().pos = pos;
    }

    pub fn position_z(&self) -> f32 {
        self.local().pos_z
    }

    pub fn set_position_z(&mut self, z: f32) {
        self.local_mut().pos_z = z;
    }

    pub fn scale(&self) -> Vec2 {
        self.local().sca
    }

    pub fn set_scale(&mut self, sca: Vec2) {
        self.local_mut().sca = sca;
    }

    /// Rotation angle in radians.
    pub fn rotation(&self) -> f32 {
        self.local().rot
    }

    pub fn set_rotation(&mut self, rot: f32) {
        self.local_mut().rot = rot;
    }

    /// Unit vector pointing along the rotation angle.
    pub fn direction(&self) -> Vec2 {
        let (sin, cos) = self.rotation().sin_cos();
        Vec2::new(cos, sin)
    }

    /// Rotate to face `dir`. A zero vector leaves the rotation unchanged.
    pub fn set_direction(&mut self, dir: Vec2) {
        if dir.length() > f32::EPSILON {
            self.set_rotation(dir.y.atan2(dir.x));
        }
    }
}

impl Component for TransformComp {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn properties(&self) -> PropertyMap<'_> {
        PropertyMap::new().with(&self.local)
    }

    fn properties_mut(&mut self) -> PropertyMapMut<'_> {
        PropertyMapMut::new().with(&mut self.local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LoadContext;
    use crate::factory::Factory;
    use crate::options::LoadOptions;
    use serde_json::json;

    #[test]
    fn transform_layout() {
        let transform = Transform {
            pos: Vec2::new(1.0, 2.0),
            pos_z: 3.0,
            sca: Vec2::new(0.5, 0.5),
            rot: 0.25,
        };
        assert_eq!(
            transform.to_node(),
            json!({
                "pos": { "x": 1.0, "y": 2.0 },
                "posZ": 3.0,
                "sca": { "x": 0.5, "y": 0.5 },
                "rot": 0.25,
            })
        );
    }

    #[test]
    fn component_nests_under_local() {
        let mut comp = TransformComp::default();
        comp.set_position(Vec2::new(4.0, 2.0));

        let mut node = Node::Null;
        Component::serialize_to(&comp, &mut node);
        assert_eq!(node["local"]["pos"], json!({ "x": 4.0, "y": 2.0 }));
        assert_eq!(node["local"]["sca"], json!({ "x": 1.0, "y": 1.0 }));
    }

    #[test]
    fn partial_entry_keeps_defaults() {
        let factory = Factory::new();
        let options = LoadOptions::default();
        let mut ctx = LoadContext::new(&factory, &options);

        let mut comp = TransformComp::default();
        Component::deserialize_from(
            &mut comp,
            &json!({ "local": { "pos": { "y": 7.0 }, "rot": 1.5 } }),
            &mut ctx,
        )
        .unwrap();

        assert_eq!(comp.position(), Vec2::new(0.0, 7.0));
        assert_eq!(comp.scale(), Vec2::ONE);
        assert_eq!(comp.rotation(), 1.5);
    }

    #[test]
    fn wrong_kind_reports_the_field_path() {
        let factory = Factory::new();
        let options = LoadOptions::default();
        let mut ctx = LoadContext::new(&factory, &options);

        let mut comp = TransformComp::default();
        let err = Component::deserialize_from(
            &mut comp,
            &json!({ "local": { "sca": { "x": "wide" } } }),
            &mut ctx,
        )
        .unwrap_err();
        assert!(err.to_string().contains("local.sca.x"), "{err}");
    }

    #[test]
    fn direction_follows_rotation() {
        let mut comp = TransformComp::default();
        assert_eq!(comp.direction(), Vec2::new(1.0, 0.0));

        comp.set_direction(Vec2::new(0.0, 2.0));
        assert!((comp.rotation() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        comp.set_direction(Vec2::ZERO);
        assert!((comp.rotation() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
