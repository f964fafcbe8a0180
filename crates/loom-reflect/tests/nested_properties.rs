//! Integration tests for nested property maps.
//!
//! An aggregate implements `Reflect` by delegating to its own property map,
//! which lets property maps nest as properties of properties.

use loom_reflect::prelude::*;
use proptest::prelude::*;
use serde_json::json;

// -- test types ---------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    fn properties(&self) -> PropertyMap<'_> {
        PropertyMap::new()
            .with_field("r", &self.r)
            .with_field("g", &self.g)
            .with_field("b", &self.b)
    }

    fn properties_mut(&mut self) -> PropertyMapMut<'_> {
        PropertyMapMut::new()
            .with_field("r", &mut self.r)
            .with_field("g", &mut self.g)
            .with_field("b", &mut self.b)
    }
}

impl Reflect for Color {
    fn serialize_to(&self, node: &mut Node) {
        self.properties().serialize_to(node);
    }

    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        self.properties_mut().deserialize_from(node)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Sprite {
    texture: Property<String>,
    tint: Property<Color>,
    layer: Property<i32>,
    frames: Property<Vec<Color>>,
    outline: Property<Option<Color>>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            texture: Property::new("texture", String::new()),
            tint: Property::new("tint", Color { r: 255, g: 255, b: 255 }),
            layer: Property::new("layer", 0),
            frames: Property::new("frames", Vec::new()),
            outline: Property::new("outline", None),
        }
    }
}

impl Sprite {
    fn properties(&self) -> PropertyMap<'_> {
        PropertyMap::new()
            .with(&self.texture)
            .with(&self.tint)
            .with(&self.layer)
            .with(&self.frames)
            .with(&self.outline)
    }

    fn properties_mut(&mut self) -> PropertyMapMut<'_> {
        PropertyMapMut::new()
            .with(&mut self.texture)
            .with(&mut self.tint)
            .with(&mut self.layer)
            .with(&mut self.frames)
            .with(&mut self.outline)
    }
}

// -- helpers --------------------------------------------------------------------

fn color() -> impl Strategy<Value = Color> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Color { r, g, b })
}

fn sprite() -> impl Strategy<Value = Sprite> {
    (
        "[a-z_]{0,12}",
        color(),
        -100i32..100,
        prop::collection::vec(color(), 0..4),
        prop::option::of(color()),
    )
        .prop_map(|(texture, tint, layer, frames, outline)| {
            let mut sprite = Sprite::default();
            sprite.texture.set(texture);
            sprite.tint.set(tint);
            sprite.layer.set(layer);
            sprite.frames.set(frames);
            sprite.outline.set(outline);
            sprite
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn nested_aggregate_layout() {
    let mut sprite = Sprite::default();
    sprite.texture.set("ship.png".to_owned());
    sprite.tint.get_mut().g = 128;
    sprite.frames.get_mut().push(Color { r: 1, g: 2, b: 3 });

    assert_eq!(
        sprite.properties().to_node(),
        json!({
            "texture": "ship.png",
            "tint": { "r": 255, "g": 128, "b": 255 },
            "layer": 0,
            "frames": [{ "r": 1, "g": 2, "b": 3 }],
            "outline": null,
        })
    );
}

#[test]
fn missing_nested_key_keeps_the_inner_default() {
    let mut sprite = Sprite::default();
    sprite
        .properties_mut()
        .deserialize_from(&json!({ "tint": { "r": 10 } }))
        .unwrap();

    assert_eq!(*sprite.tint.get(), Color { r: 10, g: 255, b: 255 });
    assert_eq!(sprite.texture.get(), "");
}

#[test]
fn malformed_nested_value_reports_the_full_path() {
    let mut sprite = Sprite::default();
    let err = sprite
        .properties_mut()
        .deserialize_from(&json!({ "frames": [{ "r": 1 }, { "g": -4 }] }))
        .unwrap_err();

    assert_eq!(err.path(), Some("frames[1].g"));
}

proptest! {
    #[test]
    fn round_trip_restores_every_field(original in sprite()) {
        let node = original.properties().to_node();

        let mut restored = Sprite::default();
        restored.properties_mut().deserialize_from(&node).unwrap();

        prop_assert_eq!(restored, original);
    }

    #[test]
    fn dropping_a_key_keeps_the_pre_load_value(
        original in sprite(),
        dropped in prop::sample::select(vec!["texture", "tint", "layer", "frames", "outline"]),
    ) {
        let mut node = original.properties().to_node();
        node.as_object_mut().unwrap().remove(dropped);

        let mut restored = Sprite::default();
        restored.properties_mut().deserialize_from(&node).unwrap();

        let defaults = Sprite::default();
        let restored_node = restored.properties().to_node();
        prop_assert_eq!(&restored_node[dropped], &defaults.properties().to_node()[dropped]);
        for key in ["texture", "tint", "layer", "frames", "outline"] {
            if key != dropped {
                prop_assert_eq!(&restored_node[key], &original.properties().to_node()[key]);
            }
        }
    }
}
