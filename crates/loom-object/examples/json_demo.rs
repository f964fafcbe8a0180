//! Save an object to JSON, change it in memory, and load it back.
//!
//! Run with:
//!   cargo run --example json_demo -p loom-object
//!
//! Set `RUST_LOG=loom_object=debug` to see registrations and load summaries.

use anyhow::Context;
use loom_object::prelude::*;

// ---------------------------------------------------------------------------
// Demo components
// ---------------------------------------------------------------------------

struct Enemy {
    life: Property<i32>,
    is_dead: Property<bool>,
    name: Property<String>,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            life: Property::new("life", 0),
            is_dead: Property::new("isDead", false),
            name: Property::new("name", String::new()),
        }
    }
}

impl TypeDescriptor for Enemy {
    const TYPE_TAG: &'static str = "Enemy";
}

impl Component for Enemy {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn properties(&self) -> PropertyMap<'_> {
        PropertyMap::new()
            .with(&self.life)
            .with(&self.is_dead)
            .with(&self.name)
    }

    fn properties_mut(&mut self) -> PropertyMapMut<'_> {
        PropertyMapMut::new()
            .with(&mut self.life)
            .with(&mut self.is_dead)
            .with(&mut self.name)
    }
}

/// Written by the demo but never registered, so loading skips it.
#[derive(Default)]
struct DebugLabel;

impl Component for DebugLabel {
    fn type_tag(&self) -> &'static str {
        "DebugLabel"
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut factory = Factory::with_builtins();
    factory.register_type::<Enemy>()?;

    let mut billy = GameObject::new("billy");
    billy.new_comp::<TransformComp>();
    let enemy = billy.new_comp::<Enemy>();
    billy.new_comp::<DebugLabel>();
    {
        let enemy = billy
            .comp_mut(enemy)
            .and_then(|c| c.downcast_mut::<Enemy>())
            .context("enemy component vanished")?;
        enemy.life.set(10);
        enemy.is_dead.set(true);
        enemy.name.set("Billy Jean".to_owned());
    }

    let dir = std::env::temp_dir().join("loom-json-demo");
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("billy.json");

    billy.save_to_file(&path, &SaveOptions::default())?;
    println!("saved to {}:", path.display());
    println!("{}", billy.to_json_string(&SaveOptions::default())?);

    if let Some(enemy) = billy.get_mut::<Enemy>() {
        enemy.life.set(999_999);
    }
    println!(
        "\nlife after mutation: {}",
        billy.get::<Enemy>().map_or(0, |e| *e.life.get())
    );

    let report = billy.load_from_file(&path, &factory, &LoadOptions::default())?;
    println!(
        "life after reload:   {}",
        billy.get::<Enemy>().map_or(0, |e| *e.life.get())
    );
    println!(
        "loaded {} components, skipped {:?}",
        report.loaded_count, report.skipped_types
    );

    Ok(())
}
