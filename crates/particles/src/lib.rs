//! Proximity-particle constellation.
//!
//! A [`Constellation`] is a field of drifting entities plus the links
//! between close pairs. Each frame updates every entity, draws every
//! entity, then draws the links. The hero, about, contact and judo canvases
//! are presets of the same scene (see [`config`]).

#![deny(unsafe_code)]

pub mod config;
pub mod entity;
pub mod field;
pub mod links;

pub use config::{ColorSource, ConstellationConfig, ThemeColors, PRESET_NAMES};
pub use entity::{Entity, Pulse, RepulsionPolicy};
pub use field::{FieldSpec, ParticleField, Population, PulseSpec};
pub use links::{draw_links, link_strength, Link, LinkFalloff, LinkStyle};

use constellation_core::color::Rgba;
use constellation_core::error::SceneError;
use constellation_core::prng::Xorshift64;
use constellation_core::scene::{FrameInput, Scene, Viewport};
use constellation_core::style::StyleContext;
use constellation_core::surface::Surface;
use serde_json::Value;

/// One constellation canvas.
///
/// Holds the variant config, the current field, and the link style resolved
/// at the last rebuild. Colors are looked up from the style context only in
/// [`Scene::rebuild`]; frames reuse them until the next resize or theme
/// change. The PRNG is owned so a given seed replays the same fields across
/// rebuilds.
pub struct Constellation {
    config: ConstellationConfig,
    field: ParticleField,
    link_style: LinkStyle,
    rng: Xorshift64,
    rebuilds: usize,
}

impl Constellation {
    /// An empty scene; nothing is drawn until the first rebuild.
    pub fn new(config: ConstellationConfig, seed: u64) -> Self {
        let link_style = LinkStyle {
            color: Rgba::TRANSPARENT,
            width: config.link_width,
            falloff: config.link_falloff,
        };
        Self {
            config,
            field: ParticleField::empty(Viewport::new(0.0, 0.0)),
            link_style,
            rng: Xorshift64::new(seed),
            rebuilds: 0,
        }
    }

    /// A named preset with JSON overrides applied.
    pub fn from_preset(name: &str, seed: u64, params: &Value) -> Result<Self, SceneError> {
        let config = ConstellationConfig::preset(name)?.with_overrides(params)?;
        Ok(Self::new(config, seed))
    }

    pub fn config(&self) -> &ConstellationConfig {
        &self.config
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn link_style(&self) -> &LinkStyle {
        &self.link_style
    }

    /// How many times the field has been rebuilt.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Entity and link colors for the theme in `style`.
    fn resolve_colors(&self, style: &StyleContext<'_>) -> ThemeColors {
        match &self.config.colors {
            ColorSource::Properties {
                entity,
                link,
                fallback,
            } => ThemeColors {
                entity: style.color(entity, fallback.entity),
                link: style.color(link, fallback.link),
            },
            ColorSource::Palette { light, dark } => {
                ColorSource::palette_for(*light, *dark, style.theme)
            }
        }
    }
}

impl Scene for Constellation {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn rebuild(&mut self, viewport: Viewport, style: &StyleContext<'_>) {
        let colors = self.resolve_colors(style);
        self.field = ParticleField::rebuild(viewport, &self.config.field, colors.entity, &mut self.rng);
        self.link_style = LinkStyle {
            color: colors.link,
            width: self.config.link_width,
            falloff: self.config.link_falloff,
        };
        self.rebuilds += 1;
        log::debug!(
            "{}: rebuilt {} entities for theme {}",
            self.config.name,
            self.field.len(),
            style.theme
        );
    }

    fn step(&mut self, input: &FrameInput) {
        self.field
            .update(input.pointer, self.config.repulsion, input.timestamp_ms);
    }

    // Entities first so links are drawn over them.
    fn draw(&self, surface: &mut dyn Surface) {
        self.field.draw(surface);
        draw_links(
            self.field.entities(),
            surface,
            self.config.link_distance,
            &self.link_style,
        );
    }

    fn params(&self) -> Value {
        self.config.to_json()
    }

    fn param_schema(&self) -> Value {
        self.config.schema()
    }
}
