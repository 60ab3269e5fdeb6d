#![deny(unsafe_code)]
//! Scene registry: maps scene names to implementations and renders
//! reproducible CPU snapshots.
//!
//! This crate sits between `constellation-core` (which defines the `Scene`
//! trait) and the scene crates (`constellation-particles`,
//! `constellation-effects`). Both the CLI and the wasm bindings depend on it
//! so name dispatch lives in one place.

pub mod raster;
pub mod render;

#[cfg(feature = "png")]
pub mod snapshot;

pub use raster::Raster;
pub use render::{render_seed, FRAME_MS};

use constellation_core::error::SceneError;
use constellation_core::scene::{FrameInput, Scene, Viewport};
use constellation_core::style::StyleContext;
use constellation_core::surface::Surface;
use constellation_effects::FormulaDrift;
use constellation_particles::Constellation;
use serde_json::Value;

/// All available scene names.
const SCENE_NAMES: &[&str] = &["hero", "about", "contact", "judo", "intro"];

/// Every scene the site can mount.
///
/// Use [`SceneKind::from_name`] for string-based construction (CLI, wasm).
pub enum SceneKind {
    /// One of the four constellation presets.
    Constellation(Constellation),
    /// Intro overlay formula drift.
    Intro(FormulaDrift),
}

impl SceneKind {
    /// Constructs a scene by name.
    ///
    /// Returns `SceneError::UnknownScene` if the name is not recognized.
    pub fn from_name(name: &str, seed: u64, params: &Value) -> Result<Self, SceneError> {
        match name {
            "intro" => Ok(SceneKind::Intro(FormulaDrift::with_params(seed, params))),
            "hero" | "about" | "contact" | "judo" => Ok(SceneKind::Constellation(
                Constellation::from_preset(name, seed, params)?,
            )),
            _ => Err(SceneError::UnknownScene(name.to_string())),
        }
    }

    /// Returns a slice of all recognized scene names.
    pub fn list_scenes() -> &'static [&'static str] {
        SCENE_NAMES
    }
}

impl Scene for SceneKind {
    fn name(&self) -> &str {
        match self {
            SceneKind::Constellation(s) => s.name(),
            SceneKind::Intro(s) => s.name(),
        }
    }

    fn rebuild(&mut self, viewport: Viewport, style: &StyleContext<'_>) {
        match self {
            SceneKind::Constellation(s) => s.rebuild(viewport, style),
            SceneKind::Intro(s) => s.rebuild(viewport, style),
        }
    }

    fn step(&mut self, input: &FrameInput) {
        match self {
            SceneKind::Constellation(s) => s.step(input),
            SceneKind::Intro(s) => s.step(input),
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        match self {
            SceneKind::Constellation(s) => s.draw(surface),
            SceneKind::Intro(s) => s.draw(surface),
        }
    }

    fn params(&self) -> Value {
        match self {
            SceneKind::Constellation(s) => s.params(),
            SceneKind::Intro(s) => s.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            SceneKind::Constellation(s) => s.param_schema(),
            SceneKind::Intro(s) => s.param_schema(),
        }
    }
}
