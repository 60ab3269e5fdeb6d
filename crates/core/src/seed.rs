//! Reproducible description of a rendered frame.
//!
//! A [`SceneSeed`] names the scene, the viewport, the theme, the parameter
//! overrides, the PRNG seed and how many frames to run. Feeding the same
//! seed to the same build yields a byte-identical snapshot.

use crate::error::SceneError;
use crate::theme::ThemeId;
use serde::{Deserialize, Serialize};

/// Largest raster a seed may ask for (8192 × 8192).
pub const MAX_PIXELS: usize = 8192 * 8192;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneSeed {
    pub scene: String,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub theme: ThemeId,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl SceneSeed {
    /// A seed with the default theme, no overrides and zero frames.
    pub fn new(scene: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            scene: scene.to_owned(),
            width,
            height,
            theme: ThemeId::default(),
            params: empty_params(),
            seed,
            frames: 0,
        }
    }

    /// Rejects zero dimensions and rasters above [`MAX_PIXELS`].
    pub fn validate(&self) -> Result<(), SceneError> {
        pixel_count(self.width, self.height).map(|_| ())
    }
}

/// `width * height` when both are non-zero and the product is at most
/// [`MAX_PIXELS`].
pub fn pixel_count(width: usize, height: usize) -> Result<usize, SceneError> {
    match width.checked_mul(height) {
        Some(px) if width > 0 && height > 0 && px <= MAX_PIXELS => Ok(px),
        _ => Err(SceneError::InvalidDimensions),
    }
}
