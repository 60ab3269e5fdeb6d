//! Headless rendering of a [`SceneSeed`].

use crate::raster::Raster;
use crate::SceneKind;
use constellation_core::color::Rgba;
use constellation_core::driver::{Animator, ManualScheduler};
use constellation_core::error::SceneError;
use constellation_core::scene::Viewport;
use constellation_core::seed::SceneSeed;
use constellation_core::style::{StyleContext, StyleSource};
use constellation_core::theme::ThemeId;

/// Simulated frame spacing (60 Hz).
pub const FRAME_MS: f64 = 1000.0 / 60.0;

fn default_background(theme: ThemeId) -> Rgba {
    if theme.is_dark() {
        Rgba::BLACK
    } else {
        Rgba::WHITE
    }
}

/// Runs the seeded scene through the animator for `seed.frames` frames and
/// returns the last frame. Zero frames yields the freshly built state.
///
/// The background comes from `--color-background`. Identical seeds and
/// properties produce identical pixels.
pub fn render_seed(seed: &SceneSeed, properties: &dyn StyleSource) -> Result<Raster, SceneError> {
    seed.validate()?;
    let scene = SceneKind::from_name(&seed.scene, seed.seed, &seed.params)?;
    let style = StyleContext::new(seed.theme, properties);
    let background = style.color("--color-background", default_background(seed.theme));
    let raster = Raster::new(seed.width, seed.height, background)?;

    let mut animator = Animator::new(scene, Some(raster), ManualScheduler::new());
    animator.start(Viewport::new(seed.width as f64, seed.height as f64), &style);
    if seed.frames == 0 {
        animator.redraw();
    }
    for frame in 1..=seed.frames {
        animator.tick(frame as f64 * FRAME_MS);
    }
    log::info!(
        "rendered {} at {}x{} after {} frames",
        seed.scene,
        seed.width,
        seed.height,
        seed.frames
    );
    animator
        .into_surface()
        .ok_or_else(|| SceneError::Io("rasterizer surface missing".into()))
}
