//! The `Scene` trait implemented by every animation the driver can run.
//!
//! The trait is object-safe so a registry can hand out `Box<dyn Scene>` and
//! the driver can run any of them through the same lifecycle.

use crate::style::StyleContext;
use crate::surface::Surface;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Size of the drawing area in CSS pixels.
///
/// Negative or non-finite dimensions are stored as zero; a zero-area
/// viewport is valid and simply holds no entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        let sanitize = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn center(&self) -> DVec2 {
        self.size() * 0.5
    }

    /// True when `p` lies inside the viewport grown by `margin` on every side.
    pub fn contains(&self, p: DVec2, margin: f64) -> bool {
        p.x >= -margin
            && p.x <= self.width + margin
            && p.y >= -margin
            && p.y <= self.height + margin
    }

    /// Clamps `p` into the viewport.
    pub fn clamp(&self, p: DVec2) -> DVec2 {
        p.clamp(DVec2::ZERO, self.size())
    }
}

/// Per-frame inputs supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position relative to the surface, `None` when the pointer
    /// has left it.
    pub pointer: Option<DVec2>,
    /// Host frame timestamp in milliseconds.
    pub timestamp_ms: f64,
}

/// An animation driven one frame at a time.
pub trait Scene {
    /// Stable name used by the registry and in logs.
    fn name(&self) -> &str;

    /// Discards all entities and builds new ones for `viewport`, resolving
    /// colors from `style`. Called on every (re)start.
    fn rebuild(&mut self, viewport: Viewport, style: &StyleContext<'_>);

    /// Advances every entity by one frame.
    fn step(&mut self, input: &FrameInput);

    /// Draws the current state. Never mutates the scene.
    fn draw(&self, surface: &mut dyn Surface);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Parameter types, ranges and defaults.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::style::StyleSheet;
    use crate::surface::Recording;
    use crate::theme::ThemeId;
    use serde_json::json;

    struct Blinker {
        viewport: Viewport,
        on: bool,
        color: Rgba,
    }

    impl Scene for Blinker {
        fn name(&self) -> &str {
            "blinker"
        }
        fn rebuild(&mut self, viewport: Viewport, style: &StyleContext<'_>) {
            self.viewport = viewport;
            self.color = style.color("--particle-color", Rgba::BLACK);
        }
        fn step(&mut self, _input: &FrameInput) {
            self.on = !self.on;
        }
        fn draw(&self, surface: &mut dyn Surface) {
            if self.on {
                surface.fill_circle(self.viewport.center(), 1.0, self.color);
            }
        }
        fn params(&self) -> Value {
            json!({"on": self.on})
        }
        fn param_schema(&self) -> Value {
            json!({"on": {"type": "boolean", "default": false}})
        }
    }

    #[test]
    fn viewport_sanitizes_bad_dimensions() {
        let v = Viewport::new(-10.0, f64::NAN);
        assert_eq!(v.width(), 0.0);
        assert_eq!(v.height(), 0.0);
        assert_eq!(v.area(), 0.0);
    }

    #[test]
    fn viewport_contains_respects_margin() {
        let v = Viewport::new(100.0, 50.0);
        assert!(v.contains(DVec2::new(100.0, 50.0), 0.0));
        assert!(!v.contains(DVec2::new(100.5, 10.0), 0.0));
        assert!(v.contains(DVec2::new(100.5, 10.0), 1.0));
        assert_eq!(v.clamp(DVec2::new(-3.0, 80.0)), DVec2::new(0.0, 50.0));
    }

    #[test]
    fn scene_is_object_safe() {
        let mut scene: Box<dyn Scene> = Box::new(Blinker {
            viewport: Viewport::new(0.0, 0.0),
            on: false,
            color: Rgba::BLACK,
        });
        let sheet = StyleSheet::builtin(ThemeId::MetallicSky);
        scene.rebuild(
            Viewport::new(10.0, 10.0),
            &StyleContext::new(ThemeId::MetallicSky, &sheet),
        );
        scene.step(&FrameInput::default());

        let mut rec = Recording::new();
        scene.draw(&mut rec);
        assert_eq!(rec.circles().count(), 1);
        assert_eq!(scene.params()["on"], true);
        assert_eq!(scene.param_schema()["on"]["type"], "boolean");
        assert_eq!(scene.name(), "blinker");
    }
}
