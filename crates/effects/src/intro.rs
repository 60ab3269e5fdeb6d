//! Intro overlay: formula strings drift in from outside the viewport toward
//! the centre and fade out as they approach the title.

use constellation_core::color::Rgba;
use constellation_core::params::param_f64;
use constellation_core::prng::Xorshift64;
use constellation_core::scene::{FrameInput, Scene, Viewport};
use constellation_core::style::StyleContext;
use constellation_core::surface::Surface;
use glam::DVec2;
use serde_json::{json, Value};

/// Strings the overlay drifts, picked uniformly.
pub const FORMULAS: &[&str] = &[
    "∑(x-μ)²/N",
    "class User {}",
    "e=mc²",
    "const animate = () => {}",
    "a²+b²=c²",
    "Promise.resolve()",
    "∇·E=ρ/ε₀",
    "for(let i=0; i<n; i++)",
];

/// Spawns per frame are capped so a long pause (hidden tab) does not
/// release a burst.
const MAX_SPAWNS_PER_STEP: usize = 4;

/// Timing and geometry of the drift. Distances are in CSS pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftConfig {
    /// Minimum time between two spawns.
    pub spawn_interval_ms: f64,
    /// Distance outside the viewport edge where formulas appear.
    pub spawn_offset: f64,
    /// Formulas further than this outside the viewport are dropped.
    pub cull_margin: f64,
    /// Formulas reach the centre after this many frames, uniform in range.
    pub travel_frames: (f64, f64),
    /// Half width of the title, subtracted from the distance to the centre.
    pub title_half_width: f64,
    /// Inside this distance from the title edge opacity starts to drop.
    pub safe_zone: f64,
    /// Width of the ramp from `max_opacity` to zero, ending `safe_zone -
    /// fade_distance` from the title.
    pub fade_distance: f64,
    pub max_opacity: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 250.0,
            spawn_offset: 100.0,
            cull_margin: 200.0,
            travel_frames: (400.0, 600.0),
            title_half_width: 150.0,
            safe_zone: 200.0,
            fade_distance: 100.0,
            max_opacity: 0.7,
        }
    }
}

impl DriftConfig {
    /// Opacity at `distance` from the title edge.
    ///
    /// Full (`max_opacity`) outside the safe zone; inside it ramps linearly
    /// from `max_opacity` down to zero over the inner `fade_distance`.
    pub fn opacity(&self, distance: f64) -> f64 {
        if distance >= self.safe_zone {
            return self.max_opacity;
        }
        if self.fade_distance <= 0.0 {
            return 0.0;
        }
        let fade = (distance - (self.safe_zone - self.fade_distance)).max(0.0) / self.fade_distance;
        fade.min(self.max_opacity)
    }
}

/// One drifting string. Velocity is constant and aims at the centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub text: &'static str,
    pub position: DVec2,
    pub velocity: DVec2,
    pub opacity: f64,
}

/// The intro overlay as a [`Scene`]. Spawning is driven by frame
/// timestamps, so seeded renders are reproducible.
pub struct FormulaDrift {
    config: DriftConfig,
    rng: Xorshift64,
    viewport: Viewport,
    color: Rgba,
    formulas: Vec<Formula>,
    last_spawn_ms: Option<f64>,
}

impl FormulaDrift {
    pub fn new(config: DriftConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Xorshift64::new(seed),
            viewport: Viewport::new(0.0, 0.0),
            color: Rgba::WHITE,
            formulas: Vec::new(),
            last_spawn_ms: None,
        }
    }

    /// Default config with JSON overrides.
    pub fn with_params(seed: u64, params: &Value) -> Self {
        let d = DriftConfig::default();
        let config = DriftConfig {
            spawn_interval_ms: param_f64(params, "spawn_interval_ms", d.spawn_interval_ms),
            title_half_width: param_f64(params, "title_width", d.title_half_width * 2.0) / 2.0,
            safe_zone: param_f64(params, "safe_zone", d.safe_zone),
            fade_distance: param_f64(params, "fade_distance", d.fade_distance),
            ..d
        };
        Self::new(config, seed)
    }

    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    fn spawn(&mut self) {
        let (w, h) = (self.viewport.width(), self.viewport.height());
        let off = self.config.spawn_offset;
        let text = FORMULAS[self.rng.next_index(FORMULAS.len())];
        let start = match self.rng.next_index(4) {
            0 => DVec2::new(self.rng.next_f64() * w, -off),
            1 => DVec2::new(w + off, self.rng.next_f64() * h),
            2 => DVec2::new(self.rng.next_f64() * w, h + off),
            _ => DVec2::new(-off, self.rng.next_f64() * h),
        };
        let (lo, hi) = self.config.travel_frames;
        let to_centre = self.viewport.center() - start;
        let velocity = DVec2::new(
            to_centre.x / self.rng.next_range(lo, hi),
            to_centre.y / self.rng.next_range(lo, hi),
        );
        self.formulas.push(Formula {
            text,
            position: start,
            velocity,
            opacity: 0.0,
        });
    }
}

impl Scene for FormulaDrift {
    fn name(&self) -> &str {
        "intro"
    }

    fn rebuild(&mut self, viewport: Viewport, style: &StyleContext<'_>) {
        self.viewport = viewport;
        self.color = style.color("--formula-color", Rgba::from_rgba8(128, 128, 128, 1.0));
        self.formulas.clear();
        self.last_spawn_ms = None;
    }

    fn step(&mut self, input: &FrameInput) {
        let now = input.timestamp_ms;
        let interval = self.config.spawn_interval_ms;
        match self.last_spawn_ms {
            None => self.last_spawn_ms = Some(now),
            Some(mut last) if interval > 0.0 => {
                let mut spawned = 0;
                while now - last >= interval {
                    if spawned < MAX_SPAWNS_PER_STEP {
                        self.spawn();
                        spawned += 1;
                    }
                    last += interval;
                }
                self.last_spawn_ms = Some(last);
            }
            Some(_) => {}
        }

        let centre = self.viewport.center();
        let viewport = self.viewport;
        let config = &self.config;
        self.formulas.retain_mut(|f| {
            f.position += f.velocity;
            let distance = f.position.distance(centre) - config.title_half_width;
            f.opacity = config.opacity(distance);
            viewport.contains(f.position, config.cull_margin)
        });
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for f in &self.formulas {
            if f.opacity > 0.0 {
                surface.fill_text(f.text, f.position, self.color.with_alpha(f.opacity));
            }
        }
    }

    fn params(&self) -> Value {
        json!({
            "spawn_interval_ms": self.config.spawn_interval_ms,
            "title_width": self.config.title_half_width * 2.0,
            "safe_zone": self.config.safe_zone,
            "fade_distance": self.config.fade_distance,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "spawn_interval_ms": {
                "type": "number", "default": 250.0, "min": 16.0, "max": 5000.0,
                "description": "Time between formula spawns"
            },
            "title_width": {
                "type": "number", "default": 300.0, "min": 0.0, "max": 2000.0,
                "description": "Width of the centred title the formulas fade around"
            },
            "safe_zone": {
                "type": "number", "default": 200.0, "min": 0.0, "max": 1000.0,
                "description": "Distance from the title edge where fading starts"
            },
            "fade_distance": {
                "type": "number", "default": 100.0, "min": 0.0, "max": 1000.0,
                "description": "Width of the fade ramp inside the safe zone"
            },
        })
    }
}
