//! A single particle: position, velocity, radius, color.

use constellation_core::color::Rgba;
use constellation_core::scene::Viewport;
use constellation_core::surface::Surface;
use glam::DVec2;

/// How the rendered radius varies over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pulse {
    Steady,
    /// `radius = base + sin(phase) * amplitude`; `phase` advances by
    /// `increment` every update, so the pulse rate follows the frame rate.
    Phase {
        phase: f64,
        increment: f64,
        amplitude: f64,
    },
    /// `radius = base * (1 + p * scale)` with
    /// `p = sin(t_ms * speed + offset) * 0.5 + 0.5`, driven by the frame
    /// timestamp.
    Clock { speed: f64, offset: f64, scale: f64 },
}

/// Reaction of entities to a nearby pointer. One policy per field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepulsionPolicy {
    None,
    /// Within `radius` of the pointer the entity is pushed away by
    /// `(pointer - position) / damping` instead of taking its velocity step.
    Displace { radius: f64, damping: f64 },
    /// Within `radius` of the pointer the entity keeps moving but its radius
    /// grows to `base + (1 - d / radius) * boost`.
    RadiusBoost { radius: f64, boost: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: DVec2,
    pub velocity: DVec2,
    pub base_radius: f64,
    /// Radius drawn this frame (base plus pulse or pointer boost).
    pub radius: f64,
    pub pulse: Pulse,
    pub color: Rgba,
}

impl Entity {
    pub fn new(position: DVec2, velocity: DVec2, base_radius: f64, color: Rgba) -> Self {
        Self {
            position,
            velocity,
            base_radius,
            radius: base_radius,
            pulse: Pulse::Steady,
            color,
        }
    }

    pub fn with_pulse(mut self, pulse: Pulse) -> Self {
        self.pulse = pulse;
        self
    }

    /// Advances one frame.
    ///
    /// The entity may end up to one velocity step outside `viewport`; the
    /// offending velocity component is then pointed back inward so the next
    /// step returns it. Pointer displacement never leaves the viewport.
    pub fn update(
        &mut self,
        viewport: Viewport,
        pointer: Option<DVec2>,
        policy: RepulsionPolicy,
        timestamp_ms: f64,
    ) {
        let displaced = match (policy, pointer) {
            (RepulsionPolicy::Displace { radius, damping }, Some(p))
                if damping > 0.0 && self.position.distance_squared(p) < radius * radius =>
            {
                let toward_pointer = p - self.position;
                self.position = viewport.clamp(self.position - toward_pointer / damping);
                true
            }
            _ => false,
        };
        if !displaced {
            self.position += self.velocity;
        }
        self.reflect(viewport);

        self.radius = match &mut self.pulse {
            Pulse::Steady => self.base_radius,
            Pulse::Phase {
                phase,
                increment,
                amplitude,
            } => {
                *phase += *increment;
                self.base_radius + phase.sin() * *amplitude
            }
            Pulse::Clock {
                speed,
                offset,
                scale,
            } => {
                let p = (timestamp_ms * *speed + *offset).sin() * 0.5 + 0.5;
                self.base_radius * (1.0 + p * *scale)
            }
        };

        if let (RepulsionPolicy::RadiusBoost { radius, boost }, Some(p)) = (policy, pointer) {
            let d = self.position.distance(p);
            if radius > 0.0 && d < radius {
                self.radius = self.base_radius + (1.0 - d / radius) * boost;
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_circle(self.position, self.radius.max(0.0), self.color);
    }

    fn reflect(&mut self, viewport: Viewport) {
        if self.position.x < 0.0 {
            self.velocity.x = self.velocity.x.abs();
        } else if self.position.x > viewport.width() {
            self.velocity.x = -self.velocity.x.abs();
        }
        if self.position.y < 0.0 {
            self.velocity.y = self.velocity.y.abs();
        } else if self.position.y > viewport.height() {
            self.velocity.y = -self.velocity.y.abs();
        }
    }
}
