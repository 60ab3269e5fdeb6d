//! The ordered entity collection of one canvas and how it is (re)built.

use crate::entity::{Entity, Pulse, RepulsionPolicy};
use constellation_core::color::Rgba;
use constellation_core::prng::Xorshift64;
use constellation_core::scene::Viewport;
use constellation_core::surface::Surface;
use glam::DVec2;

/// How many entities a viewport gets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Population {
    /// `floor(area / area_per_entity)`, optionally capped.
    Density {
        area_per_entity: f64,
        cap: Option<usize>,
    },
    /// Independent of the viewport.
    Fixed(usize),
}

impl Population {
    pub fn count(&self, viewport: Viewport) -> usize {
        match *self {
            Population::Fixed(n) => n,
            Population::Density {
                area_per_entity,
                cap,
            } => {
                if !(area_per_entity.is_finite() && area_per_entity > 0.0) {
                    log::warn!("ignoring non-positive density {area_per_entity}");
                    return 0;
                }
                let n = (viewport.area() / area_per_entity).floor() as usize;
                cap.map_or(n, |cap| n.min(cap))
            }
        }
    }
}

/// Per-entity pulse parameters drawn at rebuild time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PulseSpec {
    Steady,
    /// Random starting phase in [0, 2π).
    Phase { increment: f64, amplitude: f64 },
    /// Random speed in [0, max_speed) and offset in [0, 2π).
    Clock { max_speed: f64, scale: f64 },
}

/// Everything needed to populate a field except the viewport and color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub population: Population,
    /// Velocity components are uniform in `[-speed, speed)`.
    pub speed: f64,
    /// Base radius is uniform in `[radius.0, radius.1)`.
    pub radius: (f64, f64),
    /// Keep initial positions `2 * radius` away from the edges.
    pub inset: bool,
    pub pulse: PulseSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    entities: Vec<Entity>,
    viewport: Viewport,
}

impl ParticleField {
    /// An empty field (before the first rebuild).
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            entities: Vec::new(),
            viewport,
        }
    }

    /// Builds a fresh field. `color` is applied to every entity and is not
    /// looked up again until the next rebuild.
    pub fn rebuild(
        viewport: Viewport,
        spec: &FieldSpec,
        color: Rgba,
        rng: &mut Xorshift64,
    ) -> Self {
        let count = spec.population.count(viewport);
        let entities = (0..count)
            .map(|_| spawn(viewport, spec, color, rng))
            .collect();
        Self { entities, viewport }
    }

    /// Updates every entity in order.
    pub fn update(&mut self, pointer: Option<DVec2>, policy: RepulsionPolicy, timestamp_ms: f64) {
        let viewport = self.viewport;
        for entity in &mut self.entities {
            entity.update(viewport, pointer, policy, timestamp_ms);
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for entity in &self.entities {
            entity.draw(surface);
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn spawn(viewport: Viewport, spec: &FieldSpec, color: Rgba, rng: &mut Xorshift64) -> Entity {
    let (r_min, r_max) = spec.radius;
    let radius = rng.next_range(r_min, r_max);
    let axis = |rng: &mut Xorshift64, extent: f64| {
        let margin = 2.0 * radius;
        if spec.inset && extent > 2.0 * margin {
            rng.next_range(margin, extent - margin)
        } else {
            rng.next_f64() * extent
        }
    };
    let position = DVec2::new(axis(rng, viewport.width()), axis(rng, viewport.height()));
    let velocity = DVec2::new(rng.next_symmetric(spec.speed), rng.next_symmetric(spec.speed));

    let pulse = match spec.pulse {
        PulseSpec::Steady => Pulse::Steady,
        PulseSpec::Phase {
            increment,
            amplitude,
        } => Pulse::Phase {
            phase: rng.next_angle(),
            increment,
            amplitude,
        },
        PulseSpec::Clock { max_speed, scale } => Pulse::Clock {
            speed: rng.next_f64() * max_speed,
            offset: rng.next_angle(),
            scale,
        },
    };
    Entity::new(position, velocity, radius, color).with_pulse(pulse)
}
