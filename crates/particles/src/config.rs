//! Constellation variants.
//!
//! The site runs the same animator on four canvases that differ only in
//! numbers and color sources. Each variant is a preset here; any preset can
//! be tweaked with a JSON parameter object.

use crate::entity::RepulsionPolicy;
use crate::field::{FieldSpec, Population, PulseSpec};
use crate::links::LinkFalloff;
use constellation_core::color::Rgba;
use constellation_core::error::SceneError;
use constellation_core::params::{expect_str, param_cap, param_f64, param_range, param_usize};
use constellation_core::theme::ThemeId;
use serde_json::{json, Value};

/// Names accepted by [`ConstellationConfig::preset`].
pub const PRESET_NAMES: &[&str] = &["hero", "about", "contact", "judo"];

/// Entity and link colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub entity: Rgba,
    pub link: Rgba,
}

/// Where a variant gets its colors from at rebuild time.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSource {
    /// CSS custom properties, with fallbacks for undefined or bad values.
    Properties {
        entity: String,
        link: String,
        fallback: ThemeColors,
    },
    /// A fixed palette per theme.
    Palette { light: ThemeColors, dark: ThemeColors },
}

impl ColorSource {
    fn properties(entity: &str, link: &str, fallback: ThemeColors) -> Self {
        ColorSource::Properties {
            entity: entity.to_owned(),
            link: link.to_owned(),
            fallback,
        }
    }

    pub fn palette_for(light: ThemeColors, dark: ThemeColors, theme: ThemeId) -> ThemeColors {
        if theme.is_dark() {
            dark
        } else {
            light
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationConfig {
    pub name: String,
    pub field: FieldSpec,
    pub link_distance: f64,
    pub link_width: f64,
    pub link_falloff: LinkFalloff,
    pub repulsion: RepulsionPolicy,
    pub colors: ColorSource,
}

fn gray_fallback() -> ThemeColors {
    ThemeColors {
        entity: Rgba::from_rgba8(136, 136, 136, 1.0),
        link: Rgba::from_rgba8(150, 150, 150, 0.2),
    }
}

impl ConstellationConfig {
    /// Hero background: density 9000 capped at 100, pointer displacement,
    /// opacity falloff.
    pub fn hero() -> Self {
        Self {
            name: "hero".into(),
            field: FieldSpec {
                population: Population::Density {
                    area_per_entity: 9_000.0,
                    cap: Some(100),
                },
                speed: 0.2,
                radius: (1.0, 3.0),
                inset: true,
                pulse: PulseSpec::Steady,
            },
            link_distance: 120.0,
            link_width: 1.0,
            link_falloff: LinkFalloff::Opacity,
            repulsion: RepulsionPolicy::Displace {
                radius: 150.0,
                damping: 20.0,
            },
            colors: ColorSource::properties(
                "--color-particle",
                "--color-particle-line",
                gray_fallback(),
            ),
        }
    }

    /// About-section network: 100 pulsing nodes, pointer radius boost,
    /// fixed per-theme palette.
    pub fn about() -> Self {
        Self {
            name: "about".into(),
            field: FieldSpec {
                population: Population::Fixed(100),
                speed: 0.25,
                radius: (1.0, 2.5),
                inset: false,
                pulse: PulseSpec::Phase {
                    increment: 0.02,
                    amplitude: 0.5,
                },
            },
            link_distance: 150.0,
            link_width: 1.0,
            link_falloff: LinkFalloff::Width,
            repulsion: RepulsionPolicy::RadiusBoost {
                radius: 100.0,
                boost: 5.0,
            },
            colors: ColorSource::Palette {
                light: ThemeColors {
                    entity: Rgba::from_rgba8(0, 0, 0, 0.5),
                    link: Rgba::from_rgba8(25, 118, 210, 0.25),
                },
                dark: ThemeColors {
                    entity: Rgba::from_rgba8(255, 255, 255, 0.8),
                    link: Rgba::from_rgba8(255, 255, 255, 0.3),
                },
            },
        }
    }

    /// Contact constellation: density 12000, clock-driven pulse, no pointer.
    pub fn contact() -> Self {
        Self {
            name: "contact".into(),
            field: FieldSpec {
                population: Population::Density {
                    area_per_entity: 12_000.0,
                    cap: None,
                },
                speed: 0.1,
                radius: (0.5, 2.0),
                inset: false,
                pulse: PulseSpec::Clock {
                    max_speed: 0.02,
                    scale: 0.5,
                },
            },
            link_distance: 120.0,
            link_width: 0.5,
            link_falloff: LinkFalloff::Width,
            repulsion: RepulsionPolicy::None,
            colors: ColorSource::properties("--particle-color", "--line-color", gray_fallback()),
        }
    }

    /// Judo page: density 15000, accent-colored entities, glow links.
    pub fn judo() -> Self {
        Self {
            name: "judo".into(),
            field: FieldSpec {
                population: Population::Density {
                    area_per_entity: 15_000.0,
                    cap: None,
                },
                speed: 0.25,
                radius: (1.0, 3.0),
                inset: false,
                pulse: PulseSpec::Steady,
            },
            link_distance: 150.0,
            link_width: 1.0,
            link_falloff: LinkFalloff::Width,
            repulsion: RepulsionPolicy::None,
            colors: ColorSource::properties("--judo-accent", "--judo-glow", gray_fallback()),
        }
    }

    pub fn preset(name: &str) -> Result<Self, SceneError> {
        match name {
            "hero" => Ok(Self::hero()),
            "about" => Ok(Self::about()),
            "contact" => Ok(Self::contact()),
            "judo" => Ok(Self::judo()),
            _ => Err(SceneError::UnknownScene(name.to_owned())),
        }
    }

    /// Applies overrides from a JSON object on top of `self`.
    ///
    /// Numeric keys fall back to the current value when missing or mistyped;
    /// `repulsion` and `link_falloff` must be strings naming a known option.
    pub fn with_overrides(mut self, params: &Value) -> Result<Self, SceneError> {
        match &mut self.field.population {
            Population::Density {
                area_per_entity,
                cap,
            } => {
                *area_per_entity = param_f64(params, "density", *area_per_entity);
                *cap = param_cap(params, "cap", *cap);
            }
            Population::Fixed(n) => *n = param_usize(params, "count", *n),
        }
        self.field.speed = param_f64(params, "speed", self.field.speed);
        self.field.radius = param_range(params, "radius", self.field.radius);
        self.link_distance = param_f64(params, "link_distance", self.link_distance);
        self.link_width = param_f64(params, "link_width", self.link_width);

        if let Some(falloff) = expect_str(params, "link_falloff")? {
            self.link_falloff = match falloff {
                "opacity" => LinkFalloff::Opacity,
                "width" => LinkFalloff::Width,
                other => {
                    return Err(SceneError::ParamTypeMismatch {
                        name: "link_falloff".into(),
                        expected: "\"opacity\" or \"width\"".into(),
                        got: format!("\"{other}\""),
                    })
                }
            };
        }

        let (radius, strength) = self.repulsion_numbers();
        let radius = param_f64(params, "repulsion_radius", radius);
        let strength = param_f64(params, "repulsion_strength", strength);
        let policy = expect_str(params, "repulsion")?
            .map(str::to_owned)
            .unwrap_or_else(|| repulsion_name(self.repulsion).to_owned());
        self.repulsion = match policy.as_str() {
            "none" => RepulsionPolicy::None,
            "displace" => RepulsionPolicy::Displace {
                radius,
                damping: strength,
            },
            "radius_boost" => RepulsionPolicy::RadiusBoost {
                radius,
                boost: strength,
            },
            other => {
                return Err(SceneError::ParamTypeMismatch {
                    name: "repulsion".into(),
                    expected: "\"none\", \"displace\" or \"radius_boost\"".into(),
                    got: format!("\"{other}\""),
                })
            }
        };
        Ok(self)
    }

    /// Current values, in the same shape [`Self::with_overrides`] accepts.
    pub fn to_json(&self) -> Value {
        let (repulsion_radius, repulsion_strength) = self.repulsion_numbers();
        let mut v = json!({
            "speed": self.field.speed,
            "radius": [self.field.radius.0, self.field.radius.1],
            "link_distance": self.link_distance,
            "link_width": self.link_width,
            "link_falloff": self.link_falloff.as_str(),
            "repulsion": repulsion_name(self.repulsion),
            "repulsion_radius": repulsion_radius,
            "repulsion_strength": repulsion_strength,
        });
        match self.field.population {
            Population::Density {
                area_per_entity,
                cap,
            } => {
                v["density"] = json!(area_per_entity);
                v["cap"] = json!(cap);
            }
            Population::Fixed(n) => v["count"] = json!(n),
        }
        v
    }

    pub fn schema(&self) -> Value {
        let (repulsion_radius, repulsion_strength) = self.repulsion_numbers();
        let mut schema = json!({
            "speed": {
                "type": "number", "default": self.field.speed, "min": 0.0, "max": 5.0,
                "description": "Half-width of the initial velocity range (px/frame)"
            },
            "radius": {
                "type": "range", "default": [self.field.radius.0, self.field.radius.1],
                "description": "Base radius range [min, max) in px"
            },
            "link_distance": {
                "type": "number", "default": self.link_distance, "min": 0.0, "max": 500.0,
                "description": "Pairs closer than this are linked"
            },
            "link_width": {
                "type": "number", "default": self.link_width, "min": 0.0, "max": 5.0,
                "description": "Base stroke width of a link"
            },
            "link_falloff": {
                "type": "string", "default": self.link_falloff.as_str(),
                "options": ["opacity", "width"],
                "description": "Stroke attribute scaled by 1 - d / link_distance"
            },
            "repulsion": {
                "type": "string", "default": repulsion_name(self.repulsion),
                "options": ["none", "displace", "radius_boost"],
                "description": "Pointer reaction policy"
            },
            "repulsion_radius": {
                "type": "number", "default": repulsion_radius, "min": 0.0, "max": 500.0,
                "description": "Pointer influence radius in px"
            },
            "repulsion_strength": {
                "type": "number", "default": repulsion_strength, "min": 0.0, "max": 100.0,
                "description": "Displacement damping divisor, or radius boost in px"
            },
        });
        match self.field.population {
            Population::Density {
                area_per_entity,
                cap,
            } => {
                schema["density"] = json!({
                    "type": "number", "default": area_per_entity, "min": 1000.0, "max": 100000.0,
                    "description": "Viewport area (px²) per entity"
                });
                schema["cap"] = json!({
                    "type": "integer", "default": cap, "nullable": true,
                    "description": "Maximum entity count"
                });
            }
            Population::Fixed(n) => {
                schema["count"] = json!({
                    "type": "integer", "default": n, "min": 0, "max": 1000,
                    "description": "Entity count"
                });
            }
        }
        schema
    }

    /// Radius and strength of the current policy, or neutral defaults.
    fn repulsion_numbers(&self) -> (f64, f64) {
        match self.repulsion {
            RepulsionPolicy::None => (150.0, 20.0),
            RepulsionPolicy::Displace { radius, damping } => (radius, damping),
            RepulsionPolicy::RadiusBoost { radius, boost } => (radius, boost),
        }
    }
}

pub fn repulsion_name(policy: RepulsionPolicy) -> &'static str {
    match policy {
        RepulsionPolicy::None => "none",
        RepulsionPolicy::Displace { .. } => "displace",
        RepulsionPolicy::RadiusBoost { .. } => "radius_boost",
    }
}
