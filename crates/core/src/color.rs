//! CSS color values as used by the site's custom properties.
//!
//! Theme colors arrive as strings read from CSS custom properties
//! (`#888`, `#1976d2`, `rgba(25, 118, 210, 0.25)`), so [`Rgba`] parses the
//! subset of CSS color syntax those properties use and formats back to an
//! `rgba(...)` string that a 2D canvas context accepts as a fill or stroke
//! style.

use crate::error::SceneError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Straight-alpha color with all components in [0, 1].
///
/// Serializes as a CSS `rgba(r, g, b, a)` string. The string form quantizes
/// the channels to 8 bits and the alpha to two decimals, matching what the
/// canvas sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from 8-bit channels and a [0, 1] alpha.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Parses a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)`,
    /// `rgba(...)` or `transparent`. Surrounding whitespace is ignored, as
    /// computed-style values often carry a leading space.
    pub fn parse(css: &str) -> Result<Self, SceneError> {
        let css = css.trim();
        if css.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        if let Some(hex) = css.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = css.to_ascii_lowercase();
        let args = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| SceneError::InvalidColor(format!("unsupported color syntax: {css}")))?;
        parse_functional(args)
    }

    /// Returns the same color with its alpha replaced (clamped to [0, 1]).
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Quantizes the color channels to bytes; alpha is scaled to 0-255 too.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    /// Formats as `rgba(r, g, b, a)` with 8-bit channels.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {:.2})", self.a.clamp(0.0, 1.0))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Rgba {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn channel_to_u8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Result<Rgba, SceneError> {
    let digit = |i: usize| -> Result<u8, SceneError> {
        let c = hex.as_bytes()[i] as char;
        c.to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| SceneError::InvalidColor(format!("invalid hex digit '{c}'")))
    };
    let pair = |i: usize| -> Result<u8, SceneError> { Ok(digit(i)? * 16 + digit(i + 1)?) };

    match hex.len() {
        3 => {
            let (r, g, b) = (digit(0)?, digit(1)?, digit(2)?);
            Ok(Rgba::from_rgba8(r * 17, g * 17, b * 17, 1.0))
        }
        6 => Ok(Rgba::from_rgba8(pair(0)?, pair(2)?, pair(4)?, 1.0)),
        8 => Ok(Rgba::from_rgba8(
            pair(0)?,
            pair(2)?,
            pair(4)?,
            f64::from(pair(6)?) / 255.0,
        )),
        n => Err(SceneError::InvalidColor(format!(
            "expected 3, 6 or 8 hex digits, got {n}"
        ))),
    }
}

fn parse_functional(args: &str) -> Result<Rgba, SceneError> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(SceneError::InvalidColor(format!(
            "expected 3 or 4 components, got {}",
            parts.len()
        )));
    }
    let number = |s: &str| -> Result<f64, SceneError> {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| SceneError::InvalidColor(format!("invalid component '{s}'")))
    };
    let channel = |s: &str| -> Result<f64, SceneError> { Ok((number(s)? / 255.0).clamp(0.0, 1.0)) };

    let alpha = match parts.get(3) {
        Some(a) => number(a)?.clamp(0.0, 1.0),
        None => 1.0,
    };
    Ok(Rgba::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn parses_short_hex() {
        let c = Rgba::parse("#888").unwrap();
        assert_eq!(c.to_rgba8(), [0x88, 0x88, 0x88, 255]);
    }

    #[test]
    fn parses_long_hex_case_insensitive() {
        let c = Rgba::parse("#1976D2").unwrap();
        assert_eq!(c.to_rgba8(), [25, 118, 210, 255]);
    }

    #[test]
    fn parses_hex_with_alpha() {
        let c = Rgba::parse("#00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_rgba_with_spaces() {
        let c = Rgba::parse(" rgba(25, 118, 210, 0.25) ").unwrap();
        assert_eq!(c.to_rgba8()[..3], [25, 118, 210]);
        assert!(approx_eq(c.a, 0.25));
    }

    #[test]
    fn parses_rgb_without_alpha_as_opaque() {
        let c = Rgba::parse("rgb(150,150,150)").unwrap();
        assert!(approx_eq(c.a, 1.0));
        assert_eq!(c.to_rgba8()[0], 150);
    }

    #[test]
    fn parses_transparent_keyword() {
        assert_eq!(Rgba::parse("transparent").unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Rgba::parse("").is_err());
        assert!(Rgba::parse("#12").is_err());
        assert!(Rgba::parse("#ggg").is_err());
        assert!(Rgba::parse("hsl(0, 50%, 50%)").is_err());
        assert!(Rgba::parse("rgba(1, 2)").is_err());
        assert!(Rgba::parse("rgba(1, 2, x, 1)").is_err());
    }

    #[test]
    fn out_of_range_components_are_clamped() {
        let c = Rgba::parse("rgba(300, -5, 0, 2)").unwrap();
        assert!(approx_eq(c.r, 1.0));
        assert!(approx_eq(c.g, 0.0));
        assert!(approx_eq(c.a, 1.0));
    }

    #[test]
    fn with_alpha_replaces_alpha_only() {
        let c = Rgba::parse("#ff0000").unwrap().with_alpha(0.4);
        assert!(approx_eq(c.r, 1.0));
        assert!(approx_eq(c.a, 0.4));
        assert!(approx_eq(c.with_alpha(3.0).a, 1.0));
    }

    #[test]
    fn css_output_uses_two_decimal_alpha() {
        let c = Rgba::from_rgba8(0, 229, 255, 0.333);
        assert_eq!(c.to_css(), "rgba(0, 229, 255, 0.33)");
        assert_eq!(c.to_string(), c.to_css());
    }

    #[test]
    fn serde_uses_css_string() {
        let c = Rgba::from_rgba8(255, 255, 255, 0.8);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"rgba(255, 255, 255, 0.80)\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_rgba8(), c.to_rgba8());
    }

    #[test]
    fn deserialize_rejects_invalid_string() {
        let result: Result<Rgba, _> = serde_json::from_str("\"not-a-color\"");
        assert!(result.is_err());
    }
}
