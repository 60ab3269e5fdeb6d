//! Theme-dependent style lookups.
//!
//! Scenes resolve their colors from CSS custom properties once per rebuild.
//! In the browser the source is the document's computed style; natively it
//! is a [`StyleSheet`], either one of the built-in per-theme sheets or one
//! loaded from JSON.

use crate::color::Rgba;
use crate::theme::ThemeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Something that can answer "what is the value of this custom property".
pub trait StyleSource {
    /// Raw property value, or `None` when the property is not defined.
    fn property(&self, name: &str) -> Option<String>;
}

/// Everything a scene may read while rebuilding.
pub struct StyleContext<'a> {
    pub theme: ThemeId,
    pub properties: &'a dyn StyleSource,
}

impl<'a> StyleContext<'a> {
    pub fn new(theme: ThemeId, properties: &'a dyn StyleSource) -> Self {
        Self { theme, properties }
    }

    /// Resolves a color property, falling back when it is missing, blank or
    /// unparseable. Unparseable values are logged.
    pub fn color(&self, name: &str, fallback: Rgba) -> Rgba {
        let Some(raw) = self.properties.property(name) else {
            return fallback;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return fallback;
        }
        Rgba::parse(raw).unwrap_or_else(|e| {
            log::warn!("custom property {name} = '{raw}' is not a usable color ({e})");
            fallback
        })
    }
}

/// A flat map of custom properties (`--name` to value).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet {
    properties: BTreeMap<String, String>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_owned(), value.to_owned());
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Overlays `other` on top of `self`.
    pub fn merged(mut self, other: &StyleSheet) -> Self {
        for (k, v) in &other.properties {
            self.properties.insert(k.clone(), v.clone());
        }
        self
    }

    /// The site's stylesheet values for the given theme.
    pub fn builtin(theme: ThemeId) -> Self {
        match theme {
            ThemeId::LucidBlue => Self::new()
                .with("--color-background", "#f4f8fc")
                .with("--color-particle", "rgba(25, 118, 210, 0.6)")
                .with("--color-particle-line", "rgba(25, 118, 210, 0.3)")
                .with("--particle-color", "#1976d2")
                .with("--line-color", "rgba(25, 118, 210, 0.2)")
                .with("--judo-accent", "#c62828")
                .with("--judo-glow", "rgba(198, 40, 40, 0.35)")
                .with("--formula-color", "rgba(13, 71, 161, 0.7)"),
            ThemeId::MetallicSky => Self::new()
                .with("--color-background", "#0b1120")
                .with("--color-particle", "rgba(0, 229, 255, 0.7)")
                .with("--color-particle-line", "rgba(0, 229, 255, 0.35)")
                .with("--particle-color", "#00e5ff")
                .with("--line-color", "rgba(0, 229, 255, 0.2)")
                .with("--judo-accent", "#ffb300")
                .with("--judo-glow", "rgba(255, 179, 0, 0.3)")
                .with("--formula-color", "rgba(178, 235, 242, 0.7)"),
        }
    }
}

impl StyleSource for StyleSheet {
    fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sheets_define_the_same_properties() {
        let light = StyleSheet::builtin(ThemeId::LucidBlue);
        let dark = StyleSheet::builtin(ThemeId::MetallicSky);
        assert_eq!(light.len(), dark.len());
        for name in light.properties.keys() {
            assert!(dark.property(name).is_some(), "dark sheet lacks {name}");
        }
    }

    #[test]
    fn builtin_colors_all_parse() {
        for theme in ThemeId::ALL {
            let sheet = StyleSheet::builtin(theme);
            for (name, value) in &sheet.properties {
                assert!(Rgba::parse(value).is_ok(), "{theme} {name} = {value}");
            }
        }
    }

    #[test]
    fn color_falls_back_for_missing_blank_and_invalid() {
        let sheet = StyleSheet::new()
            .with("--blank", "  ")
            .with("--bad", "chartreuse-ish")
            .with("--good", " #ffffff");
        let ctx = StyleContext::new(ThemeId::LucidBlue, &sheet);
        let fallback = Rgba::from_rgba8(136, 136, 136, 1.0);
        assert_eq!(ctx.color("--missing", fallback), fallback);
        assert_eq!(ctx.color("--blank", fallback), fallback);
        assert_eq!(ctx.color("--bad", fallback), fallback);
        assert_eq!(ctx.color("--good", fallback), Rgba::WHITE);
    }

    #[test]
    fn merged_overrides_existing_keys() {
        let base = StyleSheet::builtin(ThemeId::LucidBlue);
        let overlay = StyleSheet::new().with("--particle-color", "#000000");
        let merged = base.clone().merged(&overlay);
        assert_eq!(merged.len(), base.len());
        assert_eq!(
            merged.property("--particle-color").as_deref(),
            Some("#000000")
        );
    }

    #[test]
    fn sheet_loads_from_flat_json() {
        let sheet: StyleSheet =
            serde_json::from_str(r##"{"--judo-accent": "#ff0000"}"##).unwrap();
        assert_eq!(sheet.property("--judo-accent").as_deref(), Some("#ff0000"));
    }
}
