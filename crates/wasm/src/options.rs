//! `mount` options, passed from JavaScript as a JSON string.

use constellation_core::error::SceneError;
use constellation_core::params::{expect_str, json_type_name};
use serde_json::Value;

/// What the canvas backing store is sized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// `window.innerWidth` × `window.innerHeight` (full-page backgrounds).
    Window,
    /// The parent element's client size (section backgrounds).
    Parent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MountOptions {
    pub params: Value,
    /// `None` picks a random seed.
    pub seed: Option<u64>,
    /// `None` follows `prefers-reduced-motion`.
    pub reduced_motion: Option<bool>,
    pub fit: Fit,
}

impl MountOptions {
    /// Parses `{"params": {...}, "seed": n, "reducedMotion": bool, "fit":
    /// "window" | "parent"}`; every key is optional and an empty string
    /// means all defaults. Hero and intro fill the window by default, the
    /// section scenes their parent.
    pub fn parse(scene: &str, json: &str) -> Result<Self, SceneError> {
        let value: Value = if json.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(json).map_err(|e| SceneError::ParamTypeMismatch {
                name: "options".into(),
                expected: "JSON object".into(),
                got: e.to_string(),
            })?
        };

        let params = match value.get("params") {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(p @ Value::Object(_)) => p.clone(),
            Some(other) => {
                return Err(SceneError::ParamTypeMismatch {
                    name: "params".into(),
                    expected: "object".into(),
                    got: json_type_name(other).into(),
                })
            }
        };

        let fit = match expect_str(&value, "fit")? {
            Some("window") => Fit::Window,
            Some("parent") => Fit::Parent,
            Some(other) => {
                return Err(SceneError::ParamTypeMismatch {
                    name: "fit".into(),
                    expected: "\"window\" or \"parent\"".into(),
                    got: format!("\"{other}\""),
                })
            }
            None if matches!(scene, "hero" | "intro") => Fit::Window,
            None => Fit::Parent,
        };

        Ok(Self {
            params,
            seed: value.get("seed").and_then(Value::as_u64),
            reduced_motion: value.get("reducedMotion").and_then(Value::as_bool),
            fit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_string_is_all_defaults() {
        let o = MountOptions::parse("contact", "").unwrap();
        assert_eq!(o.params, json!({}));
        assert_eq!(o.seed, None);
        assert_eq!(o.reduced_motion, None);
        assert_eq!(o.fit, Fit::Parent);
    }

    #[test]
    fn full_page_scenes_fit_the_window() {
        assert_eq!(MountOptions::parse("hero", "{}").unwrap().fit, Fit::Window);
        assert_eq!(MountOptions::parse("intro", "{}").unwrap().fit, Fit::Window);
        assert_eq!(MountOptions::parse("about", "{}").unwrap().fit, Fit::Parent);
    }

    #[test]
    fn explicit_values_win() {
        let o = MountOptions::parse(
            "hero",
            r#"{"params": {"link_distance": 90}, "seed": 7, "reducedMotion": true, "fit": "parent"}"#,
        )
        .unwrap();
        assert_eq!(o.params, json!({"link_distance": 90}));
        assert_eq!(o.seed, Some(7));
        assert_eq!(o.reduced_motion, Some(true));
        assert_eq!(o.fit, Fit::Parent);
    }

    #[test]
    fn malformed_options_are_rejected() {
        assert!(MountOptions::parse("hero", "{").is_err());
        assert!(MountOptions::parse("hero", r#"{"params": [1]}"#).is_err());
        assert!(MountOptions::parse("hero", r#"{"fit": "screen"}"#).is_err());
    }
}
