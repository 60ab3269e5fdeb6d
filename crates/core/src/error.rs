//! Error types for the constellation core.

use thiserror::Error;

/// Errors produced by scene, theme and rendering operations.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Width or height was zero, or the raster would be too large.
    #[error("invalid dimensions: width and height must be non-zero and at most 8192x8192 pixels in total")]
    InvalidDimensions,

    /// A scene name did not match any registered scene.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// A theme id was not one of the enumerated themes.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A CSS color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Both the durable and the volatile store rejected a write.
    #[error("storage unavailable: {0}")]
    Storage(String),

    /// Filesystem or encoder failure.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_mentions_width_and_height() {
        let msg = SceneError::InvalidDimensions.to_string();
        assert!(msg.contains("width") && msg.contains("height"), "got: {msg}");
    }

    #[test]
    fn unknown_scene_includes_name() {
        let msg = SceneError::UnknownScene("galaxy".into()).to_string();
        assert!(msg.contains("galaxy"), "got: {msg}");
    }

    #[test]
    fn unknown_theme_includes_id() {
        let msg = SceneError::UnknownTheme("theme-neon".into()).to_string();
        assert!(msg.contains("theme-neon"), "got: {msg}");
    }

    #[test]
    fn param_type_mismatch_includes_all_fields() {
        let err = SceneError::ParamTypeMismatch {
            name: "repulsion".into(),
            expected: "string".into(),
            got: "number".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("repulsion"), "missing name in: {msg}");
        assert!(msg.contains("string"), "missing expected in: {msg}");
        assert!(msg.contains("number"), "missing got in: {msg}");
    }

    #[test]
    fn storage_and_io_carry_their_message() {
        assert!(SceneError::Storage("quota".into())
            .to_string()
            .contains("quota"));
        assert!(SceneError::Io("disk full".into())
            .to_string()
            .contains("disk full"));
    }

    #[test]
    fn scene_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SceneError>();
    }

    #[test]
    fn scene_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<SceneError>();
    }
}
