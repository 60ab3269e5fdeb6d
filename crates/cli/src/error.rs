//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: scene error (unknown scene, bad dimensions, bad parameter types)
//! - 11: I/O error (PNG write, theme store file)
//! - 12: input error (bad JSON params, bad style sheet, unknown theme)
//! - 13: serialization error

use constellation_core::SceneError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    Scene(SceneError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Scene(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Scene(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<SceneError> for CliError {
    fn from(e: SceneError) -> Self {
        match e {
            SceneError::Io(msg) | SceneError::Storage(msg) => CliError::Io(msg),
            SceneError::UnknownTheme(_) | SceneError::InvalidColor(_) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Scene(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_error_exit_code_is_10() {
        let err = CliError::Scene(SceneError::UnknownScene("foo".into()));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        assert_eq!(CliError::Io("write failed".into()).exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        assert_eq!(CliError::Input("bad params".into()).exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        assert_eq!(CliError::Serialization("json fail".into()).exit_code(), 13);
    }

    #[test]
    fn io_and_storage_route_to_cli_io() {
        let cli_err = CliError::from(SceneError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
        assert_eq!(CliError::from(SceneError::Storage("ro".into())).exit_code(), 11);
    }

    #[test]
    fn unknown_theme_routes_to_input() {
        let cli_err = CliError::from(SceneError::UnknownTheme("sepia".into()));
        assert_eq!(cli_err.exit_code(), 12);
        assert!(cli_err.to_string().contains("sepia"));
    }

    #[test]
    fn other_scene_errors_route_to_cli_scene() {
        let cli_err = CliError::from(SceneError::UnknownScene("xyz".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("xyz"));
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
