//! CLI error handling.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use csvguard_common_config::SettingsError;
use csvguard_export::{ConfigError, ExportError};

use crate::Exit;

/// CLI error type with context for the user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    General { message: String },
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::Io { .. } => "E002",
            Self::Validation { .. } => "E004",
            Self::General { .. } => "E999",
        }
    }

    /// Get the exit code for this error
    pub fn exit(&self) -> Exit {
        match self {
            Self::Config { .. } => Exit::ConfigError,
            Self::Io { .. } => Exit::IoError,
            Self::Validation { .. } => Exit::ValidationError,
            Self::General { .. } => Exit::GeneralError,
        }
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: None,
        }
    }

    /// Create a config error with hint
    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(
        message: impl Into<String>,
        source: io::Error,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source,
            path: Some(path.into()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::ForbiddenCharacter { field, .. } => {
                format!("pick a {field} that does not start with =, +, - or @")
            }
            ConfigError::DelimiterEqualsEnclosure { .. } => {
                "use different characters for --delimiter and --enclosure".to_string()
            }
            ConfigError::SeparatorOverlap { .. } => {
                "--delimiter and --enclosure must not contain each other".to_string()
            }
        };
        Self::config_with_hint(err.to_string(), hint)
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::ReadError { source } => Self::Io {
                message: format!("failed to read settings: {source}"),
                source,
                path: None,
            },
            other => Self::config(other.to_string()),
        }
    }
}

impl From<ExportError> for CliError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Config(e) => e.into(),
            ExportError::Io(source) => Self::Io {
                message: format!("export failed: {source}"),
                source,
                path: None,
            },
            ExportError::Source(message) => Self::Validation { message },
            other => Self::General {
                message: other.to_string(),
            },
        }
    }
}
