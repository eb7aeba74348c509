//! Settings file loading and parsing.

use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::types::ExportSettings;

/// Settings file location relative to the project directory.
pub const SETTINGS_FILE: &str = ".csvguard/config.yaml";

/// Settings loading errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read settings: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Settings loader.
pub struct SettingsLoader {
    base_path: PathBuf,
}

impl SettingsLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the settings file this loader reads.
    pub fn settings_path(&self) -> PathBuf {
        self.base_path.join(SETTINGS_FILE)
    }

    /// Load `.csvguard/config.yaml`, or defaults when it does not exist.
    pub fn load(&self) -> Result<ExportSettings, SettingsError> {
        let path = self.settings_path();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(ExportSettings::default());
        }
        Self::load_from(&path)
    }

    /// Load an explicit settings file. A missing file is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<ExportSettings, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let settings = parse(&contents)?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand, parse and validate settings YAML.
pub fn parse(contents: &str) -> Result<ExportSettings, SettingsError> {
    let expanded = expand_env_vars(contents)?;

    let settings: ExportSettings =
        serde_yaml::from_str(&expanded).map_err(|e| SettingsError::ParseError {
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;

    validate(&settings)?;
    Ok(settings)
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String, SettingsError> {
    let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| {
        SettingsError::ParseError {
            line: None,
            message: e.to_string(),
        }
    })?;

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) => v,
            Err(_) => match default {
                Some(d) => d.to_string(),
                None => {
                    return Err(SettingsError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };

        result = result.replace(full_match, &value);
    }

    Ok(result)
}

/// Validate settings values.
fn validate(settings: &ExportSettings) -> Result<(), SettingsError> {
    if settings.page_size == 0 {
        return Err(SettingsError::ValidationError {
            message: "page_size must be greater than 0".to_string(),
        });
    }

    if let Some(name) = settings.columns.iter().find(|name| name.trim().is_empty()) {
        return Err(SettingsError::ValidationError {
            message: format!("columns must not contain blank names ({name:?})"),
        });
    }

    Ok(())
}
