//! Export errors.

use std::fmt;

use thiserror::Error;

/// Which structural character a configuration value was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorKind {
    /// Field separator.
    Delimiter,
    /// Text qualifier.
    Enclosure,
}

impl fmt::Display for SeparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delimiter => f.write_str("delimiter"),
            Self::Enclosure => f.write_str("enclosure"),
        }
    }
}

/// Invalid delimiter/enclosure configuration.
///
/// Always raised before any byte reaches the sink, so the export can be
/// retried with a corrected configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} {value:?} starts with a formula character (=, +, - or @)")]
    ForbiddenCharacter { field: SeparatorKind, value: String },

    #[error("delimiter and enclosure cannot be the same character ({value:?})")]
    DelimiterEqualsEnclosure { value: String },

    #[error("delimiter {delimiter:?} and enclosure {enclosure:?} overlap")]
    SeparatorOverlap { delimiter: String, enclosure: String },
}

/// Export error.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("writer is closed")]
    Closed,
    #[error("header already emitted, configuration can no longer change")]
    HeaderAlreadyEmitted,
    #[error("row source error: {0}")]
    Source(String),
}

impl ExportError {
    /// True for errors the caller can fix by changing settings.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Export result.
pub type ExportResult<T> = Result<T, ExportError>;
