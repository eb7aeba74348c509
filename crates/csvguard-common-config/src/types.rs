//! Settings types.

use serde::{Deserialize, Serialize};
use tracing::warn;

use csvguard_export::{ConfigError, CsvConfig, DEFAULT_PAGE_SIZE};

/// Field separator option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldSeparator {
    #[default]
    Comma,
    Semicolon,
    Tab,
    Space,
    /// Use `custom_field_separator`.
    Custom,
}

impl FieldSeparator {
    /// Option name as understood by [`CsvConfig::delimiter`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
            Self::Space => "space",
            Self::Custom => "custom",
        }
    }
}

/// Text qualifier option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextQualifier {
    #[default]
    DoubleQuote,
    Quote,
    /// Use `custom_text_qualifier`.
    Custom,
}

impl TextQualifier {
    /// Option name as understood by [`CsvConfig::enclosure`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::DoubleQuote => "double-quote",
            Self::Quote => "quote",
            Self::Custom => "custom",
        }
    }
}

/// Export settings, as stored in `.csvguard/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// When false the separator options below are ignored.
    pub use_custom_csv_settings: bool,
    pub field_separator: FieldSeparator,
    pub custom_field_separator: String,
    pub text_qualifier: TextQualifier,
    pub custom_text_qualifier: String,
    /// Header order. Empty means "discover from the data".
    pub columns: Vec<String>,
    pub allowlist: Vec<String>,
    /// Added to the built-in denylist.
    pub denylist: Vec<String>,
    pub bom: bool,
    pub page_size: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            use_custom_csv_settings: false,
            field_separator: FieldSeparator::default(),
            custom_field_separator: String::new(),
            text_qualifier: TextQualifier::default(),
            custom_text_qualifier: String::new(),
            columns: Vec::new(),
            allowlist: Vec::new(),
            denylist: Vec::new(),
            bom: true,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ExportSettings {
    fn separator_options_set(&self) -> bool {
        self.field_separator != FieldSeparator::default()
            || self.text_qualifier != TextQualifier::default()
            || !self.custom_field_separator.is_empty()
            || !self.custom_text_qualifier.is_empty()
    }

    /// Delimiter value to hand to [`CsvConfig::delimiter`].
    ///
    /// An empty custom value resolves to the default there.
    pub fn delimiter(&self) -> &str {
        if !self.use_custom_csv_settings {
            return FieldSeparator::Comma.name();
        }
        match self.field_separator {
            FieldSeparator::Custom => &self.custom_field_separator,
            other => other.name(),
        }
    }

    /// Enclosure value to hand to [`CsvConfig::enclosure`].
    pub fn enclosure(&self) -> &str {
        if !self.use_custom_csv_settings {
            return TextQualifier::DoubleQuote.name();
        }
        match self.text_qualifier {
            TextQualifier::Custom => &self.custom_text_qualifier,
            other => other.name(),
        }
    }

    /// Build the writer configuration.
    ///
    /// Fails when the selected delimiter or enclosure starts with a
    /// formula character. A delimiter equal to the enclosure is accepted
    /// here and rejected by the writer before anything is written.
    pub fn to_csv_config(&self) -> Result<CsvConfig, ConfigError> {
        if !self.use_custom_csv_settings && self.separator_options_set() {
            warn!("use_custom_csv_settings is off, separator options are ignored");
        }

        CsvConfig::new()
            .columns(self.columns.iter().cloned())
            .allowlist(self.allowlist.iter().cloned())
            .denylist(self.denylist.iter().cloned())
            .bom(self.bom)
            .delimiter(self.delimiter())?
            .enclosure(self.enclosure())
    }
}
