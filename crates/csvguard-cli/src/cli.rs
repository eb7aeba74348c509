//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum, ValueHint};

use csvguard_common_config::{ExportSettings, FieldSeparator, SettingsLoader, TextQualifier};

use crate::error::CliError;

/// csvguard - spreadsheet-safe CSV export
///
/// Reads records as JSON Lines or CSV and writes them as CSV with every
/// header and cell guarded against formula injection.
#[derive(Debug, Parser)]
#[command(name = "csvguard", author, version, about, long_about = None)]
pub struct Cli {
    /// Input file, stdin when omitted or "-"
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Input record format
    #[arg(long, value_enum, default_value_t = InputFormat::Jsonl)]
    pub input_format: InputFormat,

    /// Output file or directory, stdout when omitted
    #[arg(short, long, value_hint = ValueHint::AnyPath)]
    pub output: Option<PathBuf>,

    /// Header order (comma-separated), discovered from the input when empty
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Only export these columns (comma-separated)
    #[arg(long = "allow", value_delimiter = ',')]
    pub allow: Vec<String>,

    /// Never export these columns (comma-separated)
    #[arg(long = "deny", value_delimiter = ',')]
    pub deny: Vec<String>,

    /// Field separator: comma, semicolon, tab, space or a literal
    #[arg(long, allow_hyphen_values = true)]
    pub delimiter: Option<String>,

    /// Text qualifier: double-quote, quote or a literal
    #[arg(long, allow_hyphen_values = true)]
    pub enclosure: Option<String>,

    /// Do not write the UTF-8 byte-order mark
    #[arg(long)]
    pub no_bom: bool,

    /// Records read per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Use the column names found in the input as the allow list
    #[arg(long)]
    pub discover_allowlist: bool,

    /// Path to settings file
    #[arg(short, long, env = "CSVGUARD_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Input record format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// CSV with a header row
    Csv,
}

impl Cli {
    /// Settings from `--config`, or `.csvguard/config.yaml` in the working directory.
    pub fn load_settings(&self) -> Result<ExportSettings, CliError> {
        let settings = match &self.config {
            Some(path) => SettingsLoader::load_from(path)?,
            None => SettingsLoader::default().load()?,
        };
        Ok(settings)
    }

    /// Overlay command-line options on loaded settings.
    pub fn apply_overrides(&self, settings: &mut ExportSettings) -> Result<(), CliError> {
        if !self.columns.is_empty() {
            settings.columns = self.columns.clone();
        }
        if !self.allow.is_empty() {
            settings.allowlist = self.allow.clone();
        }
        if !self.deny.is_empty() {
            settings.denylist = self.deny.clone();
        }

        if self.delimiter.is_some() || self.enclosure.is_some() {
            if !settings.use_custom_csv_settings {
                settings.field_separator = FieldSeparator::default();
                settings.text_qualifier = TextQualifier::default();
                settings.use_custom_csv_settings = true;
            }
            // Literal values resolve option names too, so "semicolon" still works.
            if let Some(delimiter) = &self.delimiter {
                settings.field_separator = FieldSeparator::Custom;
                settings.custom_field_separator = delimiter.clone();
            }
            if let Some(enclosure) = &self.enclosure {
                settings.text_qualifier = TextQualifier::Custom;
                settings.custom_text_qualifier = enclosure.clone();
            }
        }

        if self.no_bom {
            settings.bom = false;
        }
        if let Some(page_size) = self.page_size {
            if page_size == 0 {
                return Err(CliError::config("--page-size must be greater than 0"));
            }
            settings.page_size = page_size;
        }
        Ok(())
    }
}
