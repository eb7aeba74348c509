//! Delimiter, enclosure, BOM and column-selection settings.
//!
//! Single-field problems (a separator that starts with a formula
//! character) are rejected by the setter. The delimiter/enclosure
//! collision depends on both fields, so it is only checked by
//! [`CsvConfig::validate`], which the writer runs before the header.

use std::collections::BTreeSet;

use crate::columns::effective_columns;
use crate::error::{ConfigError, SeparatorKind};
use crate::sanitize::starts_with_formula_trigger;

/// Column names that are never exported, whatever the allow list says.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "user_pass",
    "user_activation_key",
    "session_tokens",
    "wp_user-settings",
    "wp_user-settings-time",
    "wp_capabilities",
    "community-events-location",
];

/// Delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = ",";

/// Enclosure used when none is configured.
pub const DEFAULT_ENCLOSURE: &str = "\"";

const DELIMITER_NAMES: &[(&str, &str)] = &[
    ("comma", ","),
    ("semicolon", ";"),
    ("tab", "\t"),
    ("space", " "),
];

const ENCLOSURE_NAMES: &[(&str, &str)] = &[("double-quote", "\""), ("quote", "'")];

fn resolve(
    value: &str,
    names: &[(&str, &str)],
    default: &str,
    field: SeparatorKind,
) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Ok(default.to_string());
    }

    let resolved = names
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, literal)| *literal)
        .unwrap_or(value);

    if starts_with_formula_trigger(resolved) {
        return Err(ConfigError::ForbiddenCharacter {
            field,
            value: resolved.to_string(),
        });
    }

    Ok(resolved.to_string())
}

/// Resolve a delimiter name (`comma`, `semicolon`, `tab`, `space`) or custom literal.
///
/// An empty value selects the comma.
pub fn resolve_delimiter(value: &str) -> Result<String, ConfigError> {
    resolve(value, DELIMITER_NAMES, DEFAULT_DELIMITER, SeparatorKind::Delimiter)
}

/// Resolve an enclosure name (`double-quote`, `quote`) or custom literal.
///
/// An empty value selects the double quote.
pub fn resolve_enclosure(value: &str) -> Result<String, ConfigError> {
    resolve(value, ENCLOSURE_NAMES, DEFAULT_ENCLOSURE, SeparatorKind::Enclosure)
}

/// CSV output configuration, built with chained setters.
///
/// ```
/// use csvguard_export::CsvConfig;
///
/// let config = CsvConfig::new()
///     .columns(["first_name", "last_name", "memo"])
///     .denylist(["memo"])
///     .delimiter("semicolon")?
///     .enclosure("quote")?;
/// assert_eq!(config.effective_columns(), vec!["first_name", "last_name"]);
/// # Ok::<(), csvguard_export::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvConfig {
    columns: Vec<String>,
    allowlist: BTreeSet<String>,
    denylist: BTreeSet<String>,
    delimiter: String,
    enclosure: String,
    bom: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            allowlist: BTreeSet::new(),
            denylist: builtin_denylist(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            enclosure: DEFAULT_ENCLOSURE.to_string(),
            bom: true,
        }
    }
}

fn builtin_denylist() -> BTreeSet<String> {
    DEFAULT_DENYLIST.iter().map(|name| name.to_string()).collect()
}

impl CsvConfig {
    /// Comma, double quote, BOM enabled, built-in denylist, no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column list in header order.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict output to these names. Empty means no restriction.
    pub fn allowlist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowlist = names.into_iter().map(Into::into).collect();
        self
    }

    /// Exclude these names in addition to [`DEFAULT_DENYLIST`].
    ///
    /// Replaces names from a previous call; the built-in entries always stay.
    pub fn denylist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut denylist = builtin_denylist();
        denylist.extend(names.into_iter().map(Into::into));
        self.denylist = denylist;
        self
    }

    /// Write the UTF-8 byte-order mark before the header.
    pub fn bom(mut self, enabled: bool) -> Self {
        self.bom = enabled;
        self
    }

    /// Shorthand for `bom(false)`.
    pub fn disable_bom(self) -> Self {
        self.bom(false)
    }

    /// Set the field separator, see [`resolve_delimiter`].
    pub fn delimiter(mut self, value: &str) -> Result<Self, ConfigError> {
        self.delimiter = resolve_delimiter(value)?;
        Ok(self)
    }

    /// Set the text qualifier, see [`resolve_enclosure`].
    pub fn enclosure(mut self, value: &str) -> Result<Self, ConfigError> {
        self.enclosure = resolve_enclosure(value)?;
        Ok(self)
    }

    /// Check constraints that span several fields.
    ///
    /// The delimiter and enclosure must differ, and with multi-character
    /// values neither may contain the other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delimiter == self.enclosure {
            return Err(ConfigError::DelimiterEqualsEnclosure {
                value: self.delimiter.clone(),
            });
        }
        if self.delimiter.contains(self.enclosure.as_str())
            || self.enclosure.contains(self.delimiter.as_str())
        {
            return Err(ConfigError::SeparatorOverlap {
                delimiter: self.delimiter.clone(),
                enclosure: self.enclosure.clone(),
            });
        }
        Ok(())
    }

    /// Columns as supplied, before filtering.
    pub fn raw_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn allowed(&self) -> &BTreeSet<String> {
        &self.allowlist
    }

    pub fn denied(&self) -> &BTreeSet<String> {
        &self.denylist
    }

    pub fn delimiter_str(&self) -> &str {
        &self.delimiter
    }

    pub fn enclosure_str(&self) -> &str {
        &self.enclosure
    }

    pub fn bom_enabled(&self) -> bool {
        self.bom
    }

    /// Columns after allow-list intersection and deny-list subtraction.
    pub fn effective_columns(&self) -> Vec<String> {
        effective_columns(&self.columns, &self.allowlist, &self.denylist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("comma", "," ; "comma")]
    #[test_case("semicolon", ";" ; "semicolon")]
    #[test_case("tab", "\t" ; "tab")]
    #[test_case("space", " " ; "space")]
    #[test_case("", "," ; "empty falls back to comma")]
    #[test_case("|", "|" ; "custom literal")]
    #[test_case("::", "::" ; "multi character literal")]
    fn test_resolve_delimiter(input: &str, expected: &str) {
        assert_eq!(resolve_delimiter(input).unwrap(), expected);
    }

    #[test_case("double-quote", "\"" ; "double quote")]
    #[test_case("quote", "'" ; "single quote")]
    #[test_case("", "\"" ; "empty falls back to double quote")]
    #[test_case("|", "|" ; "custom literal")]
    fn test_resolve_enclosure(input: &str, expected: &str) {
        assert_eq!(resolve_enclosure(input).unwrap(), expected);
    }

    #[test_case("=" ; "equals")]
    #[test_case("+" ; "plus")]
    #[test_case("-" ; "minus")]
    #[test_case("@" ; "at sign")]
    #[test_case("=x" ; "multi character starting with trigger")]
    fn test_formula_characters_rejected(input: &str) {
        assert_eq!(
            CsvConfig::new().delimiter(input).unwrap_err(),
            ConfigError::ForbiddenCharacter {
                field: SeparatorKind::Delimiter,
                value: input.to_string(),
            }
        );
        assert_eq!(
            CsvConfig::new().enclosure(input).unwrap_err(),
            ConfigError::ForbiddenCharacter {
                field: SeparatorKind::Enclosure,
                value: input.to_string(),
            }
        );
    }

    #[test]
    fn test_defaults() {
        let config = CsvConfig::default();
        assert_eq!(config.delimiter_str(), ",");
        assert_eq!(config.enclosure_str(), "\"");
        assert!(config.bom_enabled());
        assert!(config.raw_columns().is_empty());
        assert!(config.allowed().is_empty());
        for name in DEFAULT_DENYLIST {
            assert!(config.denied().contains(*name));
        }
    }

    #[test]
    fn test_collision_only_detected_by_validate() {
        let config = CsvConfig::new()
            .delimiter("|")
            .unwrap()
            .enclosure("|")
            .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::DelimiterEqualsEnclosure {
                value: "|".to_string()
            })
        );
    }

    #[test_case("|", "||" ; "enclosure contains delimiter")]
    #[test_case("::", ":" ; "delimiter contains enclosure")]
    #[test_case("a|b", "|" ; "enclosure inside delimiter")]
    fn test_overlapping_separators_rejected(delimiter: &str, enclosure: &str) {
        let config = CsvConfig::new()
            .delimiter(delimiter)
            .unwrap()
            .enclosure(enclosure)
            .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::SeparatorOverlap {
                delimiter: delimiter.to_string(),
                enclosure: enclosure.to_string(),
            })
        );
    }

    #[test]
    fn test_distinct_multi_character_separators_accepted() {
        let config = CsvConfig::new()
            .delimiter("::")
            .unwrap()
            .enclosure("||")
            .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_collision_through_names() {
        let config = CsvConfig::new().enclosure("'").unwrap();
        assert!(config.validate().is_ok());

        let config = config.delimiter("'").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_denylist_keeps_builtin_entries() {
        let config = CsvConfig::new().denylist(["memo"]).denylist(["notes"]);
        assert!(config.denied().contains("notes"));
        assert!(!config.denied().contains("memo"));
        assert!(config.denied().contains("user_pass"));
        assert!(config.denied().contains("session_tokens"));
    }

    #[test]
    fn test_denylist_wins_over_allowlist() {
        let config = CsvConfig::new()
            .columns(["first_name", "last_name", "memo"])
            .allowlist(["first_name", "memo", "column_that_doesnt_exist"])
            .denylist(["memo"]);
        assert_eq!(config.effective_columns(), vec!["first_name"]);
    }

    #[test]
    fn test_allowlist_set_after_columns_still_applies() {
        let config = CsvConfig::new()
            .columns(["first_name", "user_pass", "\":\";-3+3+cmd|' /C calc'!D2"])
            .allowlist(["first_name", "user_pass"]);
        assert_eq!(config.effective_columns(), vec!["first_name"]);
    }

    #[test]
    fn test_disable_bom() {
        assert!(!CsvConfig::new().disable_bom().bom_enabled());
        assert!(CsvConfig::new().disable_bom().bom(true).bom_enabled());
    }
}
