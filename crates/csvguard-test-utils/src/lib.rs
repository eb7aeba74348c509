//! Test utilities for csvguard crates.

use std::collections::BTreeMap;
use tempfile::TempDir;

/// UTF-8 byte-order mark as written by the exporter.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Build a record from string pairs.
pub fn record(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Decode CSV output, failing the test if the BOM is missing.
pub fn text_after_bom(bytes: &[u8]) -> String {
    let rest = bytes
        .strip_prefix(UTF8_BOM)
        .unwrap_or_else(|| panic!("Expected UTF-8 BOM, got {:?}", &bytes[..bytes.len().min(3)]));
    String::from_utf8(rest.to_vec()).expect("CSV output is not UTF-8")
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
