//! Mapping heterogeneous records onto a fixed column schema.

use std::collections::BTreeMap;

/// One input row: column name to already-stringified value.
pub type Record = BTreeMap<String, String>;

/// Values of `record` in `columns` order.
///
/// Missing keys yield an empty string and keys outside `columns` are
/// dropped, so every projected row has exactly `columns.len()` fields.
pub fn project<'r>(record: &'r Record, columns: &[String]) -> Vec<&'r str> {
    columns
        .iter()
        .map(|column| record.get(column).map(String::as_str).unwrap_or(""))
        .collect()
}
