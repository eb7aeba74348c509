//! Formula-injection guard for header names and cell values.

/// Characters that make spreadsheet applications evaluate a cell as a formula.
pub const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Prefix that neutralizes a leading formula trigger.
pub const FORMULA_GUARD: char = '`';

/// Returns true if `value` begins with one of [`FORMULA_TRIGGERS`].
pub fn starts_with_formula_trigger(value: &str) -> bool {
    value.starts_with(&FORMULA_TRIGGERS[..])
}

/// Trims `value` and prefixes it with a backtick when it would otherwise
/// start with a formula trigger.
///
/// Used for column names and cell values alike. Any Unicode content is
/// kept as-is; only surrounding whitespace is removed.
pub fn sanitize(value: &str) -> String {
    let trimmed = value.trim();
    if starts_with_formula_trigger(trimmed) {
        let mut guarded = String::with_capacity(trimmed.len() + 1);
        guarded.push(FORMULA_GUARD);
        guarded.push_str(trimmed);
        guarded
    } else {
        trimmed.to_string()
    }
}
