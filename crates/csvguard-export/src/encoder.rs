//! Field quoting and line rendering.

use crate::sanitize::sanitize;

/// Terminator appended to every line.
pub const LINE_TERMINATOR: char = '\n';

/// UTF-8 byte-order mark.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Characters that force a field into the enclosure even when they are
/// neither the delimiter nor the enclosure.
const QUOTE_TRIGGERS: [char; 5] = ['\n', '\r', '\t', ' ', '\\'];

/// Renders sanitized fields as delimited, enclosed CSV lines.
#[derive(Debug, Clone)]
pub struct LineEncoder {
    delimiter: String,
    enclosure: String,
    doubled_enclosure: String,
}

impl LineEncoder {
    /// Create an encoder for an already validated delimiter/enclosure pair.
    pub fn new(delimiter: impl Into<String>, enclosure: impl Into<String>) -> Self {
        let enclosure = enclosure.into();
        Self {
            delimiter: delimiter.into(),
            doubled_enclosure: enclosure.repeat(2),
            enclosure,
        }
    }

    /// Whether `field` has to be wrapped in the enclosure.
    pub fn needs_enclosure(&self, field: &str) -> bool {
        field.contains(self.delimiter.as_str())
            || field.contains(self.enclosure.as_str())
            || field.contains(&QUOTE_TRIGGERS[..])
    }

    /// Append `field` to `out`, enclosing it and doubling embedded
    /// enclosure characters when needed.
    pub fn encode_field(&self, field: &str, out: &mut String) {
        if !self.needs_enclosure(field) {
            out.push_str(field);
            return;
        }

        out.push_str(&self.enclosure);
        out.push_str(&field.replace(self.enclosure.as_str(), &self.doubled_enclosure));
        out.push_str(&self.enclosure);
    }

    /// Sanitize every field and append them to `out` as one terminated line.
    pub fn encode_line<I, S>(&self, fields: I, out: &mut String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                out.push_str(&self.delimiter);
            }
            self.encode_field(&sanitize(field.as_ref()), out);
        }
        out.push(LINE_TERMINATOR);
    }
}
