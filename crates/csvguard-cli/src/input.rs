//! Record readers for JSON-Lines and CSV input.

use std::io::{BufRead, Read};

use serde_json::Value;

use csvguard_export::{ExportError, ExportResult, Record, RowSource};

/// Render a JSON value as a cell.
///
/// Strings are taken verbatim, `true` becomes `1`, `false` and `null`
/// become empty, numbers keep their JSON spelling, arrays and objects
/// are written as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// One JSON object per line. Blank lines are skipped.
pub struct JsonLinesSource<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }

    fn next_record(&mut self) -> ExportResult<Option<Record>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line)
                .map_err(|e| ExportError::Source(format!("line {}: {e}", self.line_no)))?;
            let Value::Object(fields) = value else {
                return Err(ExportError::Source(format!(
                    "line {}: expected a JSON object",
                    self.line_no
                )));
            };

            return Ok(Some(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), stringify(value)))
                    .collect(),
            ));
        }
    }
}

impl<R: BufRead> RowSource for JsonLinesSource<R> {
    fn next_page(&mut self, page_size: usize) -> ExportResult<Option<Vec<Record>>> {
        let mut page = Vec::with_capacity(page_size.min(1024));
        while page.len() < page_size {
            match self.next_record()? {
                Some(record) => page.push(record),
                None => break,
            }
        }
        Ok(if page.is_empty() { None } else { Some(page) })
    }
}

/// CSV table with a header row. Short rows leave trailing columns absent.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
}

fn csv_error(err: csv::Error) -> ExportError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => ExportError::Io(io),
            other => ExportError::Source(format!("csv input: {other:?}")),
        }
    } else {
        ExportError::Source(format!("csv input: {err}"))
    }
}

impl<R: Read> CsvSource<R> {
    /// Read the header row.
    pub fn new(reader: R) -> ExportResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let headers = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();
        Ok(Self { reader, headers })
    }

    /// Header names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> RowSource for CsvSource<R> {
    fn next_page(&mut self, page_size: usize) -> ExportResult<Option<Vec<Record>>> {
        let mut page = Vec::new();
        let mut row = csv::StringRecord::new();
        while page.len() < page_size {
            if !self.reader.read_record(&mut row).map_err(csv_error)? {
                break;
            }
            let record: Record = self
                .headers
                .iter()
                .zip(row.iter())
                .map(|(header, cell)| (header.clone(), cell.to_string()))
                .collect();
            page.push(record);
        }
        Ok(if page.is_empty() { None } else { Some(page) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("John")), "John");
        assert_eq!(stringify(&json!(true)), "1");
        assert_eq!(stringify(&json!(false)), "");
        assert_eq!(stringify(&json!(null)), "");
        assert_eq!(stringify(&json!(42)), "42");
        assert_eq!(stringify(&json!(-1.5)), "-1.5");
        assert_eq!(stringify(&json!(["a", 1])), "[\"a\",1]");
        assert_eq!(stringify(&json!({"k": "v"})), "{\"k\":\"v\"}");
    }

    #[test]
    fn test_json_lines_pages() {
        let input = "{\"a\":\"1\"}\n\n{\"a\":\"2\",\"b\":true}\n{\"a\":\"3\"}\n";
        let mut source = JsonLinesSource::new(input.as_bytes());

        let first = source.next_page(2).unwrap().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1]["b"], "1");
        assert_eq!(source.next_page(2).unwrap().unwrap().len(), 1);
        assert!(source.next_page(2).unwrap().is_none());
    }

    #[test]
    fn test_json_lines_reports_line_number() {
        let input = "{\"a\":\"1\"}\n[1,2]\n";
        let mut source = JsonLinesSource::new(input.as_bytes());
        match source.next_page(10).unwrap_err() {
            ExportError::Source(message) => {
                assert_eq!(message, "line 2: expected a JSON object")
            }
            other => panic!("Expected Source error, got {other:?}"),
        }

        let mut source = JsonLinesSource::new("{oops\n".as_bytes());
        match source.next_page(10).unwrap_err() {
            ExportError::Source(message) => assert!(message.starts_with("line 1:")),
            other => panic!("Expected Source error, got {other:?}"),
        }
    }

    #[test]
    fn test_csv_source_keeps_header_order() {
        let input = "memo,first_name,last_name\nhi,John,Smith\nyo,Sam\n";
        let mut source = CsvSource::new(input.as_bytes()).unwrap();
        assert_eq!(source.headers(), ["memo", "first_name", "last_name"]);

        let page = source.next_page(10).unwrap().unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["last_name"], "Smith");
        assert!(!page[1].contains_key("last_name"));
        assert!(source.next_page(10).unwrap().is_none());
    }
}
