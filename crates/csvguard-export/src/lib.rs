//! Streaming CSV export for semi-structured records.
//!
//! Records with heterogeneous keys are projected onto a fixed column list,
//! every header name and cell is guarded against spreadsheet formula
//! injection, and rows are streamed to a [`Sink`] batch by batch.
//!
//! ```
//! use csvguard_export::{CsvConfig, CsvWriter, MemorySink, Record};
//!
//! let config = CsvConfig::new().columns(["first_name", "memo"]).disable_bom();
//! let mut writer = CsvWriter::new(config, MemorySink::memory());
//!
//! let row: Record = [("first_name".to_string(), "=1+1".to_string())].into_iter().collect();
//! writer.write([row])?;
//! writer.close()?;
//!
//! assert_eq!(writer.sink().contents(), b"first_name,memo\n`=1+1,\n");
//! # Ok::<(), csvguard_export::ExportError>(())
//! ```

mod columns;
mod config;
mod encoder;
mod error;
mod filename;
mod project;
mod sanitize;
mod sink;
mod source;
mod writer;

pub use columns::{discover_columns, effective_columns};
pub use config::{
    resolve_delimiter, resolve_enclosure, CsvConfig, DEFAULT_DELIMITER, DEFAULT_DENYLIST,
    DEFAULT_ENCLOSURE,
};
pub use encoder::{LineEncoder, BOM, LINE_TERMINATOR};
pub use error::{ConfigError, ExportError, ExportResult, SeparatorKind};
pub use filename::default_filename;
pub use project::{project, Record};
pub use sanitize::{sanitize, starts_with_formula_trigger, FORMULA_GUARD, FORMULA_TRIGGERS};
pub use sink::{FileSink, MemorySink, Sink, WriterSink};
pub use source::{
    export_pages, ExportProgress, IterSource, PagedExport, ProgressCallback, RowSource,
    VecSource, DEFAULT_PAGE_SIZE,
};
pub use writer::{CsvWriter, WriteState};
