//! Paged row sources and the export driver.

use tracing::{debug, info};

use crate::error::ExportResult;
use crate::project::Record;
use crate::sink::Sink;
use crate::writer::CsvWriter;

/// Records fetched per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Producer of record pages.
pub trait RowSource {
    /// Next page of at most `page_size` records, `None` when exhausted.
    fn next_page(&mut self, page_size: usize) -> ExportResult<Option<Vec<Record>>>;

    /// Total number of records, when known up front.
    fn total(&self) -> Option<u64> {
        None
    }
}

/// Row source over an iterator of records.
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
    total: Option<u64>,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Record>,
{
    pub fn new(iter: I) -> Self {
        Self { iter, total: None }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }
}

/// Row source owning its records.
pub type VecSource = IterSource<std::vec::IntoIter<Record>>;

impl VecSource {
    /// Owning source over `records`, total known.
    pub fn from_vec(records: Vec<Record>) -> Self {
        let total = records.len() as u64;
        Self::new(records.into_iter()).with_total(total)
    }
}

impl<I> RowSource for IterSource<I>
where
    I: Iterator<Item = Record>,
{
    fn next_page(&mut self, page_size: usize) -> ExportResult<Option<Vec<Record>>> {
        let page: Vec<Record> = self.iter.by_ref().take(page_size).collect();
        Ok(if page.is_empty() { None } else { Some(page) })
    }

    fn total(&self) -> Option<u64> {
        self.total
    }
}

/// Export progress callback.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress information.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportProgress {
    pub exported: u64,
    pub total: Option<u64>,
    pub bytes_written: u64,
    pub percent_complete: Option<f32>,
}

impl ExportProgress {
    /// Create a new progress instance.
    pub fn new(exported: u64, total: Option<u64>, bytes_written: u64) -> Self {
        let percent_complete =
            total.map(|t| if t > 0 { exported as f32 / t as f32 * 100.0 } else { 0.0 });
        Self {
            exported,
            total,
            bytes_written,
            percent_complete,
        }
    }
}

/// Drives a [`RowSource`] through a [`CsvWriter`] page by page.
pub struct PagedExport {
    page_size: usize,
    on_progress: Option<ProgressCallback>,
}

impl Default for PagedExport {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            on_progress: None,
        }
    }
}

impl PagedExport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records per page; zero is treated as one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Called after every page with the running totals.
    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Write every page of `source`. The header is emitted even when the
    /// source is empty. The writer is left open.
    pub fn run<S, R>(&self, writer: &mut CsvWriter<S>, source: &mut R) -> ExportResult<ExportProgress>
    where
        S: Sink,
        R: RowSource + ?Sized,
    {
        let total = source.total();
        let start_rows = writer.rows_written();
        writer.emit_header()?;

        let mut pages = 0u64;
        while let Some(page) = source.next_page(self.page_size)? {
            writer.write(&page)?;
            pages += 1;

            let progress = ExportProgress::new(
                writer.rows_written() - start_rows,
                total,
                writer.bytes_written(),
            );
            debug!(page = pages, exported = progress.exported, "export page written");
            if let Some(callback) = &self.on_progress {
                callback(progress);
            }
        }

        let progress = ExportProgress::new(
            writer.rows_written() - start_rows,
            total,
            writer.bytes_written(),
        );
        info!(
            pages,
            exported = progress.exported,
            bytes = progress.bytes_written,
            "export finished"
        );
        Ok(progress)
    }
}

/// Shorthand for `PagedExport::new().page_size(page_size).run(writer, source)`.
pub fn export_pages<S, R>(
    writer: &mut CsvWriter<S>,
    source: &mut R,
    page_size: usize,
) -> ExportResult<ExportProgress>
where
    S: Sink,
    R: RowSource + ?Sized,
{
    PagedExport::new().page_size(page_size).run(writer, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CsvConfig;
    use crate::error::ExportError;
    use crate::sink::MemorySink;
    use std::sync::{Arc, Mutex};

    fn numbered(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| [("id".to_string(), i.to_string())].into_iter().collect())
            .collect()
    }

    #[test]
    fn test_iter_source_pages() {
        let mut source = VecSource::from_vec(numbered(5));
        assert_eq!(source.total(), Some(5));
        assert_eq!(source.next_page(2).unwrap().unwrap().len(), 2);
        assert_eq!(source.next_page(2).unwrap().unwrap().len(), 2);
        assert_eq!(source.next_page(2).unwrap().unwrap().len(), 1);
        assert!(source.next_page(2).unwrap().is_none());
    }

    #[test]
    fn test_progress_percent() {
        let progress = ExportProgress::new(50, Some(200), 1024);
        assert_eq!(progress.percent_complete, Some(25.0));
        assert_eq!(ExportProgress::new(0, Some(0), 0).percent_complete, Some(0.0));
        assert_eq!(ExportProgress::new(3, None, 0).percent_complete, None);
    }

    #[test]
    fn test_paged_export_writes_all_rows_once() {
        let mut writer = CsvWriter::new(
            CsvConfig::new().columns(["id"]).disable_bom(),
            MemorySink::memory(),
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);

        let progress = PagedExport::new()
            .page_size(2)
            .on_progress(Box::new(move |p: ExportProgress| sink_seen.lock().unwrap().push(p.exported)))
            .run(&mut writer, &mut VecSource::from_vec(numbered(5)))
            .unwrap();

        assert_eq!(progress.exported, 5);
        assert_eq!(progress.percent_complete, Some(100.0));
        assert_eq!(*seen.lock().unwrap(), vec![2, 4, 5]);

        let out = String::from_utf8(writer.sink().contents().to_vec()).unwrap();
        assert_eq!(out, "id\n0\n1\n2\n3\n4\n");
    }

    #[test]
    fn test_empty_source_still_emits_header() {
        let mut writer = CsvWriter::new(
            CsvConfig::new().columns(["id"]).disable_bom(),
            MemorySink::memory(),
        );
        let progress =
            export_pages(&mut writer, &mut VecSource::from_vec(Vec::new()), 10).unwrap();
        assert_eq!(progress.exported, 0);
        assert_eq!(writer.sink().contents(), b"id\n");
    }

    struct FailingSource {
        served: bool,
    }

    impl RowSource for FailingSource {
        fn next_page(&mut self, page_size: usize) -> ExportResult<Option<Vec<Record>>> {
            if self.served {
                return Err(ExportError::Source("connection reset".to_string()));
            }
            self.served = true;
            Ok(Some(numbered(page_size)))
        }
    }

    #[test]
    fn test_source_error_keeps_committed_pages() {
        let mut writer = CsvWriter::new(
            CsvConfig::new().columns(["id"]).disable_bom(),
            MemorySink::memory(),
        );
        let err = export_pages(&mut writer, &mut FailingSource { served: false }, 2).unwrap_err();
        assert!(matches!(err, ExportError::Source(_)));
        assert_eq!(writer.sink().contents(), b"id\n0\n1\n");
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let mut writer = CsvWriter::new(CsvConfig::new().columns(["id"]), MemorySink::memory());
        let progress =
            export_pages(&mut writer, &mut VecSource::from_vec(numbered(3)), 0).unwrap();
        assert_eq!(progress.exported, 3);
    }
}
