//! Export execution.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use csvguard_common_log::spans::{export_span, page_span, record_error, Timer};
use csvguard_export::{
    default_filename, discover_columns, CsvConfig, CsvWriter, ExportProgress, FileSink,
    PagedExport, Record, RowSource, Sink, VecSource, WriterSink,
};

use crate::cli::{Cli, InputFormat};
use crate::error::CliError;
use crate::input::{CsvSource, JsonLinesSource};

/// Where the CSV goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Resolve `--output`. A directory gets a timestamped file name.
    pub fn resolve(output: Option<&Path>) -> Self {
        match output {
            None => Self::Stdout,
            Some(path) if path.as_os_str() == "-" => Self::Stdout,
            Some(path) if path.is_dir() => {
                Self::File(path.join(default_filename(&chrono::Local::now())))
            }
            Some(path) => Self::File(path.to_path_buf()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Stdout => "stdout".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn sink(&self) -> Box<dyn Sink> {
        match self {
            Self::Stdout => Box::new(WriterSink::new(BufWriter::new(io::stdout().lock()))),
            Self::File(path) => Box::new(FileSink::new(path)),
        }
    }
}

fn open_input(input: Option<&Path>) -> Result<Box<dyn BufRead>, CliError> {
    match input {
        None => Ok(Box::new(io::stdin().lock())),
        Some(path) if path.as_os_str() == "-" => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                CliError::io_with_path(
                    format!("cannot open input {}: {e}", path.display()),
                    e,
                    path,
                )
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Drain `source` into memory.
fn collect_all(source: &mut dyn RowSource, page_size: usize) -> Result<Vec<Record>, CliError> {
    let mut records = Vec::new();
    while let Some(page) = source.next_page(page_size)? {
        records.extend(page);
    }
    Ok(records)
}

/// Fill in columns and allow list from the data when asked to.
///
/// Returns the source to export from; JSON input that had to be scanned
/// is replayed from memory.
fn resolve_columns(
    mut config: CsvConfig,
    discover_allowlist: bool,
    format: InputFormat,
    reader: Box<dyn BufRead>,
    page_size: usize,
) -> Result<(CsvConfig, Box<dyn RowSource>), CliError> {
    let needs_columns = config.raw_columns().is_empty();
    let needs_allowlist = discover_allowlist && config.allowed().is_empty();

    let (discovered, source): (Vec<String>, Box<dyn RowSource>) = match format {
        InputFormat::Csv => {
            let source = CsvSource::new(reader)?;
            (source.headers().to_vec(), Box::new(source) as Box<dyn RowSource>)
        }
        InputFormat::Jsonl if needs_columns || needs_allowlist => {
            let records = collect_all(&mut JsonLinesSource::new(reader), page_size)?;
            let discovered = discover_columns(records.iter());
            (discovered, Box::new(VecSource::from_vec(records)) as Box<dyn RowSource>)
        }
        InputFormat::Jsonl => (
            Vec::new(),
            Box::new(JsonLinesSource::new(reader)) as Box<dyn RowSource>,
        ),
    };

    if needs_columns {
        debug!(columns = ?discovered, "using discovered columns");
        config = config.columns(discovered.iter().cloned());
    }
    if needs_allowlist {
        config = config.allowlist(discovered);
    }
    Ok((config, source))
}

/// Run one export as described by the command line.
pub fn run(cli: &Cli) -> Result<ExportProgress, CliError> {
    let mut settings = cli.load_settings()?;
    cli.apply_overrides(&mut settings)?;

    let config = settings.to_csv_config()?;
    // Reject a delimiter/enclosure collision before any input is read.
    config.validate()?;

    let reader = open_input(cli.input.as_deref())?;
    let (config, mut source) = resolve_columns(
        config,
        cli.discover_allowlist,
        cli.input_format,
        reader,
        settings.page_size,
    )?;

    let destination = Destination::resolve(cli.output.as_deref());
    let span = export_span(&destination.describe());
    let _guard = span.enter();

    let result = export(config, source.as_mut(), &destination, settings.page_size);
    if let Err(e) = &result {
        record_error(e);
    }
    result
}

fn export(
    config: CsvConfig,
    source: &mut dyn RowSource,
    destination: &Destination,
    page_size: usize,
) -> Result<ExportProgress, CliError> {
    let timer = Timer::start("export");
    let page_size = page_size.max(1);
    let mut writer = CsvWriter::new(config, destination.sink());
    let progress = PagedExport::new()
        .page_size(page_size)
        .on_progress(Box::new(move |p: ExportProgress| {
            let page = p.exported.div_ceil(page_size as u64);
            let _page = page_span(page, p.exported).entered();
            debug!(bytes = p.bytes_written, "page exported");
        }))
        .run(&mut writer, source)?;
    writer.close()?;

    info!(
        rows = progress.exported,
        bytes = progress.bytes_written,
        elapsed_ms = %timer.elapsed_ms(),
        dest = %destination.describe(),
        "export complete"
    );
    timer.finish();
    Ok(progress)
}
