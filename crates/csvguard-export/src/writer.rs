//! Stateful CSV writer.
//!
//! The header is emitted lazily by the first [`CsvWriter::write`] call:
//! configuration is validated, effective columns are computed once, the
//! sink is opened, and the optional BOM and header line are written.
//! Later calls append rows to the same open sink.

use std::borrow::Borrow;

use tracing::{debug, info};

use crate::config::CsvConfig;
use crate::encoder::{LineEncoder, BOM};
use crate::error::{ExportError, ExportResult};
use crate::project::{project, Record};
use crate::sink::Sink;

/// Observable lifecycle state of a [`CsvWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    /// Configured, nothing written yet.
    NotStarted,
    /// Sink open, header written.
    HeaderEmitted,
    /// Terminal.
    Closed,
}

#[derive(Debug)]
enum State {
    NotStarted,
    HeaderEmitted {
        columns: Vec<String>,
        encoder: LineEncoder,
    },
    Closed,
}

/// Streams records to a [`Sink`] as CSV.
///
/// One writer owns one sink; it is not meant to be shared between threads.
#[derive(Debug)]
pub struct CsvWriter<S: Sink> {
    config: CsvConfig,
    sink: S,
    state: State,
    rows_written: u64,
    bytes_written: u64,
}

impl<S: Sink> CsvWriter<S> {
    pub fn new(config: CsvConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            state: State::NotStarted,
            rows_written: 0,
            bytes_written: 0,
        }
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Replace the configuration. Only allowed before the header.
    pub fn reconfigure(&mut self, config: CsvConfig) -> ExportResult<()> {
        match self.state {
            State::NotStarted => {
                self.config = config;
                Ok(())
            }
            State::HeaderEmitted { .. } => Err(ExportError::HeaderAlreadyEmitted),
            State::Closed => Err(ExportError::Closed),
        }
    }

    pub fn state(&self) -> WriteState {
        match self.state {
            State::NotStarted => WriteState::NotStarted,
            State::HeaderEmitted { .. } => WriteState::HeaderEmitted,
            State::Closed => WriteState::Closed,
        }
    }

    /// Columns fixed at header time.
    pub fn effective_columns(&self) -> Option<&[String]> {
        match &self.state {
            State::HeaderEmitted { columns, .. } => Some(columns),
            _ => None,
        }
    }

    /// Data rows written so far (header excluded).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Bytes handed to the sink so far, BOM and header included.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Open the sink and write BOM and header. No-op once emitted.
    ///
    /// Fails with a configuration error, before the sink is opened, when
    /// the delimiter and enclosure collide. A failed `open` leaves the
    /// writer in [`WriteState::NotStarted`]; a failed header write may
    /// leave a partial header in the sink, so the writer becomes
    /// [`WriteState::Closed`].
    pub fn emit_header(&mut self) -> ExportResult<()> {
        match self.state {
            State::NotStarted => {}
            State::HeaderEmitted { .. } => return Ok(()),
            State::Closed => return Err(ExportError::Closed),
        }

        self.config.validate()?;
        let columns = self.config.effective_columns();
        let encoder = LineEncoder::new(self.config.delimiter_str(), self.config.enclosure_str());

        self.sink.open()?;

        let mut buf = Vec::new();
        if self.config.bom_enabled() {
            buf.extend_from_slice(BOM);
        }
        let mut header = String::new();
        encoder.encode_line(&columns, &mut header);
        buf.extend_from_slice(header.as_bytes());

        if let Err(err) = self.sink.write_all(&buf) {
            self.state = State::Closed;
            return Err(err.into());
        }
        self.bytes_written += buf.len() as u64;

        info!(
            columns = columns.len(),
            bom = self.config.bom_enabled(),
            "csv header emitted"
        );
        self.state = State::HeaderEmitted { columns, encoder };
        Ok(())
    }

    /// Append a batch of records, emitting the header first if needed.
    ///
    /// The batch is encoded in full before it reaches the sink, so it is
    /// either appended entirely or not at all. Earlier batches stay committed.
    pub fn write<I, R>(&mut self, records: I) -> ExportResult<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: Borrow<Record>,
    {
        self.emit_header()?;

        let State::HeaderEmitted { columns, encoder } = &self.state else {
            return Err(ExportError::Closed);
        };

        let mut batch = String::new();
        let mut rows = 0u64;
        for record in records {
            encoder.encode_line(project(record.borrow(), columns), &mut batch);
            rows += 1;
        }

        if rows > 0 {
            self.sink.write_all(batch.as_bytes())?;
            self.rows_written += rows;
            self.bytes_written += batch.len() as u64;
        }

        debug!(rows, bytes = batch.len(), "csv batch written");
        Ok(self)
    }

    /// Close the sink. The writer is terminal afterwards.
    ///
    /// A writer that never emitted its header has no open sink; closing it
    /// only moves it to the terminal state.
    pub fn close(&mut self) -> ExportResult<()> {
        let previous = std::mem::replace(&mut self.state, State::Closed);
        match previous {
            State::NotStarted => {
                info!("csv export closed before any write");
                Ok(())
            }
            State::HeaderEmitted { .. } => {
                self.sink.close()?;
                info!(
                    rows = self.rows_written,
                    bytes = self.bytes_written,
                    "csv export closed"
                );
                Ok(())
            }
            State::Closed => Err(ExportError::Closed),
        }
    }
}
