//! Output sinks.
//!
//! A sink is opened lazily by the writer once the configuration has been
//! validated, receives whole batches of encoded bytes, and is closed once.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Destination for encoded CSV bytes.
pub trait Sink {
    /// Acquire the underlying resource.
    fn open(&mut self) -> io::Result<()>;

    /// Append `bytes`.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Flush and release the resource.
    fn close(&mut self) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Sink over any [`Write`] (stdout, a response body, a `Vec<u8>`).
#[derive(Debug, Default)]
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn open(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// In-memory sink.
pub type MemorySink = WriterSink<Vec<u8>>;

impl WriterSink<Vec<u8>> {
    pub fn memory() -> Self {
        Self::new(Vec::new())
    }

    /// Bytes written so far.
    pub fn contents(&self) -> &[u8] {
        &self.inner
    }
}

/// File sink with atomic replacement.
///
/// Bytes go to a temporary file next to the destination, which replaces
/// the destination on [`Sink::close`]. Dropping an unclosed sink removes
/// the temporary file and leaves the destination untouched.
#[derive(Debug)]
pub struct FileSink {
    final_path: PathBuf,
    temp: Option<BufWriter<NamedTempFile>>,
}

impl FileSink {
    pub fn new(final_path: impl AsRef<Path>) -> Self {
        Self {
            final_path: final_path.as_ref().to_path_buf(),
            temp: None,
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.final_path
    }

    fn parent_dir(&self) -> io::Result<PathBuf> {
        match self.final_path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Ok(PathBuf::from(".")),
            Some(parent) => Ok(parent.to_path_buf()),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "cannot determine parent directory for: {}",
                    self.final_path.display()
                ),
            )),
        }
    }
}

impl Sink for FileSink {
    fn open(&mut self) -> io::Result<()> {
        if self.temp.is_some() {
            return Ok(());
        }
        let parent = self.parent_dir()?;
        fs::create_dir_all(&parent)?;
        let temp_file = NamedTempFile::new_in(&parent)?;
        self.temp = Some(BufWriter::new(temp_file));
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.temp.as_mut() {
            Some(writer) => writer.write_all(bytes),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "file sink is not open",
            )),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        let writer = self.temp.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "file sink is not open")
        })?;
        let temp_file = writer.into_inner().map_err(|e| e.into_error())?;
        temp_file.persist(&self.final_path).map_err(|e| e.error)?;
        Ok(())
    }
}
