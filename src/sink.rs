//! Output targets
//!
//! A [`Sink`] is one destination for encoded lines. A logger writes every line to
//! each of its output sinks in order; failures are reported on its error sinks.

use crate::error::BuildError;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink contents, cloneable so a test can keep a handle while the
/// logger owns the sink
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        match self.inner.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    /// Written lines, without line endings
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut buf) = self.inner.lock() {
            buf.clear();
        }
    }

    fn append(&self, bytes: &[u8]) -> io::Result<()> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("buffer lock poisoned"))?
            .extend_from_slice(bytes);
        Ok(())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One output destination
#[derive(Debug)]
pub enum Sink {
    Stderr,
    Stdout,
    File { path: PathBuf, file: Mutex<File> },
    Memory(SharedBuffer),
}

impl Sink {
    /// Open a sink from its target string.
    ///
    /// Accepts `stderr`, `stdout`, `file:///absolute/path` and plain paths.
    /// Files are created if missing and appended to.
    pub fn open(target: &str) -> Result<Self, BuildError> {
        match target {
            "stderr" => return Ok(Sink::Stderr),
            "stdout" => return Ok(Sink::Stdout),
            "" => return Err(BuildError::InvalidSink(target.to_string())),
            _ => {}
        }

        let path = if let Some(rest) = target.strip_prefix("file://") {
            if !rest.starts_with('/') {
                return Err(BuildError::InvalidSink(target.to_string()));
            }
            rest
        } else if target.contains("://") {
            return Err(BuildError::InvalidSink(target.to_string()));
        } else {
            target
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| BuildError::OpenSink {
                path: path.to_string(),
                source,
            })?;

        Ok(Sink::File {
            path: PathBuf::from(path),
            file: Mutex::new(file),
        })
    }

    /// Sink appending to `buffer`
    pub fn memory(buffer: SharedBuffer) -> Self {
        Sink::Memory(buffer)
    }

    /// Target name, as used in error reports
    pub fn name(&self) -> String {
        match self {
            Sink::Stderr => "stderr".to_string(),
            Sink::Stdout => "stdout".to_string(),
            Sink::File { path, .. } => path.display().to_string(),
            Sink::Memory(_) => "memory".to_string(),
        }
    }

    fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stderr => io::stderr().lock().write_all(bytes),
            Sink::Stdout => io::stdout().lock().write_all(bytes),
            Sink::File { file, .. } => file
                .lock()
                .map_err(|_| io::Error::other("file lock poisoned"))?
                .write_all(bytes),
            Sink::Memory(buffer) => buffer.append(bytes),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Sink::Stderr => io::stderr().flush(),
            Sink::Stdout => io::stdout().flush(),
            Sink::File { file, .. } => file
                .lock()
                .map_err(|_| io::Error::other("file lock poisoned"))?
                .sync_all(),
            Sink::Memory(_) => Ok(()),
        }
    }
}

/// Output and error sinks of one logger
#[derive(Debug)]
pub(crate) struct Sinks {
    outputs: Vec<Sink>,
    errors: Vec<Sink>,
}

impl Sinks {
    pub(crate) fn new(outputs: Vec<Sink>, errors: Vec<Sink>) -> Self {
        Self { outputs, errors }
    }

    /// Write one encoded line to every output; failures go to the error sinks
    pub(crate) fn write_line(&self, line: &[u8]) {
        for sink in &self.outputs {
            if let Err(err) = sink.write_all(line) {
                self.report(&format!("write error: {}: {err}", sink.name()));
            }
        }
    }

    /// Flush every output
    pub(crate) fn sync(&self) {
        for sink in &self.outputs {
            if let Err(err) = sink.flush() {
                self.report(&format!("sync error: {}: {err}", sink.name()));
            }
        }
    }

    pub(crate) fn report(&self, problem: &str) {
        let line = format!(
            "{} {problem}\n",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        );
        for sink in &self.errors {
            // Nowhere left to report a failing error sink.
            let _ = sink.write_all(line.as_bytes());
        }
    }
}

/// `MakeWriter` handing the fmt layer a writer over a logger's sinks
#[derive(Debug, Clone)]
pub(crate) struct SinkWriterFactory {
    sinks: Arc<Sinks>,
}

impl SinkWriterFactory {
    pub(crate) fn new(sinks: Arc<Sinks>) -> Self {
        Self { sinks }
    }
}

impl<'a> MakeWriter<'a> for SinkWriterFactory {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter { sinks: &self.sinks }
    }
}

/// Writer for a single formatted event
pub(crate) struct SinkWriter<'a> {
    sinks: &'a Sinks,
}

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sinks.write_line(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
