use crate::errors::Result;
use crate::sink::LogSink;
use logspy_core_types::schema::DIAGNOSTICS_TARGET;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Writes one line per entry to any `io::Write`
///
/// Writes are serialized through a mutex. The writer is flushed when the
/// sink is dropped.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

/// Appends entries to a file
pub type FileSink = WriterSink<BufWriter<File>>;

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Flush buffered output, ignoring errors
    pub fn flush(&self) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writer.flush() {
            tracing::debug!(target: DIAGNOSTICS_TARGET, error = %err, "sink flush failed");
        }
    }
}

impl FileSink {
    /// Open `path` for appending, creating it if needed
    ///
    /// # Errors
    /// * `Io` - If the file cannot be opened
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write(&self, text: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(writer, "{}", text) {
            tracing::debug!(target: DIAGNOSTICS_TARGET, error = %err, "sink write failed");
        }
    }
}

impl<W: Write + Send> Drop for WriterSink<W> {
    fn drop(&mut self) {
        let writer = self
            .writer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}

impl<W: Write + Send> std::fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_each_write_is_one_line() {
        let buffer = SharedBuffer::default();
        let sink = WriterSink::new(buffer.clone());
        sink.write("first");
        sink.write("second");
        drop(sink);
        let bytes = buffer.0.lock().unwrap().clone();
        assert_eq!(String::from_utf8(bytes).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_file_sink_appends_and_flushes_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.log");

        {
            let sink = FileSink::create(&path).unwrap();
            sink.write("one");
        }
        {
            let sink = FileSink::create(&path).unwrap();
            sink.write("two");
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_file_sink_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSink::create(dir.path().join("missing").join("x.log")).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Io);
    }
}
