use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::util::ansi::LineTransform;

pub(crate) type SharedSink = Arc<Mutex<LogSink>>;

/// The log destination shared by the stdout and stderr splitters of one
/// session. Only the session controller opens and closes it.
pub(crate) struct LogSink {
    writer: Option<Box<dyn Write + Send>>,
    transform: Option<Arc<dyn LineTransform>>,
    // Bytes after the last newline, held back while a transform is active.
    pending: Vec<u8>,
    immediately_flush: bool,
    degraded: bool,
    bytes_written: u64,
}

impl LogSink {
    pub(crate) fn new(
        writer: Box<dyn Write + Send>,
        transform: Option<Arc<dyn LineTransform>>,
        immediately_flush: bool,
    ) -> Self {
        Self {
            writer: Some(writer),
            transform,
            pending: Vec::new(),
            immediately_flush,
            degraded: false,
            bytes_written: 0,
        }
    }

    pub(crate) fn shared(self) -> SharedSink {
        Arc::new(Mutex::new(self))
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub(crate) fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let Some(transform) = self.transform.clone() else {
            self.emit(buf)?;
            return self.maybe_flush();
        };

        let Some(last_nl) = buf.iter().rposition(|&b| b == b'\n') else {
            self.pending.extend_from_slice(buf);
            return Ok(());
        };
        let mut lines = std::mem::take(&mut self.pending);
        lines.extend_from_slice(&buf[..=last_nl]);
        self.pending.extend_from_slice(&buf[last_nl + 1..]);

        for line in lines.split_inclusive(|&b| b == b'\n') {
            let out = transform.transform(line);
            self.emit(&out)?;
        }
        self.maybe_flush()
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }

    /// Push out a held-back partial line and flush.
    pub(crate) fn finish(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            match self.transform.clone() {
                Some(t) => self.emit(&t.transform(&rest))?,
                None => self.emit(&rest)?,
            }
        }
        self.flush()
    }

    /// Drop the writer. Later writes from a straggling splitter go nowhere.
    pub(crate) fn close(&mut self) {
        self.writer = None;
        self.pending.clear();
    }

    /// Track sink health. True when `result` is the first failure since the
    /// sink was last healthy, which is the one failure worth reporting.
    pub(crate) fn observe(&mut self, result: &io::Result<()>) -> bool {
        match result {
            Ok(()) => {
                self.degraded = false;
                false
            }
            Err(_) => !std::mem::replace(&mut self.degraded, true),
        }
    }

    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        let Some(w) = self.writer.as_mut() else {
            return Ok(());
        };
        w.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    fn maybe_flush(&mut self) -> io::Result<()> {
        if self.immediately_flush {
            self.flush()
        } else {
            Ok(())
        }
    }
}
