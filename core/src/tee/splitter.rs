use std::io::{self, Write};

use super::sink::SharedSink;
use crate::stream::{SharedDestination, StandardStream};
use crate::util::lock;

/// Forwards every write to the original stream binding and mirrors the bytes
/// the original accepted into the session's log sink.
///
/// The console side is authoritative: its errors propagate unchanged, while a
/// failing log sink only produces a warning on the original stderr.
pub(crate) struct Splitter {
    stream: StandardStream,
    original: SharedDestination,
    sink: SharedSink,
    warn_to: SharedDestination,
}

impl Splitter {
    pub(crate) fn new(
        stream: StandardStream,
        original: SharedDestination,
        sink: SharedSink,
        warn_to: SharedDestination,
    ) -> Self {
        Self {
            stream,
            original,
            sink,
            warn_to,
        }
    }

    fn mirror(&self, buf: &[u8]) {
        let failure = {
            let mut sink = lock(&self.sink);
            let result = sink.write_all(buf);
            let fresh = sink.observe(&result);
            result.err().filter(|_| fresh)
        };
        if let Some(err) = failure {
            warn_file_failure(&self.warn_to, self.stream.label(), &err);
        }
    }
}

impl Write for Splitter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = lock(&self.original).write(buf)?;
        self.mirror(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(&self.original).flush()?;
        let failure = {
            let mut sink = lock(&self.sink);
            let result = sink.flush();
            let fresh = sink.observe(&result);
            result.err().filter(|_| fresh)
        };
        if let Some(err) = failure {
            warn_file_failure(&self.warn_to, self.stream.label(), &err);
        }
        Ok(())
    }
}

/// Written straight to the captured original stderr, never through a splitter.
pub(crate) fn warn_file_failure(warn_to: &SharedDestination, origin: &str, err: &io::Error) {
    let mut w = lock(warn_to);
    let _ = writeln!(w, "teelog: log file write failed ({origin}): {err}");
    let _ = w.flush();
}
