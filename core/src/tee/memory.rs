use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use super::session::{acquire_session, Installation};
use super::sink::LogSink;
use crate::error::{Result, TeeError};
use crate::util::ansi::{LineTransform, StripAnsi};
use crate::util::SharedBuffer;

/// Tee into RAM instead of a file; write the capture out later with
/// [`MemoryTee::persist`]. Useful when the log name depends on the run's
/// results, or to spare flash storage from frequent writes.
pub struct MemoryTee {
    redirect_stderr: bool,
    strip_formatting: bool,
    buffer: SharedBuffer,
    active: Option<Installation>,
}

impl MemoryTee {
    pub fn new(redirect_stderr: bool) -> Self {
        Self {
            redirect_stderr,
            strip_formatting: false,
            buffer: SharedBuffer::new(),
            active: None,
        }
    }

    pub fn strip_formatting(mut self, yes: bool) -> Self {
        self.strip_formatting = yes;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Each start begins with an empty buffer.
    pub fn start(&mut self) -> Result<()> {
        if self.active.is_some() {
            return Err(TeeError::config("memory tee session is already active"));
        }
        acquire_session()?;

        self.buffer.clear();
        let transform = self
            .strip_formatting
            .then(|| Arc::new(StripAnsi) as Arc<dyn LineTransform>);
        let sink = LogSink::new(Box::new(self.buffer.clone()), transform, false).shared();
        self.active = Some(Installation::install(sink, self.redirect_stderr));
        tracing::info!(
            target: "teelog.session",
            redirect_stderr = self.redirect_stderr,
            "memory tee session started"
        );
        Ok(())
    }

    /// The buffer outlives the session; read it after stopping.
    pub fn stop(&mut self) -> Result<()> {
        let Some(installation) = self.active.take() else {
            return Ok(());
        };
        let (bytes, result) = installation.teardown();
        tracing::debug!(target: "teelog.session", bytes, "memory tee session stopped");
        result
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buffer.contents()
    }

    pub fn contents_lossy(&self) -> String {
        self.buffer.contents_lossy()
    }

    /// Write the captured bytes to `path`. Returns the number of bytes written.
    pub fn persist(&self, path: impl AsRef<Path>, append: bool) -> Result<u64> {
        let path = path.as_ref();
        let mut opts = OpenOptions::new();
        opts.create(true);
        if append {
            opts.append(true);
        } else {
            opts.write(true).truncate(true);
        }

        let bytes = self.buffer.contents();
        let mut file = opts.open(path).map_err(|e| TeeError::file_access(path, e))?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .map_err(|e| TeeError::file_access(path, e))?;

        tracing::debug!(
            target: "teelog.session",
            path = %path.display(),
            bytes = bytes.len(),
            "memory tee persisted"
        );
        Ok(bytes.len() as u64)
    }
}

impl Drop for MemoryTee {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
