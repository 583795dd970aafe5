use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::sink::{LogSink, SharedSink};
use super::splitter::{warn_file_failure, Splitter};
use crate::config::TeeOptions;
use crate::error::{Result, TeeError};
use crate::stream::{self, destination, SharedDestination, StandardStream};
use crate::util::ansi::{LineTransform, StripAnsi};
use crate::util::lock;

// The sink is shared by both splitters, so a failed drain at stop belongs to
// neither stream.
const FINAL_FLUSH: &str = "final flush";

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Whether any tee session is active in this process.
pub fn session_active() -> bool {
    SESSION_ACTIVE.load(Ordering::Acquire)
}

pub(crate) fn acquire_session() -> Result<()> {
    SESSION_ACTIVE
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .map(|_| ())
        .map_err(|_| TeeError::config("another tee session is already active in this process"))
}

fn release_session() {
    SESSION_ACTIVE.store(false, Ordering::Release);
}

/// Splitters installed over the stream bindings, plus what was there before.
pub(crate) struct Installation {
    sink: SharedSink,
    saved_stdout: SharedDestination,
    saved_stderr: Option<SharedDestination>,
    warn_to: SharedDestination,
}

impl Installation {
    /// Caller must hold the session latch.
    pub(crate) fn install(sink: SharedSink, redirect_stderr: bool) -> Self {
        let saved_stdout = stream::current(StandardStream::Stdout);
        let original_stderr = stream::current(StandardStream::Stderr);

        let saved_stderr = redirect_stderr.then(|| {
            let splitter = Splitter::new(
                StandardStream::Stderr,
                original_stderr.clone(),
                sink.clone(),
                original_stderr.clone(),
            );
            stream::bind(StandardStream::Stderr, destination(splitter));
            original_stderr.clone()
        });

        let splitter = Splitter::new(
            StandardStream::Stdout,
            saved_stdout.clone(),
            sink.clone(),
            original_stderr.clone(),
        );
        stream::bind(StandardStream::Stdout, destination(splitter));

        Self {
            sink,
            saved_stdout,
            saved_stderr,
            warn_to: original_stderr,
        }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        lock(&self.sink).bytes_written()
    }

    /// Restore the captured bindings, drain and close the sink, release the
    /// latch. Returns the bytes logged during the session alongside the
    /// outcome of the final flush.
    pub(crate) fn teardown(self) -> (u64, Result<()>) {
        stream::bind(StandardStream::Stdout, self.saved_stdout);
        if let Some(stderr) = self.saved_stderr {
            stream::bind(StandardStream::Stderr, stderr);
        }

        let (bytes, failure) = {
            let mut sink = lock(&self.sink);
            let result = sink.finish();
            let fresh = sink.observe(&result);
            sink.close();
            (sink.bytes_written(), result.err().map(|e| (e, fresh)))
        };
        release_session();

        let result = match failure {
            None => Ok(()),
            Some((err, fresh)) => {
                if fresh {
                    warn_file_failure(&self.warn_to, FINAL_FLUSH, &err);
                }
                tracing::warn!(target: "teelog.session", error = %err, "final log flush failed");
                Err(TeeError::TransientWrite {
                    stream: FINAL_FLUSH,
                    source: err,
                })
            }
        };
        (bytes, result)
    }
}

/// Duplicates stdout, and optionally stderr, into a log file for the
/// duration of a session.
///
/// ```no_run
/// use teelog_core::{tee_println, Tee, TeeOptions};
///
/// let mut tee = Tee::new(TeeOptions::new("temp/tee.log").redirect_stderr(true))?;
/// tee.start()?;
/// tee_println!("hello");
/// tee.stop()?;
/// # Ok::<(), teelog_core::TeeError>(())
/// ```
///
/// Dropping an active `Tee` stops it, so the console is restored on every
/// exit path including unwinding panics.
pub struct Tee {
    options: TeeOptions,
    transform: Option<Arc<dyn LineTransform>>,
    active: Option<Installation>,
    last_bytes: u64,
}

impl Tee {
    pub fn new(options: TeeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            transform: None,
            active: None,
            last_bytes: 0,
        })
    }

    /// Use a custom file-bound transform instead of ANSI stripping.
    pub fn with_transform(mut self, transform: Arc<dyn LineTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn options(&self) -> &TeeOptions {
        &self.options
    }

    pub fn log_path(&self) -> &Path {
        &self.options.logpath
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Bytes written to the log by the current session, or by the last one.
    pub fn bytes_logged(&self) -> u64 {
        match &self.active {
            Some(installation) => installation.bytes_written(),
            None => self.last_bytes,
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.active.is_some() {
            return Err(TeeError::config(format!(
                "tee session for {} is already active",
                self.options.logpath.display()
            )));
        }
        acquire_session()?;

        let file = match self.open_log_file() {
            Ok(f) => f,
            Err(e) => {
                release_session();
                tracing::error!(target: "teelog.session", error = %e, "tee session not started");
                return Err(e);
            }
        };

        let sink = LogSink::new(
            Box::new(BufWriter::new(file)),
            self.file_transform(),
            self.options.immediately_flush,
        )
        .shared();
        self.active = Some(Installation::install(sink, self.options.redirect_stderr));

        tracing::info!(
            target: "teelog.session",
            path = %self.options.logpath.display(),
            append = self.options.append_mode,
            redirect_stderr = self.options.redirect_stderr,
            "tee session started"
        );
        Ok(())
    }

    /// Restore the original streams and close the log file. A no-op when the
    /// session is not active. Streams are restored even when the final flush
    /// fails; that failure is returned as [`TeeError::TransientWrite`].
    pub fn stop(&mut self) -> Result<()> {
        let Some(installation) = self.active.take() else {
            return Ok(());
        };
        let (bytes, result) = installation.teardown();
        self.last_bytes = bytes;
        tracing::debug!(target: "teelog.session", bytes, "tee session stopped");
        result
    }

    /// Start a session that ends when the returned guard is dropped.
    pub fn guard(&mut self) -> Result<TeeGuard<'_>> {
        self.start()?;
        Ok(TeeGuard { tee: self })
    }

    fn open_log_file(&self) -> Result<File> {
        let mut opts = OpenOptions::new();
        opts.create(true);
        if self.options.append_mode {
            opts.append(true);
        } else {
            opts.write(true).truncate(true);
        }
        opts.open(&self.options.logpath)
            .map_err(|e| TeeError::file_access(&self.options.logpath, e))
    }

    fn file_transform(&self) -> Option<Arc<dyn LineTransform>> {
        self.transform.clone().or_else(|| {
            self.options
                .strip_formatting_for_file
                .then(|| Arc::new(StripAnsi) as Arc<dyn LineTransform>)
        })
    }
}

impl Drop for Tee {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

impl std::fmt::Debug for Tee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tee")
            .field("options", &self.options)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Scope guard for an active [`Tee`] session.
pub struct TeeGuard<'a> {
    tee: &'a mut Tee,
}

impl TeeGuard<'_> {
    pub fn tee(&self) -> &Tee {
        self.tee
    }

    /// Stop now and report the result instead of discarding it on drop.
    pub fn finish(self) -> Result<()> {
        self.tee.stop()
    }
}

impl Drop for TeeGuard<'_> {
    fn drop(&mut self) {
        let _ = self.tee.stop();
    }
}
