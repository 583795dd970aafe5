use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TeeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeeOptions {
    /// Log file. Its parent directory must already exist.
    pub logpath: PathBuf,

    /// If true, stderr is duplicated into the same file.
    #[serde(default)]
    pub redirect_stderr: bool,

    /// Append to an existing file instead of truncating it.
    #[serde(default = "default_append_mode")]
    pub append_mode: bool,

    /// Strip ANSI escape codes from the file copy; the console keeps them.
    #[serde(default)]
    pub strip_formatting_for_file: bool,

    /// Flush the file after every write instead of relying on buffering.
    #[serde(default)]
    pub immediately_flush: bool,
}

fn default_append_mode() -> bool {
    true
}

impl TeeOptions {
    pub fn new(logpath: impl Into<PathBuf>) -> Self {
        Self {
            logpath: logpath.into(),
            redirect_stderr: false,
            append_mode: default_append_mode(),
            strip_formatting_for_file: false,
            immediately_flush: false,
        }
    }

    pub fn redirect_stderr(mut self, yes: bool) -> Self {
        self.redirect_stderr = yes;
        self
    }

    pub fn append_mode(mut self, yes: bool) -> Self {
        self.append_mode = yes;
        self
    }

    pub fn strip_formatting_for_file(mut self, yes: bool) -> Self {
        self.strip_formatting_for_file = yes;
        self
    }

    pub fn immediately_flush(mut self, yes: bool) -> Self {
        self.immediately_flush = yes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.logpath.as_os_str().is_empty() {
            return Err(TeeError::config("logpath must not be empty"));
        }
        Ok(())
    }
}
