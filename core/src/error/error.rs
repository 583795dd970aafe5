use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeeError {
    #[error("config error: {0}")]
    Configuration(String),
    #[error("cannot open log file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("log file write failed ({stream}): {source}")]
    TransientWrite {
        stream: &'static str,
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TeeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TeeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_access_message_names_the_path() {
        let err = TeeError::file_access(
            "/nope/tee.log",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "cannot open log file /nope/tee.log: missing");
    }

    #[test]
    fn transient_write_names_the_failing_side() {
        let err = TeeError::TransientWrite {
            stream: "stdout",
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(err.to_string(), "log file write failed (stdout): disk full");
    }
}
