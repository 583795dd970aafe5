//! Duplicate a process's stdout, and optionally stderr, onto the console and
//! a log file at the same time, like `tee` for the process's own output.
//!
//! Output is observable when it goes through the crate's stream bindings:
//! the [`tee_println!`] family of macros or [`stream::stdout()`] /
//! [`stream::stderr()`] handles.

pub mod config;
pub mod error;
pub mod stream;
pub mod tee;
pub mod util;

pub use config::TeeOptions;
pub use error::{Result, TeeError};
pub use stream::{SharedBuffer, StandardStream};
pub use tee::{session_active, MemoryTee, Tee, TeeGuard};
pub use util::ansi::{strip_ansi, LineTransform, StripAnsi};
