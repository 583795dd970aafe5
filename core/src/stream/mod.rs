//! Process-wide standard stream bindings.
//!
//! `println!` cannot be redirected from inside a Rust process, so output that
//! should be observable by a tee goes through these bindings instead: the
//! `tee_print!` family, or any [`StreamHandle`] from [`stdout()`] and
//! [`stderr()`]. Initially the bindings point at the real process streams.

mod binding;
mod types;

pub use binding::{_print, bind, current, is_bound_to, stderr, stdout, StreamHandle};
pub use types::{destination, SharedDestination, StandardStream};
pub use crate::util::SharedBuffer;
