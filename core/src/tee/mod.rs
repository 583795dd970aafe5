//! Stream duplication: splitters over the standard stream bindings, and the
//! session controllers that install and remove them.

mod memory;
mod session;
mod sink;
mod splitter;

pub use memory::MemoryTee;
pub use session::{session_active, Tee, TeeGuard};
