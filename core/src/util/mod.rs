pub mod ansi;

mod shared_buffer;
pub use shared_buffer::SharedBuffer;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock that survives a panic in another writer; console output must keep flowing.
pub(crate) fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
