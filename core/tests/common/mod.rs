#![allow(dead_code)]

use teelog_core::stream::{self, destination, SharedDestination};
use teelog_core::{SharedBuffer, StandardStream};

/// Rebinds both standard streams to in-memory buffers so tests can read what
/// "the console" received. Restores the previous bindings on drop.
pub struct Console {
    pub out: SharedBuffer,
    pub err: SharedBuffer,
    out_dest: SharedDestination,
    err_dest: SharedDestination,
    prev: Option<(SharedDestination, SharedDestination)>,
}

impl Console {
    pub fn capture() -> Self {
        init_tracing();
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let out_dest = destination(out.clone());
        let err_dest = destination(err.clone());
        let prev_out = stream::bind(StandardStream::Stdout, out_dest.clone());
        let prev_err = stream::bind(StandardStream::Stderr, err_dest.clone());
        Self {
            out,
            err,
            out_dest,
            err_dest,
            prev: Some((prev_out, prev_err)),
        }
    }

    /// True when both bindings point back at this console's buffers.
    pub fn is_bound(&self) -> bool {
        stream::is_bound_to(StandardStream::Stdout, &self.out_dest)
            && stream::is_bound_to(StandardStream::Stderr, &self.err_dest)
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        if let Some((out, err)) = self.prev.take() {
            stream::bind(StandardStream::Stdout, out);
            stream::bind(StandardStream::Stderr, err);
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("teelog=debug")
        .with_test_writer()
        .try_init();
}

pub fn read(path: &std::path::Path) -> Vec<u8> {
    std::fs::read(path).unwrap_or_default()
}
