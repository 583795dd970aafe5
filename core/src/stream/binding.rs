use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;

use super::types::{destination, SharedDestination, StandardStream};
use crate::util::lock;

lazy_static! {
    static ref STDOUT_BINDING: RwLock<SharedDestination> = RwLock::new(destination(io::stdout()));
    static ref STDERR_BINDING: RwLock<SharedDestination> = RwLock::new(destination(io::stderr()));
}

fn slot(stream: StandardStream) -> &'static RwLock<SharedDestination> {
    match stream {
        StandardStream::Stdout => &STDOUT_BINDING,
        StandardStream::Stderr => &STDERR_BINDING,
    }
}

/// The destination `stream` currently writes to.
pub fn current(stream: StandardStream) -> SharedDestination {
    slot(stream)
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Rebind `stream` to `dest`, returning the previous binding.
pub fn bind(stream: StandardStream, dest: SharedDestination) -> SharedDestination {
    let mut g = slot(stream).write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *g, dest)
}

pub fn is_bound_to(stream: StandardStream, dest: &SharedDestination) -> bool {
    Arc::ptr_eq(&current(stream), dest)
}

/// Writer that resolves the binding on every call, so a handle taken before a
/// session starts still reaches the splitter.
#[derive(Debug, Clone, Copy)]
pub struct StreamHandle {
    stream: StandardStream,
}

pub fn stdout() -> StreamHandle {
    StreamHandle {
        stream: StandardStream::Stdout,
    }
}

pub fn stderr() -> StreamHandle {
    StreamHandle {
        stream: StandardStream::Stderr,
    }
}

impl Write for StreamHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let dest = current(self.stream);
        let mut g = lock(&dest);
        g.write(buf)
    }

    // One lock for the whole buffer keeps a print from interleaving with
    // another thread's print.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let dest = current(self.stream);
        let mut g = lock(&dest);
        g.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let dest = current(self.stream);
        let mut g = lock(&dest);
        g.flush()
    }
}

#[doc(hidden)]
pub fn _print(stream: StandardStream, args: fmt::Arguments<'_>) {
    let text = match args.as_str() {
        Some(s) => std::borrow::Cow::Borrowed(s),
        None => std::borrow::Cow::Owned(args.to_string()),
    };
    let mut handle = StreamHandle { stream };
    // Same contract as a console print: output errors are not reported.
    let _ = handle.write_all(text.as_bytes());
}

/// Print to the bound stdout destination.
#[macro_export]
macro_rules! tee_print {
    ($($arg:tt)*) => {
        $crate::stream::_print($crate::stream::StandardStream::Stdout, format_args!($($arg)*))
    };
}

/// Print a line to the bound stdout destination.
#[macro_export]
macro_rules! tee_println {
    () => {
        $crate::tee_print!("\n")
    };
    ($($arg:tt)*) => {
        $crate::stream::_print(
            $crate::stream::StandardStream::Stdout,
            format_args!("{}\n", format_args!($($arg)*)),
        )
    };
}

/// Print to the bound stderr destination.
#[macro_export]
macro_rules! tee_eprint {
    ($($arg:tt)*) => {
        $crate::stream::_print($crate::stream::StandardStream::Stderr, format_args!($($arg)*))
    };
}

/// Print a line to the bound stderr destination.
#[macro_export]
macro_rules! tee_eprintln {
    () => {
        $crate::tee_eprint!("\n")
    };
    ($($arg:tt)*) => {
        $crate::stream::_print(
            $crate::stream::StandardStream::Stderr,
            format_args!("{}\n", format_args!($($arg)*)),
        )
    };
}
