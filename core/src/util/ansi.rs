//! File-bound text transforms.
//!
//! Color helpers hand the tee finished strings with embedded escape codes.
//! Terminals need those codes, log files usually do not, so a
//! [`LineTransform`] can rewrite the copy headed for the file while the
//! console copy stays untouched.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::bytes::Regex;

/// Rewrites the log file copy one line per call. `line` ends with its newline,
/// except for a trailing partial line handed over once when the session stops.
pub trait LineTransform: Send + Sync {
    fn transform<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]>;
}

lazy_static! {
    // CSI (colors, cursor moves), OSC (titles, hyperlinks) and two byte escapes.
    static ref ANSI_ESCAPE: Regex = Regex::new(
        r"(?-u)\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]"
    )
    .expect("ANSI escape pattern is valid");
}

/// Removes ANSI escape sequences, leaving the plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripAnsi;

impl LineTransform for StripAnsi {
    fn transform<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]> {
        strip_ansi(line)
    }
}

pub fn strip_ansi(input: &[u8]) -> Cow<'_, [u8]> {
    if !input.contains(&0x1b) {
        return Cow::Borrowed(input);
    }
    ANSI_ESCAPE.replace_all(input, &b""[..])
}
