use std::io::Write;
use std::sync::{Arc, Mutex};

/// Any writer that can stand in for a standard stream.
pub type SharedDestination = Arc<Mutex<dyn Write + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardStream {
    Stdout,
    Stderr,
}

impl StandardStream {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

pub fn destination<W>(writer: W) -> SharedDestination
where
    W: Write + Send + 'static,
{
    Arc::new(Mutex::new(writer))
}
