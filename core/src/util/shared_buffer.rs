use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::lock;

/// Cloneable in-memory writer. Every clone appends to the same bytes.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        lock(&self.inner).clone()
    }

    pub fn contents_lossy(&self) -> String {
        String::from_utf8_lossy(&lock(&self.inner)).into_owned()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.inner).clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let buf = SharedBuffer::new();
        let mut other = buf.clone();
        other.write_all(b"abc").unwrap();
        other.write_all("é\n".as_bytes()).unwrap();
        assert_eq!(buf.contents(), "abcé\n".as_bytes());
        assert_eq!(buf.contents_lossy(), "abcé\n");

        buf.clear();
        assert!(other.is_empty());
    }
}
