//! Memory-mapped file backend.
//!
//! [`Physical`] maps the target assembly read-only. The mapping is never written through;
//! publicised output is produced from a private copy of the bytes.

use super::Backend;
use crate::{Error::Empty, Result};

use memmap2::Mmap;
use std::{fs, path::Path};

/// Backend exposing a file on disk through a read-only memory map.
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    /// Open and map the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped and
    /// [`crate::Error::Empty`] for zero-length files, which cannot be mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Err(Empty);
        }

        // The target must not be modified by another process while it is loaded
        let mmap = unsafe { Mmap::map(&file) }?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error::FileError;

    #[test]
    fn mapped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Foo.dll");
        std::fs::write(&path, [0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00]).unwrap();

        let physical = Physical::new(&path).unwrap();

        assert_eq!(physical.len(), 6);
        assert_eq!(&physical.data()[..2], b"MZ");
        assert_eq!(physical.data_slice(2, 3).unwrap(), &[0x90, 0x00, 0x03]);
        assert!(physical.data_slice(4, 3).is_err());
    }

    #[test]
    fn missing_file() {
        match Physical::new("/nonexistent/Foo.dll") {
            Err(FileError(io_error)) => {
                assert_eq!(io_error.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected FileError"),
        }
    }

    #[test]
    fn empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Foo.dll");
        std::fs::write(&path, b"").unwrap();

        assert!(matches!(Physical::new(&path), Err(Empty)));
    }
}
