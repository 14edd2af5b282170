//! Memory-mapped file backend for [`crate::File`].
//!
//! Scanned samples can be large, and only a handful of metadata ranges are ever touched.
//! Mapping the file lets the OS page in just those ranges.

use super::Backend;
use crate::Result;

use memmap2::Mmap;
use std::{fs, path::Path};

/// A read-only memory mapping of a file on disk.
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    /// Opens and maps the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Io`] if the file cannot be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path)?;

        // The mapping is read-only. Truncating the file underneath a live mapping is the
        // caller's responsibility, as with any mmap consumer.
        let mmap = unsafe { Mmap::map(&file) }?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn physical() {
        let path = std::env::temp_dir().join(format!(
            "dotprobe-physical-{}.bin",
            std::process::id()
        ));
        {
            let mut file = fs::File::create(&path).unwrap();
            file.write_all(b"MZ\x90\x00dotprobe").unwrap();
        }

        let physical = Physical::new(&path).unwrap();
        assert_eq!(physical.len(), 12);
        assert_eq!(&physical.data()[..2], b"MZ");

        drop(physical);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn physical_missing() {
        let result = Physical::new(std::env::temp_dir().join("dotprobe-does-not-exist.bin"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
