//! Checked cursor over an untrusted byte buffer.
//!
//! Table rows, stream headers and the fixed-size headers are all walked with a [`Parser`].
//! It carries the buffer and a position, and moves only through operations that validate
//! the range they touch first. A failed read leaves the position where it was. Heap lookups,
//! which read one entry at a known offset, use the helpers in `file::io` directly.
//!
//! # Examples
//!
//! ```rust
//! use dotprobe::Parser;
//!
//! let data = [0x2A, 0x00, 0x01, 0x00, 0x00, 0x00, b'h', b'i'];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_le::<u16>()?, 0x2A);
//! assert_eq!(parser.read_index(true)?, 1);
//! assert_eq!(parser.read_bytes(2)?, b"hi");
//! assert!(parser.read_le::<u8>().is_err());
//! # Ok::<(), dotprobe::Error>(())
//! ```

use crate::{
    file::io::{fits, read_le_at, read_le_at_dyn, slice_at, CilIO},
    Result,
};

/// A bounds-checked cursor over a byte slice.
///
/// Positions are absolute indices into the wrapped slice. Seeking to the very end of the
/// buffer is allowed (nothing can be read from there), seeking past it is not.
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Creates a new parser positioned at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `offset` lies beyond the end of `data`.
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self> {
        let mut parser = Parser::new(data);
        parser.seek(offset)?;
        Ok(parser)
    }

    /// Returns `true` if `length` more bytes can be read from the current position.
    #[must_use]
    pub fn has(&self, length: usize) -> bool {
        fits(self.data, self.position, length)
    }

    /// Moves the cursor to an absolute position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if `pos` lies beyond the end of the buffer.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(out_of_range_error!(pos, 0));
        }

        self.position = pos;
        Ok(())
    }

    /// Moves the cursor forward by `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if the move would leave the buffer.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if !fits(self.data, self.position, step) {
            return Err(out_of_range_error!(self.position, step));
        }

        self.position += step;
        Ok(())
    }

    /// Returns the current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Reads a little-endian value and advances past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the value does not fit.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Reads a 2- or 4-byte heap or table index.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the index does not fit.
    pub fn read_index(&mut self, is_large: bool) -> Result<u32> {
        read_le_at_dyn(self.data, &mut self.position, is_large)
    }

    /// Takes the next `length` bytes and advances past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let Some(bytes) = slice_at(self.data, self.position, length) else {
            return Err(out_of_range_error!(self.position, length));
        };

        self.position += length;
        Ok(bytes)
    }

    /// Runs `f` and rewinds the cursor if it fails.
    ///
    /// # Errors
    /// Returns whatever error `f` returned.
    pub fn transactional<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let saved_position = self.position;
        let result = f(self);
        if result.is_err() {
            self.position = saved_position;
        }
        result
    }
}
