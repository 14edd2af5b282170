//! Bounds-checked little-endian reads over untrusted byte buffers.
//!
//! Every structure decoded by this crate originates from a possibly hostile file. All reads
//! go through [`fits`] first, which rejects ranges that overflow or leave the buffer, so that
//! a corrupt offset can only ever produce an error, never an out-of-bounds access.
//!
//! # Key Components
//!
//! - [`fits`] - The bounds oracle; `true` iff `offset..offset + length` lies inside the buffer
//! - [`CilIO`] - Conversion trait for the primitive types read from metadata
//! - [`read_le`] / [`read_le_at`] - Checked little-endian reads, optionally advancing an offset
//! - [`read_le_at_dyn`] - Reads a 2- or 4-byte heap/table index depending on its width
//!
//! # Examples
//!
//! ```rust
//! use dotprobe::file::io::{fits, read_le_at};
//!
//! let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00];
//! let mut offset = 0;
//!
//! assert!(fits(&data, 2, 4));
//! assert!(!fits(&data, 4, usize::MAX));
//! assert_eq!(read_le_at::<u16>(&data, &mut offset)?, 1);
//! assert_eq!(read_le_at::<u32>(&data, &mut offset)?, 2);
//! # Ok::<(), dotprobe::Error>(())
//! ```

use crate::{Error::Truncated, Result};

/// Returns `true` if `length` bytes starting at `offset` lie fully inside `data`.
///
/// The addition is checked, so an `offset + length` that would wrap around is rejected
/// rather than compared after overflow.
#[must_use]
pub fn fits(data: &[u8], offset: usize, length: usize) -> bool {
    offset
        .checked_add(length)
        .is_some_and(|end| end <= data.len())
}

/// Returns the `length` bytes at `offset`, if they lie inside `data`.
#[must_use]
pub fn slice_at(data: &[u8], offset: usize, length: usize) -> Option<&[u8]> {
    let end = offset.checked_add(length)?;
    data.get(offset..end)
}

/// Trait for the primitive integer types that are read from metadata structures.
///
/// Allows the generic readers to stay agnostic of the concrete width while still decoding
/// via the standard library's `from_le_bytes`.
pub trait CilIO: Sized {
    /// Fixed-size byte array representation of the type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decodes a value from little-endian bytes.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

impl CilIO for u64 {
    type Bytes = [u8; 8];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u64::from_le_bytes(bytes)
    }
}

impl CilIO for u32 {
    type Bytes = [u8; 4];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u32::from_le_bytes(bytes)
    }
}

impl CilIO for u16 {
    type Bytes = [u8; 2];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u16::from_le_bytes(bytes)
    }
}

impl CilIO for u8 {
    type Bytes = [u8; 1];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u8::from_le_bytes(bytes)
    }
}

/// Reads a little-endian value from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::Truncated`] if `data` is shorter than `T`.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a little-endian value at `offset` and advances `offset` past it.
///
/// On failure `offset` is left untouched.
///
/// # Errors
/// Returns [`crate::Error::Truncated`] if the value does not fit inside `data`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(bytes) = slice_at(data, *offset, type_len) else {
        return Err(Truncated);
    };

    let Ok(read) = bytes.try_into() else {
        return Err(Truncated);
    };

    *offset += type_len;

    Ok(T::from_le_bytes(read))
}

/// Reads a 4-byte value if `is_large` is set, otherwise a 2-byte value widened to `u32`.
///
/// # Errors
/// Returns [`crate::Error::Truncated`] if the value does not fit inside `data`.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}
