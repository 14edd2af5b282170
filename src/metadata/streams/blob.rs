//! Compressed length prefixes and the `#Blob` heap.
//!
//! Blob and user-string entries are framed by an ECMA-335 II.24.2.4 compressed length:
//!
//! | First byte  | Encoded length                                   | Prefix size |
//! |-------------|--------------------------------------------------|-------------|
//! | `0xxxxxxx`  | `b0`                                             | 1           |
//! | `10xxxxxx`  | `(b0 & 0x3F) << 8 \| b1`                          | 2           |
//! | `110xxxxx`  | `(b0 & 0x1F) << 24 \| b1 << 16 \| b2 << 8 \| b3` | 4           |
//!
//! Any other first byte is rejected. A nonzero length is decremented by one: the heaps carry
//! a terminal byte after each entry which is not part of the value.

use crate::{
    file::io::{read_le_at, slice_at},
    Error::InvalidPrefix,
    Result,
};

/// A decoded compressed length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobEntry {
    /// Content length, already reduced by the terminal byte
    pub length: u32,
    /// Number of bytes taken by the prefix itself
    pub consumed: u8,
}

impl BlobEntry {
    /// Decodes the length prefix at `offset` inside `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the prefix runs past the buffer, and
    /// [`crate::Error::InvalidPrefix`] if the first byte is not a known encoding.
    pub fn decode(data: &[u8], offset: usize) -> Result<BlobEntry> {
        let mut position = offset;
        let first_byte = read_le_at::<u8>(data, &mut position)?;

        let (raw, consumed) = if first_byte & 0x80 == 0 {
            (u32::from(first_byte), 1)
        } else if first_byte & 0xC0 == 0x80 {
            let second_byte = read_le_at::<u8>(data, &mut position)?;
            (
                ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte),
                2,
            )
        } else if first_byte & 0xE0 == 0xC0 {
            let b1 = u32::from(read_le_at::<u8>(data, &mut position)?);
            let b2 = u32::from(read_le_at::<u8>(data, &mut position)?);
            let b3 = u32::from(read_le_at::<u8>(data, &mut position)?);
            (
                ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3,
                4,
            )
        } else {
            return Err(InvalidPrefix(first_byte));
        };

        Ok(BlobEntry {
            length: raw.saturating_sub(1),
            consumed,
        })
    }
}

/// The `#Blob` heap, addressed by byte index from its base.
///
/// Entries are looked up inside the whole image buffer rather than a slice cut to the
/// declared stream size, since entries are only required to lie inside the image.
#[derive(Debug, Clone, Copy)]
pub struct Blob<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> Blob<'a> {
    /// Creates a view of the heap starting at absolute offset `base` inside `data`.
    #[must_use]
    pub fn new(data: &'a [u8], base: usize) -> Blob<'a> {
        Blob { data, base }
    }

    /// Returns the content of the entry at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if the entry does not fit the buffer, or any
    /// error of [`BlobEntry::decode`].
    pub fn get(&self, index: u32) -> Result<&'a [u8]> {
        let (start, length) = self.locate(index)?;
        Ok(&self.data[start..start + length])
    }

    /// Returns the absolute offset and length of the content of the entry at `index`.
    ///
    /// # Errors
    /// Same as [`Blob::get`].
    pub fn locate(&self, index: u32) -> Result<(usize, usize)> {
        let Some(offset) = self.base.checked_add(index as usize) else {
            return Err(out_of_range_error!(self.base, index));
        };

        let entry = BlobEntry::decode(self.data, offset)?;
        let start = offset + usize::from(entry.consumed);

        match slice_at(self.data, start, entry.length as usize) {
            Some(content) => Ok((start, content.len())),
            None => Err(out_of_range_error!(start, entry.length)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn decode_table() {
        assert_eq!(
            BlobEntry::decode(&[0x04], 0).unwrap(),
            BlobEntry { length: 3, consumed: 1 }
        );
        assert_eq!(
            BlobEntry::decode(&[0x80, 0x05], 0).unwrap(),
            BlobEntry { length: 4, consumed: 2 }
        );
        assert_eq!(
            BlobEntry::decode(&[0xC0, 0x00, 0x00, 0x05], 0).unwrap(),
            BlobEntry { length: 4, consumed: 4 }
        );
        assert!(matches!(
            BlobEntry::decode(&[0xE0], 0),
            Err(Error::InvalidPrefix(0xE0))
        ));
    }

    #[test]
    fn decode_edges() {
        // zero length is not decremented
        assert_eq!(
            BlobEntry::decode(&[0x00], 0).unwrap(),
            BlobEntry { length: 0, consumed: 1 }
        );
        assert_eq!(
            BlobEntry::decode(&[0x01], 0).unwrap(),
            BlobEntry { length: 0, consumed: 1 }
        );
        assert_eq!(
            BlobEntry::decode(&[0xBF, 0xFF], 0).unwrap(),
            BlobEntry { length: 0x3FFE, consumed: 2 }
        );
        assert_eq!(
            BlobEntry::decode(&[0xDF, 0xFF, 0xFF, 0xFF], 0).unwrap(),
            BlobEntry { length: 0x1FFF_FFFE, consumed: 4 }
        );
        assert!(matches!(
            BlobEntry::decode(&[0xFF, 0x00, 0x00, 0x00], 0),
            Err(Error::InvalidPrefix(0xFF))
        ));
    }

    #[test]
    fn decode_truncated() {
        assert!(matches!(BlobEntry::decode(&[], 0), Err(Error::Truncated)));
        assert!(matches!(BlobEntry::decode(&[0x04], 1), Err(Error::Truncated)));
        assert!(matches!(BlobEntry::decode(&[0x80], 0), Err(Error::Truncated)));
        assert!(matches!(
            BlobEntry::decode(&[0xC0, 0x00, 0x00], 0),
            Err(Error::Truncated)
        ));
        assert!(matches!(
            BlobEntry::decode(&[0x04], usize::MAX),
            Err(Error::Truncated)
        ));
    }

    #[test]
    fn heap_lookup() {
        #[rustfmt::skip]
        let data = [
            /* unrelated    */ 0xCC, 0xCC,
            /* 0 - empty    */ 0x00,
            /* 1 - len 3    */ 0x04, 0xAA, 0xBB, 0xCC, 0x00,
            /* 6 - len 1    */ 0x02, 0x11, 0x00,
            /* 9 - too long */ 0x10, 0x01,
        ];

        let blob = Blob::new(&data, 2);

        assert_eq!(blob.get(0).unwrap(), &[] as &[u8]);
        assert_eq!(blob.get(1).unwrap(), &[0xAA, 0xBB, 0xCC]);
        assert_eq!(blob.get(6).unwrap(), &[0x11]);
        assert_eq!(blob.locate(1).unwrap(), (4, 3));
        assert!(matches!(blob.get(9), Err(Error::OutOfRange { .. })));
        assert!(blob.get(100).is_err());
        assert!(Blob::new(&data, usize::MAX).get(u32::MAX).is_err());
    }
}
