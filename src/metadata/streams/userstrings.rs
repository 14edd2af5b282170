use widestring::U16String;

use crate::{
    file::io::{fits, slice_at},
    metadata::streams::BlobEntry,
    Result,
};

/// The `#US` heap: length-prefixed UTF-16LE literals referenced by `ldstr`.
///
/// Entries are walked sequentially from the start of the heap. Each entry is handed out as
/// its raw stored bytes; [`decode_utf16`] turns one into text when needed.
pub struct UserStrings<'a> {
    entries: Vec<&'a [u8]>,
}

impl<'a> UserStrings<'a> {
    /// Walks the heap of `size` bytes at absolute offset `base` inside `data`.
    ///
    /// The walk stops at the first undecodable length prefix. Zero-length entries and
    /// entries whose content does not fit the buffer are skipped.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfRange`] if the declared heap is empty or does not fit,
    /// and [`crate::Error::MalformedHeader`] if its first byte is not `0x00`.
    pub fn parse(data: &'a [u8], base: usize, size: u32) -> Result<UserStrings<'a>> {
        if size == 0 || !fits(data, base, size as usize) {
            return Err(out_of_range_error!(base, size));
        }

        if data[base] != 0 {
            return Err(malformed_error!(
                "#US heap must start with 0x00, found {:#04x}",
                data[base]
            ));
        }

        let end = base + size as usize;
        let mut offset = base + 1;
        let mut entries = Vec::new();

        while offset < end {
            let entry = match BlobEntry::decode(data, offset) {
                Ok(entry) => entry,
                Err(error) => {
                    log::debug!("#US walk stopped at {offset:#x}: {error}");
                    break;
                }
            };
            offset += usize::from(entry.consumed);

            if entry.length == 0 {
                continue;
            }

            if let Some(bytes) = slice_at(data, offset, entry.length as usize) {
                entries.push(bytes);
                offset += bytes.len();
            }
        }

        Ok(UserStrings { entries })
    }

    /// Returns the number of collected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entry was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the raw entries, in heap order.
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.entries.iter().copied()
    }
}

/// Decodes raw UTF-16LE user-string bytes, replacing unpaired surrogates.
///
/// A trailing odd byte is ignored.
#[must_use]
pub fn decode_utf16(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect::<Vec<u16>>();

    U16String::from_vec(units).to_string_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data: [u8; 35] = [
            0xCC, 0xCC,
            0x00,
            0x1b, 0x48, 0x00, 0x65, 0x00, 0x6c, 0x00, 0x6c, 0x00, 0x6f, 0x00, 0x2c, 0x00, 0x20, 0x00, 0x57, 0x00, 0x6f, 0x00, 0x72, 0x00, 0x6c, 0x00, 0x64, 0x00, 0x21, 0x00, 0x00,
            0x03, 0x41, 0x00, 0x00,
        ];

        let heap = UserStrings::parse(&data, 2, 33).unwrap();
        let entries: Vec<&[u8]> = heap.iter().collect();

        assert_eq!(heap.len(), 2);
        assert_eq!(entries[0].len(), 26);
        assert_eq!(decode_utf16(entries[0]), "Hello, World!");
        assert_eq!(entries[1], &[0x41, 0x00]);
        assert_eq!(decode_utf16(entries[1]), "A");
    }

    #[test]
    fn stops_on_invalid_prefix() {
        #[rustfmt::skip]
        let data = [
            0x00,
            0x03, 0x42, 0x00, 0x00,
            0xE0,
            0x03, 0x43, 0x00, 0x00,
        ];

        let heap = UserStrings::parse(&data, 0, data.len() as u32).unwrap();
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn entry_past_heap_end_is_dropped() {
        // second entry claims 0x10 bytes but only 2 remain
        let data = [0x00, 0x03, 0x42, 0x00, 0x00, 0x11, 0x43, 0x00];

        let heap = UserStrings::parse(&data, 0, data.len() as u32).unwrap();
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn invalid() {
        assert!(UserStrings::parse(&[], 0, 0).is_err());
        assert!(UserStrings::parse(&[0x00], 0, 0).is_err());
        assert!(UserStrings::parse(&[0x00, 0x00], 0, 3).is_err());
        assert!(matches!(
            UserStrings::parse(&[0x01, 0x00], 0, 2),
            Err(Error::MalformedHeader { .. })
        ));
        assert!(UserStrings::parse(&[0x00], usize::MAX, 1).is_err());
    }

    #[test]
    fn odd_length_decode() {
        assert_eq!(decode_utf16(&[0x41, 0x00, 0x42]), "A");
        assert_eq!(decode_utf16(&[0x00, 0xD8]), "\u{FFFD}");
    }
}
