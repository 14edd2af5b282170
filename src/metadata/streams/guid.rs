use crate::file::io::slice_at;

/// The `#GUID` heap: a packed array of 16-byte GUIDs.
///
/// Only the first `max_entries` records are considered, independent of the declared stream
/// size. The walk ends early at the first record that would not fit the buffer.
pub struct Guid<'a> {
    data: &'a [u8],
    base: usize,
    size: usize,
}

impl<'a> Guid<'a> {
    /// Creates a view of the heap of `size` bytes at absolute offset `base`, capped to
    /// `max_entries` records.
    #[must_use]
    pub fn new(data: &'a [u8], base: usize, size: u32, max_entries: usize) -> Guid<'a> {
        Guid {
            data,
            base,
            size: (size as usize).min(max_entries.saturating_mul(16)),
        }
    }

    /// Returns the GUID at the 1-based `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<uguid::Guid> {
        let start = index.checked_sub(1)?.checked_mul(16)?;
        if start.checked_add(16)? > self.size {
            return None;
        }

        let bytes = slice_at(self.data, self.base.checked_add(start)?, 16)?;
        let mut buffer = [0u8; 16];
        buffer.copy_from_slice(bytes);

        Some(uguid::Guid::from_bytes(buffer))
    }

    /// Returns an iterator over the heap records, in order.
    pub fn iter(&self) -> impl Iterator<Item = uguid::Guid> + '_ {
        (1..).map_while(|index| self.get(index))
    }
}

/// Formats a GUID in its canonical lowercase form, e.g. `d437908e-65e6-487c-9735-7bdff699bea5`.
#[must_use]
pub fn format_guid(guid: &uguid::Guid) -> String {
    guid.to_string().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data : [u8; 50] = [
            /* unrelated */ 0xCC, 0xCC,
            /* 1 - 0;16  */ 0x8e, 0x90, 0x37, 0xd4, 0xe6, 0x65, 0x7c, 0x48, 0x97, 0x35, 0x7b, 0xdf, 0xf6, 0x99, 0xbe, 0xa5,
            /* 2 - 16;32 */ 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
            /* 3 - 32;48 */ 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let guids = Guid::new(&data, 2, 48, 16);

        assert_eq!(
            guids.get(1).unwrap(),
            uguid::guid!("d437908e-65e6-487c-9735-7bdff699bea5")
        );
        assert_eq!(
            format_guid(&guids.get(2).unwrap()),
            "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa"
        );
        assert_eq!(
            format_guid(&guids.get(3).unwrap()),
            "00000000-0000-0000-0000-000000000000"
        );
        assert!(guids.get(0).is_none());
        assert!(guids.get(4).is_none());
        assert_eq!(guids.iter().count(), 3);
    }

    #[test]
    fn record_cap() {
        let data = vec![0x11u8; 16 * 20];

        let guids = Guid::new(&data, 0, 16 * 20, 16);
        assert_eq!(guids.iter().count(), 16);

        let guids = Guid::new(&data, 0, 16 * 20, 2);
        assert_eq!(guids.iter().count(), 2);
    }

    #[test]
    fn stops_at_buffer_end() {
        let data = vec![0x22u8; 40];

        // declared 48 bytes, 2 whole records present
        let guids = Guid::new(&data, 0, 48, 16);
        assert_eq!(guids.iter().count(), 2);

        // partial trailing record in the declared size is ignored
        let guids = Guid::new(&data, 0, 20, 16);
        assert_eq!(guids.iter().count(), 1);
    }
}
