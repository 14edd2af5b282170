/// The `#Strings` heap: NUL-terminated identifiers addressed by byte index.
///
/// A lookup yields `None` instead of an error when no terminator is found, since many
/// string columns are optional and a dangling index is routine in damaged samples. The
/// scan for the terminator is bounded by `max_len`.
#[derive(Debug, Clone, Copy)]
pub struct Strings<'a> {
    data: &'a [u8],
    base: usize,
    max_len: usize,
}

impl<'a> Strings<'a> {
    /// Creates a view of the heap starting at absolute offset `base` inside `data`.
    #[must_use]
    pub fn new(data: &'a [u8], base: usize, max_len: usize) -> Strings<'a> {
        Strings {
            data,
            base,
            max_len,
        }
    }

    /// Returns the raw bytes of the string at `index`, without its terminator.
    #[must_use]
    pub fn get_bytes(&self, index: u32) -> Option<&'a [u8]> {
        let start = self.base.checked_add(index as usize)?;
        let remaining = self.data.get(start..)?;
        let window = &remaining[..remaining.len().min(self.max_len.saturating_add(1))];

        let end = window.iter().position(|&byte| byte == 0)?;
        Some(&window[..end])
    }

    /// Returns the string at `index`, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<String> {
        self.get_bytes(index).map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data : [u8; 41] = [
            0xCC, 0xCC,
            0x00,
            0x3c, 0x4d, 0x61, 0x69, 0x6e, 0x3e, 0x24, 0x00,
            0x43, 0x5f, 0x53, 0x68, 0x61, 0x72, 0x70, 0x5f, 0x50, 0x4f, 0x43, 0x5f, 0x31, 0x00,
            0x3c, 0x4d, 0x6f, 0x64, 0x75, 0x6c, 0x65, 0x3e, 0x00,
            0xff, 0x41, 0x00,
            0x41, 0x42, 0x43, 0x44,
        ];

        let strings = Strings::new(&data, 2, 1024);

        assert_eq!(strings.get(0).as_deref(), Some(""));
        assert_eq!(strings.get(1).as_deref(), Some("<Main>$"));
        assert_eq!(strings.get(9).as_deref(), Some("C_Sharp_POC_1"));
        assert_eq!(strings.get(23).as_deref(), Some("<Module>"));
        assert_eq!(strings.get(32).as_deref(), Some("\u{FFFD}A"));
        assert_eq!(strings.get_bytes(32), Some(&[0xff, 0x41][..]));
        // unterminated tail
        assert_eq!(strings.get(35), None);
        assert_eq!(strings.get(40), None);
        assert_eq!(strings.get(u32::MAX), None);
    }

    #[test]
    fn scan_limit() {
        let mut data = vec![b'a'; 1024];
        data.push(0);
        data.extend_from_slice(&[b'b'; 1025]);
        data.push(0);

        let strings = Strings::new(&data, 0, 1024);
        assert_eq!(strings.get_bytes(0).map(<[u8]>::len), Some(1024));
        assert_eq!(strings.get(1025), None);
        assert_eq!(strings.get_bytes(1026).map(<[u8]>::len), Some(1024));
    }
}
