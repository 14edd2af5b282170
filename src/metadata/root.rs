//! The metadata root (`BSJB` header) that precedes the stream directory.
//!
//! [`Root::read`] performs the metadata half of the managed-image probe: the magic has to
//! match, and the declared version length has to be sane and inside the buffer. Everything
//! read after the version string (flags, stream count) is best-effort and kept separate, so
//! a root that passes the probe stays accepted even if its tail is cut off.

use crate::{
    file::io::{read_le_at, slice_at},
    Error::Truncated,
    Result,
};

/// The magic signature at the start of every metadata root
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// Size of the fixed part of the root, up to the version string
pub const ROOT_HEADER_SIZE: usize = 16;

/// The parsed fixed header of the metadata root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    /// Absolute file offset of the root
    pub offset: usize,
    /// Magic signature, always [`CIL_HEADER_MAGIC`]
    pub signature: u32,
    /// Major version, 1 for all known runtimes
    pub major_version: u16,
    /// Minor version, 1 for all known runtimes
    pub minor_version: u16,
    /// Reserved, 0
    pub reserved: u32,
    /// Declared length of the version buffer, a multiple of 4 in `[4, 252]`
    pub length: u32,
    /// Version text up to its NUL terminator; `None` if no terminator sits inside `length`
    pub version: Option<String>,
}

impl Root {
    /// Reads and validates the metadata root located at `offset` inside `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the header or version buffer do not fit, and
    /// [`crate::Error::MalformedHeader`] on a magic or version length mismatch.
    pub fn read(data: &[u8], offset: usize) -> Result<Root> {
        let Some(header) = slice_at(data, offset, ROOT_HEADER_SIZE) else {
            return Err(Truncated);
        };

        let mut cursor = 0;
        let signature = read_le_at::<u32>(header, &mut cursor)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {:#x}",
                signature
            ));
        }

        let major_version = read_le_at::<u16>(header, &mut cursor)?;
        let minor_version = read_le_at::<u16>(header, &mut cursor)?;
        let reserved = read_le_at::<u32>(header, &mut cursor)?;
        let length = read_le_at::<u32>(header, &mut cursor)?;

        if length == 0 || length > 255 || length % 4 != 0 {
            return Err(malformed_error!("Invalid version string length - {}", length));
        }

        let Some(version_buffer) = slice_at(data, offset + ROOT_HEADER_SIZE, length as usize)
        else {
            return Err(Truncated);
        };

        let version = version_buffer
            .iter()
            .position(|&byte| byte == 0)
            .map(|end| String::from_utf8_lossy(&version_buffer[..end]).into_owned());

        Ok(Root {
            offset,
            signature,
            major_version,
            minor_version,
            reserved,
            length,
            version,
        })
    }

    /// Absolute offset of the 2-byte flags field that follows the version buffer.
    #[must_use]
    pub fn flags_offset(&self) -> usize {
        self.offset + ROOT_HEADER_SIZE + self.length as usize
    }

    /// Absolute offset of the first stream header.
    #[must_use]
    pub fn streams_offset(&self) -> usize {
        self.flags_offset() + 4
    }

    /// Reads the declared number of stream headers.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the count lies outside `data`.
    pub fn stream_number(&self, data: &[u8]) -> Result<u16> {
        let mut offset = self.flags_offset() + 2;
        read_le_at::<u16>(data, &mut offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[rustfmt::skip]
    const ROOT: [u8; 32] = [
        /* signature */ 0x42, 0x53, 0x4A, 0x42,
        /* major     */ 0x01, 0x00,
        /* minor     */ 0x01, 0x00,
        /* reserved  */ 0x00, 0x00, 0x00, 0x00,
        /* length    */ 0x0C, 0x00, 0x00, 0x00,
        /* version   */ b'v', b'4', b'.', b'0', b'.', b'3', b'0', b'3', b'1', b'9', 0x00, 0x00,
        /* flags     */ 0x00, 0x00,
        /* streams   */ 0x05, 0x00,
    ];

    #[test]
    fn crafted() {
        let mut data = vec![0xCC; 8];
        data.extend_from_slice(&ROOT);

        let root = Root::read(&data, 8).unwrap();

        assert_eq!(root.signature, CIL_HEADER_MAGIC);
        assert_eq!(root.major_version, 1);
        assert_eq!(root.minor_version, 1);
        assert_eq!(root.length, 12);
        assert_eq!(root.version.as_deref(), Some("v4.0.30319"));
        assert_eq!(root.flags_offset(), 8 + 28);
        assert_eq!(root.streams_offset(), 8 + 32);
        assert_eq!(root.stream_number(&data).unwrap(), 5);
    }

    #[test]
    fn bad_magic() {
        let mut data = ROOT;
        data[0] = 0x43;

        assert!(matches!(
            Root::read(&data, 0),
            Err(Error::MalformedHeader { .. })
        ));
    }

    #[test]
    fn bad_version_length() {
        for length in [0u8, 2, 13] {
            let mut data = ROOT;
            data[12] = length;
            assert!(Root::read(&data, 0).is_err(), "length {length} accepted");
        }

        let mut data = ROOT.to_vec();
        data[13] = 0x01; // 268
        assert!(Root::read(&data, 0).is_err());
    }

    #[test]
    fn version_must_fit() {
        assert!(matches!(Root::read(&ROOT[..20], 0), Err(Error::Truncated)));
        assert!(matches!(Root::read(&ROOT[..15], 0), Err(Error::Truncated)));
        assert!(Root::read(&ROOT, 30).is_err());
    }

    #[test]
    fn unterminated_version() {
        let mut data = ROOT;
        data[26] = b'x';
        data[27] = b'x';

        let root = Root::read(&data, 0).unwrap();
        assert_eq!(root.version, None);
    }

    #[test]
    fn stream_number_cut_off() {
        let root = Root::read(&ROOT[..29], 0).unwrap();
        assert!(root.stream_number(&ROOT[..29]).is_err());
    }
}
