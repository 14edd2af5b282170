use crate::{file::parser::Parser, Error::Truncated, Result};

/// Size of the window a stream name, including its NUL terminator, must fit in.
pub const STREAM_NAME_SIZE: usize = 32;

/// One record of the stream directory that follows the metadata root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset of the stream, relative to the metadata root
    pub offset: u32,
    /// Declared size of the stream in bytes
    pub size: u32,
    /// Stream name without its terminator, e.g. `#~` or `#Strings`
    pub name: String,
}

impl StreamHeader {
    /// Reads the stream header at the position of `parser` and moves it to the next record,
    /// `8 + len + 4 - len % 4` bytes further.
    ///
    /// On failure the cursor is left at the start of the record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the fixed fields or the full name window do
    /// not fit, and [`crate::Error::MalformedHeader`] if the window holds no terminator.
    pub fn read(parser: &mut Parser<'_>) -> Result<StreamHeader> {
        parser.transactional(|parser| {
            let start = parser.pos();
            let offset = parser.read_le::<u32>()?;
            let size = parser.read_le::<u32>()?;
            let window = parser.read_bytes(STREAM_NAME_SIZE).map_err(|_| Truncated)?;

            let Some(name_len) = window.iter().position(|&byte| byte == 0) else {
                return Err(malformed_error!(
                    "Stream name at {:#x} is not terminated within {} bytes",
                    start + 8,
                    STREAM_NAME_SIZE
                ));
            };

            parser.seek(start + 8 + name_len + 4 - (name_len % 4))?;

            Ok(StreamHeader {
                offset,
                size,
                name: String::from_utf8_lossy(&window[..name_len]).into_owned(),
            })
        })
    }
}
