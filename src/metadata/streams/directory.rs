use crate::{
    file::parser::Parser,
    metadata::{root::Root, streams::StreamHeader},
};

/// Absolute location of a stream inside the image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamLocation {
    /// Absolute file offset of the first byte of the stream
    pub offset: usize,
    /// Declared size of the stream
    pub size: u32,
}

/// The stream directory of a metadata root.
///
/// Holds every header that was walked, in directory order, plus the locations of the first
/// stream carrying each recognized name. Later duplicates are reported in `headers` but
/// never replace an already captured location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamDirectory {
    /// All walked headers, in directory order
    pub headers: Vec<StreamHeader>,
    /// The table stream (`#~`, or the uncompressed `#-`)
    pub tables: Option<StreamLocation>,
    /// The `#Strings` heap
    pub strings: Option<StreamLocation>,
    /// The `#US` heap
    pub user_strings: Option<StreamLocation>,
    /// The `#GUID` heap
    pub guid: Option<StreamLocation>,
    /// The `#Blob` heap
    pub blob: Option<StreamLocation>,
}

impl StreamDirectory {
    /// Walks up to `count` stream headers that follow `root` inside `data`.
    ///
    /// The walk ends silently at the first record that does not fit or is malformed;
    /// whatever was found before that point is kept.
    #[must_use]
    pub fn read(data: &[u8], root: &Root, count: u16) -> StreamDirectory {
        let mut directory = StreamDirectory {
            headers: Vec::with_capacity(usize::from(count).min(16)),
            ..StreamDirectory::default()
        };

        let Ok(mut parser) = Parser::at(data, root.streams_offset()) else {
            log::debug!("Stream directory at {:#x} is out of bounds", root.streams_offset());
            return directory;
        };

        for _ in 0..count {
            let header = match StreamHeader::read(&mut parser) {
                Ok(header) => header,
                Err(error) => {
                    log::debug!("Stream directory walk stopped at {:#x}: {error}", parser.pos());
                    break;
                }
            };

            if let Some(stream_offset) = root.offset.checked_add(header.offset as usize) {
                let location = StreamLocation {
                    offset: stream_offset,
                    size: header.size,
                };

                let slot = match header.name.as_str() {
                    "#~" | "#-" => Some(&mut directory.tables),
                    "#Strings" => Some(&mut directory.strings),
                    "#US" => Some(&mut directory.user_strings),
                    "#GUID" => Some(&mut directory.guid),
                    "#Blob" => Some(&mut directory.blob),
                    _ => None,
                };

                if let Some(slot) = slot {
                    slot.get_or_insert(location);
                }
            }

            directory.headers.push(header);
        }

        if directory.headers.len() < usize::from(count) {
            log::warn!(
                "Metadata root declares {} streams, {} were readable",
                count,
                directory.headers.len()
            );
        }

        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(offset: u32, size: u32, name: &str) -> Vec<u8> {
        let mut record = Vec::new();
        record.extend_from_slice(&offset.to_le_bytes());
        record.extend_from_slice(&size.to_le_bytes());
        record.extend_from_slice(name.as_bytes());
        record.push(0);
        while record.len() % 4 != 0 {
            record.push(0);
        }
        record
    }

    fn root(count: u16) -> Vec<u8> {
        #[rustfmt::skip]
        let mut data = vec![
            /* signature */ 0x42, 0x53, 0x4A, 0x42,
            /* major     */ 0x01, 0x00,
            /* minor     */ 0x01, 0x00,
            /* reserved  */ 0x00, 0x00, 0x00, 0x00,
            /* length    */ 0x04, 0x00, 0x00, 0x00,
            /* version   */ b'v', b'4', 0x00, 0x00,
            /* flags     */ 0x00, 0x00,
        ];
        data.extend_from_slice(&count.to_le_bytes());
        data
    }

    #[test]
    fn recognized_streams() {
        let mut data = root(6);
        data.extend(header(0x6C, 0x100, "#~"));
        data.extend(header(0x16C, 0x20, "#Strings"));
        data.extend(header(0x18C, 0x10, "#US"));
        data.extend(header(0x19C, 0x10, "#GUID"));
        data.extend(header(0x1AC, 0x08, "#Blob"));
        data.extend(header(0x1B4, 0x08, "#Blob"));
        data.resize(data.len() + 32, 0);

        let root = Root::read(&data, 0).unwrap();
        let directory = StreamDirectory::read(&data, &root, root.stream_number(&data).unwrap());

        assert_eq!(directory.headers.len(), 6);
        assert_eq!(
            directory.tables,
            Some(StreamLocation { offset: 0x6C, size: 0x100 })
        );
        assert_eq!(directory.strings.unwrap().offset, 0x16C);
        assert_eq!(directory.user_strings.unwrap().offset, 0x18C);
        assert_eq!(directory.guid.unwrap().offset, 0x19C);
        // first occurrence wins
        assert_eq!(directory.blob.unwrap().offset, 0x1AC);
        assert_eq!(directory.headers[5].offset, 0x1B4);
    }

    #[test]
    fn uncompressed_tables_and_prefixes() {
        let mut data = root(3);
        data.extend(header(0x40, 0x10, "#~x"));
        data.extend(header(0x50, 0x10, "#-"));
        data.extend(header(0x60, 0x10, "#~"));
        data.resize(data.len() + 32, 0);

        let root = Root::read(&data, 0).unwrap();
        let directory = StreamDirectory::read(&data, &root, 3);

        assert_eq!(directory.headers.len(), 3);
        assert_eq!(directory.headers[0].name, "#~x");
        assert_eq!(directory.tables.unwrap().offset, 0x50);
    }

    #[test]
    fn stops_at_first_unreadable_header() {
        let mut data = root(4);
        data.extend(header(0x40, 0x10, "#Strings"));
        data.extend(header(0x50, 0x10, "#Blob"));
        // room for the first name window, not for the second
        data.resize(70, 0);

        let root = Root::read(&data, 0).unwrap();
        let directory = StreamDirectory::read(&data, &root, 4);

        assert_eq!(directory.headers.len(), 1);
        assert!(directory.strings.is_some());
        assert!(directory.blob.is_none());
    }

    #[test]
    fn offsets_are_root_relative() {
        let mut data = vec![0xCC; 0x20];
        data.extend(root(1));
        data.extend(header(0x6C, 0x10, "#GUID"));
        data.resize(data.len() + 32, 0);

        let root = Root::read(&data, 0x20).unwrap();
        let directory = StreamDirectory::read(&data, &root, 1);

        assert_eq!(directory.guid.unwrap().offset, 0x20 + 0x6C);
    }
}
