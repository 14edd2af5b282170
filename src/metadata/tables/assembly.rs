use crate::{
    file::parser::Parser,
    metadata::{
        record::{AssemblyInfo, DotNet, Version},
        tables::{MetadataTable, RowReadable, TableContext, TableInfo},
    },
    Result,
};

/// The `Assembly` table holds the manifest of the current assembly, at most one row.
///
/// # Table Structure (ECMA-335 §22.2)
/// | Column | Size | Description |
/// |--------|------|-------------|
/// | HashAlgId | 4 bytes | Hash algorithm of the file hashes |
/// | MajorVersion | 2 bytes | |
/// | MinorVersion | 2 bytes | |
/// | BuildNumber | 2 bytes | |
/// | RevisionNumber | 2 bytes | |
/// | Flags | 4 bytes | `AssemblyFlags` |
/// | PublicKey | Blob index | Full public key, may be empty |
/// | Name | String index | Simple name |
/// | Culture | String index | Culture, empty when neutral |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// Hash algorithm identifier
    pub hash_alg_id: u32,
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
    /// Assembly flags
    pub flags: u32,
    /// Index into the '#Blob' heap
    pub public_key: u32,
    /// Index into the '#Strings' heap
    pub name: u32,
    /// Index into the '#Strings' heap
    pub culture: u32,
}

impl AssemblyRaw {
    /// Returns the four-part version of this row
    #[must_use]
    pub fn version(&self) -> Version {
        Version {
            major: self.major_version,
            minor: self.minor_version,
            build_number: self.build_number,
            revision_number: self.revision_number,
        }
    }
}

impl RowReadable for AssemblyRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(AssemblyRaw {
            rid,
            offset: parser.pos(),
            hash_alg_id: parser.read_le::<u32>()?,
            major_version: parser.read_le::<u16>()?,
            minor_version: parser.read_le::<u16>()?,
            build_number: parser.read_le::<u16>()?,
            revision_number: parser.read_le::<u16>()?,
            flags: parser.read_le::<u32>()?,
            public_key: parser.read_index(sizes.is_large_blob())?,
            name: parser.read_index(sizes.is_large_str())?,
            culture: parser.read_index(sizes.is_large_str())?,
        })
    }
}

/// Sets `assembly` from the first row. An empty culture is reported as absent.
pub(crate) fn extract(context: &TableContext<'_>, table: &MetadataTable, out: &mut DotNet) {
    let Some(assembly) = table.get::<AssemblyRaw>(context.data, 1, context.sizes()) else {
        log::debug!("Assembly row does not fit at {:#x}", table.offset);
        return;
    };

    out.assembly = Some(AssemblyInfo {
        version: assembly.version(),
        name: context.strings.get(assembly.name),
        culture: context
            .strings
            .get(assembly.culture)
            .filter(|culture| !culture.is_empty()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x04, 0x80, 0x00, 0x00, // hash_alg_id
            0x01, 0x00, // major_version
            0x02, 0x00, // minor_version
            0x03, 0x00, // build_number
            0x04, 0x00, // revision_number
            0x01, 0x00, 0x00, 0x00, // flags
            0x06, 0x06, // public_key
            0x07, 0x07, // name
            0x08, 0x08, // culture
        ];

        let sizes = TableInfo::new_test(&[], false, false, false);
        let mut parser = Parser::new(&data);
        let row = AssemblyRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 22);
        assert_eq!(row.hash_alg_id, 0x8004);
        assert_eq!(
            row.version(),
            Version {
                major: 1,
                minor: 2,
                build_number: 3,
                revision_number: 4
            }
        );
        assert_eq!(row.flags, 1);
        assert_eq!(row.public_key, 0x0606);
        assert_eq!(row.name, 0x0707);
        assert_eq!(row.culture, 0x0808);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x04, 0x80, 0x00, 0x00, // hash_alg_id
            0x01, 0x00, // major_version
            0x02, 0x00, // minor_version
            0x03, 0x00, // build_number
            0x04, 0x00, // revision_number
            0x01, 0x00, 0x00, 0x00, // flags
            0x06, 0x06, 0x06, 0x06, // public_key
            0x07, 0x07, 0x07, 0x07, // name
            0x08, 0x08, 0x08, 0x08, // culture
        ];

        let sizes = TableInfo::new_test(&[], true, true, true);
        let mut parser = Parser::new(&data);
        let row = AssemblyRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 28);
        assert_eq!(row.public_key, 0x0606_0606);
        assert_eq!(row.culture, 0x0808_0808);
    }
}
