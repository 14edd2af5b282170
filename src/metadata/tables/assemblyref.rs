use crate::{
    file::parser::Parser,
    metadata::{
        record::{AssemblyRefInfo, DotNet, Version},
        tables::{count, MetadataTable, RowReadable, TableContext, TableInfo},
    },
    Result,
};

/// An `AssemblyRef` row: one assembly this module depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRefRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
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
    /// Index into the '#Blob' heap, full key or 8-byte token
    pub public_key_or_token: u32,
    /// Index into the '#Strings' heap
    pub name: u32,
    /// Index into the '#Strings' heap
    pub culture: u32,
    /// Index into the '#Blob' heap
    pub hash_value: u32,
}

impl AssemblyRefRaw {
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

impl RowReadable for AssemblyRefRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(AssemblyRefRaw {
            rid,
            offset: parser.pos(),
            major_version: parser.read_le::<u16>()?,
            minor_version: parser.read_le::<u16>()?,
            build_number: parser.read_le::<u16>()?,
            revision_number: parser.read_le::<u16>()?,
            flags: parser.read_le::<u32>()?,
            public_key_or_token: parser.read_index(sizes.is_large_blob())?,
            name: parser.read_index(sizes.is_large_str())?,
            culture: parser.read_index(sizes.is_large_str())?,
            hash_value: parser.read_index(sizes.is_large_blob())?,
        })
    }
}

/// Adds one entry per row that fits. A row whose key blob is unreadable keeps only its
/// version.
pub(crate) fn extract(context: &TableContext<'_>, table: &MetadataTable, out: &mut DotNet) {
    for assembly_ref in table.rows::<AssemblyRefRaw>(context.data, context.sizes()) {
        let mut info = AssemblyRefInfo {
            version: assembly_ref.version(),
            ..AssemblyRefInfo::default()
        };

        match context.blob.get(assembly_ref.public_key_or_token) {
            Ok(key) => {
                info.public_key_or_token = (!key.is_empty()).then(|| key.to_vec());
                info.name = context.strings.get(assembly_ref.name);
            }
            Err(error) => log::debug!(
                "AssemblyRef {} key blob unreadable: {error}",
                assembly_ref.rid
            ),
        }

        out.assembly_refs.push(info);
    }

    out.number_of_assembly_refs = count(out.assembly_refs.len());
}
