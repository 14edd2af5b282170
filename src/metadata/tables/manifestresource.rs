use crate::{
    file::{
        io::{fits, read_le_at},
        parser::Parser,
    },
    metadata::{
        record::{DotNet, Resource},
        tables::{
            count, CodedIndex, CodedIndexType, MetadataTable, RowReadable, TableContext,
            TableInfo,
        },
    },
    Result,
};

/// A `ManifestResource` row: a named resource, embedded or linked.
///
/// # Table Structure (ECMA-335 §22.24)
/// | Column | Size | Description |
/// |--------|------|-------------|
/// | Offset | 4 bytes | Position inside the resources blob of the CLI header |
/// | Flags | 4 bytes | Visibility attributes |
/// | Name | String index | Resource name |
/// | Implementation | Implementation coded index | 0 when embedded in this file |
///
/// Embedded resource data is laid out as a `u32` length followed by that many bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestResourceRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// Offset of the resource inside the resources blob
    pub offset_field: u32,
    /// Resource attributes
    pub flags: u32,
    /// Index into the '#Strings' heap
    pub name: u32,
    /// An `Implementation` coded index
    pub implementation: CodedIndex,
}

impl ManifestResourceRaw {
    /// Returns `true` if the resource data lives in this file
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.implementation.tag == 0 && self.implementation.row == 0
    }
}

impl RowReadable for ManifestResourceRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(ManifestResourceRaw {
            rid,
            offset: parser.pos(),
            offset_field: parser.read_le::<u32>()?,
            flags: parser.read_le::<u32>()?,
            name: parser.read_index(sizes.is_large_str())?,
            implementation: CodedIndex::read(parser, sizes, CodedIndexType::Implementation)?,
        })
    }
}

/// Collects every embedded resource whose data fits the image.
pub(crate) fn extract(context: &TableContext<'_>, table: &MetadataTable, out: &mut DotNet) {
    out.number_of_resources = Some(0);

    let Some(resource_base) = context.resource_base else {
        log::debug!("No resources blob, ManifestResource table skipped");
        return;
    };

    for resource in table.rows::<ManifestResourceRaw>(context.data, context.sizes()) {
        if !resource.is_embedded() {
            continue;
        }

        let Some(start) = resource_base.checked_add(resource.offset_field as usize) else {
            continue;
        };

        let mut position = start;
        let Ok(length) = read_le_at::<u32>(context.data, &mut position) else {
            log::debug!("Resource {} length out of range at {start:#x}", resource.rid);
            continue;
        };

        if !fits(context.data, start, length as usize) {
            log::debug!("Resource {} data out of range at {start:#x}", resource.rid);
            continue;
        }

        out.resources.push(Resource {
            offset: position as u64,
            length,
            name: context.strings.get(resource.name),
        });
    }

    out.number_of_resources = count(out.resources.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::TableId;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x01, 0x01, 0x01, 0x01, // offset_field
            0x02, 0x02, 0x02, 0x02, // flags
            0x03, 0x03, // name
            0x00, 0x00, // implementation
        ];

        let sizes = TableInfo::new_test(&[], false, false, false);
        let mut parser = Parser::new(&data);
        let row = ManifestResourceRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 12);
        assert_eq!(row.offset_field, 0x0101_0101);
        assert_eq!(row.flags, 0x0202_0202);
        assert_eq!(row.name, 0x0303);
        assert!(row.is_embedded());
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x01, 0x01, 0x01, 0x01, // offset_field
            0x02, 0x02, 0x02, 0x02, // flags
            0x03, 0x03, // name
            0x05, 0x00, 0x00, 0x00, // implementation
        ];

        let sizes = TableInfo::new_test(&[(TableId::AssemblyRef, 0x4000)], false, false, false);
        let mut parser = Parser::new(&data);
        let row = ManifestResourceRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 14);
        assert_eq!(row.implementation, CodedIndex { tag: 1, row: 1 });
        assert!(!row.is_embedded());
    }
}
