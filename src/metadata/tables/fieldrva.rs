use crate::{
    file::parser::Parser,
    metadata::{
        record::DotNet,
        tables::{count, MetadataTable, RowReadable, TableContext, TableId, TableInfo},
    },
    Result,
};

/// A `FieldRVA` row: the location of the initial data of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRvaRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// RVA of the initial value
    pub rva: u32,
    /// Index into the `Field` table
    pub field: u32,
}

impl RowReadable for FieldRvaRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(FieldRvaRaw {
            rid,
            offset: parser.pos(),
            rva: parser.read_le::<u32>()?,
            field: parser.read_index(sizes.is_large(TableId::Field))?,
        })
    }
}

/// Collects the file offset of every field whose RVA maps into the image.
pub(crate) fn extract(context: &TableContext<'_>, table: &MetadataTable, out: &mut DotNet) {
    for field_rva in table.rows::<FieldRvaRaw>(context.data, context.sizes()) {
        match context.image.rva_to_offset(field_rva.rva) {
            Some(offset) => out.field_offsets.push(offset as u64),
            None => log::debug!(
                "FieldRVA {} points outside the image: {:#x}",
                field_rva.rid,
                field_rva.rva
            ),
        }
    }

    out.number_of_field_offsets = count(out.field_offsets.len());
}
