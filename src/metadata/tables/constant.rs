use crate::{
    file::parser::Parser,
    metadata::{
        record::DotNet,
        tables::{
            count, CodedIndex, CodedIndexType, MetadataTable, RowReadable, TableContext,
            TableInfo,
        },
    },
    Result,
};

/// `ELEMENT_TYPE_STRING`, the only constant type that is extracted
pub const ELEMENT_TYPE_STRING: u8 = 0x0E;

/// A `Constant` row: the compile-time value of a field, parameter or property.
///
/// # Table Structure (ECMA-335 §22.9)
/// | Column | Size | Description |
/// |--------|------|-------------|
/// | Type | 1 byte | `ELEMENT_TYPE_*` of the value |
/// | Padding | 1 byte | Shall be zero |
/// | Parent | HasConstant coded index | Owner of the constant |
/// | Value | Blob index | The value itself |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// Element type of the value
    pub base: u8,
    /// Padding byte
    pub padding: u8,
    /// A `HasConstant` coded index
    pub parent: CodedIndex,
    /// Index into the '#Blob' heap
    pub value: u32,
}

impl RowReadable for ConstantRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(ConstantRaw {
            rid,
            offset: parser.pos(),
            base: parser.read_le::<u8>()?,
            padding: parser.read_le::<u8>()?,
            parent: CodedIndex::read(parser, sizes, CodedIndexType::HasConstant)?,
            value: parser.read_index(sizes.is_large_blob())?,
        })
    }
}

/// Collects the raw value of every string constant. Empty values are kept.
pub(crate) fn extract(context: &TableContext<'_>, table: &MetadataTable, out: &mut DotNet) {
    for constant in table.rows::<ConstantRaw>(context.data, context.sizes()) {
        if constant.base != ELEMENT_TYPE_STRING {
            continue;
        }

        match context.blob.get(constant.value) {
            Ok(value) => out.constants.push(value.to_vec()),
            Err(error) => log::debug!("Constant {} value skipped: {error}", constant.rid),
        }
    }

    out.number_of_constants = count(out.constants.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::TableId;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x0E, // type
            0x00, // padding
            0x05, 0x00, // parent
            0x04, 0x04, // value
        ];

        let sizes = TableInfo::new_test(&[(TableId::Param, 1)], false, false, false);
        let mut parser = Parser::new(&data);
        let row = ConstantRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 6);
        assert_eq!(row.base, ELEMENT_TYPE_STRING);
        assert_eq!(row.parent, CodedIndex { tag: 1, row: 1 });
        assert_eq!(
            CodedIndexType::HasConstant.table(row.parent.tag),
            Some(TableId::Param)
        );
        assert_eq!(row.value, 0x0404);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x08, // type
            0x00, // padding
            0x05, 0x00, 0x00, 0x00, // parent
            0x04, 0x04, 0x04, 0x04, // value
        ];

        let sizes = TableInfo::new_test(&[(TableId::Field, 0x4000)], false, true, false);
        let mut parser = Parser::new(&data);
        let row = ConstantRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 10);
        assert_eq!(row.base, 0x08);
        assert_eq!(row.value, 0x0404_0404);
    }
}
