use crate::{
    file::parser::Parser,
    metadata::tables::{CodedIndex, CodedIndexType, RowReadable, TableInfo},
    Result,
};

/// A `MemberRef` row: a reference to a field or method of some class.
///
/// Only read as the constructor of a custom attribute during the custom attribute chase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRefRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// A `MemberRefParent` coded index
    pub class: CodedIndex,
    /// Index into the '#Strings' heap
    pub name: u32,
    /// Index into the '#Blob' heap
    pub signature: u32,
}

impl RowReadable for MemberRefRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(MemberRefRaw {
            rid,
            offset: parser.pos(),
            class: CodedIndex::read(parser, sizes, CodedIndexType::MemberRefParent)?,
            name: parser.read_index(sizes.is_large_str())?,
            signature: parser.read_index(sizes.is_large_blob())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::TableId;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x09, 0x00, // class
            0x02, 0x02, // name
            0x03, 0x03, // signature
        ];

        let sizes = TableInfo::new_test(&[(TableId::TypeRef, 1)], false, false, false);
        let mut parser = Parser::new(&data);
        let row = MemberRefRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 6);
        assert_eq!(row.class, CodedIndex { tag: 1, row: 1 });
        assert_eq!(
            CodedIndexType::MemberRefParent.table(row.class.tag),
            Some(TableId::TypeRef)
        );
        assert_eq!(row.name, 0x0202);
        assert_eq!(row.signature, 0x0303);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x09, 0x00, 0x00, 0x00, // class
            0x02, 0x02, // name
            0x03, 0x03, 0x03, 0x03, // signature
        ];

        // 0x2000 > 0xFFFF >> 3
        let sizes = TableInfo::new_test(&[(TableId::TypeRef, 0x2000)], false, true, false);
        let mut parser = Parser::new(&data);
        let row = MemberRefRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 10);
        assert_eq!(row.class, CodedIndex { tag: 1, row: 1 });
        assert_eq!(row.signature, 0x0303_0303);
    }
}
