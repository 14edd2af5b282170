use crate::{
    file::parser::Parser,
    metadata::tables::{CodedIndex, CodedIndexType, RowReadable, TableInfo},
    Result,
};

/// A `TypeRef` row: a reference to a type defined in another module or assembly.
///
/// Only read as the target of a `MemberRef` class during the custom attribute chase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRefRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// A `ResolutionScope` coded index
    pub resolution_scope: CodedIndex,
    /// Index into the '#Strings' heap
    pub type_name: u32,
    /// Index into the '#Strings' heap
    pub type_namespace: u32,
}

impl RowReadable for TypeRefRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(TypeRefRaw {
            rid,
            offset: parser.pos(),
            resolution_scope: CodedIndex::read(parser, sizes, CodedIndexType::ResolutionScope)?,
            type_name: parser.read_index(sizes.is_large_str())?,
            type_namespace: parser.read_index(sizes.is_large_str())?,
        })
    }
}
