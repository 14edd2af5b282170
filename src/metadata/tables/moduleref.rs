use crate::{
    file::parser::Parser,
    metadata::{
        record::DotNet,
        tables::{count, MetadataTable, RowReadable, TableContext, TableInfo},
    },
    Result,
};

/// A `ModuleRef` row: the name of a module referenced by P/Invoke or a `File` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRefRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// Index into the '#Strings' heap
    pub name: u32,
}

impl RowReadable for ModuleRefRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(ModuleRefRaw {
            rid,
            offset: parser.pos(),
            name: parser.read_index(sizes.is_large_str())?,
        })
    }
}

/// Collects every resolvable module reference name.
pub(crate) fn extract(context: &TableContext<'_>, table: &MetadataTable, out: &mut DotNet) {
    for module_ref in table.rows::<ModuleRefRaw>(context.data, context.sizes()) {
        match context.strings.get(module_ref.name) {
            Some(name) => out.modulerefs.push(name),
            None => log::debug!("ModuleRef {} has no readable name", module_ref.rid),
        }
    }

    out.number_of_modulerefs = count(out.modulerefs.len());
}
