use crate::{
    file::parser::Parser,
    metadata::{
        record::DotNet,
        tables::{MetadataTable, RowReadable, TableContext, TableInfo},
    },
    Result,
};

/// The `Module` table holds exactly one row describing the current module.
///
/// # Table Structure (ECMA-335 §22.30)
/// | Column | Size | Description |
/// |--------|------|-------------|
/// | Generation | 2 bytes | Reserved, shall be zero |
/// | Name | String index | Module name |
/// | Mvid | GUID index | Module version id |
/// | EncId | GUID index | Reserved |
/// | EncBaseId | GUID index | Reserved |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// Reserved, shall be zero
    pub generation: u16,
    /// Index into the '#Strings' heap
    pub name: u32,
    /// Index into the '#GUID' heap
    pub mvid: u32,
    /// Index into the '#GUID' heap
    pub encid: u32,
    /// Index into the '#GUID' heap
    pub encbaseid: u32,
}

impl RowReadable for ModuleRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(ModuleRaw {
            rid,
            offset: parser.pos(),
            generation: parser.read_le::<u16>()?,
            name: parser.read_index(sizes.is_large_str())?,
            mvid: parser.read_index(sizes.is_large_guid())?,
            encid: parser.read_index(sizes.is_large_guid())?,
            encbaseid: parser.read_index(sizes.is_large_guid())?,
        })
    }
}

/// Sets `module_name` from the first row.
pub(crate) fn extract(context: &TableContext<'_>, table: &MetadataTable, out: &mut DotNet) {
    let Some(module) = table.get::<ModuleRaw>(context.data, 1, context.sizes()) else {
        log::debug!("Module row does not fit at {:#x}", table.offset);
        return;
    };

    out.module_name = context.strings.get(module.name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x01, 0x01, // generation
            0x02, 0x02, // name
            0x03, 0x03, // mvid
            0x04, 0x04, // encid
            0x05, 0x05, // encbaseid
        ];

        let sizes = TableInfo::new_test(&[], false, false, false);
        let mut parser = Parser::new(&data);
        let row = ModuleRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 10);
        assert_eq!(row.generation, 0x0101);
        assert_eq!(row.name, 0x0202);
        assert_eq!(row.mvid, 0x0303);
        assert_eq!(row.encid, 0x0404);
        assert_eq!(row.encbaseid, 0x0505);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x01, 0x01, // generation
            0x02, 0x02, 0x02, 0x02, // name
            0x03, 0x03, 0x03, 0x03, // mvid
            0x04, 0x04, 0x04, 0x04, // encid
            0x05, 0x05, 0x05, 0x05, // encbaseid
        ];

        let sizes = TableInfo::new_test(&[], true, true, true);
        let mut parser = Parser::new(&data);
        let row = ModuleRaw::row_read(&mut parser, 1, &sizes).unwrap();

        assert_eq!(parser.pos(), 18);
        assert_eq!(row.name, 0x0202_0202);
        assert_eq!(row.encbaseid, 0x0505_0505);
    }
}
