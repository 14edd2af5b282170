use bitflags::bitflags;

use crate::{
    file::parser::Parser,
    metadata::tables::{MetadataTable, TableId, TableInfo},
    Error::Truncated,
    Result,
};

/// Size of the fixed part of the table stream header.
pub const TABLES_HEADER_SIZE: usize = 24;

bitflags! {
    /// The `HeapSizes` byte of the table stream header. A set flag widens every index into
    /// the matching heap from 2 to 4 bytes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeapSizes: u8 {
        /// Indexes into `#Strings` are 4 bytes
        const LARGE_STRINGS = 0x01;
        /// Indexes into `#GUID` are 4 bytes
        const LARGE_GUID = 0x02;
        /// Indexes into `#Blob` are 4 bytes
        const LARGE_BLOB = 0x04;
    }
}

/// The `TablesHeader` structure represents the header of the '#~' stream, together with the
/// location of every table that follows it.
///
/// Reading it runs both passes over the presence mask: the row-count pass producing
/// [`TableInfo`], then the layout walk placing each present table at its absolute offset.
/// No row content is read here.
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.24.2.6 && II.22
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablesHeader {
    /// Absolute offset of the header inside the image buffer
    pub offset: usize,
    /// Major version of table schemata, shall be 2
    pub major_version: u8,
    /// Minor version of table schemata, shall be 0
    pub minor_version: u8,
    /// Index widths of the three heaps
    pub heap_sizes: HeapSizes,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfo,
    tables: Vec<MetadataTable>,
}

impl TablesHeader {
    /// Reads the table stream header at absolute `offset` inside `data` and lays out its
    /// tables.
    ///
    /// The layout walk stops at the first presence bit without a defined table, since its
    /// row width and therefore the position of everything after it is unknown. Tables placed
    /// before that point are kept.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the header or the row-count array does not fit,
    /// and [`crate::Error::CorruptCardinality`] if a table declares more than `max_rows` rows.
    pub fn read(data: &[u8], offset: usize, max_rows: u32) -> Result<TablesHeader> {
        let mut parser = Parser::at(data, offset).map_err(|_| Truncated)?;
        if !parser.has(TABLES_HEADER_SIZE) {
            return Err(Truncated);
        }

        // reserved
        parser.advance_by(4)?;
        let major_version = parser.read_le::<u8>()?;
        let minor_version = parser.read_le::<u8>()?;
        let heap_sizes = HeapSizes::from_bits_retain(parser.read_le::<u8>()?);
        parser.advance_by(1)?;
        let valid = parser.read_le::<u64>()?;
        let sorted = parser.read_le::<u64>()?;

        let (info, first_row) = TableInfo::read(data, parser.pos(), valid, heap_sizes, max_rows)?;

        let mut tables = Vec::with_capacity(valid.count_ones() as usize);
        let mut current_offset = first_row;
        for bit in 0..u64::BITS {
            if valid & (1 << bit) == 0 {
                continue;
            }

            let Some(id) = TableId::from_bit(bit) else {
                log::debug!("Table layout stopped at undefined presence bit {bit:#x}");
                break;
            };

            let table = MetadataTable {
                id,
                offset: current_offset,
                row_size: id.row_size(&info),
                rows: info.rows(id),
            };
            tables.push(table);

            match table
                .size()
                .and_then(|size| current_offset.checked_add(size))
            {
                Some(next_offset) => current_offset = next_offset,
                None => break,
            }
        }

        Ok(TablesHeader {
            offset,
            major_version,
            minor_version,
            heap_sizes,
            valid,
            sorted,
            info,
            tables,
        })
    }

    /// Get the number of tables declared present
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Returns the placed table of kind `table_id`, if it was reached by the layout walk.
    #[must_use]
    pub fn table(&self, table_id: TableId) -> Option<&MetadataTable> {
        self.tables.iter().find(|table| table.id == table_id)
    }

    /// Returns every placed table, in storage order.
    #[must_use]
    pub fn tables(&self) -> &[MetadataTable] {
        &self.tables
    }
}
