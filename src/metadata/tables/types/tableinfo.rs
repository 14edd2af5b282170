use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le_at,
    metadata::{
        streams::HeapSizes,
        tables::types::{CodedIndexType, TableId},
    },
    Error::CorruptCardinality,
    Result,
};

/// `TableInfo` holds the row count of every table in the stream and the width of every
/// index column that follows from them.
///
/// It is the output of the row-count pass: nothing about a row layout can be known before
/// all counts are read, since a coded index may point at a table stored after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableInfo {
    rows: [u32; TableId::COUNT],
    coded_indexes: [u8; CodedIndexType::COUNT],
    heap_sizes: HeapSizes,
}

impl TableInfo {
    /// Runs the row-count pass.
    ///
    /// Reads one `u32` per bit set in `valid`, in ascending bit order, from the array at
    /// absolute `offset` inside `data`. Bits without a defined table still consume their
    /// count. Returns the info together with the offset of the first table row.
    ///
    /// ## Arguments
    /// * 'data'       - The image buffer
    /// * 'offset'     - Absolute offset of the row-count array
    /// * 'valid'      - The presence mask of the table stream header
    /// * 'heap_sizes' - The heap index widths of the table stream header
    /// * 'max_rows'   - Row counts above this value are rejected
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the array runs past the buffer and
    /// [`crate::Error::CorruptCardinality`] if a table exceeds `max_rows`.
    pub fn read(
        data: &[u8],
        offset: usize,
        valid: u64,
        heap_sizes: HeapSizes,
        max_rows: u32,
    ) -> Result<(TableInfo, usize)> {
        let mut rows = [0u32; TableId::COUNT];
        let mut next_row_offset = offset;

        for bit in 0..u64::BITS {
            if valid & (1 << bit) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            match TableId::from_bit(bit) {
                Some(table) => {
                    if row_count > max_rows {
                        return Err(CorruptCardinality {
                            table,
                            rows: row_count,
                        });
                    }
                    rows[table as usize] = row_count;
                }
                None => log::warn!("Presence bit {bit:#x} has no table, declares {row_count} rows"),
            }
        }

        Ok((TableInfo::build(rows, heap_sizes), next_row_offset))
    }

    #[cfg(test)]
    /// Special constructor for unit-tests
    ///
    /// ## Arguments
    /// * 'valid_tables'    - A slice of touples, which provides (table_id, row_count) of the valid tables
    /// * 'large_str'       - Specify if the #String heap indexes are 4 or 2 bytes
    /// * 'large_blob'      - Specify if the #Blob heap indexes are 4 or 2 bytes
    /// * 'large_guid'      - Specify if the #GUID heap indexes are 4 or 2 bytes
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> TableInfo {
        let mut rows = [0u32; TableId::COUNT];
        for (table, count) in valid_tables {
            rows[*table as usize] = *count;
        }

        let mut heap_sizes = HeapSizes::empty();
        heap_sizes.set(HeapSizes::LARGE_STRINGS, large_str);
        heap_sizes.set(HeapSizes::LARGE_BLOB, large_blob);
        heap_sizes.set(HeapSizes::LARGE_GUID, large_guid);

        TableInfo::build(rows, heap_sizes)
    }

    fn build(rows: [u32; TableId::COUNT], heap_sizes: HeapSizes) -> TableInfo {
        let mut table_info = TableInfo {
            rows,
            coded_indexes: [2; CodedIndexType::COUNT],
            heap_sizes,
        };

        for coded_index in CodedIndexType::iter() {
            let max_rows = coded_index
                .tables()
                .iter()
                .map(|table| table_info.rows(*table))
                .max()
                .unwrap_or(0);

            if max_rows > (0xFFFF >> coded_index.tag_bits()) {
                table_info.coded_indexes[coded_index as usize] = 4;
            }
        }

        table_info
    }

    /// Returns the declared row count of `table`, 0 if it is absent.
    #[must_use]
    pub fn rows(&self, table: TableId) -> u32 {
        self.rows[table as usize]
    }

    /// Returns true, if a requested table is larger than 2^16 rows and hence requires 4 bytes instead of 2 bytes
    #[must_use]
    pub fn is_large(&self, table: TableId) -> bool {
        self.rows[table as usize] > u32::from(u16::MAX)
    }

    /// Returns the heap index widths this info was built with
    #[must_use]
    pub fn heap_sizes(&self) -> HeapSizes {
        self.heap_sizes
    }

    /// Indicates the size of indexes referring into the '#Strings' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.heap_sizes.contains(HeapSizes::LARGE_STRINGS)
    }

    /// Indicates the size of indexes referring into the '#GUID' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.heap_sizes.contains(HeapSizes::LARGE_GUID)
    }

    /// Indicates the size of indexes referring into the '#Blob' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.heap_sizes.contains(HeapSizes::LARGE_BLOB)
    }

    /// Returns the width of a '#Strings' heap index in bytes
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        width(self.is_large_str())
    }

    /// Returns the width of a '#GUID' heap index in bytes
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        width(self.is_large_guid())
    }

    /// Returns the width of a '#Blob' heap index in bytes
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        width(self.is_large_blob())
    }

    /// Returns the width of a simple index into `table` in bytes.
    #[must_use]
    pub fn table_index_bytes(&self, table: TableId) -> u8 {
        width(self.is_large(table))
    }

    /// Returns the width of a `coded_index_type` column in bytes.
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        self.coded_indexes[coded_index_type as usize]
    }
}

fn width(is_large: bool) -> u8 {
    if is_large {
        4
    } else {
        2
    }
}
