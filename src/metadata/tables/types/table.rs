use crate::{
    file::{io::slice_at, parser::Parser},
    metadata::tables::types::{TableId, TableInfo},
    Result,
};

/// A row type that can be decoded from its table.
pub trait RowReadable: Sized {
    /// Reads one row at the position of `parser`, advancing it past the row.
    ///
    /// ## Arguments
    /// * `parser` - Cursor over the image buffer, positioned at the row
    /// * `rid`    - The 1-based row identifier
    /// * `sizes`  - Index widths from the row-count pass
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if a column runs past the buffer.
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self>;
}

/// Location and shape of one table inside the table stream.
///
/// Rows are addressed by arithmetic over this descriptor instead of being materialized,
/// so tables can reference each other without holding on to any borrowed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataTable {
    /// The kind of table
    pub id: TableId,
    /// Absolute offset of the first row inside the image buffer
    pub offset: usize,
    /// Width of one row in bytes
    pub row_size: u32,
    /// Declared number of rows
    pub rows: u32,
}

impl MetadataTable {
    /// Returns the declared size of the table in bytes, `None` on overflow.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        (self.row_size as usize).checked_mul(self.rows as usize)
    }

    /// Returns the bytes of the row with 1-based index `rid`, if it exists and fits `data`.
    #[must_use]
    pub fn row<'a>(&self, data: &'a [u8], rid: u32) -> Option<&'a [u8]> {
        if rid == 0 || rid > self.rows {
            return None;
        }

        let start = ((rid - 1) as usize)
            .checked_mul(self.row_size as usize)?
            .checked_add(self.offset)?;
        slice_at(data, start, self.row_size as usize)
    }

    /// Returns the start of the row `rid` if the whole row fits `data`.
    fn row_offset(&self, data: &[u8], rid: u32) -> Option<usize> {
        self.row(data, rid)?;
        Some((rid - 1) as usize * self.row_size as usize + self.offset)
    }

    /// Decodes the row with 1-based index `rid`, or `None` if it does not fit `data`.
    ///
    /// Each row gets a fresh cursor placed at its start.
    #[must_use]
    pub fn get<T: RowReadable>(&self, data: &[u8], rid: u32, sizes: &TableInfo) -> Option<T> {
        let mut parser = Parser::at(data, self.row_offset(data, rid)?).ok()?;
        T::row_read(&mut parser, rid, sizes).ok()
    }

    /// Decodes rows in order, ending at the first row that does not fit `data`.
    pub fn rows<'a, T: RowReadable + 'a>(
        &self,
        data: &'a [u8],
        sizes: &'a TableInfo,
    ) -> impl Iterator<Item = T> + 'a {
        let table = *self;
        (1..=table.rows).map_while(move |rid| table.get(data, rid, sizes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows() {
        #[rustfmt::skip]
        let data = [
            /* unrelated */ 0xCC,
            /* row 1     */ 0x01, 0x00,
            /* row 2     */ 0x02, 0x00,
            /* row 3     */ 0x03,
        ];

        let table = MetadataTable {
            id: TableId::ModuleRef,
            offset: 1,
            row_size: 2,
            rows: 3,
        };

        assert_eq!(table.size(), Some(6));
        assert_eq!(table.row(&data, 1), Some(&[0x01, 0x00][..]));
        assert_eq!(table.row(&data, 2), Some(&[0x02, 0x00][..]));
        assert_eq!(table.row(&data, 3), None);
        assert_eq!(table.row(&data, 0), None);
        assert_eq!(table.row(&data, 4), None);
    }

    struct Pair {
        rid: u32,
        offset: usize,
        value: u16,
    }

    impl RowReadable for Pair {
        fn row_read(parser: &mut Parser<'_>, rid: u32, _sizes: &TableInfo) -> Result<Self> {
            Ok(Pair {
                rid,
                offset: parser.pos(),
                value: parser.read_le::<u16>()?,
            })
        }
    }

    #[test]
    fn typed_rows() {
        let data = [0xCC, 0x01, 0x00, 0x02, 0x00, 0x03];
        let sizes = TableInfo::new_test(&[(TableId::ModuleRef, 3)], false, false, false);
        let table = MetadataTable {
            id: TableId::ModuleRef,
            offset: 1,
            row_size: 2,
            rows: 3,
        };

        let rows: Vec<Pair> = table.rows(&data, &sizes).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].rid, 2);
        assert_eq!(rows[1].offset, 3);
        assert_eq!(rows[1].value, 2);
        assert!(table.get::<Pair>(&data, 3, &sizes).is_none());
    }

    #[test]
    fn no_overflow() {
        let table = MetadataTable {
            id: TableId::Assembly,
            offset: usize::MAX - 4,
            row_size: 22,
            rows: 1,
        };

        let sizes = TableInfo::new_test(&[], false, false, false);
        assert_eq!(table.row(&[0; 8], 1), None);
        assert!(table.get::<Pair>(&[0; 8], 1, &sizes).is_none());
    }
}
