//! Building blocks shared by all metadata tables: table kinds, coded indexes, the
//! row-count pass and the per-table row layouts.

mod codedindex;
mod layout;
mod table;
mod tableid;
mod tableinfo;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use table::{MetadataTable, RowReadable};
pub use tableid::TableId;
pub use tableinfo::TableInfo;
