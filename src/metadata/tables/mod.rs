//! Metadata tables of the `#~` stream.
//!
//! A private `types` module carries everything shared by all tables: table kinds, coded indexes,
//! the row-count pass ([`TableInfo`]) and the per-table row layouts. The remaining
//! modules each decode one table kind with a `*Raw` row type and, for the tables that
//! feed the output record, an extraction step.
//!
//! Extraction runs over the placed tables in storage order. Each table is independent: a
//! row that cannot be decoded is skipped, a table that cannot be reached contributes
//! nothing, and neither affects any other table.

mod types;
pub use types::{CodedIndex, CodedIndexType, MetadataTable, RowReadable, TableId, TableInfo};

mod assembly;
mod assemblyref;
mod constant;
mod customattribute;
mod fieldrva;
mod manifestresource;
mod memberref;
mod module;
mod moduleref;
mod typeref;

pub use assembly::AssemblyRaw;
pub use assemblyref::AssemblyRefRaw;
pub use constant::{ConstantRaw, ELEMENT_TYPE_STRING};
pub use customattribute::CustomAttributeRaw;
pub use fieldrva::FieldRvaRaw;
pub use manifestresource::ManifestResourceRaw;
pub use memberref::MemberRefRaw;
pub use module::ModuleRaw;
pub use moduleref::ModuleRefRaw;
pub use typeref::TypeRefRaw;

use crate::{
    file::Image,
    metadata::{
        record::DotNet,
        streams::{Blob, Strings, TablesHeader},
    },
};

/// Everything a table extraction step may read from.
pub(crate) struct TableContext<'a> {
    /// The image buffer all offsets point into
    pub data: &'a [u8],
    /// The laid-out table stream
    pub header: &'a TablesHeader,
    /// The `#Strings` heap
    pub strings: Strings<'a>,
    /// The `#Blob` heap
    pub blob: Blob<'a>,
    /// The image, for RVA translation
    pub image: &'a dyn Image,
    /// File offset of the managed resources blob of the CLI header
    pub resource_base: Option<usize>,
}

impl TableContext<'_> {
    /// Returns the index widths from the row-count pass
    pub fn sizes(&self) -> &TableInfo {
        &self.header.info
    }
}

/// Runs the extraction step of every placed table which has one.
pub(crate) fn extract(context: &TableContext<'_>, out: &mut DotNet) {
    let placed = context.header.tables().len();
    if placed < context.header.table_count() as usize {
        log::debug!("{} of {} declared tables were placed", placed, context.header.table_count());
    }

    for table in context.header.tables() {
        match table.id {
            TableId::Module => module::extract(context, table, out),
            TableId::Constant => constant::extract(context, table, out),
            TableId::CustomAttribute => customattribute::extract(context, table, out),
            TableId::ModuleRef => moduleref::extract(context, table, out),
            TableId::FieldRVA => fieldrva::extract(context, table, out),
            TableId::Assembly => assembly::extract(context, table, out),
            TableId::AssemblyRef => assemblyref::extract(context, table, out),
            TableId::ManifestResource => manifestresource::extract(context, table, out),
            _ => {}
        }
    }
}

/// Converts a collected length into an output count.
fn count(len: usize) -> Option<u32> {
    Some(u32::try_from(len).unwrap_or(u32::MAX))
}
