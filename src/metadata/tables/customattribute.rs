use crate::{
    file::{
        io::{read_le, slice_at},
        parser::Parser,
    },
    metadata::{
        record::DotNet,
        tables::{
            CodedIndex, CodedIndexType, MemberRefRaw, MetadataTable, RowReadable, TableContext,
            TableId, TableInfo, TypeRefRaw,
        },
    },
    Result,
};

/// Name of the attribute type the type library GUID is taken from
pub const GUID_ATTRIBUTE: &str = "GuidAttribute";

/// A `CustomAttribute` row: an attribute instance attached to some metadata item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAttributeRaw {
    /// Row ID
    pub rid: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// A `HasCustomAttribute` coded index, the item carrying the attribute
    pub parent: CodedIndex,
    /// A `CustomAttributeType` coded index, the attribute constructor
    pub constructor: CodedIndex,
    /// Index into the '#Blob' heap, the encoded arguments
    pub value: u32,
}

impl RowReadable for CustomAttributeRaw {
    fn row_read(parser: &mut Parser<'_>, rid: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(CustomAttributeRaw {
            rid,
            offset: parser.pos(),
            parent: CodedIndex::read(parser, sizes, CodedIndexType::HasCustomAttribute)?,
            constructor: CodedIndex::read(parser, sizes, CodedIndexType::CustomAttributeType)?,
            value: parser.read_index(sizes.is_large_blob())?,
        })
    }
}

/// Sets `typelib` from `GuidAttribute` instances on the assembly; the last one wins.
///
/// The constructor is followed into `MemberRef`, its class into `TypeRef`, and the type
/// name compared. Any row that breaks the chain is skipped.
pub(crate) fn extract(context: &TableContext<'_>, table: &MetadataTable, out: &mut DotNet) {
    let (Some(member_refs), Some(type_refs)) = (
        context.header.table(TableId::MemberRef),
        context.header.table(TableId::TypeRef),
    ) else {
        return;
    };

    for attribute in table.rows::<CustomAttributeRaw>(context.data, context.sizes()) {
        match typelib(context, &attribute, member_refs, type_refs) {
            Ok(Some(typelib)) => out.typelib = Some(typelib),
            Ok(None) => {}
            Err(error) => log::debug!("CustomAttribute {} chase failed: {error}", attribute.rid),
        }
    }
}

/// Resolves one attribute row; `Ok(None)` when it is not a `GuidAttribute` on the assembly.
fn typelib(
    context: &TableContext<'_>,
    attribute: &CustomAttributeRaw,
    member_refs: &MetadataTable,
    type_refs: &MetadataTable,
) -> Result<Option<String>> {
    if CodedIndexType::HasCustomAttribute.table(attribute.parent.tag) != Some(TableId::Assembly)
        || CodedIndexType::CustomAttributeType.table(attribute.constructor.tag)
            != Some(TableId::MemberRef)
        || attribute.constructor.row == 0
    {
        return Ok(None);
    }

    let Some(member_ref) =
        member_refs.get::<MemberRefRaw>(context.data, attribute.constructor.row, context.sizes())
    else {
        return Err(out_of_range_error!(member_refs.offset, attribute.constructor.row));
    };

    if CodedIndexType::MemberRefParent.table(member_ref.class.tag) != Some(TableId::TypeRef)
        || member_ref.class.row == 0
    {
        return Ok(None);
    }

    let Some(type_ref) =
        type_refs.get::<TypeRefRaw>(context.data, member_ref.class.row, context.sizes())
    else {
        return Err(out_of_range_error!(type_refs.offset, member_ref.class.row));
    };

    let Some(name) = context.strings.get_bytes(type_ref.type_name) else {
        return Err(malformed_error!("TypeRef {} name unreadable", type_ref.rid));
    };

    if name != GUID_ATTRIBUTE.as_bytes() || attribute.value == 0 {
        return Ok(None);
    }

    let (start, length) = context.blob.locate(attribute.value)?;
    // prolog + string length
    let prefix = match slice_at(context.data, start, 3) {
        Some(prefix) if length >= 3 => prefix,
        _ => return Ok(None),
    };

    if read_le::<u16>(prefix)? != 0x0001 {
        return Ok(None);
    }

    let str_len = prefix[2];
    let Some(text) = slice_at(context.data, start + 3, usize::from(str_len)) else {
        return Err(out_of_range_error!(start + 3, str_len));
    };

    let typelib = match text.first() {
        None | Some(0x00 | 0xFF) => String::new(),
        Some(_) => {
            let end = text.iter().position(|byte| *byte == 0).unwrap_or(text.len());
            String::from_utf8_lossy(&text[..end]).into_owned()
        }
    };

    Ok(Some(typelib))
}
