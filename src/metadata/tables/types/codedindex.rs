use strum::{EnumCount, EnumIter};

use crate::{
    file::parser::Parser,
    metadata::tables::{TableId, TableInfo},
    Result,
};

/// The coded index kinds of ECMA-335 II.24.2.6.
///
/// A coded index packs a tag selecting one of several target tables into its low bits and
/// a 1-based row into the rest. The tag width is fixed per kind; the column is 4 bytes wide
/// whenever the largest target table has more rows than the remaining bits can address.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
pub enum CodedIndexType {
    /// `TypeDef`, `TypeRef` or `TypeSpec`
    TypeDefOrRef,
    /// `Field`, `Param` or `Property`
    HasConstant,
    /// Any of the 22 tables that can carry a custom attribute
    HasCustomAttribute,
    /// `Field` or `Param`
    HasFieldMarshal,
    /// `TypeDef`, `MethodDef` or `Assembly`
    HasDeclSecurity,
    /// `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef` or `TypeSpec`
    MemberRefParent,
    /// `Event` or `Property`
    HasSemantics,
    /// `MethodDef` or `MemberRef`
    MethodDefOrRef,
    /// `Field` or `MethodDef`
    MemberForwarded,
    /// `File`, `AssemblyRef` or `ExportedType`
    Implementation,
    /// `MethodDef` (tag 2) or `MemberRef` (tag 3); tags 0, 1 and 4 are unused
    CustomAttributeType,
    /// `Module`, `ModuleRef`, `AssemblyRef` or `TypeRef`
    ResolutionScope,
    /// `TypeDef` or `MethodDef`
    TypeOrMethodDef,
}

impl CodedIndexType {
    /// Returns the tables this coded index can reference, in tag order.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::HasConstant => &[TableId::Field, TableId::Param, TableId::Property],
            CodedIndexType::HasCustomAttribute => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                // 'Permission' in the standard, which has no table of that name
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
            ],
            CodedIndexType::HasFieldMarshal => &[TableId::Field, TableId::Param],
            CodedIndexType::HasDeclSecurity => {
                &[TableId::TypeDef, TableId::MethodDef, TableId::Assembly]
            }
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::HasSemantics => &[TableId::Event, TableId::Property],
            CodedIndexType::MethodDefOrRef => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::MemberForwarded => &[TableId::Field, TableId::MethodDef],
            CodedIndexType::Implementation => {
                &[TableId::File, TableId::AssemblyRef, TableId::ExportedType]
            }
            CodedIndexType::CustomAttributeType => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
            CodedIndexType::TypeOrMethodDef => &[TableId::TypeDef, TableId::MethodDef],
        }
    }

    /// Returns the number of tag values, including unused ones.
    #[must_use]
    pub fn tag_count(&self) -> usize {
        match self {
            CodedIndexType::CustomAttributeType => 5,
            _ => self.tables().len(),
        }
    }

    /// Returns the number of low bits holding the tag, `ceil(log2(tag_count))`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn tag_bits(&self) -> u8 {
        let tags = self.tag_count();
        // tag_count is at least 2 for every kind
        (usize::BITS - (tags - 1).leading_zeros()) as u8
    }

    /// Returns the table a tag value selects, or `None` for unused or out-of-range tags.
    #[must_use]
    pub fn table(&self, tag: u32) -> Option<TableId> {
        match self {
            CodedIndexType::CustomAttributeType => match tag {
                2 => Some(TableId::MethodDef),
                3 => Some(TableId::MemberRef),
                _ => None,
            },
            _ => self.tables().get(tag as usize).copied(),
        }
    }

    /// Splits a raw column value into its tag and row.
    #[must_use]
    pub fn decode(&self, value: u32) -> CodedIndex {
        let tag_bits = self.tag_bits();
        CodedIndex {
            tag: value & ((1 << tag_bits) - 1),
            row: value >> tag_bits,
        }
    }
}

/// A coded index split into its raw tag and 1-based row (0 meaning "none").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodedIndex {
    /// The raw tag value
    pub tag: u32,
    /// The row the index points to
    pub row: u32,
}

impl CodedIndex {
    /// Reads a `kind` column at the cursor, sized by `sizes`, and splits it.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the column does not fit.
    pub fn read(
        parser: &mut Parser<'_>,
        sizes: &TableInfo,
        kind: CodedIndexType,
    ) -> Result<CodedIndex> {
        let value = parser.read_index(sizes.coded_index_bytes(kind) == 4)?;
        Ok(kind.decode(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn tag_bits() {
        assert_eq!(CodedIndexType::TypeDefOrRef.tag_bits(), 2);
        assert_eq!(CodedIndexType::HasConstant.tag_bits(), 2);
        assert_eq!(CodedIndexType::HasCustomAttribute.tag_bits(), 5);
        assert_eq!(CodedIndexType::HasFieldMarshal.tag_bits(), 1);
        assert_eq!(CodedIndexType::HasDeclSecurity.tag_bits(), 2);
        assert_eq!(CodedIndexType::MemberRefParent.tag_bits(), 3);
        assert_eq!(CodedIndexType::HasSemantics.tag_bits(), 1);
        assert_eq!(CodedIndexType::MethodDefOrRef.tag_bits(), 1);
        assert_eq!(CodedIndexType::MemberForwarded.tag_bits(), 1);
        assert_eq!(CodedIndexType::Implementation.tag_bits(), 2);
        assert_eq!(CodedIndexType::CustomAttributeType.tag_bits(), 3);
        assert_eq!(CodedIndexType::ResolutionScope.tag_bits(), 2);
        assert_eq!(CodedIndexType::TypeOrMethodDef.tag_bits(), 1);
    }

    #[test]
    fn every_kind_has_tables() {
        for kind in CodedIndexType::iter() {
            assert!(kind.tag_count() >= 2, "{kind:?}");
            assert!(kind.tables().len() <= kind.tag_count());
        }
    }

    #[test]
    fn decode() {
        // Assembly, row 1
        let index = CodedIndexType::HasCustomAttribute.decode((1 << 5) | 14);
        assert_eq!(index, CodedIndex { tag: 14, row: 1 });
        assert_eq!(
            CodedIndexType::HasCustomAttribute.table(index.tag),
            Some(TableId::Assembly)
        );

        // MemberRef, row 7
        let index = CodedIndexType::CustomAttributeType.decode((7 << 3) | 3);
        assert_eq!(index, CodedIndex { tag: 3, row: 7 });
        assert_eq!(
            CodedIndexType::CustomAttributeType.table(index.tag),
            Some(TableId::MemberRef)
        );
        assert_eq!(CodedIndexType::CustomAttributeType.table(4), None);
        assert_eq!(CodedIndexType::CustomAttributeType.table(0), None);

        // TypeRef, row 2
        let index = CodedIndexType::MemberRefParent.decode((2 << 3) | 1);
        assert_eq!(
            CodedIndexType::MemberRefParent.table(index.tag),
            Some(TableId::TypeRef)
        );
        assert_eq!(CodedIndexType::MemberRefParent.table(7), None);
    }

    #[test]
    fn read() {
        let data = [0x2E, 0x00, 0x2E, 0x00, 0x00, 0x00];

        let sizes = TableInfo::new_test(&[], false, false, false);
        let mut parser = Parser::new(&data);
        let index =
            CodedIndex::read(&mut parser, &sizes, CodedIndexType::HasCustomAttribute).unwrap();
        assert_eq!(index, CodedIndex { tag: 14, row: 1 });
        assert_eq!(parser.pos(), 2);

        let sizes = TableInfo::new_test(&[(TableId::MethodDef, 3000)], false, false, false);
        let mut parser = Parser::at(&data, 2).unwrap();
        let index =
            CodedIndex::read(&mut parser, &sizes, CodedIndexType::HasCustomAttribute).unwrap();
        assert_eq!(index, CodedIndex { tag: 14, row: 1 });
        assert_eq!(parser.pos(), 6);

        let mut parser = Parser::at(&data, 4).unwrap();
        assert!(CodedIndex::read(&mut parser, &sizes, CodedIndexType::HasCustomAttribute).is_err());
        assert_eq!(parser.pos(), 4);
    }
}
