use crate::metadata::tables::types::{CodedIndexType, TableId, TableInfo};

impl TableId {
    /// Returns the byte width of one row of this table, per the column definitions of
    /// ECMA-335 II.22.
    ///
    /// Column widths are fixed scalars, heap indexes sized by the stream header flags,
    /// simple indexes sized by the target table and coded indexes sized by their largest
    /// target. All of them come from `sizes`, so the result is only meaningful after the
    /// row-count pass.
    #[must_use]
    #[rustfmt::skip]
    pub fn row_size(self, sizes: &TableInfo) -> u32 {
        let string = sizes.str_bytes();
        let guid = sizes.guid_bytes();
        let blob = sizes.blob_bytes();
        let index = |table: TableId| sizes.table_index_bytes(table);
        let coded = |kind: CodedIndexType| sizes.coded_index_bytes(kind);

        u32::from(match self {
            TableId::Module => {
                /* generation */  2 +
                /* name */        string +
                /* mvid */        guid +
                /* encid */       guid +
                /* encbaseid */   guid
            }
            TableId::TypeRef => {
                /* resolution_scope */ coded(CodedIndexType::ResolutionScope) +
                /* type_name */        string +
                /* type_namespace */   string
            }
            TableId::TypeDef => {
                /* flags */          4 +
                /* type_name */      string +
                /* type_namespace */ string +
                /* extends */        coded(CodedIndexType::TypeDefOrRef) +
                /* field_list */     index(TableId::Field) +
                /* method_list */    index(TableId::MethodDef)
            }
            TableId::FieldPtr => /* field */ index(TableId::Field),
            TableId::Field => {
                /* flags */     2 +
                /* name */      string +
                /* signature */ blob
            }
            TableId::MethodPtr => /* method */ index(TableId::MethodDef),
            TableId::MethodDef => {
                /* rva */        4 +
                /* impl_flags */ 2 +
                /* flags */      2 +
                /* name */       string +
                /* signature */  blob +
                /* param_list */ index(TableId::Param)
            }
            TableId::ParamPtr => /* param */ index(TableId::Param),
            TableId::Param => {
                /* flags */    2 +
                /* sequence */ 2 +
                /* name */     string
            }
            TableId::InterfaceImpl => {
                /* class */     index(TableId::TypeDef) +
                /* interface */ coded(CodedIndexType::TypeDefOrRef)
            }
            TableId::MemberRef => {
                /* class */     coded(CodedIndexType::MemberRefParent) +
                /* name */      string +
                /* signature */ blob
            }
            TableId::Constant => {
                /* base */    1 +
                /* padding */ 1 +
                /* parent */  coded(CodedIndexType::HasConstant) +
                /* value */   blob
            }
            TableId::CustomAttribute => {
                /* parent */      coded(CodedIndexType::HasCustomAttribute) +
                /* constructor */ coded(CodedIndexType::CustomAttributeType) +
                /* value */       blob
            }
            TableId::FieldMarshal => {
                /* parent */      coded(CodedIndexType::HasFieldMarshal) +
                /* native_type */ blob
            }
            TableId::DeclSecurity => {
                /* action */         2 +
                /* parent */         coded(CodedIndexType::HasDeclSecurity) +
                /* permission_set */ blob
            }
            TableId::ClassLayout => {
                /* packing_size */ 2 +
                /* class_size */   4 +
                /* parent */       index(TableId::TypeDef)
            }
            TableId::FieldLayout => {
                /* offset */ 4 +
                /* field */  index(TableId::Field)
            }
            TableId::StandAloneSig => /* signature */ blob,
            TableId::EventMap => {
                /* parent */     index(TableId::TypeDef) +
                /* event_list */ index(TableId::Event)
            }
            TableId::EventPtr => /* event */ index(TableId::Event),
            TableId::Event => {
                /* flags */      2 +
                /* name */       string +
                /* event_type */ coded(CodedIndexType::TypeDefOrRef)
            }
            TableId::PropertyMap => {
                /* parent */        index(TableId::TypeDef) +
                /* property_list */ index(TableId::Property)
            }
            TableId::PropertyPtr => /* property */ index(TableId::Property),
            TableId::Property => {
                /* flags */     2 +
                /* name */      string +
                /* signature */ blob
            }
            TableId::MethodSemantics => {
                /* semantics */   2 +
                /* method */      index(TableId::MethodDef) +
                /* association */ coded(CodedIndexType::HasSemantics)
            }
            TableId::MethodImpl => {
                /* class */              index(TableId::TypeDef) +
                /* method_body */        coded(CodedIndexType::MethodDefOrRef) +
                /* method_declaration */ coded(CodedIndexType::MethodDefOrRef)
            }
            TableId::ModuleRef => /* name */ string,
            TableId::TypeSpec => /* signature */ blob,
            TableId::ImplMap => {
                /* mapping_flags */    2 +
                /* member_forwarded */ coded(CodedIndexType::MemberForwarded) +
                /* import_name */      string +
                /* import_scope */     index(TableId::ModuleRef)
            }
            TableId::FieldRVA => {
                /* rva */   4 +
                /* field */ index(TableId::Field)
            }
            TableId::EncLog => {
                /* token */     4 +
                /* func_code */ 4
            }
            TableId::EncMap => /* token */ 4,
            TableId::Assembly => {
                /* hash_alg_id */     4 +
                /* major_version */   2 +
                /* minor_version */   2 +
                /* build_number */    2 +
                /* revision_number */ 2 +
                /* flags */           4 +
                /* public_key */      blob +
                /* name */            string +
                /* culture */         string
            }
            TableId::AssemblyProcessor => /* processor */ 4,
            TableId::AssemblyOS => {
                /* os_platform_id */   4 +
                /* os_major_version */ 4 +
                /* os_minor_version */ 4
            }
            TableId::AssemblyRef => {
                /* major_version */       2 +
                /* minor_version */       2 +
                /* build_number */        2 +
                /* revision_number */     2 +
                /* flags */               4 +
                /* public_key_or_token */ blob +
                /* name */                string +
                /* culture */             string +
                /* hash_value */          blob
            }
            TableId::AssemblyRefProcessor => {
                /* processor */    4 +
                /* assembly_ref */ index(TableId::AssemblyRef)
            }
            TableId::AssemblyRefOS => {
                /* os_platform_id */   4 +
                /* os_major_version */ 4 +
                /* os_minor_version */ 4 +
                /* assembly_ref */     index(TableId::AssemblyRef)
            }
            TableId::File => {
                /* flags */      4 +
                /* name */       string +
                /* hash_value */ blob
            }
            TableId::ExportedType => {
                /* flags */          4 +
                /* type_def_id */    4 +
                /* type_name */      string +
                /* type_namespace */ string +
                /* implementation */ coded(CodedIndexType::Implementation)
            }
            TableId::ManifestResource => {
                /* offset */         4 +
                /* flags */          4 +
                /* name */           string +
                /* implementation */ coded(CodedIndexType::Implementation)
            }
            TableId::NestedClass => {
                /* nested_class */    index(TableId::TypeDef) +
                /* enclosing_class */ index(TableId::TypeDef)
            }
            TableId::GenericParam => {
                /* number */ 2 +
                /* flags */  2 +
                /* owner */  coded(CodedIndexType::TypeOrMethodDef) +
                /* name */   string
            }
            TableId::MethodSpec => {
                /* method */        coded(CodedIndexType::MethodDefOrRef) +
                /* instantiation */ blob
            }
            TableId::GenericParamConstraint => {
                /* owner */      index(TableId::GenericParam) +
                /* constraint */ coded(CodedIndexType::TypeDefOrRef)
            }
        })
    }
}
