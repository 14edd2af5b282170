use strum::{EnumCount, EnumIter, FromRepr};

/// Identifies a metadata table by its bit position in the `Valid` mask of the table stream.
///
/// The discriminants are the ECMA-335 table numbers. Tables in the stream appear in this
/// order, so iterating the mask from bit 0 upwards visits them in storage order.
///
/// ## Reference
/// * [ECMA-335 Partition II, Section 22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Metadata Tables
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, FromRepr, Eq, Hash)]
#[repr(u8)]
pub enum TableId {
    /// `Module` table (0x00) - the current module, exactly one row
    Module = 0x00,
    /// `TypeRef` table (0x01) - references to types defined elsewhere
    TypeRef = 0x01,
    /// `TypeDef` table (0x02) - types defined in this module
    TypeDef = 0x02,
    /// `FieldPtr` table (0x03) - field indirection, uncompressed streams only
    FieldPtr = 0x03,
    /// `Field` table (0x04)
    Field = 0x04,
    /// `MethodPtr` table (0x05) - method indirection, uncompressed streams only
    MethodPtr = 0x05,
    /// `MethodDef` table (0x06)
    MethodDef = 0x06,
    /// `ParamPtr` table (0x07) - parameter indirection, uncompressed streams only
    ParamPtr = 0x07,
    /// `Param` table (0x08)
    Param = 0x08,
    /// `InterfaceImpl` table (0x09)
    InterfaceImpl = 0x09,
    /// `MemberRef` table (0x0A) - references to fields and methods of other types
    MemberRef = 0x0A,
    /// `Constant` table (0x0B) - compile-time constants of fields, params and properties
    Constant = 0x0B,
    /// `CustomAttribute` table (0x0C)
    CustomAttribute = 0x0C,
    /// `FieldMarshal` table (0x0D)
    FieldMarshal = 0x0D,
    /// `DeclSecurity` table (0x0E)
    DeclSecurity = 0x0E,
    /// `ClassLayout` table (0x0F)
    ClassLayout = 0x0F,
    /// `FieldLayout` table (0x10)
    FieldLayout = 0x10,
    /// `StandAloneSig` table (0x11)
    StandAloneSig = 0x11,
    /// `EventMap` table (0x12)
    EventMap = 0x12,
    /// `EventPtr` table (0x13) - event indirection, uncompressed streams only
    EventPtr = 0x13,
    /// `Event` table (0x14)
    Event = 0x14,
    /// `PropertyMap` table (0x15)
    PropertyMap = 0x15,
    /// `PropertyPtr` table (0x16) - property indirection, uncompressed streams only
    PropertyPtr = 0x16,
    /// `Property` table (0x17)
    Property = 0x17,
    /// `MethodSemantics` table (0x18)
    MethodSemantics = 0x18,
    /// `MethodImpl` table (0x19)
    MethodImpl = 0x19,
    /// `ModuleRef` table (0x1A) - referenced native and managed modules
    ModuleRef = 0x1A,
    /// `TypeSpec` table (0x1B)
    TypeSpec = 0x1B,
    /// `ImplMap` table (0x1C) - P/Invoke mappings
    ImplMap = 0x1C,
    /// `FieldRVA` table (0x1D) - initial data of fields
    FieldRVA = 0x1D,
    /// `EncLog` table (0x1E)
    EncLog = 0x1E,
    /// `EncMap` table (0x1F)
    EncMap = 0x1F,
    /// `Assembly` table (0x20) - the assembly manifest, at most one row
    Assembly = 0x20,
    /// `AssemblyProcessor` table (0x21)
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` table (0x22)
    AssemblyOS = 0x22,
    /// `AssemblyRef` table (0x23) - referenced assemblies
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` table (0x24)
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` table (0x25)
    AssemblyRefOS = 0x25,
    /// `File` table (0x26)
    File = 0x26,
    /// `ExportedType` table (0x27)
    ExportedType = 0x27,
    /// `ManifestResource` table (0x28) - embedded and linked resources
    ManifestResource = 0x28,
    /// `NestedClass` table (0x29)
    NestedClass = 0x29,
    /// `GenericParam` table (0x2A)
    GenericParam = 0x2A,
    /// `MethodSpec` table (0x2B)
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table (0x2C)
    GenericParamConstraint = 0x2C,
}

impl TableId {
    /// Returns the table stored at bit position `bit` of the `Valid` mask, if one is defined.
    #[must_use]
    pub fn from_bit(bit: u32) -> Option<TableId> {
        u8::try_from(bit).ok().and_then(TableId::from_repr)
    }

    /// Returns the bit of this table in the `Valid` mask.
    #[must_use]
    pub fn mask(self) -> u64 {
        1 << self as u8
    }
}
