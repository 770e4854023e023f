use strum::{EnumCount, EnumIter};

/// Identifiers for the metadata tables defined in ECMA-335 §II.22.
///
/// The numeric value of each variant is the table number used in the `valid` bit vector of
/// the tables stream header and in the high byte of a metadata token.
///
/// Only the tables of the assembly metadata are listed. Portable PDB tables (0x30 and up)
/// may still be announced by an image; they are placed after every table listed here, so
/// their rows never influence the location of a table this crate reads.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash, PartialOrd, Ord)]
pub enum TableId {
    /// `Module` - the current module
    Module = 0x00,
    /// `TypeRef` - references to types of other modules or assemblies
    TypeRef = 0x01,
    /// `TypeDef` - type definitions
    TypeDef = 0x02,
    /// `FieldPtr` - indirection into `Field`, only in unoptimized metadata
    FieldPtr = 0x03,
    /// `Field` - field definitions
    Field = 0x04,
    /// `MethodPtr` - indirection into `MethodDef`, only in unoptimized metadata
    MethodPtr = 0x05,
    /// `MethodDef` - method definitions
    MethodDef = 0x06,
    /// `ParamPtr` - indirection into `Param`, only in unoptimized metadata
    ParamPtr = 0x07,
    /// `Param` - method parameters
    Param = 0x08,
    /// `InterfaceImpl` - interfaces implemented by types
    InterfaceImpl = 0x09,
    /// `MemberRef` - references to fields and methods
    MemberRef = 0x0A,
    /// `Constant` - compile-time constants
    Constant = 0x0B,
    /// `CustomAttribute` - custom attribute applications
    CustomAttribute = 0x0C,
    /// `FieldMarshal` - marshalling descriptors
    FieldMarshal = 0x0D,
    /// `DeclSecurity` - declarative security
    DeclSecurity = 0x0E,
    /// `ClassLayout` - explicit type layout
    ClassLayout = 0x0F,
    /// `FieldLayout` - explicit field offsets
    FieldLayout = 0x10,
    /// `StandAloneSig` - standalone signatures
    StandAloneSig = 0x11,
    /// `EventMap` - type to event list mapping
    EventMap = 0x12,
    /// `EventPtr` - indirection into `Event`, only in unoptimized metadata
    EventPtr = 0x13,
    /// `Event` - event definitions
    Event = 0x14,
    /// `PropertyMap` - type to property list mapping
    PropertyMap = 0x15,
    /// `PropertyPtr` - indirection into `Property`, only in unoptimized metadata
    PropertyPtr = 0x16,
    /// `Property` - property definitions
    Property = 0x17,
    /// `MethodSemantics` - property and event accessors
    MethodSemantics = 0x18,
    /// `MethodImpl` - explicit method overrides
    MethodImpl = 0x19,
    /// `ModuleRef` - references to other modules
    ModuleRef = 0x1A,
    /// `TypeSpec` - type specifications
    TypeSpec = 0x1B,
    /// `ImplMap` - P/Invoke mappings
    ImplMap = 0x1C,
    /// `FieldRVA` - initial field data
    FieldRVA = 0x1D,
    /// `EncLog` - edit and continue log
    EncLog = 0x1E,
    /// `EncMap` - edit and continue token map
    EncMap = 0x1F,
    /// `Assembly` - the current assembly
    Assembly = 0x20,
    /// `AssemblyProcessor` - unused
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` - unused
    AssemblyOS = 0x22,
    /// `AssemblyRef` - referenced assemblies
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` - unused
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` - unused
    AssemblyRefOS = 0x25,
    /// `File` - files of a multi-file assembly
    File = 0x26,
    /// `ExportedType` - types exported from other modules
    ExportedType = 0x27,
    /// `ManifestResource` - manifest resources
    ManifestResource = 0x28,
    /// `NestedClass` - nested type to enclosing type mapping
    NestedClass = 0x29,
    /// `GenericParam` - generic parameters
    GenericParam = 0x2A,
    /// `MethodSpec` - generic method instantiations
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` - generic parameter constraints
    GenericParamConstraint = 0x2C,
}

impl TableId {
    /// The token prefix of rows in this table (`table << 24`).
    #[must_use]
    pub fn token_base(self) -> u32 {
        (self as u32) << 24
    }
}
