//! `TypeDef` table (0x02): the type definitions of a module.
//!
//! Every type of the module, including the `<Module>` pseudo type and nested types, owns one
//! row. The row's `Flags` column carries the [`TypeAttributes`], its `FieldList` and
//! `MethodList` columns mark the start of the contiguous runs of fields and methods it owns.

mod raw;

use bitflags::bitflags;

pub use raw::*;

bitflags! {
    /// Attribute bits of a `TypeDef` row (ECMA-335 §II.23.1.15).
    ///
    /// The visibility group is covered by [`TypeAttributes::VISIBILITY_MASK`] and is modelled
    /// separately by [`crate::metadata::visibility::TypeVisibility`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeAttributes: u32 {
        /// The 3 bits holding the visibility of the type
        const VISIBILITY_MASK = 0x0000_0007;
        /// The 2 bits holding the layout of the type
        const LAYOUT_MASK = 0x0000_0018;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Type is abstract
        const ABSTRACT = 0x0000_0080;
        /// Type cannot be derived from
        const SEALED = 0x0000_0100;
        /// Name is special, the name describes how
        const SPECIAL_NAME = 0x0000_0400;
        /// Type is imported
        const IMPORT = 0x0000_1000;
        /// Type is serializable
        const SERIALIZABLE = 0x0000_2000;
        /// The 2 bits holding the string format for interop
        const STRING_FORMAT_MASK = 0x0003_0000;
        /// Initialize the type any time before the first static field access
        const BEFORE_FIELD_INIT = 0x0010_0000;
        /// The runtime treats the name specially
        const RT_SPECIAL_NAME = 0x0000_0800;
        /// Type has security associated with it
        const HAS_SECURITY = 0x0004_0000;
        /// Type is a forwarder, only used in `ExportedType`
        const IS_TYPE_FORWARDER = 0x0020_0000;

        // Keep unknown and multi-bit values intact
        const _ = !0;
    }
}
