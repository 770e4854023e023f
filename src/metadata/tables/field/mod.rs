//! `Field` table (0x04): the fields of all types in the module.

mod raw;

use bitflags::bitflags;

pub use raw::*;

bitflags! {
    /// Attribute bits of a `Field` row (ECMA-335 §II.23.1.5).
    ///
    /// The access group is covered by [`FieldAttributes::FIELD_ACCESS_MASK`] and is modelled
    /// separately by [`crate::metadata::visibility::MemberAccess`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldAttributes: u16 {
        /// The 3 bits holding the accessibility of the field
        const FIELD_ACCESS_MASK = 0x0007;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init
        const INIT_ONLY = 0x0020;
        /// Value is compile time constant
        const LITERAL = 0x0040;
        /// Reserved (to indicate this field should not be serialized when type is remoted)
        const NOT_SERIALIZED = 0x0080;
        /// Field is special
        const SPECIAL_NAME = 0x0200;
        /// Implementation is forwarded through `PInvoke`
        const PINVOKE_IMPL = 0x2000;
        /// CLI provides 'special' behavior, depending upon the name of the field
        const RT_SPECIAL_NAME = 0x0400;
        /// Field has marshalling information
        const HAS_FIELD_MARSHAL = 0x1000;
        /// Field has default
        const HAS_DEFAULT = 0x8000;
        /// Field has RVA
        const HAS_FIELD_RVA = 0x0100;

        const _ = !0;
    }
}
