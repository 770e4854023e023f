//! `MethodDef` table (0x06): the methods of all types in the module.

mod raw;

use bitflags::bitflags;

pub use raw::*;

bitflags! {
    /// Attribute bits of a `MethodDef` row (ECMA-335 §II.23.1.10).
    ///
    /// The access group is covered by [`MethodAttributes::MEMBER_ACCESS_MASK`] and is modelled
    /// separately by [`crate::metadata::visibility::MemberAccess`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodAttributes: u16 {
        /// The 3 bits holding the accessibility of the method
        const MEMBER_ACCESS_MASK = 0x0007;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
        /// Method can only be overriden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// Implementation is forwarded through `PInvoke`
        const PINVOKE_IMPL = 0x2000;
        /// Reserved: shall be zero for conforming implementations
        const UNMANAGED_EXPORT = 0x0008;
        /// CLI provides 'special' behavior, depending upon the name of the method
        const RT_SPECIAL_NAME = 0x1000;
        /// Method has security associate with it
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;

        const _ = !0;
    }
}
