//! Visibility and accessibility of definitions as closed variants.
//!
//! ECMA-335 stores the visibility of a type and the accessibility of a member as a 3-bit group
//! inside the flags column. The groups are mutually exclusive values, not independent bits, so
//! OR-ing `Public` onto a stale value produces a different (wrong) variant. [`TypeVisibility`] and
//! [`MemberAccess`] model the groups as enums; definitions keep them apart from the remaining
//! attribute bits and only recombine the two when the flags are written.

use strum::EnumIter;

/// Mask of the visibility group in `TypeAttributes`.
pub const TYPE_VISIBILITY_MASK: u32 = 0x0000_0007;
/// Mask of the access group in `MethodAttributes` and `FieldAttributes`.
pub const MEMBER_ACCESS_MASK: u16 = 0x0007;

/// Visibility of a type (ECMA-335 §II.23.1.15, `VisibilityMask`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TypeVisibility {
    /// Class has no public scope
    NotPublic,
    /// Class has public scope
    Public,
    /// Class is nested with public visibility
    NestedPublic,
    /// Class is nested with private visibility
    NestedPrivate,
    /// Class is nested with family visibility
    NestedFamily,
    /// Class is nested with assembly visibility
    NestedAssembly,
    /// Class is nested with family and assembly visibility
    NestedFamAndAssem,
    /// Class is nested with family or assembly visibility
    NestedFamOrAssem,
}

impl TypeVisibility {
    /// Extract the visibility from raw `TypeDef` flags
    #[must_use]
    pub fn from_type_flags(flags: u32) -> Self {
        match flags & TYPE_VISIBILITY_MASK {
            0 => TypeVisibility::NotPublic,
            1 => TypeVisibility::Public,
            2 => TypeVisibility::NestedPublic,
            3 => TypeVisibility::NestedPrivate,
            4 => TypeVisibility::NestedFamily,
            5 => TypeVisibility::NestedAssembly,
            6 => TypeVisibility::NestedFamAndAssem,
            _ => TypeVisibility::NestedFamOrAssem,
        }
    }

    /// The raw value of the visibility group
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            TypeVisibility::NotPublic => 0,
            TypeVisibility::Public => 1,
            TypeVisibility::NestedPublic => 2,
            TypeVisibility::NestedPrivate => 3,
            TypeVisibility::NestedFamily => 4,
            TypeVisibility::NestedAssembly => 5,
            TypeVisibility::NestedFamAndAssem => 6,
            TypeVisibility::NestedFamOrAssem => 7,
        }
    }

    /// The public variant matching the nesting of a type
    #[must_use]
    pub fn public_for(nested: bool) -> Self {
        if nested {
            TypeVisibility::NestedPublic
        } else {
            TypeVisibility::Public
        }
    }

    /// Returns `true` for the visibilities only a nested type can carry
    #[must_use]
    pub fn is_nested(self) -> bool {
        !matches!(self, TypeVisibility::NotPublic | TypeVisibility::Public)
    }
}

/// Accessibility of a method or field (ECMA-335 §II.23.1.10 `MemberAccessMask`, §II.23.1.5
/// `FieldAccessMask`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum MemberAccess {
    /// Member not referenceable
    CompilerControlled,
    /// Accessible only by the parent type
    Private,
    /// Accessible by sub-types only in this Assembly
    FamAndAssem,
    /// Accessibly by anyone in the Assembly
    Assembly,
    /// Accessible only by type and sub-types
    Family,
    /// Accessibly by sub-types anywhere, plus anyone in assembly
    FamOrAssem,
    /// Accessibly by anyone who has visibility to this scope
    Public,
}

impl MemberAccess {
    /// Extract the access from raw `MethodDef` or `Field` flags.
    ///
    /// The group value 7 is not defined by ECMA-335; it is read as `Public`. The definitions
    /// remember the raw value, so a rewrite still counts and normalizes it to the defined
    /// public value.
    #[must_use]
    pub fn from_member_flags(flags: u16) -> Self {
        match flags & MEMBER_ACCESS_MASK {
            0 => MemberAccess::CompilerControlled,
            1 => MemberAccess::Private,
            2 => MemberAccess::FamAndAssem,
            3 => MemberAccess::Assembly,
            4 => MemberAccess::Family,
            5 => MemberAccess::FamOrAssem,
            _ => MemberAccess::Public,
        }
    }

    /// The raw value of the access group
    #[must_use]
    pub fn bits(self) -> u16 {
        match self {
            MemberAccess::CompilerControlled => 0,
            MemberAccess::Private => 1,
            MemberAccess::FamAndAssem => 2,
            MemberAccess::Assembly => 3,
            MemberAccess::Family => 4,
            MemberAccess::FamOrAssem => 5,
            MemberAccess::Public => 6,
        }
    }
}
