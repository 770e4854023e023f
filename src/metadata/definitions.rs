//! Type, method and field definitions of a loaded assembly.
//!
//! Every definition splits its flags column into the visibility group, held as a
//! [`TypeVisibility`] or [`MemberAccess`], and the remaining attribute bits. Mutators only ever
//! replace the group as a whole, [`TypeDefinition::flags`] and friends recombine both parts.

use crate::metadata::{
    tables::{FieldAttributes, MethodAttributes, TypeAttributes},
    token::Token,
    visibility::{MemberAccess, TypeVisibility, MEMBER_ACCESS_MASK, TYPE_VISIBILITY_MASK},
};

/// A method owned by a [`TypeDefinition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    /// Token of the `MethodDef` row
    pub token: Token,
    /// Absolute offset of the row's `Flags` column in the image, 0 if not backed by an image
    pub offset: usize,
    /// Name of the method
    pub name: String,
    access: MemberAccess,
    reserved_access: bool,
    attributes: MethodAttributes,
}

impl MethodDefinition {
    /// Create a method definition from the raw `Flags` column
    #[must_use]
    pub fn new(token: Token, offset: usize, name: impl Into<String>, flags: u16) -> Self {
        MethodDefinition {
            token,
            offset,
            name: name.into(),
            access: MemberAccess::from_member_flags(flags),
            reserved_access: flags & MEMBER_ACCESS_MASK == MEMBER_ACCESS_MASK,
            attributes: MethodAttributes::from_bits_retain(flags & !MEMBER_ACCESS_MASK),
        }
    }

    /// Current accessibility
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        self.access
    }

    /// Attribute bits outside of the access group
    #[must_use]
    pub fn attributes(&self) -> MethodAttributes {
        self.attributes
    }

    /// Replace the accessibility
    pub fn set_access(&mut self, access: MemberAccess) {
        self.access = access;
        self.reserved_access = false;
    }

    /// Make the method public. Returns `true` if the accessibility changed.
    pub fn set_public(&mut self) -> bool {
        let changed = self.access != MemberAccess::Public || self.reserved_access;
        self.set_access(MemberAccess::Public);
        changed
    }

    /// The recombined `Flags` column. The undefined access value 7 is kept until the access is
    /// replaced.
    #[must_use]
    pub fn flags(&self) -> u16 {
        let access = if self.reserved_access {
            MEMBER_ACCESS_MASK
        } else {
            self.access.bits()
        };
        self.attributes.bits() | access
    }
}

/// A field owned by a [`TypeDefinition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Token of the `Field` row
    pub token: Token,
    /// Absolute offset of the row's `Flags` column in the image, 0 if not backed by an image
    pub offset: usize,
    /// Name of the field
    pub name: String,
    access: MemberAccess,
    reserved_access: bool,
    attributes: FieldAttributes,
}

impl FieldDefinition {
    /// Create a field definition from the raw `Flags` column
    #[must_use]
    pub fn new(token: Token, offset: usize, name: impl Into<String>, flags: u16) -> Self {
        FieldDefinition {
            token,
            offset,
            name: name.into(),
            access: MemberAccess::from_member_flags(flags),
            reserved_access: flags & MEMBER_ACCESS_MASK == MEMBER_ACCESS_MASK,
            attributes: FieldAttributes::from_bits_retain(flags & !MEMBER_ACCESS_MASK),
        }
    }

    /// Current accessibility
    #[must_use]
    pub fn access(&self) -> MemberAccess {
        self.access
    }

    /// Attribute bits outside of the access group
    #[must_use]
    pub fn attributes(&self) -> FieldAttributes {
        self.attributes
    }

    /// Replace the accessibility
    pub fn set_access(&mut self, access: MemberAccess) {
        self.access = access;
        self.reserved_access = false;
    }

    /// Make the field public. Returns `true` if the accessibility changed.
    pub fn set_public(&mut self) -> bool {
        let changed = self.access != MemberAccess::Public || self.reserved_access;
        self.set_access(MemberAccess::Public);
        changed
    }

    /// The recombined `Flags` column. The undefined access value 7 is kept until the access is
    /// replaced.
    #[must_use]
    pub fn flags(&self) -> u16 {
        let access = if self.reserved_access {
            MEMBER_ACCESS_MASK
        } else {
            self.access.bits()
        };
        self.attributes.bits() | access
    }
}

/// A type definition together with the methods and fields it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    /// Token of the `TypeDef` row
    pub token: Token,
    /// Absolute offset of the row's `Flags` column in the image, 0 if not backed by an image
    pub offset: usize,
    /// Namespace, empty for the global namespace and for nested types
    pub namespace: String,
    /// Name of the type
    pub name: String,
    nested: bool,
    visibility: TypeVisibility,
    attributes: TypeAttributes,
    methods: Vec<MethodDefinition>,
    fields: Vec<FieldDefinition>,
}

impl TypeDefinition {
    /// Create a type definition from the raw `Flags` column
    #[must_use]
    pub fn new(
        token: Token,
        offset: usize,
        namespace: impl Into<String>,
        name: impl Into<String>,
        nested: bool,
        flags: u32,
    ) -> Self {
        TypeDefinition {
            token,
            offset,
            namespace: namespace.into(),
            name: name.into(),
            nested,
            visibility: TypeVisibility::from_type_flags(flags),
            attributes: TypeAttributes::from_bits_retain(flags & !TYPE_VISIBILITY_MASK),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// `Namespace.Name`, or only the name for types without a namespace
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns `true` if the type is declared inside another type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Current visibility
    #[must_use]
    pub fn visibility(&self) -> TypeVisibility {
        self.visibility
    }

    /// Attribute bits outside of the visibility group
    #[must_use]
    pub fn attributes(&self) -> TypeAttributes {
        self.attributes
    }

    /// Replace the visibility
    pub fn set_visibility(&mut self, visibility: TypeVisibility) {
        self.visibility = visibility;
    }

    /// Make the type public, `NestedPublic` for nested types and `Public` otherwise.
    /// Returns `true` if the visibility changed.
    pub fn set_public(&mut self) -> bool {
        let public = TypeVisibility::public_for(self.nested);
        let changed = self.visibility != public;
        self.set_visibility(public);
        changed
    }

    /// The recombined `Flags` column
    #[must_use]
    pub fn flags(&self) -> u32 {
        self.attributes.bits() | self.visibility.bits()
    }

    /// Methods owned by this type
    #[must_use]
    pub fn methods(&self) -> &[MethodDefinition] {
        &self.methods
    }

    /// Mutable access to the methods owned by this type
    pub fn methods_mut(&mut self) -> &mut [MethodDefinition] {
        &mut self.methods
    }

    /// Fields owned by this type
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Mutable access to the fields owned by this type
    pub fn fields_mut(&mut self) -> &mut [FieldDefinition] {
        &mut self.fields
    }

    /// Attach a method to this type
    pub fn add_method(&mut self, method: MethodDefinition) {
        self.methods.push(method);
    }

    /// Attach a field to this type
    pub fn add_field(&mut self, field: FieldDefinition) {
        self.fields.push(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::TableId;

    #[test]
    fn type_keeps_attributes() {
        // NestedPrivate | Sealed | BeforeFieldInit
        let flags = 0x0010_0103;
        let mut ty = TypeDefinition::new(
            Token::from_parts(TableId::TypeDef, 3),
            0,
            "",
            "B",
            true,
            flags,
        );

        assert_eq!(ty.visibility(), TypeVisibility::NestedPrivate);
        assert_eq!(ty.flags(), flags);
        assert!(ty
            .attributes()
            .contains(TypeAttributes::SEALED | TypeAttributes::BEFORE_FIELD_INIT));

        assert!(ty.set_public());
        assert_eq!(ty.visibility(), TypeVisibility::NestedPublic);
        assert_eq!(ty.flags(), 0x0010_0102);
        assert!(!ty.set_public());
    }

    #[test]
    fn top_level_type_becomes_public() {
        let mut ty = TypeDefinition::new(Token::default(), 0, "Ns", "A", false, 0x0000_0000);
        assert_eq!(ty.full_name(), "Ns.A");

        assert!(ty.set_public());
        assert_eq!(ty.visibility(), TypeVisibility::Public);
        assert_eq!(ty.flags(), 0x0000_0001);
    }

    #[test]
    fn members_replace_whole_group() {
        // Private | Static | HideBySig
        let mut method = MethodDefinition::new(Token::default(), 0, "m", 0x0091);
        assert_eq!(method.access(), MemberAccess::Private);
        assert!(method.set_public());
        assert_eq!(method.flags(), 0x0096);

        // FamOrAssem | InitOnly
        let mut field = FieldDefinition::new(Token::default(), 0, "f", 0x0025);
        assert!(field.set_public());
        assert_eq!(field.flags(), 0x0026);
        assert!(field.attributes().contains(FieldAttributes::INIT_ONLY));

        let mut public = MethodDefinition::new(Token::default(), 0, "n", 0x0006);
        assert!(!public.set_public());
        assert_eq!(public.flags(), 0x0006);
    }

    #[test]
    fn undefined_member_access_is_normalized() {
        let mut field = FieldDefinition::new(Token::default(), 0, "f", 0x0017);
        assert_eq!(field.access(), MemberAccess::Public);
        assert_eq!(field.flags(), 0x0017);
        assert!(field.set_public());
        assert_eq!(field.flags(), 0x0016);
        assert!(!field.set_public());

        let mut method = MethodDefinition::new(Token::default(), 0, "m", 0x0087);
        assert_eq!(method.flags(), 0x0087);
        method.set_access(MemberAccess::Private);
        assert_eq!(method.flags(), 0x0081);
    }
}
