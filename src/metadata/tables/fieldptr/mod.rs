//! `FieldPtr` table (0x03): indirection into the `Field` table.
//!
//! Only present in unoptimized (`#-`) metadata. When it exists, the list columns of
//! `TypeDef` index this table instead of `Field` directly.

mod raw;

pub use raw::*;
