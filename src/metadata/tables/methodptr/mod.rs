//! `MethodPtr` table (0x05): indirection into the `MethodDef` table.
//!
//! Only present in unoptimized (`#-`) metadata. When it exists, the list columns of
//! `TypeDef` index this table instead of `MethodDef` directly.

mod raw;

pub use raw::*;
