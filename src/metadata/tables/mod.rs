//! Metadata tables relevant to accessibility rewriting.
//!
//! [`types`] holds the generic machinery (table ids, column widths, typed row access). The
//! remaining modules define the raw rows of the tables that describe types and their members:
//!
//! - [`typedef`] - `TypeDef` (0x02), with the type visibility in its flags
//! - [`fieldptr`] / [`field`] - `FieldPtr` (0x03) and `Field` (0x04)
//! - [`methodptr`] / [`methoddef`] - `MethodPtr` (0x05) and `MethodDef` (0x06)
//! - [`nestedclass`] - `NestedClass` (0x29), deciding which types are nested
//!
//! Every raw row remembers its absolute offset in the image, which is where the flags get
//! patched on write.

pub mod field;
pub mod fieldptr;
pub mod methoddef;
pub mod methodptr;
pub mod nestedclass;
pub mod typedef;
pub mod types;

pub use field::{FieldAttributes, FieldRaw};
pub use fieldptr::FieldPtrRaw;
pub use methoddef::{MethodAttributes, MethodDefRaw};
pub use methodptr::MethodPtrRaw;
pub use nestedclass::NestedClassRaw;
pub use typedef::{TypeAttributes, TypeDefRaw};
pub use types::*;
