//! CLI metadata of .NET assemblies, as far as accessibility rewriting needs it.
//!
//! # Key Components
//!
//! - [`accessor`] - the [`MetadataAccessor`] / [`AssemblyMetadata`] capability interface
//! - [`definitions`] - type, method and field definitions with their visibility
//! - [`visibility`] - the closed [`TypeVisibility`] and [`MemberAccess`] variants
//! - [`cilassembly`] - [`CilAssembly`] and [`CilAccessor`], the PE/CLI implementation
//! - [`cor20header`], [`root`], [`streams`], [`tables`] - the on-disk structures read on the way
//! - [`token`] - metadata table row references
//!
//! # Examples
//!
//! ```rust,no_run
//! use publiciser::metadata::{AssemblyMetadata, CilAssembly};
//!
//! let assembly = CilAssembly::from_file("bin/Foo.dll".as_ref())?;
//! for ty in assembly.types() {
//!     println!("{} {:?} ({} methods)", ty.full_name(), ty.visibility(), ty.methods().len());
//! }
//! # Ok::<(), publiciser::Error>(())
//! ```

/// The capability interface over an assembly's binary format
pub mod accessor;
/// Implementation of a loaded PE/CLI assembly
pub mod cilassembly;
/// Implementation of the Header of CIL
pub mod cor20header;
/// Type, method and field definitions
pub mod definitions;
/// Implementation of the metadata root
pub mod root;
/// Implementation of the metadata streams
pub mod streams;
/// Implementation of the metadata tables
pub mod tables;
/// Implementation of metadata tokens
pub mod token;
/// Visibility and accessibility variants
pub mod visibility;

pub use accessor::{AssemblyMetadata, MetadataAccessor};
pub use cilassembly::{CilAccessor, CilAssembly};
pub use definitions::{FieldDefinition, MethodDefinition, TypeDefinition};
pub use tables::TableId;
pub use token::Token;
pub use visibility::{MemberAccess, TypeVisibility};
