//! The capability interface over an assembly's binary format.
//!
//! The rewrite only needs to load an assembly, walk its type definitions with their methods and
//! fields, and write the result back. [`MetadataAccessor`] and [`AssemblyMetadata`] express
//! exactly that, so the rewrite logic can run against [`crate::metadata::CilAccessor`] for real
//! PE images as well as against an in-memory implementation.

use std::path::Path;

use crate::{metadata::definitions::TypeDefinition, Result};

/// A loaded assembly, exposing its type definitions for inspection and mutation.
pub trait AssemblyMetadata {
    /// All type definitions, in metadata order
    fn types(&self) -> &[TypeDefinition];

    /// Mutable access to all type definitions
    fn types_mut(&mut self) -> &mut [TypeDefinition];
}

/// Loads and writes assemblies of one binary format.
pub trait MetadataAccessor {
    /// The loaded representation of an assembly
    type Assembly: AssemblyMetadata;

    /// Load the assembly at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid assembly of this format.
    fn load(&self, path: &Path) -> Result<Self::Assembly>;

    /// Serialize `assembly`, including all mutations, to `path`.
    ///
    /// # Errors
    /// Returns an error if the assembly cannot be serialized or the file cannot be written.
    fn write(&self, assembly: &Self::Assembly, path: &Path) -> Result<()>;
}
