//! # publiciser Prelude
//!
//! The types needed to configure and run a publicise task, plus the metadata entry points.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all publiciser operations
pub use crate::Error;

/// The result type used throughout publiciser
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Configuring and running the task
pub use crate::{Publicise, PubliciseConfig, PubliciseOutcome};

/// Change detection
pub use crate::{Fingerprint, FingerprintStrategy};

/// Rewriting without the cache
pub use crate::{RewriteSummary, Rewriter};

// ================================================================================================
// Metadata
// ================================================================================================

pub use crate::metadata::{
    AssemblyMetadata, CilAccessor, CilAssembly, FieldDefinition, MemberAccess, MetadataAccessor,
    MethodDefinition, Token, TypeDefinition, TypeVisibility,
};
