// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # publiciser
//!
//! Rewrites the accessibility metadata of a compiled .NET assembly so that every type,
//! method and field becomes public, then writes the result as a new assembly. Projects can
//! compile against the publicised copy to reach otherwise inaccessible members.
//!
//! Rewriting is incremental: a fingerprint of the target (its modification time, or a SHA-1
//! of its content) is stored next to the output, and an unchanged target is skipped.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use publiciser::prelude::*;
//!
//! let config = PubliciseConfig::new()
//!     .target_assembly_path("bin/Foo.dll")
//!     .output_path("obj/publicised");
//!
//! let outcome = Publicise::new(config).execute()?;
//! println!("{outcome}");
//! # Ok::<(), publiciser::Error>(())
//! ```
//!
//! ## Lower-level access
//!
//! [`metadata::CilAssembly`] loads the TypeDef, MethodDef and Field definitions of an image
//! and writes them back by patching their flag columns in place. Every other byte of the
//! image is preserved. [`rewriter::publicise`] works on anything implementing
//! [`metadata::AssemblyMetadata`].
//!
//! ```rust,no_run
//! use publiciser::metadata::{AssemblyMetadata, CilAssembly};
//! use publiciser::rewriter::publicise;
//! use std::path::Path;
//!
//! let mut assembly = CilAssembly::from_file(Path::new("bin/Foo.dll"))?;
//! let summary = publicise(&mut assembly);
//! println!("{} of {} types changed", summary.types_changed, summary.types);
//! assembly.write_to_file(Path::new("Foo_publicised.dll"))?;
//! # Ok::<(), publiciser::Error>(())
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
pub mod prelude;

/// PE image access: backends, section mapping and little-endian I/O.
pub mod file;

/// Parsing and patching of the CLI metadata needed for publicising.
///
/// - [`metadata::cor20header`] - CLR 2.0 header
/// - [`metadata::root`] - Metadata root and stream directory
/// - [`metadata::streams`] - Tables stream header and `#Strings` heap
/// - [`metadata::tables`] - TypeDef, MethodDef, Field and the tables needed to resolve them
/// - [`metadata::definitions`] - Owned, mutable type and member definitions
pub mod metadata;

/// Fingerprints of target assemblies and the on-disk cache records.
pub mod cache;

/// Promotes every definition of an assembly to public and writes the result.
pub mod rewriter;

mod task;

/// `publiciser` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `publiciser` Error type
pub use error::Error;

pub use cache::{Fingerprint, FingerprintStrategy};
pub use file::File;
pub use rewriter::{RewriteSummary, Rewriter};
pub use task::{Publicise, PubliciseConfig, PubliciseOutcome, DEFAULT_SUFFIX};
