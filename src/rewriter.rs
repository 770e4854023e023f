//! Promotion of every definition of an assembly to public.
//!
//! [`Rewriter`] drives a [`MetadataAccessor`]: it loads the input, replaces the visibility of
//! every type with the public variant matching its nesting, makes every method and field public
//! and writes the result to `<output_dir>/<name><suffix>.dll`.

use std::path::{Path, PathBuf};

use crate::{
    cache::assembly_identity,
    metadata::{AssemblyMetadata, MetadataAccessor},
    Error, Result,
};

/// Extension of the written assembly.
pub const OUTPUT_EXTENSION: &str = "dll";

/// What a rewrite changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Where the publicised assembly was written
    pub output: PathBuf,
    /// Number of types in the assembly
    pub types: usize,
    /// Types whose visibility changed
    pub types_changed: usize,
    /// Methods whose accessibility changed
    pub methods_changed: usize,
    /// Fields whose accessibility changed
    pub fields_changed: usize,
}

/// Applies the publicising rewrite through an accessor.
pub struct Rewriter<A> {
    accessor: A,
}

impl<A: MetadataAccessor> Rewriter<A> {
    /// Create a rewriter that loads and writes through `accessor`
    pub fn new(accessor: A) -> Self {
        Rewriter { accessor }
    }

    /// The accessor used for loading and writing
    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// Rewrite `input` into `output_dir`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the output would replace `input`,
    /// [`Error::LoadFailed`] if `input` cannot be loaded and [`Error::WriteFailed`] if the
    /// output cannot be written. Nothing is written when loading fails.
    pub fn rewrite(&self, input: &Path, output_dir: &Path, suffix: &str) -> Result<RewriteSummary> {
        let output = output_path(input, output_dir, suffix)?;
        if is_same_file(input, &output) {
            log::warn!("Output {} would overwrite the target assembly", output.display());
            return Err(Error::InvalidArgument("suffix"));
        }

        log::info!("Loading {}", input.display());
        let mut assembly = self.accessor.load(input).map_err(|source| Error::LoadFailed {
            path: input.to_path_buf(),
            source: Box::new(source),
        })?;

        let mut summary = publicise(&mut assembly);
        summary.output = output;

        log::info!(
            "Publicised {} of {} types, {} methods, {} fields",
            summary.types_changed,
            summary.types,
            summary.methods_changed,
            summary.fields_changed
        );

        self.accessor
            .write(&assembly, &summary.output)
            .map_err(|source| Error::WriteFailed {
                path: summary.output.clone(),
                source: Box::new(source),
            })?;
        log::info!("Wrote {}", summary.output.display());

        Ok(summary)
    }
}

/// Make every definition of `assembly` public.
///
/// Top-level types become `Public`, nested types `NestedPublic`, methods and fields `Public`.
/// Applying it to an already public assembly changes nothing. The `output` of the returned
/// summary is left empty.
pub fn publicise<M: AssemblyMetadata>(assembly: &mut M) -> RewriteSummary {
    let mut summary = RewriteSummary {
        output: PathBuf::new(),
        types: assembly.types().len(),
        types_changed: 0,
        methods_changed: 0,
        fields_changed: 0,
    };

    for ty in assembly.types_mut() {
        let before = ty.visibility();
        if ty.set_public() {
            summary.types_changed += 1;
            log::debug!(
                "{} {}: {:?} -> {:?}",
                ty.token,
                ty.full_name(),
                before,
                ty.visibility()
            );
        }

        for method in ty.methods_mut() {
            if method.set_public() {
                summary.methods_changed += 1;
            }
        }

        for field in ty.fields_mut() {
            if field.set_public() {
                summary.fields_changed += 1;
            }
        }
    }

    summary
}

/// `<output_dir>/<identity><suffix>.dll` for the assembly at `input`.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `input` has no file name.
pub fn output_path(input: &Path, output_dir: &Path, suffix: &str) -> Result<PathBuf> {
    let identity = assembly_identity(input)?;
    Ok(output_dir.join(format!("{identity}{suffix}.{OUTPUT_EXTENSION}")))
}

/// `true` if `output` names the file at `input` once links and relative components are resolved.
fn is_same_file(input: &Path, output: &Path) -> bool {
    fn resolve(path: &Path) -> Option<PathBuf> {
        if let Ok(path) = path.canonicalize() {
            return Some(path);
        }

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Some(parent.canonicalize().ok()?.join(path.file_name()?))
    }

    match (resolve(input), resolve(output)) {
        (Some(input), Some(output)) => input == output,
        _ => input == output,
    }
}
