//! The publicise task: validation, cache gating, rewrite and cache persistence.
//!
//! One [`Publicise::execute`] call performs, in order:
//! 1. parameter validation ([`Error::InvalidArgument`], no I/O)
//! 2. the existence check of the target ([`PubliciseOutcome::TargetMissing`])
//! 3. the cache decision ([`PubliciseOutcome::Skipped`])
//! 4. the rewrite ([`Error::LoadFailed`] / [`Error::WriteFailed`] are fatal)
//! 5. persisting the new fingerprint, where a failure only costs a redundant rewrite next time
//!
//! Invocations for the same assembly identity and output directory must not run concurrently.

use std::{fmt, path::PathBuf};

use crate::{
    cache::{
        assembly_identity, compute_fingerprint, read_cached_fingerprint, write_cached_fingerprint,
        Fingerprint, FingerprintStrategy,
    },
    metadata::{CilAccessor, MetadataAccessor},
    rewriter::{RewriteSummary, Rewriter},
    Error, Result,
};

/// Default suffix inserted into the name of the written assembly.
pub const DEFAULT_SUFFIX: &str = "_publicised";

/// Parameters of a publicise run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubliciseConfig {
    /// The assembly to publicise (required).
    pub target_assembly_path: Option<PathBuf>,

    /// Directory receiving the publicised assembly and the cache record (required).
    pub output_path: Option<PathBuf>,

    /// Inserted between the assembly name and the extension (default: `_publicised`).
    pub suffix: String,

    /// How the target is fingerprinted (default: modification time).
    pub fingerprint: FingerprintStrategy,

    /// Rewrite even if the cache record matches (default: false).
    pub force: bool,
}

impl Default for PubliciseConfig {
    fn default() -> Self {
        Self {
            target_assembly_path: None,
            output_path: None,
            suffix: DEFAULT_SUFFIX.to_string(),
            fingerprint: FingerprintStrategy::default(),
            force: false,
        }
    }
}

impl PubliciseConfig {
    /// Creates a configuration with default values and no paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assembly to publicise.
    #[must_use]
    pub fn target_assembly_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_assembly_path = Some(path.into());
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the file name suffix of the written assembly.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Select the fingerprint strategy.
    #[must_use]
    pub fn fingerprint(mut self, strategy: FingerprintStrategy) -> Self {
        self.fingerprint = strategy;
        self
    }

    /// Bypass the cache decision.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Result of a non-fatal publicise run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PubliciseOutcome {
    /// The target is unchanged since the last rewrite; nothing was written.
    Skipped {
        /// The fingerprint matching the cache record
        fingerprint: Fingerprint,
    },
    /// The publicised assembly was written.
    Rewritten {
        /// What the rewrite changed
        summary: RewriteSummary,
        /// The persisted fingerprint
        fingerprint: Fingerprint,
        /// `false` if the cache record could not be written
        cache_updated: bool,
    },
    /// The target assembly does not exist; nothing was written.
    TargetMissing {
        /// The configured target
        path: PathBuf,
    },
}

impl PubliciseOutcome {
    /// The boolean result reported to a build system: `false` only if the target is missing.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !matches!(self, PubliciseOutcome::TargetMissing { .. })
    }
}

impl fmt::Display for PubliciseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PubliciseOutcome::Skipped { .. } => write!(f, "Assembly unchanged, skipped"),
            PubliciseOutcome::Rewritten {
                summary,
                cache_updated,
                ..
            } => {
                write!(f, "Publicised assembly written to {}", summary.output.display())?;
                if !cache_updated {
                    write!(f, " (cache record not updated)")?;
                }
                Ok(())
            }
            PubliciseOutcome::TargetMissing { path } => {
                write!(f, "Target assembly {} does not exist", path.display())
            }
        }
    }
}

/// Runs the publicise task for one configuration.
pub struct Publicise<A = CilAccessor> {
    config: PubliciseConfig,
    rewriter: Rewriter<A>,
}

impl Publicise<CilAccessor> {
    /// Create a task that reads and writes PE/CLI assemblies.
    #[must_use]
    pub fn new(config: PubliciseConfig) -> Self {
        Self::with_accessor(config, CilAccessor)
    }
}

impl<A: MetadataAccessor> Publicise<A> {
    /// Create a task using a custom metadata accessor.
    pub fn with_accessor(config: PubliciseConfig, accessor: A) -> Self {
        Publicise {
            config,
            rewriter: Rewriter::new(accessor),
        }
    }

    /// The configuration of this task
    pub fn config(&self) -> &PubliciseConfig {
        &self.config
    }

    /// Run the task.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if the target or output path is not set, or the output
    ///   would overwrite the target
    /// - [`Error::FileError`] if the target cannot be fingerprinted
    /// - [`Error::LoadFailed`] / [`Error::WriteFailed`] if the rewrite fails, in which case the
    ///   cache record is left untouched
    pub fn execute(&self) -> Result<PubliciseOutcome> {
        let Some(target) = self.config.target_assembly_path.as_deref() else {
            return Err(Error::InvalidArgument("targetAssemblyPath"));
        };
        let Some(output_dir) = self.config.output_path.as_deref() else {
            return Err(Error::InvalidArgument("outputPath"));
        };

        if !target.is_file() {
            log::info!("Target assembly {} does not exist", target.display());
            return Ok(PubliciseOutcome::TargetMissing {
                path: target.to_path_buf(),
            });
        }

        let identity = assembly_identity(target)?;
        let fingerprint = compute_fingerprint(target, self.config.fingerprint)?;
        let cached = read_cached_fingerprint(&identity, output_dir);
        log::debug!(
            "Fingerprint of {identity}: {fingerprint}, cached: {}",
            cached.as_ref().map_or("<none>", Fingerprint::as_str)
        );

        if cached.as_ref() == Some(&fingerprint) {
            if !self.config.force {
                log::info!("{identity} is unchanged, skipping");
                return Ok(PubliciseOutcome::Skipped { fingerprint });
            }
            log::info!("{identity} is unchanged, rewriting anyway");
        }

        let summary = self
            .rewriter
            .rewrite(target, output_dir, &self.config.suffix)?;

        let cache_updated = match write_cached_fingerprint(&identity, output_dir, &fingerprint) {
            Ok(()) => {
                log::info!("Stored fingerprint of {identity}");
                true
            }
            Err(error) => {
                log::warn!("Failed to store fingerprint of {identity} - {error}");
                false
            }
        };

        Ok(PubliciseOutcome::Rewritten {
            summary,
            fingerprint,
            cache_updated,
        })
    }
}
