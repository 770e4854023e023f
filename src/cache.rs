//! Change detection for target assemblies.
//!
//! A [`Fingerprint`] summarizes the state of an input file. After a successful rewrite it is
//! persisted next to the output as `<output>/<identity>_hash.hash`; the next invocation skips the
//! rewrite iff the freshly computed fingerprint has the same text as that record. A missing or
//! unreadable record never matches, so the worst case of a lost record is one redundant rewrite.
//!
//! Two strategies exist:
//! - [`FingerprintStrategy::ModifiedTime`] - the last-modification instant. Cheap, but two
//!   different contents written within the same timestamp tick are indistinguishable.
//! - [`FingerprintStrategy::ContentSha1`] - SHA-1 over the file content.
//!
//! The text form is prefixed by the strategy, so records of one strategy never match
//! fingerprints of the other.

use std::{
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use sha1::{Digest, Sha1};

use crate::{Error, Result};

/// Suffix appended to the assembly identity to form the record file name.
pub const RECORD_SUFFIX: &str = "_hash.hash";

/// How the fingerprint of an input file is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FingerprintStrategy {
    /// Last-modification instant of the file, in nanoseconds since the UNIX epoch
    #[default]
    ModifiedTime,
    /// SHA-1 of the file content
    ContentSha1,
}

impl FingerprintStrategy {
    fn prefix(self) -> &'static str {
        match self {
            FingerprintStrategy::ModifiedTime => "mtime",
            FingerprintStrategy::ContentSha1 => "sha1",
        }
    }
}

/// Opaque, textually comparable summary of an input file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap text read from a cache record
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Fingerprint(text.into())
    }

    /// The persisted text form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity of an assembly: its file name without extension.
///
/// # Errors
/// Returns [`crate::Error::InvalidArgument`] if `path` has no file name.
pub fn assembly_identity(path: &Path) -> Result<String> {
    match path.file_stem() {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string_lossy().into_owned()),
        _ => Err(Error::InvalidArgument("targetAssemblyPath")),
    }
}

/// Location of the cache record of `identity` inside `output_dir`.
#[must_use]
pub fn record_path(identity: &str, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{identity}{RECORD_SUFFIX}"))
}

/// Compute the fingerprint of `input`.
///
/// # Errors
/// Returns [`crate::Error::FileError`] if the file does not exist or cannot be read.
pub fn compute_fingerprint(input: &Path, strategy: FingerprintStrategy) -> Result<Fingerprint> {
    let value = match strategy {
        FingerprintStrategy::ModifiedTime => {
            let modified = std::fs::metadata(input)?.modified()?;
            let since_epoch = modified
                .duration_since(UNIX_EPOCH)
                .map_err(std::io::Error::other)?;
            since_epoch.as_nanos().to_string()
        }
        FingerprintStrategy::ContentSha1 => {
            let mut hasher = Sha1::new();
            hasher.update(std::fs::read(input)?);
            hasher
                .finalize()
                .iter()
                .map(|byte| format!("{byte:02x}"))
                .collect::<String>()
        }
    };

    Ok(Fingerprint(format!("{}:{value}", strategy.prefix())))
}

/// Read the persisted fingerprint of `identity`.
///
/// Returns `None` if no record exists. An unreadable record is treated the same way, which
/// forces a rewrite that then replaces it.
#[must_use]
pub fn read_cached_fingerprint(identity: &str, output_dir: &Path) -> Option<Fingerprint> {
    let path = record_path(identity, output_dir);
    match std::fs::read_to_string(&path) {
        Ok(text) => Some(Fingerprint(text)),
        Err(error) => {
            if error.kind() != ErrorKind::NotFound {
                log::debug!("Ignoring unreadable cache record {} - {error}", path.display());
            }
            None
        }
    }
}

/// Create or overwrite the record of `identity` with `fingerprint`.
///
/// # Errors
/// Returns [`crate::Error::FileError`] if the record cannot be written.
pub fn write_cached_fingerprint(
    identity: &str,
    output_dir: &Path,
    fingerprint: &Fingerprint,
) -> Result<()> {
    std::fs::write(record_path(identity, output_dir), fingerprint.as_str())?;
    Ok(())
}
