use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Invocation Errors
/// - [`Error::InvalidArgument`] - A required parameter was not provided or is unusable
///
/// ## Publicising Errors
/// - [`Error::LoadFailed`] - The target assembly could not be loaded through the accessor
/// - [`Error::WriteFailed`] - The publicised assembly could not be written
///
/// ## File Parsing Errors
/// - [`Error::Malformed`] - Corrupted or invalid file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond file boundaries
/// - [`Error::NotSupported`] - Unsupported file format or feature
/// - [`Error::Empty`] - Empty input provided
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from goblin crate
///
/// A missing target assembly is deliberately *not* an error; it is reported through
/// [`crate::PubliciseOutcome::TargetMissing`].
///
/// # Examples
///
/// ```rust,no_run
/// use publiciser::{Error, Publicise, PubliciseConfig};
///
/// let config = PubliciseConfig::new()
///     .target_assembly_path("bin/Foo.dll")
///     .output_path("obj/publicised");
///
/// match Publicise::new(config).execute() {
///     Ok(outcome) => println!("{outcome}"),
///     Err(Error::InvalidArgument(name)) => eprintln!("missing parameter: {name}"),
///     Err(Error::LoadFailed { path, source }) => {
///         eprintln!("could not load {}: {source}", path.display());
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A required invocation parameter is absent or unusable.
    ///
    /// Raised before the target is loaded. The payload names the parameter, e.g. `suffix`
    /// when the output would overwrite the target assembly.
    #[error("Missing or invalid parameter - {0}")]
    InvalidArgument(&'static str),

    /// The target assembly exists but could not be loaded.
    ///
    /// Nothing is written and the cache record is left untouched, so the next
    /// invocation retries the rewrite.
    #[error("Failed to load assembly {} - {source}", path.display())]
    LoadFailed {
        /// The assembly that failed to load
        path: PathBuf,
        /// The underlying parsing or I/O error
        source: Box<Error>,
    },

    /// The publicised assembly could not be written.
    ///
    /// The cache record is not updated in that case.
    #[error("Failed to write assembly {} - {source}", path.display())]
    WriteFailed {
        /// The output path that could not be written
        path: PathBuf,
        /// The underlying I/O error
        source: Box<Error>,
    },

    /// The file is damaged and could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Indicates that the input is a PE file without a CLR runtime header, or uses
    /// a metadata layout this crate does not understand.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),
}

impl Error {
    /// Returns `true` if this error was raised while loading the target assembly.
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Error::LoadFailed { .. })
    }

    /// Returns `true` if this error was raised while writing the publicised assembly.
    #[must_use]
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Error::WriteFailed { .. })
    }
}
