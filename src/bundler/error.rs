//! Error types for bundler operations.
//!
//! Provides contextual error chaining, filesystem-specific errors and
//! dedicated variants for the external packaging tools.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Example
//!
//! ```no_run
//! # use std::path::{Path, PathBuf};
//! # type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
//! #
//! # trait ErrorExt<T> {
//! #     fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
//! # }
//! # impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
//! #     fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
//! #         self.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
//! #     }
//! # }
//! fn read_manifest(path: &Path) -> Result<String> {
//!     let contents = std::fs::read_to_string(path)
//!         .fs_context("reading cabinet manifest", path)?;
//!     Ok(contents)
//! }
//! ```

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
    process::ExitStatus,
};
use thiserror::Error as DeriveError;

/// Errors returned by the bundler.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "copying source file")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// An external tool could not be started.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// An external tool ran but reported failure.
    #[error("command {command} exited with {status}")]
    ToolFailed {
        /// Full command line that was executed
        command: String,
        /// Exit status reported by the tool
        status: ExitStatus,
    },

    /// An external tool is not installed or not on `PATH`.
    #[error("{tool} not found: {error}")]
    ToolNotFound {
        /// Name or path that was looked up
        tool: String,
        /// Lookup failure
        error: which::Error,
    },

    /// A top-level entry of the source tree is not a directory.
    #[error("‘{}’ is not a directory", path.display())]
    NotADirectory {
        /// Offending path
        path: PathBuf,
    },

    /// A top-level folder name is not a numeric directory id.
    #[error("‘{}’ is not named after a numeric directory id", path.display())]
    InvalidDirectoryId {
        /// Offending path
        path: PathBuf,
    },

    /// Shortcut target is not of the form `DIRID\relative\path`.
    #[error("invalid shortcut target {0:?}: expected DIRID\\relative\\path")]
    InvalidShortcut(String),

    /// Cabinet manifest is missing data or carries malformed values.
    #[error("invalid cabinet manifest {}: {reason}", path.display())]
    Manifest {
        /// Manifest file
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// Cabinet manifest could not be parsed.
    #[error("{0}")]
    Ini(#[from] ini::Error),

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking directory (used while staging source files).
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
///
/// Wraps I/O errors with the path that caused them for better diagnostics.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying source file".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// # Examples
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_directory_names_path() {
        let err = Error::NotADirectory {
            path: PathBuf::from("src/readme.txt"),
        };
        assert_eq!(err.to_string(), "‘src/readme.txt’ is not a directory");
    }

    #[test]
    fn test_context_wraps_inner_error() {
        let res: Result<()> = Err(Error::GenericError("boom".into()));
        let err = res.context("writing script").unwrap_err();
        assert_eq!(err.to_string(), "writing script: boom");
    }

    #[test]
    fn test_option_context() {
        let missing: Option<u32> = None;
        let err = missing.context("no volume").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "no volume"));
    }
}
