//! Top-level error types for setup package generation.
//!
//! This module defines the errors surfaced by the command line tool, with
//! actionable messages and recovery suggestions.

use crate::bundler::Error as BundlerError;
use thiserror::Error;

/// Result type alias for command line operations
pub type Result<T> = std::result::Result<T, SetupError>;

/// Main error type for the command line tool
#[derive(Error, Debug)]
pub enum SetupError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Packaging errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] BundlerError),
}

/// Command line interface errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl SetupError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            SetupError::Cli(CliError::InvalidArguments { .. }) => vec![
                "Run with --help to see every option".to_string(),
            ],
            SetupError::Bundler(BundlerError::NotADirectory { .. })
            | SetupError::Bundler(BundlerError::InvalidDirectoryId { .. }) => vec![
                "The source directory may only contain folders named after directory ids (e.g. 24, 11)"
                    .to_string(),
                "Move loose files into the folder of the directory they install to".to_string(),
            ],
            SetupError::Bundler(BundlerError::ToolNotFound { tool, .. }) => vec![
                format!("Install {tool} or add it to PATH"),
                "Point --iexpress-binary or --makecab-binary at the executable".to_string(),
            ],
            SetupError::Bundler(BundlerError::ToolFailed { command, .. }) => vec![
                format!("Run the command by hand to see its output: {command}"),
                "Re-run with RUST_LOG=debug for the generated directives paths".to_string(),
            ],
            SetupError::Bundler(BundlerError::InvalidShortcut(_)) => vec![
                "Write the shortcut target as DIRID\\path\\to\\file.exe, e.g. 24\\Acme\\acme.exe"
                    .to_string(),
            ],
            SetupError::Bundler(BundlerError::Manifest { .. }) => vec![
                "Check that the cabinet maker supports GenerateInf".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_bundler_errors_convert() {
        let err: SetupError = BundlerError::NotADirectory {
            path: PathBuf::from("payload/readme.txt"),
        }
        .into();
        assert!(err.to_string().contains("payload/readme.txt"));
        assert_eq!(err.recovery_suggestions().len(), 2);
    }

    #[test]
    fn test_fallback_suggestion() {
        let err: SetupError = std::io::Error::other("disk full").into();
        assert_eq!(
            err.recovery_suggestions(),
            ["Check the error message above for specific details"]
        );
    }
}
