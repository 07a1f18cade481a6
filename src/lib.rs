//! # kodegen_bundler_inf
//!
//! Setup package generator for legacy Windows targets.
//!
//! Turns a source tree laid out by target directory id into an INF install
//! script plus DOS 8.3 staged files, and optionally packs the result into a
//! self-extracting executable (IExpress) or a set of 1.44 MB floppy images
//! (MAKECAB).
//!
//! ## Features
//!
//! - **Short names**: collision-free `NAME~N.EXT` allocation per package
//! - **Uninstall support**: registry entries and an uninstall section
//! - **ADVPACK extensions**: begin/end prompts and directory removal
//! - **Launcher**: optional `SETUP.EXE` bootstrapper next to the script
//!
//! ## Usage
//!
//! ```bash
//! kodegen_bundler_inf --source-dir payload --make-filedist dist
//! kodegen_bundler_inf --source-dir payload --make-iexpress acme.exe --with-uninstall Acme
//! kodegen_bundler_inf --source-dir payload --make-floppydist floppies --advanced-inf
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export main types for public API
pub use bundler::{BundledArtifact, Bundler, PackageType, Settings, SettingsBuilder};
pub use cli::Args;
pub use error::{CliError, Result, SetupError};
