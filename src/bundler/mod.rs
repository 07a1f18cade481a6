//! Legacy Windows setup package builder.
//!
//! This module turns a source tree into an INF-driven setup package for the
//! Windows setup engines (SETUPAPI and ADVPACK), staged under DOS 8.3 names.
//!
//! # Source layout
//!
//! The source directory holds one folder per target directory id:
//!
//! ```text
//! payload/
//! ├── 24/Acme/acme.exe     installed to C:\Acme\acme.exe
//! └── 11/acme.dll          installed to %windir%\System\acme.dll
//! ```
//!
//! # Supported Outputs
//!
//! | Output | Result | External tool |
//! |--------|--------|---------------|
//! | File distribution | Directory with `SETUP.INF` and staged files | none |
//! | Self-extractor | Single `.EXE` | IExpress |
//! | Floppy distribution | `Disk1`, `Disk2`, ... | MAKECAB |
//!
//! # Integration
//!
//! ```no_run
//! use kodegen_bundler_inf::bundler::{Bundler, OutputTarget, SettingsBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SettingsBuilder::new()
//!     .source_dir("payload")
//!     .output(OutputTarget::FloppyDist("floppies".into()))
//!     .uninstall_id(Some("AcmeTool".into()))
//!     .build()?;
//!
//! let artifacts = Bundler::new(settings)?.bundle().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
mod error;
pub mod inf;
pub mod package;
pub(crate) mod platform;
mod resources;
mod settings;
pub mod staging;
pub mod utils;

// Public re-exports
pub use builder::Bundler;
pub use error::{Context, Error, ErrorExt, Result};
pub use package::SetupPackage;
pub use platform::PackageType;
pub use settings::{
    DEFAULT_IEXPRESS_BINARY,
    DEFAULT_MAKECAB_BINARY,
    DEFAULT_SHORT_INF_NAME,
    InfSettings,
    OutputTarget,
    // Main configuration types
    Settings,
    SettingsBuilder,
    Shortcut,
};

/// A produced setup package.
///
/// # Fields
///
/// - `package_type`: The kind of output that was created
/// - `paths`: Top-level files or directories created for this output
/// - `size`: Total size in bytes of everything below `paths`
/// - `checksum`: SHA-256 checksum of the first path
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_inf::bundler::{Bundler, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_inf::bundler::Result<()> {
/// let bundler = Bundler::new(settings)?;
/// for artifact in bundler.bundle().await? {
///     println!("Created {}: {} bytes", artifact.package_type, artifact.size);
///     println!("SHA256: {}", artifact.checksum);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BundledArtifact {
    /// The package type that was created.
    pub package_type: PackageType,

    /// Paths to the files or directories created for this output.
    pub paths: Vec<std::path::PathBuf>,

    /// Total size in bytes.
    pub size: u64,

    /// SHA-256 checksum of the main artifact.
    ///
    /// Directories are hashed over their sorted relative paths and contents.
    pub checksum: String,
}
