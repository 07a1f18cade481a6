//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that runs the
//! packaging drivers for every requested output.
//!
//! # Overview
//!
//! The bundler:
//! 1. Reads configuration from [`Settings`]
//! 2. Checks that the external tools and launcher image are available
//! 3. Runs each driver in the order the outputs were requested
//! 4. Calculates sizes and checksums
//! 5. Returns [`BundledArtifact`] results
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_inf::bundler::{Bundler, OutputTarget, SettingsBuilder};
//!
//! # async fn example() -> kodegen_bundler_inf::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .source_dir("payload")
//!     .output(OutputTarget::FileDist("dist".into()))
//!     .title(Some("Acme Tool".into()))
//!     .build()?;
//!
//! let bundler = Bundler::new(settings)?;
//! for artifact in bundler.bundle().await? {
//!     println!("Created: {} ({} bytes)", artifact.package_type, artifact.size);
//!     println!("SHA256: {}", artifact.checksum);
//! }
//! # Ok(())
//! # }
//! ```

use crate::bail;
use crate::bundler::{
    BundledArtifact, Result, Settings,
    platform::{filedist, floppy, iexpress, tool::find_tool},
    resources::bootstrapper,
    settings::OutputTarget,
    utils::checksum::{artifact_size, calculate_sha256},
};

/// Main bundler orchestrator.
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    ///
    /// Fails if an external tool needed by one of the outputs is missing, or
    /// if a launcher is requested and its image cannot be found. Nothing is
    /// written before these checks pass.
    pub fn new(settings: Settings) -> Result<Self> {
        for output in settings.outputs() {
            match output {
                OutputTarget::FileDist(_) => {}
                OutputTarget::IExpress(_) => {
                    find_tool(settings.iexpress_binary())?;
                }
                OutputTarget::FloppyDist(_) => {
                    find_tool(settings.makecab_binary())?;
                }
            }
        }

        if settings.inf().with_bootstrapper {
            let image = bootstrapper::locate(settings.bootstrapper_image())?;
            log::debug!("Launcher image: {}", image.display());
        }

        Ok(Self { settings })
    }

    /// Produces every requested output.
    ///
    /// # Returns
    ///
    /// Vector of [`BundledArtifact`] results, one per output, in request order.
    pub async fn bundle(&self) -> Result<Vec<BundledArtifact>> {
        let mut artifacts = Vec::new();

        for output in self.settings.outputs() {
            let package_type = output.package_type();
            let paths = match output {
                OutputTarget::FileDist(dir) => filedist::bundle_project(&self.settings, dir).await?,
                OutputTarget::IExpress(file) => iexpress::bundle_project(&self.settings, file).await?,
                OutputTarget::FloppyDist(dir) => floppy::bundle_project(&self.settings, dir).await?,
            };

            let mut size = 0u64;
            for p in &paths {
                size += artifact_size(p)?;
            }

            let checksum = if let Some(first_path) = paths.first() {
                calculate_sha256(first_path).await?
            } else {
                bail!(
                    "Packaging driver for {} returned no paths - this indicates a bundler bug",
                    package_type
                );
            };

            artifacts.push(BundledArtifact {
                package_type,
                paths,
                size,
                checksum,
            });
        }

        Ok(artifacts)
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
