//! Flat file distribution.
//!
//! The source tree is staged straight into the output directory and the
//! install script is written next to the staged files. The directory can
//! be copied to any medium and installed by right-clicking the script.

use super::stage_package;
use crate::bundler::{error::ErrorExt, Result, settings::Settings};
use std::path::{Path, PathBuf};

/// Builds a flat distribution in `out_dir`.
///
/// Returns the output directory.
pub async fn bundle_project(settings: &Settings, out_dir: &Path) -> Result<Vec<PathBuf>> {
    log::info!("Building file distribution in {}", out_dir.display());

    tokio::fs::create_dir_all(out_dir)
        .await
        .fs_context("creating distribution directory", out_dir)?;

    let package = stage_package(settings, out_dir)?;
    package.write_inf_file()?;

    log::info!("✓ Created file distribution: {}", out_dir.display());

    Ok(vec![out_dir.to_path_buf()])
}
