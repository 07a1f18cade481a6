//! Multi-volume floppy distribution via MAKECAB.
//!
//! MAKECAB decides which cabinet lands on which disk, but the script on
//! disk 1 must already be in place when it does. The script is therefore
//! written twice:
//!
//! 1. Stage into a temporary directory and list placeholder volumes, with
//!    every file on the last one, so the first script is at least as long
//!    as the final one
//! 2. Write `SETUP.DDF` into the output directory and run
//!    `MAKECAB.EXE /F SETUP.DDF` there
//! 3. Read the generated `SETUP.INF` manifest for the real layout
//! 4. Rewrite the script (and launcher) into `Disk1`

mod ddf;
mod manifest;

pub use ddf::CabinetDirectives;
pub use manifest::CabinetManifest;

use super::{stage_package, tool::run_tool};
use crate::bundler::{error::ErrorExt, Result, settings::Settings};
use path_absolutize::Absolutize;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Directives file written into the output directory.
pub const DDF_FILE_NAME: &str = "SETUP.DDF";
/// Layout manifest written by MAKECAB.
pub const MANIFEST_FILE_NAME: &str = "SETUP.INF";
/// Directory of the first disk.
pub const FIRST_DISK_DIR: &str = "Disk1";

/// Builds a floppy distribution in `out_dir`.
///
/// Returns the output directory.
pub async fn bundle_project(settings: &Settings, out_dir: &Path) -> Result<Vec<PathBuf>> {
    log::info!("Building floppy distribution in {}", out_dir.display());

    tokio::fs::create_dir_all(out_dir)
        .await
        .fs_context("creating distribution directory", out_dir)?;
    let out_dir = out_dir
        .absolutize()
        .fs_context("resolving distribution directory", out_dir)?
        .to_path_buf();

    let temp_dir = tempfile::tempdir().fs_context("creating temporary directory", std::env::temp_dir())?;
    let mut package = stage_package(settings, temp_dir.path())?;

    package.fake_floppy_disks();
    package.write_inf_file()?;

    let ddf_path = out_dir.join(DDF_FILE_NAME);
    CabinetDirectives::from_package(&package, settings.cab_compress()).write_to_file(&ddf_path)?;

    run_tool(
        settings.makecab_binary(),
        [OsStr::new("/F"), ddf_path.as_os_str()],
        Some(&out_dir),
    )
    .await?;

    let manifest = CabinetManifest::load(&out_dir.join(MANIFEST_FILE_NAME))?;
    package.fill_disks(manifest.volumes(), &manifest.files);

    let first_disk = out_dir.join(FIRST_DISK_DIR);
    tokio::fs::create_dir_all(&first_disk)
        .await
        .fs_context("creating first disk directory", &first_disk)?;
    package.set_out_dir(&first_disk);
    package.write_inf_file()?;

    log::info!(
        "✓ Created floppy distribution: {} ({} disks)",
        out_dir.display(),
        package.disks().len()
    );

    Ok(vec![out_dir])
}
