//! Self-extracting executable via IExpress.
//!
//! # Process
//!
//! 1. Stage the source tree into `<temp>/files`
//! 2. Move the begin prompt (and, unless the advanced launcher shows it,
//!    the end prompt) from the script into the directives
//! 3. Write the script and optional launcher
//! 4. Write `<temp>/SETUP.SED` listing every staged file
//! 5. Run `IEXPRESS.EXE /N <temp>/SETUP.SED`
//!
//! The temporary directory is removed when the driver returns, whether or
//! not IExpress succeeded.

mod sed;

pub use sed::{Launch, SedDirectives};

use super::{stage_package, tool::run_tool};
use crate::bundler::{error::ErrorExt, Result, settings::Settings, utils::fs::list_files};
use path_absolutize::Absolutize;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Name of the directives file inside the temporary directory.
pub const SED_FILE_NAME: &str = "SETUP.SED";

/// Builds a self-extracting executable at `out_file`.
///
/// Returns the executable path.
pub async fn bundle_project(settings: &Settings, out_file: &Path) -> Result<Vec<PathBuf>> {
    log::info!("Building self-extracting package {}", out_file.display());

    let target_name = out_file
        .absolutize()
        .fs_context("resolving output file", out_file)?
        .to_path_buf();
    if let Some(parent) = target_name.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating output directory", parent)?;
    }

    let temp_dir = tempfile::tempdir().fs_context("creating temporary directory", std::env::temp_dir())?;
    let files_dir = temp_dir.path().join("files");
    tokio::fs::create_dir_all(&files_dir)
        .await
        .fs_context("creating staging directory", &files_dir)?;

    let inf = settings.inf();
    let mut package = stage_package(settings, &files_dir)?;

    let begin_prompt = package.take_begin_prompt();
    let launch = if inf.with_bootstrapper {
        Launch::Bootstrapper(inf.exe_file_name())
    } else {
        Launch::Script(inf.inf_file_name())
    };
    let end_prompt = if inf.with_bootstrapper && inf.advanced {
        None
    } else {
        package.take_end_prompt()
    };

    package.write_inf_file()?;

    let directives = SedDirectives {
        target_name: target_name.clone(),
        friendly_name: inf.display_name().to_string(),
        begin_prompt,
        end_prompt,
        launch,
        files: list_files(&files_dir)?,
        source_dir: files_dir,
    };
    let sed_path = temp_dir.path().join(SED_FILE_NAME);
    directives.to_document().write_to_file(&sed_path)?;

    run_tool(settings.iexpress_binary(), [OsStr::new("/N"), sed_path.as_os_str()], None).await?;

    log::info!("✓ Created self-extracting package: {}", target_name.display());

    Ok(vec![target_name])
}
