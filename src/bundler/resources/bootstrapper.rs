//! Launcher executable lookup.
//!
//! The launcher is a small 32-bit Windows program that starts the install
//! script through the right setup engine. It is not built by this crate;
//! its image is copied next to the script as `<NAME>.EXE`.
//!
//! Lookup order:
//! 1. An explicit path (`--bootstrapper-image` / `SETUP_BOOTSTRAPPER_IMAGE`)
//! 2. `res/bootstrap32.exe` next to the running executable

use crate::bundler::{Error, Result, error::ErrorExt, utils::fs::copy_file};
use std::path::{Path, PathBuf};

/// File name of the bundled launcher image.
pub const IMAGE_NAME: &str = "bootstrap32.exe";

/// Directory next to the executable that holds bundled resources.
pub const RESOURCE_DIR: &str = "res";

/// Resolves the launcher image.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::GenericError(format!(
            "launcher image {} does not exist",
            path.display()
        )));
    }

    let exe = std::env::current_exe().fs_context("locating running executable", "")?;
    let candidate = exe
        .parent()
        .map(|dir| dir.join(RESOURCE_DIR).join(IMAGE_NAME))
        .unwrap_or_else(|| PathBuf::from(RESOURCE_DIR).join(IMAGE_NAME));

    if candidate.is_file() {
        log::debug!("Using bundled launcher {}", candidate.display());
        Ok(candidate)
    } else {
        Err(Error::GenericError(format!(
            "launcher image not found at {}; pass --bootstrapper-image",
            candidate.display()
        )))
    }
}

/// Copies the launcher image to `dest`.
pub fn install(image: &Path, dest: &Path) -> Result<()> {
    let size = copy_file(image, dest)?;
    log::info!("Wrote launcher {} ({} bytes)", dest.display(), size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_image_must_exist() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let image = temp_dir.path().join(IMAGE_NAME);

        assert!(locate(Some(&image)).is_err());

        std::fs::write(&image, b"MZ").unwrap();
        assert_eq!(locate(Some(&image)).unwrap(), image);
    }

    #[test]
    fn test_install_copies_bytes() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let image = temp_dir.path().join(IMAGE_NAME);
        let dest = temp_dir.path().join("SETUP.EXE");
        std::fs::write(&image, b"MZ\x90\x00").unwrap();

        install(&image, &dest).unwrap();
        assert_eq!(std::fs::read(dest).unwrap(), b"MZ\x90\x00");
    }
}
