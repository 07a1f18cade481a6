//! Packaging drivers.
//!
//! Each driver stages the source tree, writes the install script and
//! finalizes one kind of distributable.
//!
//! | Package type | Output | External tool | Module |
//! |--------------|--------|---------------|--------|
//! | File distribution | Directory with script and staged files | none | [`filedist`] |
//! | Self-extractor | Single `.EXE` | IExpress | [`iexpress`] |
//! | Floppy distribution | `Disk1`, `Disk2`, ... directories | MAKECAB | [`floppy`] |
//!
//! Drivers run one after another; each stages its own copy of the source
//! tree and never shares staging state with the others.

pub mod filedist;
pub mod floppy;
pub mod iexpress;
pub mod tool;

use crate::bundler::{Result, package::SetupPackage, resources::bootstrapper, settings::Settings};
use std::{fmt, path::Path};

/// Supported package types.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum PackageType {
    /// Flat directory with the install script next to the staged files.
    FileDist,

    /// Self-extracting executable built by IExpress.
    ///
    /// Extracts to a temporary directory and runs the script or launcher.
    IExpress,

    /// 1.44 MB floppy layout built by MAKECAB.
    ///
    /// Files are stored in cabinets spanning as many disks as needed.
    FloppyDist,
}

impl PackageType {
    /// Returns the short name for this package type.
    ///
    /// This is the lowercase identifier used in CLI output.
    pub fn short_name(&self) -> &'static str {
        match self {
            PackageType::FileDist => "filedist",
            PackageType::IExpress => "iexpress",
            PackageType::FloppyDist => "floppydist",
        }
    }

    /// Returns every package type, in the order they are produced.
    pub fn all() -> [PackageType; 3] {
        [PackageType::FileDist, PackageType::IExpress, PackageType::FloppyDist]
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Stages the source tree into `out_dir` and attaches the launcher image.
///
/// The launcher is resolved before any file is copied.
pub(crate) fn stage_package(settings: &Settings, out_dir: &Path) -> Result<SetupPackage> {
    let image = if settings.inf().with_bootstrapper {
        Some(bootstrapper::locate(settings.bootstrapper_image())?)
    } else {
        None
    };

    let mut package = SetupPackage::stage(settings.inf(), settings.source_dir(), out_dir)?;
    package.set_bootstrapper_image(image);
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names() {
        let names: Vec<String> = PackageType::all().iter().map(ToString::to_string).collect();
        assert_eq!(names, ["filedist", "iexpress", "floppydist"]);
    }
}
