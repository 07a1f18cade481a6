//! MAKECAB layout manifest parsing.
//!
//! With `GenerateInf=ON` MAKECAB writes an INF-style report of where every
//! file ended up:
//!
//! ```text
//! [disk list]
//! 1=Acme Disk 1
//! 2=Acme Disk 2
//!
//! [file list]
//! SETUP.INF=1
//! ACME.EXE=2
//! ```
//!
//! Keys are case-sensitive.

use crate::bundler::{Error, Result};
use ini::{Ini, ParseOption, Properties};
use std::path::{Path, PathBuf};

/// Section listing volume numbers and labels.
pub const DISK_SECTION: &str = "disk list";
/// Section listing file names and volume numbers.
pub const FILE_SECTION: &str = "file list";

/// Volume layout computed by MAKECAB.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CabinetManifest {
    /// `(volume, label)` in file order
    pub disks: Vec<(u32, String)>,
    /// `(file name, volume)` in file order
    pub files: Vec<(String, u32)>,
}

impl CabinetManifest {
    /// Reads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let ini = Ini::load_from_file_opt(path, parse_options())?;
        Self::from_ini(&ini, path)
    }

    /// Parses manifest text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let ini = Ini::load_from_str_opt(text, parse_options()).map_err(|e| Error::Ini(ini::Error::Parse(e)))?;
        Self::from_ini(&ini, path)
    }

    /// Volume numbers in file order.
    pub fn volumes(&self) -> impl Iterator<Item = u32> + '_ {
        self.disks.iter().map(|(n, _)| *n)
    }

    fn from_ini(ini: &Ini, path: &Path) -> Result<Self> {
        let disks = section(ini, DISK_SECTION, path)?
            .iter()
            .map(|(number, label)| Ok((volume_number(number, path)?, label.to_string())))
            .collect::<Result<Vec<_>>>()?;

        let files = section(ini, FILE_SECTION, path)?
            .iter()
            .map(|(file, number)| Ok((file.to_string(), volume_number(number, path)?)))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Cabinet manifest lists {} volumes and {} files",
            disks.len(),
            files.len()
        );
        Ok(Self { disks, files })
    }
}

fn parse_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn section<'a>(ini: &'a Ini, name: &str, path: &Path) -> Result<&'a Properties> {
    ini.section(Some(name)).ok_or_else(|| Error::Manifest {
        path: PathBuf::from(path),
        reason: format!("missing [{name}] section"),
    })
}

fn volume_number(value: &str, path: &Path) -> Result<u32> {
    value.trim().parse().map_err(|_| Error::Manifest {
        path: PathBuf::from(path),
        reason: format!("{value:?} is not a volume number"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = "\
;*** MAKECAB generated report
[disk list]
1=Acme Disk 1
2=Acme Disk 2

[cabinet list]
1=1,SETUP1.CAB
2=2,SETUP2.CAB

[file list]
SETUP.INF=1
ACME.EXE=1
README.TXT=2
";

    #[test]
    fn test_parse_layout() {
        let manifest = CabinetManifest::parse(MANIFEST, Path::new("SETUP.INF")).unwrap();

        assert_eq!(
            manifest.disks,
            [(1, "Acme Disk 1".to_string()), (2, "Acme Disk 2".to_string())]
        );
        assert_eq!(manifest.volumes().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(
            manifest.files,
            [
                ("SETUP.INF".to_string(), 1),
                ("ACME.EXE".to_string(), 1),
                ("README.TXT".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_missing_section() {
        let err = CabinetManifest::parse("[disk list]\n1=A\n", Path::new("SETUP.INF")).unwrap_err();
        assert!(matches!(err, Error::Manifest { ref reason, .. } if reason.contains("file list")));
    }

    #[test]
    fn test_non_numeric_volume() {
        let err = CabinetManifest::parse("[disk list]\nx=A\n[file list]\n", Path::new("SETUP.INF")).unwrap_err();
        assert!(err.to_string().contains("is not a volume number"));
    }

    #[test]
    fn test_load_crlf_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("SETUP.INF");
        std::fs::write(&path, MANIFEST.replace('\n', "\r\n")).unwrap();

        let manifest = CabinetManifest::load(&path).unwrap();
        assert_eq!(manifest.disks.len(), 2);
        assert_eq!(manifest.files[2], ("README.TXT".to_string(), 2));
    }
}
