//! Cabinet directives (`.DDF`) generation.
//!
//! MAKECAB reads a line-oriented directives file: `.Set` commands followed
//! by the files to store. The script and launcher go onto the first disk
//! uncompressed; everything else goes into cabinets spanning as many disks
//! as needed. MAKECAB also writes a manifest describing the final layout.

use crate::bundler::{
    Result,
    inf::CRLF,
    package::SetupPackage,
    utils::fs::{TextEncoding, write_text_file},
};
use std::path::{Path, PathBuf};

/// Title used for disk labels when none is configured.
pub const DEFAULT_TITLE: &str = "SETUP";

/// Contents of one `.DDF` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CabinetDirectives {
    /// Disk label prefix
    pub title: String,
    /// Cabinet name prefix
    pub inf_name: String,
    /// Directory the listed files are read from
    pub source_dir: PathBuf,
    /// Files stored outside cabinets, in order
    pub uncompressed: Vec<String>,
    /// Files stored in cabinets, in order
    pub cabinet: Vec<String>,
    /// Whether cabinet contents are compressed
    pub compress: bool,
}

impl CabinetDirectives {
    /// Collects the files of a staged package.
    pub fn from_package(package: &SetupPackage, compress: bool) -> Self {
        let settings = package.settings();

        let mut uncompressed = Vec::new();
        if settings.with_bootstrapper {
            uncompressed.push(settings.exe_file_name());
        }
        uncompressed.push(settings.inf_file_name());

        let cabinet = package
            .groups()
            .iter()
            .flat_map(|g| g.source_files().map(str::to_string))
            .collect();

        Self {
            title: settings.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            inf_name: settings.short_inf_name.clone(),
            source_dir: package.out_dir().to_path_buf(),
            uncompressed,
            cabinet,
            compress,
        }
    }

    /// Renders the directives, CRLF separated.
    pub fn render(&self) -> String {
        let mut lines = vec![
            ".OPTION EXPLICIT".to_string(),
            format!(".Set DiskLabelTemplate={} Disk *", self.title),
            format!(".Set CabinetNameTemplate={}*.CAB", self.inf_name),
            ".Set DiskDirectoryTemplate=Disk*".to_string(),
            ".Set MaxDiskSize=1.44M".to_string(),
            ".Set GenerateInf=ON".to_string(),
            ".Set InfFileName=SETUP.INF".to_string(),
            ".Set RptFileName=SETUP.RPT".to_string(),
            ".Set InfDiskHeader=\"[disk list]\"".to_string(),
            ".Set InfDiskLineFormat=\"*disk#*=*label*\"".to_string(),
            ".Set InfCabinetHeader=\"[cabinet list]\"".to_string(),
            ".Set InfCabinetLineFormat=\"*cab#*=*disk#*,*cabfile*\"".to_string(),
            ".Set InfFileHeader=\"[file list]\"".to_string(),
            ".Set InfFileLineFormat=\"*file*=*disk#*\"".to_string(),
            format!(".Set SourceDir=\"{}\"", self.source_dir.display()),
            String::new(),
            ".Set Cabinet=Off".to_string(),
            ".Set Compress=Off".to_string(),
        ];
        lines.extend(self.uncompressed.iter().cloned());

        lines.push(String::new());
        lines.push(".Set Cabinet=On".to_string());
        lines.push(".Set FolderSizeThreshold=1000000".to_string());
        lines.push(format!(".Set Compress={}", if self.compress { "On" } else { "Off" }));
        lines.extend(self.cabinet.iter().cloned());

        lines.join(CRLF)
    }

    /// Writes the directives to `path`, ASCII when possible.
    pub fn write_to_file(&self, path: &Path) -> Result<TextEncoding> {
        write_text_file(path, &self.render())
    }
}
