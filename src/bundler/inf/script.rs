//! Install script assembly.
//!
//! Turns a staging session into the INF install script read by SETUPAPI or
//! ADVPACK on the target machine. Sections are emitted in a fixed order:
//!
//! 1. `[Version]` signature block
//! 2. One `CopyFilesN` section and `[DestinationDirs]` entry per target directory
//! 3. Advanced-mode prompts
//! 4. Uninstall sections (only with an uninstall id)
//! 5. `[SourceDisksNames]` and `[SourceDisksFiles]`
//! 6. Shortcut creation and removal
//!
//! The script is rebuilt from scratch every time it is written.

use super::document::InfDocument;
use crate::bundler::{
    settings::InfSettings,
    staging::{StagedFile, TargetDirectoryGroup},
};
use std::collections::BTreeMap;

const UNINSTALL_KEY: &str = "SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Uninstall";
const UNINSTALL_KEY_WOW64: &str = "SOFTWARE\\WOW6432Node\\Microsoft\\Windows\\CurrentVersion\\Uninstall";
const REQUIRED_ENGINE: &str = "SetupAPI,\"Fatal Error - need setupapi.dll\"";

/// String value written to the 32-bit registry view (`FLG_ADDREG_32BITKEY`).
const REG_STRING: u32 = 0x4000;
/// DWORD value written to the 32-bit registry view.
const REG_DWORD: u32 = 0x10001 | 0x4000;

/// Quotes free text for the INF format.
///
/// Percent signs and double quotes are doubled before the value is
/// wrapped in double quotes.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('%', "%%").replace('"', "\"\""))
}

/// Quoted path relative to a directory id, e.g. `"%24%\Program Files\App"`.
pub(crate) fn dirid_path(dir_id: &str, path: &str) -> String {
    format!("\"%{}%\\{}", dir_id, &quoted(path)[1..])
}

/// Ordered mapping from volume number to volume label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskSet {
    disks: BTreeMap<u32, String>,
}

impl DiskSet {
    /// Label of the single volume used by non-floppy distributions.
    pub const DEFAULT_LABEL: &'static str = "Installation Files";

    /// A single volume numbered 1.
    pub fn single(label: impl Into<String>) -> Self {
        Self {
            disks: BTreeMap::from([(1, label.into())]),
        }
    }

    /// Volumes `1..=count`, labelled `<title> Disk <n>`.
    pub fn numbered(title: &str, count: u32) -> Self {
        Self::from_numbers(title, 1..=count)
    }

    /// Volumes with the given numbers, labelled `<title> Disk <n>`.
    pub fn from_numbers(title: &str, numbers: impl IntoIterator<Item = u32>) -> Self {
        Self {
            disks: numbers
                .into_iter()
                .map(|n| (n, format!("{title} Disk {n}")))
                .collect(),
        }
    }

    /// Number of volumes.
    pub fn len(&self) -> usize {
        self.disks.len()
    }

    /// Returns whether the set has no volumes.
    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// Volumes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.disks.iter().map(|(n, label)| (*n, label.as_str()))
    }
}

impl Default for DiskSet {
    fn default() -> Self {
        Self::single(Self::DEFAULT_LABEL)
    }
}

/// Everything the install script is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct InstallScript<'a> {
    /// Titles, uninstall id, shortcut and feature flags
    pub settings: &'a InfSettings,
    /// Copy groups in emission order
    pub groups: &'a [TargetDirectoryGroup],
    /// Staged and synthesised files for the volume table
    pub files: &'a [StagedFile],
    /// Total bytes copied while staging
    pub total_size: u64,
    /// Volume manifest
    pub disks: &'a DiskSet,
    /// Prompt shown before installing (advanced mode only)
    pub begin_prompt: Option<&'a str>,
    /// Prompt shown after installing (advanced mode only)
    pub end_prompt: Option<&'a str>,
}

impl InstallScript<'_> {
    /// Builds the complete script document.
    pub fn build(&self) -> InfDocument {
        let mut inf = InfDocument::new();

        self.add_version(&mut inf);
        self.add_copy_sections(&mut inf);
        if self.settings.advanced {
            self.add_install_prompts(&mut inf);
        }
        if let Some(id) = self.settings.uninstall_id.as_deref() {
            self.add_uninstall(&mut inf, id);
        }
        self.add_source_disks(&mut inf);
        self.add_shortcut(&mut inf);

        inf
    }

    fn add_version(&self, inf: &mut InfDocument) {
        inf.set_value("Version", "Signature", "$CHICAGO$");

        if self.settings.advanced {
            inf.set_value("Version", "AdvancedINF", "2.5");
        }

        if let Some(publisher) = &self.settings.publisher {
            inf.set_value("Version", "Provider", quoted(publisher));
        }
    }

    fn add_copy_sections(&self, inf: &mut InfDocument) {
        for group in self.groups {
            let title = group.section_title();
            inf.append_to_list_value("DefaultInstall", "CopyFiles", &title);
            inf.set_section(&title, group.section_lines());
            inf.set_value("DestinationDirs", &title, group.destination_dir());
        }
    }

    fn add_install_prompts(&self, inf: &mut InfDocument) {
        let name = self.settings.display_name();

        inf.set_value("DefaultInstall", "RequiredEngine", REQUIRED_ENGINE);
        inf.set_value("DefaultInstall", "UpdateAdvDlls", "1");
        inf.set_value("DefaultInstall", "BeginPrompt", "InstallBeginPrompt");
        inf.set_value("InstallBeginPrompt", "Title", quoted(name));

        if let Some(prompt) = self.begin_prompt {
            inf.set_value("InstallBeginPrompt", "Prompt", quoted(prompt));
            inf.set_value("InstallBeginPrompt", "ButtonType", "YESNO");
        }

        if let Some(prompt) = self.end_prompt {
            inf.set_value("DefaultInstall", "EndPrompt", "InstallEndPrompt");
            inf.set_value("InstallEndPrompt", "Prompt", quoted(prompt));
        }
    }

    fn add_uninstall(&self, inf: &mut InfDocument, id: &str) {
        let settings = self.settings;
        let name = settings.display_name();
        let inf_name = &settings.short_inf_name;

        inf.append_to_list_value("DefaultInstall", "CopyFiles", "UninstallCopyInfFile");
        inf.append_to_list_value("DefaultInstall", "AddReg", "UninstallRegKeys");

        for group in self.groups {
            inf.append_to_list_value("DefaultUninstall", "DelFiles", &group.section_title());
        }

        inf.append_to_list_value("DefaultUninstall", "DelReg", "UninstallRegKeyDel");

        if settings.advanced {
            inf.set_value("DefaultUninstall", "RequiredEngine", REQUIRED_ENGINE);
            inf.append_to_list_value("DefaultUninstall", "DelDirs", "UninstallDelDirs");
            for group in self.groups {
                inf.add_line("UninstallDelDirs", group.del_dirs_line());
            }

            inf.append_to_list_value("DefaultUninstall", "BeginPrompt", "UninstallBeginPrompt");
            inf.append_to_list_value("DefaultUninstall", "EndPrompt", "UninstallEndPrompt");
            inf.set_value("UninstallBeginPrompt", "Title", quoted(name));
            inf.set_value(
                "UninstallBeginPrompt",
                "Prompt",
                quoted(&format!("Do you really want to uninstall {name}?")),
            );
            inf.set_value("UninstallBeginPrompt", "ButtonType", "YESNO");
            inf.set_value(
                "UninstallEndPrompt",
                "Prompt",
                quoted(&format!("{name} has been uninstalled successfully.")),
            );
        }

        inf.append_to_list_value("DefaultUninstall", "DelFiles", "UninstallCopyInfFile");
        inf.add_line("UninstallCopyInfFile", format!("{id}.INF,{inf_name}.INF,,7"));
        inf.set_value("DestinationDirs", "UninstallCopyInfFile", "10,INF");

        inf.append_to_list_value("DefaultUninstall", "DelFiles", "UninstallDeletePnfFile");
        inf.add_line("UninstallDeletePnfFile", format!("{id}.PNF,,,7"));
        inf.set_value("DestinationDirs", "UninstallDeletePnfFile", "10,INF");

        let key = format!("HKLM,\"{UNINSTALL_KEY}\\{id}\"");
        let display_name = settings.title.as_deref().unwrap_or(id);
        inf.add_line(
            "UninstallRegKeys",
            format!("{key},\"DisplayName\",{REG_STRING},{}", quoted(display_name)),
        );

        let uninstall_command = if settings.advanced {
            format!("\"rundll32.exe advpack.dll,LaunchINFSectionEx {id}.INF,DefaultUninstall,,0,\"")
        } else {
            format!(
                "\"rundll32.exe setupapi.dll,InstallHinfSection DefaultUninstall 132 %10%\\INF\\{id}.INF\""
            )
        };
        inf.add_line(
            "UninstallRegKeys",
            format!("{key},\"UninstallString\",{REG_STRING},{uninstall_command}"),
        );

        inf.add_line("UninstallRegKeys", format!("{key},\"NoModify\",{REG_DWORD},1"));
        inf.add_line("UninstallRegKeys", format!("{key},\"NoRepair\",{REG_DWORD},1"));
        inf.add_line(
            "UninstallRegKeys",
            format!("{key},\"EstimatedSize\",{REG_DWORD},{}", self.total_size / 1024),
        );
        if let Some(publisher) = &settings.publisher {
            inf.add_line(
                "UninstallRegKeys",
                format!("{key},\"Publisher\",{REG_STRING},{}", quoted(publisher)),
            );
        }

        inf.add_line("UninstallRegKeyDel", key);
        inf.add_line("UninstallRegKeyDel", format!("HKLM,\"{UNINSTALL_KEY_WOW64}\\{id}\""));
    }

    fn add_source_disks(&self, inf: &mut InfDocument) {
        let inf_name = &self.settings.short_inf_name;
        for (number, label) in self.disks.iter() {
            inf.set_value(
                "SourceDisksNames",
                &number.to_string(),
                format!("{},{inf_name}{number}.CAB,0", quoted(label)),
            );
        }

        inf.set_section(
            "SourceDisksFiles",
            self.files
                .iter()
                .map(|f| format!("{}={}", f.short_name, f.volume)),
        );
    }

    fn add_shortcut(&self, inf: &mut InfDocument) {
        let Some(shortcut) = &self.settings.shortcut else {
            return;
        };

        let description = self
            .settings
            .title
            .as_deref()
            .unwrap_or_else(|| shortcut.file_name());
        let target = dirid_path(&shortcut.dir_id, &shortcut.path);

        inf.append_to_list_value("DefaultInstall", "UpdateInis", "ShortcutInstallIni");
        inf.add_line("ShortcutInstallIni", "setup.ini,progman.groups,,\"shortcutgrp1=.\"");
        inf.add_line(
            "ShortcutInstallIni",
            format!(
                "setup.ini,shortcutgrp1,,\"\"{}\",\"\"\"\"\"{}\"\"\"\"\"\"",
                quoted(description),
                target
            ),
        );

        if self.settings.uninstall_id.is_some() {
            inf.append_to_list_value("DefaultUninstall", "UpdateInis", "ShortcutRemoveIni");
            inf.add_line("ShortcutRemoveIni", "setup.ini,progman.groups,,\"shortcutgrp1=.\"");
            inf.add_line(
                "ShortcutRemoveIni",
                format!("setup.ini,shortcutgrp1,,\"\"{}\"\"", quoted(description)),
            );
        }
    }
}
