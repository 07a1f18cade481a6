//! One staged setup package.
//!
//! A [`SetupPackage`] is created by staging the source tree into an output
//! directory. Packaging drivers then adjust it (move prompts elsewhere,
//! replace the volume layout, change the output directory) and write the
//! install script, possibly more than once.

use crate::bundler::{
    Result,
    inf::{DiskSet, InfDocument, InstallScript},
    resources::bootstrapper,
    settings::InfSettings,
    staging::{FileStager, StagedFile, TargetDirectoryGroup},
};
use std::path::{Path, PathBuf};

/// Capacity of one 1.44 MB floppy.
pub const FLOPPY_CAPACITY: u64 = 1440 * 1024;

/// Number of placeholder volumes to list before the real layout is known.
///
/// The placeholder entries must take at least as much room in the script as
/// the real ones will, because the cabinet maker fills the first volume
/// to the last byte around the script.
pub fn placeholder_volume_count(total_size: u64) -> u32 {
    u32::try_from(total_size / FLOPPY_CAPACITY)
        .unwrap_or(u32::MAX)
        .saturating_add(2)
}

/// A staged source tree plus the script state derived from it.
#[derive(Debug)]
pub struct SetupPackage {
    settings: InfSettings,
    stager: FileStager,
    groups: Vec<TargetDirectoryGroup>,
    disks: DiskSet,
    begin_prompt: Option<String>,
    end_prompt: Option<String>,
    bootstrapper_image: Option<PathBuf>,
}

impl SetupPackage {
    /// Stages `source_dir` into `out_dir`.
    ///
    /// `out_dir` must exist. Prompts start out as the defaults derived from
    /// the title.
    pub fn stage(settings: &InfSettings, source_dir: &Path, out_dir: &Path) -> Result<Self> {
        log::info!("Staging {} into {}", source_dir.display(), out_dir.display());

        let mut stager = FileStager::for_script(out_dir, &settings.short_inf_name);
        let groups = stager.stage_tree(source_dir)?;

        Ok(Self {
            begin_prompt: Some(settings.default_begin_prompt()),
            end_prompt: Some(settings.default_end_prompt()),
            settings: settings.clone(),
            stager,
            groups,
            disks: DiskSet::default(),
            bootstrapper_image: None,
        })
    }

    /// Script settings.
    pub fn settings(&self) -> &InfSettings {
        &self.settings
    }

    /// Directory the script is written to.
    pub fn out_dir(&self) -> &Path {
        self.stager.out_dir()
    }

    /// Changes the directory the script is written to.
    pub fn set_out_dir(&mut self, out_dir: impl Into<PathBuf>) {
        self.stager.set_out_dir(out_dir);
    }

    /// Non-empty copy groups.
    pub fn groups(&self) -> &[TargetDirectoryGroup] {
        &self.groups
    }

    /// Staged and synthesised files.
    pub fn files(&self) -> &[StagedFile] {
        self.stager.files()
    }

    /// Bytes copied while staging.
    pub fn total_size(&self) -> u64 {
        self.stager.total_size()
    }

    /// Current volume layout.
    pub fn disks(&self) -> &DiskSet {
        &self.disks
    }

    /// Sets the launcher image written next to the script.
    ///
    /// Only used when the settings ask for a bootstrapper.
    pub fn set_bootstrapper_image(&mut self, image: Option<PathBuf>) {
        self.bootstrapper_image = image;
    }

    /// Removes the begin prompt from the script and returns it.
    pub fn take_begin_prompt(&mut self) -> Option<String> {
        self.begin_prompt.take()
    }

    /// Removes the end prompt from the script and returns it.
    pub fn take_end_prompt(&mut self) -> Option<String> {
        self.end_prompt.take()
    }

    /// Lists placeholder volumes large enough for any real layout and
    /// assigns every file to the last one.
    pub fn fake_floppy_disks(&mut self) {
        let count = placeholder_volume_count(self.total_size());
        log::debug!("Using {} placeholder volumes", count);

        self.disks = DiskSet::numbered(self.settings.display_name(), count);
        self.stager.set_all_volumes(count);
    }

    /// Replaces the volume layout with the one computed by the cabinet maker.
    ///
    /// Files the cabinet maker lists that were never staged are ignored.
    pub fn fill_disks<I>(&mut self, volumes: I, files: &[(String, u32)])
    where
        I: IntoIterator<Item = u32>,
    {
        self.disks = DiskSet::from_numbers(self.settings.display_name(), volumes);

        for (name, volume) in files {
            if !self.stager.set_volume(name, *volume) {
                log::debug!("Ignoring unknown file {} in volume layout", name);
            }
        }
    }

    /// Renders the install script for the current state.
    pub fn script(&self) -> InfDocument {
        InstallScript {
            settings: &self.settings,
            groups: &self.groups,
            files: self.stager.files(),
            total_size: self.stager.total_size(),
            disks: &self.disks,
            begin_prompt: self.begin_prompt.as_deref(),
            end_prompt: self.end_prompt.as_deref(),
        }
        .build()
    }

    /// Writes the script, and the launcher if enabled, to the output
    /// directory. Returns the written paths.
    pub fn write_inf_file(&self) -> Result<Vec<PathBuf>> {
        let inf_path = self.out_dir().join(self.settings.inf_file_name());
        let encoding = self.script().write_to_file(&inf_path)?;
        log::info!("Wrote install script {} ({:?})", inf_path.display(), encoding);

        let mut written = vec![inf_path];

        if self.settings.with_bootstrapper {
            let exe_path = self.out_dir().join(self.settings.exe_file_name());
            let image = match &self.bootstrapper_image {
                Some(image) => image.clone(),
                None => bootstrapper::locate(None)?,
            };
            bootstrapper::install(&image, &exe_path)?;
            written.push(exe_path);
        }

        Ok(written)
    }
}
