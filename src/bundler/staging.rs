//! Source tree staging.
//!
//! The source directory holds one folder per target directory id (`24` for
//! the system drive root, `11` for the system directory, and so on). Every
//! regular file below those folders is copied into one flat output
//! directory under a unique 8.3 name, and grouped by the target directory
//! it will be installed into.
//!
//! ```text
//! source/
//! ├── 24/
//! │   └── Acme/
//! │       ├── acme.exe        → ACME.EXE   (group: 24, "Acme")
//! │       └── Docs/
//! │           └── manual.html → MANUAL.HTM (group: 24, "Acme\Docs")
//! └── 11/
//!     └── acme.dll            → ACME.DLL   (group: 11, "")
//! ```

use crate::bundler::{
    Error, Result,
    error::ErrorExt,
    inf::script::{dirid_path, quoted},
    utils::{fs::copy_file, shortname::ShortNameAllocator},
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Names installers may add next to the script after staging.
const SUPPORT_DLLS: [&str; 3] = ["ADVPACK.DLL", "W95INF16.DLL", "W95INF32.DLL"];

/// A file in the flat output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Original file, or `None` for files generated after staging
    pub source: Option<PathBuf>,
    /// 8.3 name in the output directory
    pub short_name: String,
    /// Bytes copied
    pub size: u64,
    /// Volume the file is stored on
    pub volume: u32,
}

/// Files destined for one target directory.
///
/// Each group becomes one `CopyFilesN` section of the install script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirectoryGroup {
    number: u32,
    dir_id: u32,
    subdir: String,
    files: Vec<(String, String)>,
}

impl TargetDirectoryGroup {
    /// Creates an empty group.
    ///
    /// `subdir` is relative to the directory id, backslash separated, and
    /// empty for the directory itself.
    pub fn new(number: u32, dir_id: u32, subdir: String) -> Self {
        Self {
            number,
            dir_id,
            subdir,
            files: Vec::new(),
        }
    }

    /// Maps the installed file name `target` to the staged short name.
    pub fn add_file(&mut self, target: String, short_name: String) {
        match self.files.iter_mut().find(|(t, _)| *t == target) {
            Some(entry) => entry.1 = short_name,
            None => self.files.push((target, short_name)),
        }
    }

    /// Session-unique group number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Target directory id.
    pub fn dir_id(&self) -> u32 {
        self.dir_id
    }

    /// Path below the directory id.
    pub fn subdir(&self) -> &str {
        &self.subdir
    }

    /// `(installed name, short name)` pairs in staging order.
    pub fn files(&self) -> &[(String, String)] {
        &self.files
    }

    /// Returns whether no file has been added.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Name of the copy section, e.g. `CopyFiles3`.
    pub fn section_title(&self) -> String {
        format!("CopyFiles{}", self.number)
    }

    /// Copy section lines: `"target","SOURCE",,7`.
    pub fn section_lines(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|(target, source)| format!("{},{},,7", quoted(target), quoted(source)))
            .collect()
    }

    /// `[DestinationDirs]` value, e.g. `24,"Acme\Docs"`.
    pub fn destination_dir(&self) -> String {
        format!("{},{}", self.dir_id, quoted(&self.subdir))
    }

    /// Line for the uninstall `DelDirs` section.
    pub fn del_dirs_line(&self) -> String {
        dirid_path(&self.dir_id.to_string(), &self.subdir)
    }

    /// Short names of the staged files.
    pub fn source_files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(_, source)| source.as_str())
    }
}

/// Copies source files into a flat output directory.
///
/// Owns the short-name namespace of that directory, the list of files in
/// it, and the group counter for one staging session.
#[derive(Debug)]
pub struct FileStager {
    out_dir: PathBuf,
    names: ShortNameAllocator,
    files: Vec<StagedFile>,
    total_size: u64,
    next_group: u32,
}

impl FileStager {
    /// Creates a stager with an empty namespace.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            names: ShortNameAllocator::new(),
            files: Vec::new(),
            total_size: 0,
            next_group: 1,
        }
    }

    /// Creates a stager with the install script's own names claimed.
    ///
    /// `<inf_name>.INF` is synthesised; the launcher name and the support
    /// DLLs a self-extractor may add are reserved.
    pub fn for_script(out_dir: impl Into<PathBuf>, inf_name: &str) -> Self {
        let mut stager = Self::new(out_dir);
        stager.synthesize(&format!("{inf_name}.INF"));
        stager.reserve(&format!("{inf_name}.EXE"));
        for dll in SUPPORT_DLLS {
            stager.reserve(dll);
        }
        stager
    }

    /// Output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Records a file that is generated in place rather than copied.
    pub fn synthesize(&mut self, short_name: &str) {
        self.names.reserve(short_name);
        self.files.push(StagedFile {
            source: None,
            short_name: short_name.to_string(),
            size: 0,
            volume: 1,
        });
    }

    /// Reserves a name without listing it.
    pub fn reserve(&mut self, short_name: &str) {
        self.names.reserve(short_name);
    }

    /// Copies one file into the output directory and returns its short name.
    pub fn copy_file(&mut self, source: &Path) -> Result<String> {
        let long_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let short_name = self.names.allocate(&long_name);

        let size = copy_file(source, &self.out_dir.join(&short_name))?;
        self.total_size += size;
        self.files.push(StagedFile {
            source: Some(source.to_path_buf()),
            short_name: short_name.clone(),
            size,
            volume: 1,
        });

        Ok(short_name)
    }

    /// Stages every file below `root` and returns the non-empty groups.
    ///
    /// Groups are numbered in pre-order (a folder before its subfolders) and
    /// returned in that order. All top-level entries are checked before the
    /// first file is copied.
    ///
    /// Subfolder groups come after their parent, so `CopyFiles=` lists and
    /// copy sections read parent first; the installed result is the same
    /// in either order.
    pub fn stage_tree(&mut self, root: &Path) -> Result<Vec<TargetDirectoryGroup>> {
        let top_level = top_level_dirs(root)?;

        let mut groups = Vec::new();
        for (dir_id, path) in top_level {
            self.stage_directory(dir_id, &path, &mut groups)?;
        }

        groups.retain(|g: &TargetDirectoryGroup| !g.is_empty());
        log::info!(
            "Staged {} files ({} bytes) in {} groups",
            self.files.iter().filter(|f| f.source.is_some()).count(),
            self.total_size,
            groups.len()
        );
        Ok(groups)
    }

    fn stage_directory(
        &mut self,
        dir_id: u32,
        top: &Path,
        groups: &mut Vec<TargetDirectoryGroup>,
    ) -> Result<()> {
        let mut group_of_dir: HashMap<PathBuf, usize> = HashMap::new();

        for entry in WalkDir::new(top).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            let relative = entry.path().strip_prefix(top)?;

            if entry.file_type().is_dir() {
                let subdir = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("\\");
                group_of_dir.insert(relative.to_path_buf(), groups.len());
                groups.push(TargetDirectoryGroup::new(self.next_group, dir_id, subdir));
                self.next_group += 1;
            } else if entry.file_type().is_file() {
                let parent = relative.parent().unwrap_or(Path::new(""));
                let index = *group_of_dir.get(parent).ok_or_else(|| {
                    Error::GenericError(format!("no group for {}", entry.path().display()))
                })?;

                let short_name = self.copy_file(entry.path())?;
                let target = entry.file_name().to_string_lossy().into_owned();
                groups[index].add_file(target, short_name);
            }
        }

        Ok(())
    }

    /// Every staged and synthesised file, in staging order.
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Sum of the sizes of all copied files.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Moves one file to another volume.
    ///
    /// Returns `false` if no file has that short name.
    pub fn set_volume(&mut self, short_name: &str, volume: u32) -> bool {
        match self
            .files
            .iter_mut()
            .find(|f| f.short_name.eq_ignore_ascii_case(short_name))
        {
            Some(file) => {
                log::debug!("{} -> volume {}", file.short_name, volume);
                file.volume = volume;
                true
            }
            None => false,
        }
    }

    /// Moves every file to `volume`.
    pub fn set_all_volumes(&mut self, volume: u32) {
        for file in &mut self.files {
            file.volume = volume;
        }
    }

    /// Points later writes at another directory.
    ///
    /// Already staged files are not moved.
    pub fn set_out_dir(&mut self, out_dir: impl Into<PathBuf>) {
        self.out_dir = out_dir.into();
    }
}

/// Validates the top level of the source tree and sorts it by directory id.
fn top_level_dirs(root: &Path) -> Result<Vec<(u32, PathBuf)>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(root).fs_context("reading source directory", root)? {
        let path = entry.fs_context("reading source directory", root)?.path();
        if !path.is_dir() {
            return Err(Error::NotADirectory { path });
        }

        let dir_id = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.parse::<u32>().ok());
        match dir_id {
            Some(dir_id) => dirs.push((dir_id, path)),
            None => return Err(Error::InvalidDirectoryId { path }),
        }
    }

    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_group_rendering() {
        let mut group = TargetDirectoryGroup::new(3, 24, "Acme\\100%".into());
        group.add_file("read me.txt".into(), "READ_ME.TXT".into());

        assert_eq!(group.section_title(), "CopyFiles3");
        assert_eq!(group.section_lines(), ["\"read me.txt\",\"READ_ME.TXT\",,7"]);
        assert_eq!(group.destination_dir(), "24,\"Acme\\100%%\"");
        assert_eq!(group.del_dirs_line(), "\"%24%\\Acme\\100%%\"");
    }

    #[test]
    fn test_stage_two_directory_ids() {
        let source = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(source.path(), "1/readme.txt", b"hello");
        write(source.path(), "2/sub/app.dat", b"0123456789");

        let mut stager = FileStager::new(out.path());
        let groups = stager.stage_tree(source.path()).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].dir_id(), 1);
        assert_eq!(groups[0].subdir(), "");
        assert_eq!(groups[0].files(), [("readme.txt".to_string(), "README.TXT".to_string())]);
        assert_eq!(groups[1].dir_id(), 2);
        assert_eq!(groups[1].subdir(), "sub");
        assert_eq!(groups[1].files(), [("app.dat".to_string(), "APP.DAT".to_string())]);

        assert_eq!(stager.total_size(), 15);
        assert_eq!(fs::read(out.path().join("README.TXT")).unwrap(), b"hello");
        assert_eq!(fs::read(out.path().join("APP.DAT")).unwrap(), b"0123456789");
    }

    #[test]
    fn test_groups_are_numbered_parent_first() {
        let source = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(source.path(), "24/App/a.txt", b"a");
        write(source.path(), "24/App/Docs/b.txt", b"b");
        write(source.path(), "24/App/Docs/Deep/c.txt", b"c");

        let mut stager = FileStager::new(out.path());
        let groups = stager.stage_tree(source.path()).unwrap();

        let layout: Vec<(u32, &str)> = groups.iter().map(|g| (g.number(), g.subdir())).collect();
        assert_eq!(layout, [(2, "App"), (3, "App\\Docs"), (4, "App\\Docs\\Deep")]);
    }

    #[test]
    fn test_empty_directories_are_dropped() {
        let source = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(source.path().join("10/empty/nested")).unwrap();

        let mut stager = FileStager::new(out.path());
        let groups = stager.stage_tree(source.path()).unwrap();
        assert!(groups.is_empty());
        assert_eq!(stager.total_size(), 0);
    }

    #[test]
    fn test_top_level_file_is_rejected() {
        let source = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(source.path(), "1/ok.txt", b"ok");
        write(source.path(), "stray.txt", b"x");

        let mut stager = FileStager::new(out.path());
        let err = stager.stage_tree(source.path()).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { ref path } if path.ends_with("stray.txt")));
        assert!(err.to_string().contains("stray.txt"));
        assert!(!out.path().join("OK.TXT").exists());
    }

    #[test]
    fn test_non_numeric_directory_is_rejected() {
        let source = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(source.path(), "windows/a.txt", b"a");

        let mut stager = FileStager::new(out.path());
        let err = stager.stage_tree(source.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidDirectoryId { .. }));
    }

    #[test]
    fn test_script_names_are_claimed() {
        let source = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(source.path(), "24/setup.inf", b"user inf");
        write(source.path(), "24/setup.exe", b"user exe");
        write(source.path(), "24/advpack.dll", b"user dll");

        let mut stager = FileStager::for_script(out.path(), "SETUP");
        let groups = stager.stage_tree(source.path()).unwrap();

        let names: Vec<&str> = groups[0].source_files().collect();
        assert_eq!(names, ["ADVPAC~1.DLL", "SETUP~1.EXE", "SETUP~1.INF"]);

        let listed: Vec<&str> = stager.files().iter().map(|f| f.short_name.as_str()).collect();
        assert_eq!(listed, ["SETUP.INF", "ADVPAC~1.DLL", "SETUP~1.EXE", "SETUP~1.INF"]);
        assert_eq!(stager.files()[0].source, None);
    }

    #[test]
    fn test_volume_assignment() {
        let mut stager = FileStager::new("unused");
        stager.synthesize("SETUP.INF");
        stager.synthesize("SETUP.EXE");

        stager.set_all_volumes(4);
        assert!(stager.files().iter().all(|f| f.volume == 4));

        assert!(stager.set_volume("setup.inf", 1));
        assert!(!stager.set_volume("MISSING.TXT", 2));
        assert_eq!(stager.files()[0].volume, 1);
        assert_eq!(stager.files()[1].volume, 4);
    }
}
