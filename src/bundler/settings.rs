//! Configuration structures for packaging operations.
//!
//! [`InfSettings`] holds everything that ends up in the install script;
//! [`Settings`] adds the source tree, the requested outputs and the
//! external tools used to produce them. Both are built through
//! [`SettingsBuilder`].

use crate::bundler::{
    Error, Result,
    error::Context,
    platform::PackageType,
};
use std::path::{Path, PathBuf};

/// Default script name, without extension.
pub const DEFAULT_SHORT_INF_NAME: &str = "SETUP";
/// Default self-extractor binary.
pub const DEFAULT_IEXPRESS_BINARY: &str = "IEXPRESS.EXE";
/// Default cabinet maker binary.
pub const DEFAULT_MAKECAB_BINARY: &str = "MAKECAB.EXE";

/// Program-manager shortcut target, `DIRID\relative\path`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Shortcut {
    /// Directory id the path is relative to, e.g. `24`
    pub dir_id: String,
    /// Backslash separated path below the directory id
    pub path: String,
}

impl Shortcut {
    /// Parses `DIRID\relative\path`.
    ///
    /// Both parts must be non-empty.
    pub fn parse(target: &str) -> Result<Self> {
        match target.split_once('\\') {
            Some((dir_id, path)) if !dir_id.is_empty() && !path.is_empty() => Ok(Self {
                dir_id: dir_id.to_string(),
                path: path.to_string(),
            }),
            _ => Err(Error::InvalidShortcut(target.to_string())),
        }
    }

    /// Last path component, used as the shortcut description when no
    /// title is configured.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('\\').next().unwrap_or(&self.path)
    }
}

/// Settings rendered into the install script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfSettings {
    /// Script name without extension; also names the launcher and cabinets
    pub short_inf_name: String,
    /// Product title shown in prompts and the uninstall list
    pub title: Option<String>,
    /// Publisher written to `[Version]` and the uninstall key
    pub publisher: Option<String>,
    /// Uninstall registry key name; enables the uninstall sections
    pub uninstall_id: Option<String>,
    /// Shortcut to create in the program manager group
    pub shortcut: Option<Shortcut>,
    /// Ship the launcher executable next to the script
    pub with_bootstrapper: bool,
    /// Use ADVPACK extensions (prompts, directory removal)
    pub advanced: bool,
}

impl Default for InfSettings {
    fn default() -> Self {
        Self {
            short_inf_name: DEFAULT_SHORT_INF_NAME.to_string(),
            title: None,
            publisher: None,
            uninstall_id: None,
            shortcut: None,
            with_bootstrapper: false,
            advanced: false,
        }
    }
}

impl InfSettings {
    /// Title, or the short script name when no title is set.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.short_inf_name)
    }

    /// `<NAME>.INF`
    pub fn inf_file_name(&self) -> String {
        format!("{}.INF", self.short_inf_name)
    }

    /// `<NAME>.EXE`
    pub fn exe_file_name(&self) -> String {
        format!("{}.EXE", self.short_inf_name)
    }

    /// Question asked before installing.
    pub fn default_begin_prompt(&self) -> String {
        format!("Do you want to install {}?", self.display_name())
    }

    /// Message shown after installing.
    pub fn default_end_prompt(&self) -> String {
        format!("{} has been installed successfully.", self.display_name())
    }
}

/// One requested output and where it goes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutputTarget {
    /// Flat distribution written into a directory
    FileDist(PathBuf),
    /// Self-extracting executable
    IExpress(PathBuf),
    /// Multi-volume floppy layout written into a directory
    FloppyDist(PathBuf),
}

impl OutputTarget {
    /// Package type produced by this output.
    pub fn package_type(&self) -> PackageType {
        match self {
            OutputTarget::FileDist(_) => PackageType::FileDist,
            OutputTarget::IExpress(_) => PackageType::IExpress,
            OutputTarget::FloppyDist(_) => PackageType::FloppyDist,
        }
    }

    /// Output directory or file.
    pub fn path(&self) -> &Path {
        match self {
            OutputTarget::FileDist(p) | OutputTarget::IExpress(p) | OutputTarget::FloppyDist(p) => p,
        }
    }
}

/// Validated configuration for one packaging run.
#[derive(Clone, Debug)]
pub struct Settings {
    inf: InfSettings,
    source_dir: PathBuf,
    outputs: Vec<OutputTarget>,
    bootstrapper_image: Option<PathBuf>,
    iexpress_binary: String,
    makecab_binary: String,
    cab_compress: bool,
}

impl Settings {
    /// Script settings.
    pub fn inf(&self) -> &InfSettings {
        &self.inf
    }

    /// Root with one folder per directory id.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Requested outputs, in the order they are produced.
    pub fn outputs(&self) -> &[OutputTarget] {
        &self.outputs
    }

    /// Explicit launcher image, if configured.
    pub fn bootstrapper_image(&self) -> Option<&Path> {
        self.bootstrapper_image.as_deref()
    }

    /// Self-extractor binary name or path.
    pub fn iexpress_binary(&self) -> &str {
        &self.iexpress_binary
    }

    /// Cabinet maker binary name or path.
    pub fn makecab_binary(&self) -> &str {
        &self.makecab_binary
    }

    /// Whether cabinet contents are compressed.
    pub fn cab_compress(&self) -> bool {
        self.cab_compress
    }
}

/// Builder for [`Settings`].
#[derive(Debug)]
pub struct SettingsBuilder {
    inf: InfSettings,
    source_dir: Option<PathBuf>,
    outputs: Vec<OutputTarget>,
    bootstrapper_image: Option<PathBuf>,
    iexpress_binary: String,
    makecab_binary: String,
    cab_compress: bool,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self {
            inf: InfSettings::default(),
            source_dir: None,
            outputs: Vec::new(),
            bootstrapper_image: None,
            iexpress_binary: DEFAULT_IEXPRESS_BINARY.to_string(),
            makecab_binary: DEFAULT_MAKECAB_BINARY.to_string(),
            cab_compress: true,
        }
    }
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the source tree root.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds an output. At least one is required.
    pub fn output(mut self, output: OutputTarget) -> Self {
        self.outputs.push(output);
        self
    }

    /// Sets the script name. Default: `SETUP`
    pub fn short_inf_name(mut self, name: impl Into<String>) -> Self {
        self.inf.short_inf_name = name.into();
        self
    }

    /// Sets the product title.
    pub fn title(mut self, title: Option<String>) -> Self {
        self.inf.title = title;
        self
    }

    /// Sets the publisher.
    pub fn publisher(mut self, publisher: Option<String>) -> Self {
        self.inf.publisher = publisher;
        self
    }

    /// Enables uninstall support under the given registry key name.
    pub fn uninstall_id(mut self, id: Option<String>) -> Self {
        self.inf.uninstall_id = id;
        self
    }

    /// Sets the shortcut target.
    pub fn shortcut(mut self, shortcut: Option<Shortcut>) -> Self {
        self.inf.shortcut = shortcut;
        self
    }

    /// Ships the launcher executable.
    pub fn with_bootstrapper(mut self, enabled: bool) -> Self {
        self.inf.with_bootstrapper = enabled;
        self
    }

    /// Enables ADVPACK extensions.
    pub fn advanced_inf(mut self, enabled: bool) -> Self {
        self.inf.advanced = enabled;
        self
    }

    /// Overrides the launcher image location.
    pub fn bootstrapper_image(mut self, path: Option<PathBuf>) -> Self {
        self.bootstrapper_image = path;
        self
    }

    /// Sets the self-extractor binary. Default: `IEXPRESS.EXE`
    pub fn iexpress_binary(mut self, binary: impl Into<String>) -> Self {
        self.iexpress_binary = binary.into();
        self
    }

    /// Sets the cabinet maker binary. Default: `MAKECAB.EXE`
    pub fn makecab_binary(mut self, binary: impl Into<String>) -> Self {
        self.makecab_binary = binary.into();
        self
    }

    /// Enables or disables cabinet compression. Default: enabled
    pub fn cab_compress(mut self, enabled: bool) -> Self {
        self.cab_compress = enabled;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `source_dir` is missing, no output was added, or
    /// the short script name is empty.
    pub fn build(self) -> Result<Settings> {
        let source_dir = self.source_dir.context("source_dir is required")?;

        if self.outputs.is_empty() {
            crate::bail!("at least one output is required");
        }
        if self.inf.short_inf_name.is_empty() {
            crate::bail!("short_inf_name must not be empty");
        }

        Ok(Settings {
            inf: self.inf,
            source_dir,
            outputs: self.outputs,
            bootstrapper_image: self.bootstrapper_image,
            iexpress_binary: self.iexpress_binary,
            makecab_binary: self.makecab_binary,
            cab_compress: self.cab_compress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_parse() {
        let shortcut = Shortcut::parse("24\\Acme\\bin\\acme.exe").unwrap();
        assert_eq!(shortcut.dir_id, "24");
        assert_eq!(shortcut.path, "Acme\\bin\\acme.exe");
        assert_eq!(shortcut.file_name(), "acme.exe");

        assert!(Shortcut::parse("acme.exe").is_err());
        assert!(Shortcut::parse("\\acme.exe").is_err());
        assert!(Shortcut::parse("24\\").is_err());
    }

    #[test]
    fn test_default_prompts_use_title_or_name() {
        let mut inf = InfSettings::default();
        assert_eq!(inf.default_begin_prompt(), "Do you want to install SETUP?");

        inf.title = Some("Acme".into());
        assert_eq!(inf.default_end_prompt(), "Acme has been installed successfully.");
    }

    #[test]
    fn test_builder_defaults() {
        let settings = SettingsBuilder::new()
            .source_dir("src")
            .output(OutputTarget::FileDist("out".into()))
            .build()
            .unwrap();

        assert_eq!(settings.inf().short_inf_name, "SETUP");
        assert_eq!(settings.iexpress_binary(), "IEXPRESS.EXE");
        assert_eq!(settings.makecab_binary(), "MAKECAB.EXE");
        assert!(settings.cab_compress());
        assert_eq!(settings.outputs()[0].package_type(), PackageType::FileDist);
    }

    #[test]
    fn test_builder_requires_source_and_output() {
        let err = SettingsBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("source_dir is required"));

        let err = SettingsBuilder::new().source_dir("src").build().unwrap_err();
        assert!(err.to_string().contains("at least one output"));

        let err = SettingsBuilder::new()
            .source_dir("src")
            .output(OutputTarget::FileDist("out".into()))
            .short_inf_name("")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("short_inf_name"));
    }
}
