//! Command line argument parsing and validation.
//!
//! One invocation can request several outputs; they are produced in the
//! order file distribution, self-extractor, floppy distribution.

use crate::bundler::{
    DEFAULT_IEXPRESS_BINARY, DEFAULT_MAKECAB_BINARY, DEFAULT_SHORT_INF_NAME, OutputTarget, Settings,
    SettingsBuilder, Shortcut,
};
use clap::Parser;
use std::path::PathBuf;

/// Legacy Windows setup package generator
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_inf",
    version,
    about = "Generate INF-based Windows setup packages",
    long_about = "Generate INF-based Windows setup packages from a directory tree.

The source directory holds one folder per target directory id
(24 = system drive root, 11 = system directory, ...).

Usage:
  kodegen_bundler_inf --source-dir payload --make-filedist dist
  kodegen_bundler_inf --source-dir payload --make-iexpress acme.exe --with-uninstall Acme
  kodegen_bundler_inf --source-dir payload --make-floppydist floppies --title \"Acme Tool\""
)]
pub struct Args {
    /// Root directory with one folder per target directory id
    #[arg(long, value_name = "DIR")]
    pub source_dir: PathBuf,

    /// Write a flat distribution into OUTDIR
    #[arg(long, value_name = "OUTDIR")]
    pub make_filedist: Option<PathBuf>,

    /// Build a self-extracting executable with IExpress
    #[arg(long, value_name = "OUTFILE.EXE")]
    pub make_iexpress: Option<PathBuf>,

    /// Write a 1.44 MB floppy layout into OUTDIR with MAKECAB
    #[arg(long, value_name = "OUTDIR")]
    pub make_floppydist: Option<PathBuf>,

    /// Register an uninstaller under this key name
    #[arg(long, value_name = "ID")]
    pub with_uninstall: Option<String>,

    /// Publisher shown in the uninstall list
    #[arg(long)]
    pub publisher: Option<String>,

    /// Product title used in prompts and disk labels
    #[arg(long)]
    pub title: Option<String>,

    /// Script name without extension
    #[arg(long, default_value = DEFAULT_SHORT_INF_NAME)]
    pub short_inf_name: String,

    /// Create a program-manager shortcut to DIRID\path\file
    #[arg(long, value_name = "TARGETFILE")]
    pub shortcut: Option<String>,

    /// Ship the launcher executable next to the script
    #[arg(long)]
    pub with_bootstrapper: bool,

    /// Use ADVPACK extensions (prompts, directory removal)
    #[arg(long)]
    pub advanced_inf: bool,

    /// Self-extractor binary
    #[arg(long, value_name = "IEXPRESS.EXE", env = "IEXPRESS_BINARY", default_value = DEFAULT_IEXPRESS_BINARY)]
    pub iexpress_binary: String,

    /// Cabinet maker binary
    #[arg(long, value_name = "MAKECAB.EXE", env = "MAKECAB_BINARY", default_value = DEFAULT_MAKECAB_BINARY)]
    pub makecab_binary: String,

    /// Launcher image to ship with --with-bootstrapper
    #[arg(long, value_name = "PATH", env = "SETUP_BOOTSTRAPPER_IMAGE")]
    pub bootstrapper_image: Option<PathBuf>,

    /// Store cabinet contents uncompressed
    #[arg(long)]
    pub no_cab_compress: bool,

    /// Show verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.make_filedist.is_none() && self.make_iexpress.is_none() && self.make_floppydist.is_none() {
            return Err(
                "Need at least one of --make-filedist or --make-iexpress or --make-floppydist".to_string(),
            );
        }

        if self.short_inf_name.is_empty() {
            return Err("--short-inf-name must not be empty".to_string());
        }

        if let Some(shortcut) = &self.shortcut {
            Shortcut::parse(shortcut).map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    /// Requested outputs, in production order
    pub fn outputs(&self) -> Vec<OutputTarget> {
        let mut outputs = Vec::new();
        if let Some(dir) = &self.make_filedist {
            outputs.push(OutputTarget::FileDist(dir.clone()));
        }
        if let Some(file) = &self.make_iexpress {
            outputs.push(OutputTarget::IExpress(file.clone()));
        }
        if let Some(dir) = &self.make_floppydist {
            outputs.push(OutputTarget::FloppyDist(dir.clone()));
        }
        outputs
    }

    /// Build packaging settings from the arguments
    pub fn to_settings(&self) -> crate::bundler::Result<Settings> {
        let shortcut = self.shortcut.as_deref().map(Shortcut::parse).transpose()?;

        let mut builder = SettingsBuilder::new()
            .source_dir(&self.source_dir)
            .short_inf_name(self.short_inf_name.clone())
            .title(self.title.clone())
            .publisher(self.publisher.clone())
            .uninstall_id(self.with_uninstall.clone())
            .shortcut(shortcut)
            .with_bootstrapper(self.with_bootstrapper)
            .advanced_inf(self.advanced_inf)
            .bootstrapper_image(self.bootstrapper_image.clone())
            .iexpress_binary(self.iexpress_binary.clone())
            .makecab_binary(self.makecab_binary.clone())
            .cab_compress(!self.no_cab_compress);

        for output in self.outputs() {
            builder = builder.output(output);
        }

        builder.build()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.quiet)
    }
}

impl RuntimeConfig {
    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        let _ = self.output.section(title);
    }

    /// Print a progress line
    pub fn progress(&self, message: &str) {
        let _ = self.output.progress(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}
