//! Self-extraction directives (`.SED`) generation.
//!
//! IExpress reads a directives file in INF syntax. The `[Options]` section
//! refers to `%Strings%` entries; those carry the prompts, the names and
//! the command run after extraction.

use crate::bundler::inf::InfDocument;
use std::path::PathBuf;

/// Packaging options that never change.
const FIXED_OPTIONS: [&str; 8] = [
    "PackagePurpose=InstallApp",
    "ShowInstallProgramWindow=0",
    "HideExtractAnimation=0",
    "UseLongFileName=0",
    "InsideCompressed=0",
    "CAB_FixedSize=0",
    "CAB_ResvCodeSigning=0",
    "RebootMode=I",
];

/// Options whose values live in `[Strings]`.
const STRING_OPTIONS: [&str; 9] = [
    "InstallPrompt",
    "DisplayLicense",
    "FinishMessage",
    "TargetName",
    "FriendlyName",
    "AppLaunched",
    "PostInstallCmd",
    "AdminQuietInstCmd",
    "UserQuietInstCmd",
];

/// What runs once the package has been extracted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Launch {
    /// The launcher executable, which supports quiet installs.
    Bootstrapper(String),
    /// The install script itself.
    Script(String),
}

/// Contents of one `.SED` file.
#[derive(Clone, Debug)]
pub struct SedDirectives {
    /// Executable IExpress writes
    pub target_name: PathBuf,
    /// Window title
    pub friendly_name: String,
    /// Question asked before extracting
    pub begin_prompt: Option<String>,
    /// Message shown when done
    pub end_prompt: Option<String>,
    /// Command run after extraction
    pub launch: Launch,
    /// Directory holding the files to pack
    pub source_dir: PathBuf,
    /// File names inside `source_dir`
    pub files: Vec<String>,
}

impl SedDirectives {
    /// Renders the directives document.
    pub fn to_document(&self) -> InfDocument {
        let mut sed = InfDocument::new();

        sed.set_section("Version", ["Class=IEXPRESS", "SEDVersion=3"]);

        sed.set_section("Options", FIXED_OPTIONS);
        for option in STRING_OPTIONS {
            sed.set_value("Options", option, format!("%{option}%"));
        }
        sed.set_value("Options", "SourceFiles", "SourceFiles");

        sed.set_value("Strings", "InstallPrompt", self.begin_prompt.as_deref().unwrap_or_default());
        sed.set_value("Strings", "DisplayLicense", "");
        sed.set_value("Strings", "FinishMessage", self.end_prompt.as_deref().unwrap_or_default());
        sed.set_value("Strings", "TargetName", self.target_name.display());
        sed.set_value("Strings", "FriendlyName", &self.friendly_name);
        sed.set_value("Strings", "AppLaunched", "");
        sed.set_value("Strings", "PostInstallCmd", "<None>");
        sed.set_value("Strings", "AdminQuietInstCmd", "");
        sed.set_value("Strings", "UserQuietInstCmd", "");

        match &self.launch {
            Launch::Bootstrapper(exe) => {
                sed.set_value("Strings", "AppLaunched", format!("{exe} /norestart"));
                sed.set_value("Strings", "AdminQuietInstCmd", format!("{exe} /quiet /norestart"));
                sed.set_value("Strings", "UserQuietInstCmd", format!("{exe} /quiet /norestart"));
            }
            Launch::Script(inf) => {
                sed.set_value("Strings", "AppLaunched", inf);
            }
        }

        sed.set_value("SourceFiles", "SourceFiles0", self.source_dir.display());
        sed.set_section("SourceFiles0", self.files.iter().map(|f| format!("{f}=")));

        sed
    }
}
