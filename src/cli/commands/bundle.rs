//! Bundle command implementation.
//!
//! Creates every requested setup package from the source tree.

use crate::bundler::{BundledArtifact, Bundler};
use crate::cli::{Args, RuntimeConfig};
use crate::error::{CliError, Result};

/// Execute bundle command
pub(super) async fn execute_bundle(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    config.verbose_println("Configuring bundler...");
    let settings = args
        .to_settings()
        .map_err(|e| CliError::InvalidArguments { reason: e.to_string() })?;

    config.verbose_println(&format!("Source directory: {}", settings.source_dir().display()));
    for output in settings.outputs() {
        config.verbose_println(&format!("Requested {}: {}", output.package_type(), output.path().display()));
    }

    let bundler = Bundler::new(settings)?;

    config.progress("Building setup packages...");
    let artifacts = bundler.bundle().await?;

    print_bundle_summary(&artifacts, config);

    Ok(0)
}

/// Print a summary of created packages
fn print_bundle_summary(artifacts: &[BundledArtifact], config: &RuntimeConfig) {
    if artifacts.is_empty() {
        config.warning_println("No artifacts were created");
        return;
    }

    config.section("Setup packages");
    config.success_println(&format!("Created {} package(s)", artifacts.len()));

    for artifact in artifacts {
        config.println(&format!("\n  {}:", artifact.package_type));
        for path in &artifact.paths {
            let size_mb = artifact.size as f64 / 1_048_576.0;
            config.println(&format!("    📦 {} ({:.2} MB)", path.display(), size_mb));
        }
        config.println(&format!("    🔐 SHA256: {}", artifact.checksum));
    }
}
