//! External tool execution.
//!
//! The self-extractor and cabinet makers are Windows programs driven by a
//! directives file. They are looked up on `PATH` (or used as given when a
//! path is passed), run to completion, and their exit status is checked.
//! There is no timeout.

use crate::bundler::error::{Error, Result};
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

/// Resolves a tool name or path to an executable.
pub fn find_tool(tool: &str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Ok(path)
        }
        Err(error) => Err(Error::ToolNotFound {
            tool: tool.to_string(),
            error,
        }),
    }
}

/// Runs `tool` with `args`, optionally inside `cwd`, and waits for it.
///
/// Fails if the tool cannot be found or started, or exits unsuccessfully.
pub async fn run_tool<I, S>(tool: &str, args: I, cwd: Option<&Path>) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = find_tool(tool)?;
    let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
    let command = command_line(tool, &args);

    log::info!("Running {}", command);

    let mut cmd = tokio::process::Command::new(&program);
    cmd.args(&args);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    let status = cmd.status().await.map_err(|error| Error::CommandFailed {
        command: command.clone(),
        error,
    })?;

    if !status.success() {
        return Err(Error::ToolFailed { command, status });
    }

    Ok(())
}

fn command_line(tool: &str, args: &[OsString]) -> String {
    let mut line = tool.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let args = [OsString::from("/N"), OsString::from("C:\\tmp\\SETUP.SED")];
        assert_eq!(command_line("IEXPRESS.EXE", &args), "IEXPRESS.EXE /N C:\\tmp\\SETUP.SED");
    }

    #[test]
    fn test_missing_tool() {
        let err = find_tool("definitely-not-a-real-packer-binary").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_fatal() {
        let err = run_tool("false", Vec::<&str>::new(), None).await.unwrap_err();
        assert!(matches!(err, Error::ToolFailed { ref command, .. } if command == "false"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run() {
        run_tool("true", ["ignored"], None).await.unwrap();
    }
}
