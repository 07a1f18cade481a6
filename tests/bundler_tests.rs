use assert_cmd::Command;
use kodegen_bundler_inf::bundler::{Bundler, Error, OutputTarget, PackageType, SettingsBuilder, Shortcut};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn payload(root: &Path) {
    fs::create_dir_all(root.join("24/Acme/Docs")).unwrap();
    fs::create_dir_all(root.join("11")).unwrap();
    fs::write(root.join("24/Acme/acme.exe"), b"MZ acme").unwrap();
    fs::write(root.join("24/Acme/Docs/readme.txt"), b"read me").unwrap();
    fs::write(root.join("11/acme.dll"), b"MZ dll").unwrap();
}

fn read_lossy(path: &Path) -> String {
    String::from_utf8_lossy(&fs::read(path).unwrap()).into_owned()
}

#[tokio::test]
async fn test_file_distribution_with_uninstall_and_shortcut() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    payload(source.path());
    let dist = out.path().join("dist");

    let settings = SettingsBuilder::new()
        .source_dir(source.path())
        .output(OutputTarget::FileDist(dist.clone()))
        .title(Some("Acme Tool".into()))
        .publisher(Some("Acme Corp".into()))
        .uninstall_id(Some("AcmeTool".into()))
        .shortcut(Some(Shortcut::parse("24\\Acme\\acme.exe").unwrap()))
        .build()
        .unwrap();

    let artifacts = Bundler::new(settings).unwrap().bundle().await.unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].package_type, PackageType::FileDist);

    for staged in ["ACME.EXE", "README.TXT", "ACME.DLL"] {
        assert!(dist.join(staged).is_file(), "{staged} was not staged");
    }

    let inf = read_lossy(&dist.join("SETUP.INF"));
    assert!(inf.contains("Signature=$CHICAGO$"));
    assert!(inf.contains("Provider=\"Acme Corp\""));
    assert!(inf.contains("\"DisplayName\""));
    assert!(inf.contains("\"Acme Tool\""));
    assert!(inf.contains("AcmeTool.INF,SETUP.INF,,7"));
    assert!(inf.contains("\r\n"));
}

#[tokio::test]
async fn test_loose_file_in_source_root_is_rejected() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(source.path().join("readme.txt"), b"loose").unwrap();

    let settings = SettingsBuilder::new()
        .source_dir(source.path())
        .output(OutputTarget::FileDist(out.path().join("dist")))
        .build()
        .unwrap();

    let err = Bundler::new(settings).unwrap().bundle().await.unwrap_err();
    assert!(err.to_string().contains("readme.txt"));
}

#[test]
fn test_cli_requires_an_output_mode() {
    let source = TempDir::new().unwrap();

    Command::cargo_bin("kodegen_bundler_inf")
        .unwrap()
        .arg("--source-dir")
        .arg(source.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--make-filedist"));
}

#[test]
fn test_cli_file_distribution() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    payload(source.path());
    let dist = out.path().join("dist");

    Command::cargo_bin("kodegen_bundler_inf")
        .unwrap()
        .arg("--source-dir")
        .arg(source.path())
        .arg("--make-filedist")
        .arg(&dist)
        .args(["--short-inf-name", "ACME", "--advanced-inf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 1 package(s)"));

    let inf = read_lossy(&dist.join("ACME.INF"));
    assert!(inf.contains("AdvancedINF=2.5"));
    assert!(inf.contains("BeginPrompt=InstallBeginPrompt"));
    // ACME.EXE belongs to the launcher, so the payload executable moves aside
    assert!(dist.join("ACME~1.EXE").is_file());
    assert!(!dist.join("ACME.EXE").exists());
}

#[test]
fn test_cli_missing_packer_fails_before_writing() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    payload(source.path());
    let dist = out.path().join("dist");

    Command::cargo_bin("kodegen_bundler_inf")
        .unwrap()
        .arg("--source-dir")
        .arg(source.path())
        .arg("--make-filedist")
        .arg(&dist)
        .arg("--make-floppydist")
        .arg(out.path().join("floppies"))
        .args(["--makecab-binary", "no-such-makecab-binary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-makecab-binary"));

    assert!(!dist.exists());
}

/// Writes an executable shell script standing in for a packer.
#[cfg(unix)]
fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
const TWO_DISK_MAKECAB: &str = r#"[ "$1" = "/F" ] && [ -f "$2" ] || exit 64
cat > SETUP.INF <<'END'
;*** MAKECAB generated report
[disk list]
1=SETUP Disk 1
2=SETUP Disk 2

[cabinet list]
1=1,SETUP1.CAB
2=2,SETUP2.CAB

[file list]
SETUP.INF=1
ACME.EXE=1
README.TXT=2
ACME.DLL=2
END
"#;

#[cfg(unix)]
#[tokio::test]
async fn test_floppy_script_is_rewritten_from_manifest() {
    let source = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    payload(source.path());
    let floppies = out.path().join("floppies");
    let makecab = fake_tool(tools.path(), "makecab", TWO_DISK_MAKECAB);

    let settings = SettingsBuilder::new()
        .source_dir(source.path())
        .output(OutputTarget::FloppyDist(floppies.clone()))
        .makecab_binary(makecab.to_string_lossy())
        .build()
        .unwrap();

    let artifacts = Bundler::new(settings).unwrap().bundle().await.unwrap();
    assert_eq!(artifacts[0].package_type, PackageType::FloppyDist);

    let ddf = read_lossy(&floppies.join("SETUP.DDF"));
    assert!(ddf.contains("SETUP.INF"));

    let inf = read_lossy(&floppies.join("Disk1/SETUP.INF"));
    let lines: Vec<&str> = inf.split("\r\n").collect();
    assert!(lines.contains(&"1=\"SETUP Disk 1\",SETUP1.CAB,0"));
    assert!(lines.contains(&"2=\"SETUP Disk 2\",SETUP2.CAB,0"));
    // placeholder volumes are gone and every file moved to its real disk
    assert!(!lines.iter().any(|l| l.starts_with("3=")));
    assert!(lines.contains(&"SETUP.INF=1"));
    assert!(lines.contains(&"ACME.EXE=1"));
    assert!(lines.contains(&"README.TXT=2"));
    assert!(lines.contains(&"ACME.DLL=2"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_splitter_aborts_before_rewrite() {
    let source = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    payload(source.path());
    let floppies = out.path().join("floppies");
    let makecab = fake_tool(tools.path(), "makecab", "exit 2\n");

    let settings = SettingsBuilder::new()
        .source_dir(source.path())
        .output(OutputTarget::FloppyDist(floppies.clone()))
        .makecab_binary(makecab.to_string_lossy())
        .build()
        .unwrap();

    let err = Bundler::new(settings).unwrap().bundle().await.unwrap_err();
    assert!(matches!(err, Error::ToolFailed { .. }), "unexpected error: {err}");
    assert!(floppies.join("SETUP.DDF").is_file());
    assert!(!floppies.join("Disk1").exists());
}

/// Runs the binary with a self-extractor that copies its working directory
/// to `capture` and fails. Returns the captured directory.
#[cfg(unix)]
fn run_failing_iexpress(extra_args: &[&str], bootstrapper: Option<&Path>) -> (TempDir, PathBuf) {
    let source = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    payload(source.path());
    let capture = out.path().join("capture");
    let iexpress = fake_tool(
        tools.path(),
        "iexpress",
        "[ \"$1\" = \"/N\" ] || exit 64\ncp -R \"$(dirname \"$2\")\" \"$CAPTURE_DIR\"\nexit 3\n",
    );

    let mut cmd = Command::cargo_bin("kodegen_bundler_inf").unwrap();
    cmd.env("TMPDIR", scratch.path())
        .env("CAPTURE_DIR", &capture)
        .arg("--source-dir")
        .arg(source.path())
        .arg("--make-iexpress")
        .arg(out.path().join("acme.exe"))
        .arg("--iexpress-binary")
        .arg(&iexpress)
        .args(["--title", "Acme Tool"])
        .args(extra_args);
    if let Some(image) = bootstrapper {
        cmd.arg("--with-bootstrapper").arg("--bootstrapper-image").arg(image);
    }
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("exited with"));

    // the staging directory is removed even though the packer failed
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    assert!(!out.path().join("acme.exe").exists());

    (out, capture)
}

#[cfg(unix)]
#[test]
fn test_self_extractor_takes_both_prompts() {
    let (_out, capture) = run_failing_iexpress(&[], None);

    let sed = read_lossy(&capture.join("SETUP.SED"));
    assert!(sed.contains("InstallPrompt=Do you want to install Acme Tool?\r\n"));
    assert!(sed.contains("FinishMessage=Acme Tool has been installed successfully.\r\n"));
    assert!(sed.contains("AppLaunched=SETUP.INF\r\n"));
    assert!(sed.contains("SETUP.INF=\r\n"));

    assert!(capture.join("files/ACME.EXE").is_file());
}

#[cfg(unix)]
#[test]
fn test_advanced_launcher_keeps_end_prompt_in_script() {
    let images = TempDir::new().unwrap();
    let image = images.path().join("bootstrap32.exe");
    fs::write(&image, b"MZ launcher").unwrap();

    let (_out, capture) = run_failing_iexpress(&["--advanced-inf"], Some(&image));

    let sed = read_lossy(&capture.join("SETUP.SED"));
    assert!(sed.contains("InstallPrompt=Do you want to install Acme Tool?\r\n"));
    assert!(sed.contains("FinishMessage=\r\n"));
    assert!(sed.contains("AppLaunched=SETUP.EXE /norestart\r\n"));

    let inf = read_lossy(&capture.join("files/SETUP.INF"));
    assert!(inf.contains("EndPrompt=InstallEndPrompt"));
    assert!(!inf.contains("Do you want to install"));
    assert_eq!(fs::read(capture.join("files/SETUP.EXE")).unwrap(), b"MZ launcher");
}
