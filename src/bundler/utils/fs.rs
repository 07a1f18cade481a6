//! File system utilities for bundling.
//!
//! Provides the text writer shared by every generated script and directives
//! file, plus small helpers for copying staged files.

use crate::bundler::error::{ErrorExt, Result};
use std::{fs, path::Path};

/// Byte order mark written in front of UTF-16 text.
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Text encoding selected for a generated file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextEncoding {
    /// Every code point is below 128; one byte per character.
    Ascii,
    /// Little-endian UTF-16 with a byte order mark.
    Utf16,
}

/// Encodes `content` the way setup engines expect to read it.
///
/// Pure ASCII text is written as-is. Anything else is written as UTF-16LE
/// with a byte order mark, since the engines cannot read UTF-8.
pub fn encode_text(content: &str) -> (TextEncoding, Vec<u8>) {
    if content.is_ascii() {
        return (TextEncoding::Ascii, content.as_bytes().to_vec());
    }

    let mut bytes = Vec::with_capacity(2 + content.len() * 2);
    bytes.extend_from_slice(&UTF16_LE_BOM);
    for unit in content.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    (TextEncoding::Utf16, bytes)
}

/// Writes `content` to `path` using [`encode_text`].
///
/// Line endings are written unchanged; callers produce CRLF themselves.
pub fn write_text_file(path: &Path, content: &str) -> Result<TextEncoding> {
    let (encoding, bytes) = encode_text(content);
    fs::write(path, bytes).fs_context("writing text file", path)?;
    log::debug!("Wrote {} ({:?})", path.display(), encoding);
    Ok(encoding)
}

/// Copies a regular file byte for byte and returns the number of bytes copied.
///
/// The destination directory must already exist.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    if !from.is_file() {
        return Err(crate::bundler::Error::GenericError(format!(
            "{from:?} is not a file"
        )));
    }
    fs::copy(from, to).fs_context("copying source file", from)
}

/// Lists the regular files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).fs_context("reading directory", dir)? {
        let entry = entry.fs_context("reading directory entry", dir)?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ascii_text_is_written_verbatim() {
        let (encoding, bytes) = encode_text("[Version]\r\nSignature=$CHICAGO$\r\n");
        assert_eq!(encoding, TextEncoding::Ascii);
        assert_eq!(bytes, b"[Version]\r\nSignature=$CHICAGO$\r\n");
    }

    #[test]
    fn test_non_ascii_text_is_utf16_with_bom() {
        let (encoding, bytes) = encode_text("Zoë");
        assert_eq!(encoding, TextEncoding::Utf16);
        assert_eq!(bytes, vec![0xFF, 0xFE, b'Z', 0, b'o', 0, 0xEB, 0]);
    }

    #[test]
    fn test_ascii_boundary() {
        assert_eq!(encode_text("tab\t\u{7f}").0, TextEncoding::Ascii);
        assert_eq!(encode_text("\u{80}").0, TextEncoding::Utf16);
    }

    #[test]
    fn test_list_files_skips_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("B.TXT"), b"b").unwrap();
        fs::write(temp_dir.path().join("A.TXT"), b"a").unwrap();
        fs::create_dir(temp_dir.path().join("SUB")).unwrap();

        let files = list_files(temp_dir.path()).unwrap();
        assert_eq!(files, vec!["A.TXT".to_string(), "B.TXT".to_string()]);
    }
}
