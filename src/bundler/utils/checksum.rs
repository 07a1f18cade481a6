//! Artifact checksum calculation.
//!
//! SHA-256 digests for finished artifacts. A flat distribution is a
//! directory, so directory trees are hashed too.

use crate::{bail, bundler::Result, bundler::error::ErrorExt};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the SHA-256 checksum of a file or directory.
///
/// Returns the hex-encoded digest (64 characters).
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;

    if metadata.is_file() {
        let mut hasher = Sha256::new();
        hash_file_into(&mut hasher, path).await?;
        Ok(format!("{:x}", hasher.finalize()))
    } else if metadata.is_dir() {
        calculate_directory_sha256(path).await
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }
}

/// Total size in bytes of a file, or of every file below a directory.
pub fn artifact_size(path: &Path) -> Result<u64> {
    let mut size = 0u64;
    for entry in walkdir::WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file() {
            size += entry
                .metadata()
                .map_err(crate::bundler::Error::WalkdirError)?
                .len();
        }
    }
    Ok(size)
}

/// Hashes every file's relative path and content, in sorted path order.
async fn calculate_directory_sha256(dir_path: &Path) -> Result<String> {
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(dir_path).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            entries.push(entry.into_path());
        }
    }
    entries.sort();

    let mut hasher = Sha256::new();
    for path in entries {
        let rel_path = path.strip_prefix(dir_path)?;
        hasher.update(rel_path.to_string_lossy().as_bytes());
        hash_file_into(&mut hasher, &path).await?;
    }

    Ok(format!("{:x}", hasher.finalize()))
}

async fn hash_file_into(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_digest() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("SETUP.INF");
        fs::write(&file, b"abc").unwrap();

        assert_eq!(
            calculate_sha256(&file).await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(artifact_size(&file).unwrap(), 3);
    }

    #[tokio::test]
    async fn test_directory_digest_depends_on_names() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        fs::write(a.path().join("ACME.EXE"), b"MZ").unwrap();
        fs::write(b.path().join("ACME~1.EXE"), b"MZ").unwrap();

        let digest_a = calculate_sha256(a.path()).await.unwrap();
        let digest_b = calculate_sha256(b.path()).await.unwrap();
        assert_ne!(digest_a, digest_b);
        assert_eq!(artifact_size(a.path()).unwrap(), 2);
    }
}
