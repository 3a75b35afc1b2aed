//! Hashing utilities for build keys and source tree verification.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

fn update_from_file(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;

    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(())
}

/// Hash a directory tree: relative paths and file contents, in sorted order.
///
/// `.git` directories are skipped, so two checkouts of the same commit hash
/// identically regardless of clone metadata.
pub fn hash_tree(root: &Path) -> Result<String> {
    let mut hasher = Sha256::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let rel = rel.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            hasher.update(b"d\0");
            hasher.update(rel.as_bytes());
            hasher.update(b"\0");
        } else if entry.file_type().is_file() {
            hasher.update(b"f\0");
            hasher.update(rel.as_bytes());
            hasher.update(b"\0");
            update_from_file(&mut hasher, entry.path())?;
            hasher.update(b"\0");
        }
    }

    Ok(hex::encode(hasher.finalize()))
}

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0"); // Separator
        self
    }

    /// Add a file's contents to the fingerprint.
    pub fn update_file(&mut self, path: &Path) -> Result<&mut Self> {
        update_from_file(&mut self.hasher, path)?;
        self.hasher.update(b"\0");
        Ok(self)
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(&self) -> String {
        hex::encode(self.hasher.clone().finalize())
    }

    /// Finalize and return a short fingerprint (first 16 chars).
    pub fn finish_short(&self) -> String {
        self.finish()[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fingerprint() {
        let fp1 = Fingerprint::new().update_str("hello").update_str("world").finish();
        let fp2 = Fingerprint::new().update_str("hello").update_str("world").finish();
        let fp3 = Fingerprint::new().update_str("helloworld").finish();

        assert_eq!(fp1, fp2);
        assert_ne!(fp1, fp3);
    }

    #[test]
    fn test_fingerprint_file_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fix.patch");

        std::fs::write(&path, "+one\n").unwrap();
        let a = Fingerprint::new().update_file(&path).unwrap().finish();
        std::fs::write(&path, "+two\n").unwrap();
        let b = Fingerprint::new().update_file(&path).unwrap().finish();

        assert_ne!(a, b);
        assert!(Fingerprint::new().update_file(&tmp.path().join("missing")).is_err());
    }

    #[test]
    fn test_hash_tree_ignores_git_dir() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();

        for root in [a.path(), b.path()] {
            std::fs::create_dir_all(root.join("src")).unwrap();
            std::fs::write(root.join("src/lib.c"), "int x;").unwrap();
        }
        std::fs::create_dir_all(b.path().join(".git")).unwrap();
        std::fs::write(b.path().join(".git/HEAD"), "ref: refs/heads/main").unwrap();

        assert_eq!(hash_tree(a.path()).unwrap(), hash_tree(b.path()).unwrap());

        std::fs::write(b.path().join("src/lib.c"), "int y;").unwrap();
        assert_ne!(hash_tree(a.path()).unwrap(), hash_tree(b.path()).unwrap());
    }
}
