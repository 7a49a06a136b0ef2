//! SHA-1 file digests.
//!
//! The published digests for the package set predate the SHA-2 era, so
//! verification stays SHA-1. This is corruption detection on a trusted
//! list, not a signature scheme.

use crate::error::Result;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io;
use std::path::Path;

/// Hex SHA-1 digest of a file's contents.
pub fn checksum_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn digests_known_content() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"hello world").unwrap();
        drop(file);

        assert_eq!(
            checksum_file(&path).unwrap(),
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
    }

    #[test]
    fn digests_empty_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("empty");
        File::create(&path).unwrap();

        assert_eq!(
            checksum_file(&path).unwrap(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(checksum_file(&temp.path().join("nope")).is_err());
    }
}
