use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Manifest entry describing one CAD file, as posted with a new commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileManifest {
    pub filename: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub content_hash: String,
}

pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Hashes a file on disk and describes it for a commit manifest.
pub fn describe_file(path: &Path) -> Result<FileManifest> {
    let data = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::validation(format!("{} is not a file", path.display())))?;

    Ok(FileManifest {
        file_type: file_type(&filename),
        file_path: path.to_string_lossy().into_owned(),
        file_size: data.len() as i64,
        content_hash: hash_bytes(&data),
        filename,
    })
}

/// Upper-cased extension including the dot, e.g. `.SLDPRT`. Empty when the
/// name has no extension.
pub fn file_type(filename: &str) -> String {
    match Path::new(filename).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy().to_ascii_uppercase()),
        None => String::new(),
    }
}

/// Content-addressed location for a blob with the given hash. Fails unless the
/// hash is 64 lowercase hex characters.
pub fn storage_path(content_hash: &str) -> Result<String> {
    if !is_valid_content_hash(content_hash) {
        return Err(Error::validation(format!(
            "'{content_hash}' is not a SHA-256 content hash"
        )));
    }
    Ok(format!(
        "objects/{}/{}/{}",
        &content_hash[0..2],
        &content_hash[2..4],
        content_hash
    ))
}

pub fn is_valid_content_hash(content_hash: &str) -> bool {
    content_hash.len() == 64
        && content_hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes_is_sha256() {
        assert_eq!(
            hash_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_file_type() {
        assert_eq!(file_type("Base_Plate.sldprt"), ".SLDPRT");
        assert_eq!(file_type("Arm.v2.SLDASM"), ".SLDASM");
        assert_eq!(file_type("README"), "");
    }

    #[test]
    fn test_storage_path_fans_out() {
        let hash = hash_bytes(b"gear");
        let path = storage_path(&hash).unwrap();
        assert_eq!(path, format!("objects/{}/{}/{}", &hash[..2], &hash[2..4], hash));
    }

    #[test]
    fn test_storage_path_rejects_bad_hash() {
        let bad = [String::new(), "ab".to_string(), "é".repeat(32), "F".repeat(64)];
        for hash in &bad {
            assert!(matches!(storage_path(hash), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn test_content_hash_validation() {
        assert!(is_valid_content_hash(&hash_bytes(b"x")));
        assert!(!is_valid_content_hash("abc"));
        assert!(!is_valid_content_hash(&"A".repeat(64)));
        assert!(!is_valid_content_hash(&"g".repeat(64)));
    }

    #[test]
    fn test_describe_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("Motor_Mount.sldprt");
        std::fs::write(&path, b"solid body").unwrap();

        let manifest = describe_file(&path).unwrap();
        assert_eq!(manifest.filename, "Motor_Mount.sldprt");
        assert_eq!(manifest.file_type, ".SLDPRT");
        assert_eq!(manifest.file_size, 10);
        assert_eq!(manifest.content_hash, hash_bytes(b"solid body"));
    }
}
