use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::client::{check_credential, fingerprint, ContentHash, StorageClient};
use crate::error::StorageError;

/// Provenance written next to every stored blob as `<hash>.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provenance {
    pub source: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
    pub uploader: String,
}

/// Directory-backed store. Blobs live at `<root>/<hash>`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.blob_path(hash).is_file()
    }

    pub fn provenance(&self, hash: &ContentHash) -> Result<Provenance, StorageError> {
        let path = self.sidecar_path(hash);
        if !path.is_file() {
            return Err(StorageError::NotFound(hash.to_string()));
        }
        let raw = std::fs::read(&path).map_err(|source| StorageError::Io { path, source })?;
        Ok(serde_json::from_slice(&raw)?)
    }

    fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        self.root.join(hash.as_str())
    }

    fn sidecar_path(&self, hash: &ContentHash) -> PathBuf {
        self.root.join(format!("{hash}.json"))
    }
}

impl StorageClient for LocalStore {
    fn upload(&self, file: &Path, credential: &SecretString) -> Result<ContentHash, StorageError> {
        check_credential(credential)?;

        let bytes = std::fs::read(file).map_err(|source| StorageError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let hash = ContentHash::of_bytes(&bytes);

        std::fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;

        let blob = self.blob_path(&hash);
        if !blob.is_file() {
            std::fs::write(&blob, &bytes).map_err(|source| StorageError::Io {
                path: blob.clone(),
                source,
            })?;
        }

        let provenance = Provenance {
            source: file.display().to_string(),
            size_bytes: bytes.len() as u64,
            uploaded_at: Utc::now(),
            uploader: fingerprint(credential),
        };
        let sidecar = self.sidecar_path(&hash);
        std::fs::write(&sidecar, serde_json::to_vec_pretty(&provenance)?).map_err(|source| {
            StorageError::Io {
                path: sidecar,
                source,
            }
        })?;

        tracing::info!("Uploaded {} -> {hash}", file.display());
        Ok(hash)
    }

    fn download(&self, hash: &ContentHash, output: &Path) -> Result<(), StorageError> {
        let blob = self.blob_path(hash);
        if !blob.is_file() {
            return Err(StorageError::NotFound(hash.to_string()));
        }
        let bytes = std::fs::read(&blob).map_err(|source| StorageError::Io {
            path: blob.clone(),
            source,
        })?;

        let actual = ContentHash::of_bytes(&bytes);
        if &actual != hash {
            return Err(StorageError::DigestMismatch {
                expected: hash.to_string(),
                actual: actual.to_string(),
            });
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(output, &bytes).map_err(|source| StorageError::Io {
            path: output.to_path_buf(),
            source,
        })?;

        tracing::info!("Downloaded {hash} -> {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key() -> SecretString {
        SecretString::from("0x59c6995e998f97a5a0044966f0945389".to_string())
    }

    #[test]
    fn test_upload_then_download() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("feed.json");
        std::fs::write(&source, br#"[{"severity":"high"}]"#).unwrap();
        let store = LocalStore::new(tmp.path().join("store"));

        let hash = store.upload(&source, &key()).unwrap();
        assert_eq!(hash, ContentHash::of_bytes(br#"[{"severity":"high"}]"#));
        assert!(store.contains(&hash));

        let output = tmp.path().join("out/nested/feed.json");
        store.download(&hash, &output).unwrap();
        assert_eq!(
            std::fs::read(&output).unwrap(),
            std::fs::read(&source).unwrap()
        );
    }

    #[test]
    fn test_upload_records_provenance() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("feed.json");
        std::fs::write(&source, b"[]").unwrap();
        let store = LocalStore::new(tmp.path().join("store"));

        let hash = store.upload(&source, &key()).unwrap();
        let provenance = store.provenance(&hash).unwrap();
        assert_eq!(provenance.size_bytes, 2);
        assert_eq!(provenance.uploader, fingerprint(&key()));
        assert!(provenance.source.ends_with("feed.json"));
    }

    #[test]
    fn test_upload_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("feed.json");
        std::fs::write(&source, b"[1,2,3]").unwrap();
        let store = LocalStore::new(tmp.path().join("store"));

        let first = store.upload(&source, &key()).unwrap();
        let second = store.upload(&source, &key()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_upload_requires_credential() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("feed.json");
        std::fs::write(&source, b"[]").unwrap();
        let store = LocalStore::new(tmp.path().join("store"));

        let err = store.upload(&source, &SecretString::from("".to_string())).unwrap_err();
        assert!(matches!(err, StorageError::MissingCredential));
        assert!(!store.root().exists());
    }

    #[test]
    fn test_upload_missing_file() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path().join("store"));
        let err = store
            .upload(&tmp.path().join("absent.json"), &key())
            .unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn test_download_unknown_hash() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let hash = ContentHash::of_bytes(b"never stored");
        let err = store
            .download(&hash, &tmp.path().join("out.json"))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn test_download_detects_corruption() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("feed.json");
        std::fs::write(&source, b"original").unwrap();
        let store = LocalStore::new(tmp.path().join("store"));
        let hash = store.upload(&source, &key()).unwrap();

        std::fs::write(store.root().join(hash.as_str()), b"tampered").unwrap();
        let err = store
            .download(&hash, &tmp.path().join("out.json"))
            .unwrap_err();
        assert!(matches!(err, StorageError::DigestMismatch { .. }));
    }
}
