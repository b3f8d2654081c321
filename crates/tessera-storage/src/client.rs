use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::error::StorageError;

/// Credential value shipped in example `.env` files; never a real key.
pub const PLACEHOLDER_CREDENTIAL: &str = "0xYOUR_PRIVATE_KEY_HERE";

/// Identifier of stored content: `0x` followed by 64 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(format!("0x{:x}", Sha256::digest(bytes)))
    }

    pub fn parse(s: &str) -> Result<Self, StorageError> {
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| StorageError::InvalidHash(s.to_string()))?;
        if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StorageError::InvalidHash(s.to_string()));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A content-addressed store that feed files are published to and fetched from.
pub trait StorageClient {
    /// Store the file's bytes and return the hash they are addressed by.
    fn upload(&self, file: &Path, credential: &SecretString) -> Result<ContentHash, StorageError>;

    /// Write the content stored under `hash` to `output`.
    fn download(&self, hash: &ContentHash, output: &Path) -> Result<(), StorageError>;
}

/// Reject an empty credential or the example placeholder.
pub fn check_credential(credential: &SecretString) -> Result<(), StorageError> {
    let value = credential.expose_secret().trim();
    if value.is_empty() || value == PLACEHOLDER_CREDENTIAL {
        return Err(StorageError::MissingCredential);
    }
    Ok(())
}

/// Short, non-reversible identifier for whoever holds `credential`.
pub fn fingerprint(credential: &SecretString) -> String {
    let digest = format!("{:x}", Sha256::digest(credential.expose_secret().as_bytes()));
    digest[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_of_bytes() {
        // SHA-256 of the empty string.
        assert_eq!(
            ContentHash::of_bytes(b"").as_str(),
            "0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_parse_normalizes_case() {
        let upper = format!("0x{}", "AB".repeat(32));
        let parsed = ContentHash::parse(&upper).unwrap();
        assert_eq!(parsed.as_str(), format!("0x{}", "ab".repeat(32)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ContentHash::parse("abc").is_err());
        assert!(ContentHash::parse("0x1234").is_err());
        assert!(ContentHash::parse(&format!("0x{}", "zz".repeat(32))).is_err());
        assert!(ContentHash::parse("../../etc/passwd").is_err());
    }

    #[test]
    fn test_check_credential() {
        assert!(check_credential(&SecretString::from("".to_string())).is_err());
        assert!(check_credential(&SecretString::from("  ".to_string())).is_err());
        assert!(check_credential(&SecretString::from(PLACEHOLDER_CREDENTIAL.to_string())).is_err());
        assert!(check_credential(&SecretString::from("0xdeadbeef".to_string())).is_ok());
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = fingerprint(&SecretString::from("key-one".to_string()));
        assert_eq!(a.len(), 16);
        assert_eq!(a, fingerprint(&SecretString::from("key-one".to_string())));
        assert_ne!(a, fingerprint(&SecretString::from("key-two".to_string())));
    }
}
