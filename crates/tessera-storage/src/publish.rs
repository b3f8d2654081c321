use secrecy::SecretString;

use tessera_core::Catalog;

use crate::client::{check_credential, ContentHash, StorageClient};
use crate::error::StorageError;

/// A feed whose data file was uploaded.
#[derive(Debug, Clone)]
pub struct PublishedFeed {
    pub feed_id: String,
    pub data_file: String,
    pub hash: ContentHash,
    /// `storage_hash` currently recorded for the feed in the registry.
    pub registry_hash: String,
}

impl PublishedFeed {
    /// True when the registry does not yet point at the uploaded content.
    pub fn is_stale(&self) -> bool {
        !self.registry_hash.eq_ignore_ascii_case(self.hash.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct FailedFeed {
    pub feed_id: String,
    pub error: String,
}

/// Outcome of a publish run.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub published: Vec<PublishedFeed>,
    pub failed: Vec<FailedFeed>,
}

/// Upload the data file of every feed in the catalog.
///
/// A feed that fails to upload is recorded in the report and the run moves on
/// to the next one. Only a missing credential aborts the whole run.
pub fn publish_feeds<C>(
    catalog: &Catalog,
    client: &C,
    credential: &SecretString,
) -> Result<PublishReport, StorageError>
where
    C: StorageClient + ?Sized,
{
    check_credential(credential)?;

    let mut report = PublishReport::default();
    for feed in catalog.feeds(None) {
        let path = catalog.data_path(feed);
        tracing::info!(feed = %feed.feed_id, "Uploading {}", path.display());
        match client.upload(&path, credential) {
            Ok(hash) => {
                report.published.push(PublishedFeed {
                    feed_id: feed.feed_id.clone(),
                    data_file: feed.data_file.clone(),
                    hash,
                    registry_hash: feed.storage_hash.clone(),
                });
            }
            Err(e) => {
                tracing::warn!(feed = %feed.feed_id, "Upload failed: {e}");
                report.failed.push(FailedFeed {
                    feed_id: feed.feed_id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalStore;
    use tempfile::TempDir;

    fn write_catalog(dir: &std::path::Path, with_second_file: bool) {
        std::fs::create_dir_all(dir.join("feeds")).unwrap();
        let entry = |id: &str, hash: &str| {
            serde_json::json!({
                "feed_id": id,
                "name": id,
                "description": "",
                "category": "test",
                "query_pattern": "alert",
                "provider": { "name": "P", "id": "p", "reputation_score": 1.0 },
                "query_cost_credits": 1,
                "data_file": format!("feeds/{id}.json"),
                "storage_hash": hash,
                "storage_network": "0G",
                "last_updated": "",
                "update_frequency": ""
            })
        };
        let current = ContentHash::of_bytes(b"[]").to_string();
        let registry = serde_json::json!([entry("first", &current), entry("second", "0x00")]);
        std::fs::write(dir.join("registry.json"), registry.to_string()).unwrap();
        std::fs::write(dir.join("feeds/first.json"), b"[]").unwrap();
        if with_second_file {
            std::fs::write(dir.join("feeds/second.json"), br#"[{"severity":"low"}]"#).unwrap();
        }
    }

    fn key() -> SecretString {
        SecretString::from("0xfeedface".to_string())
    }

    #[test]
    fn test_publish_all_feeds() {
        let tmp = TempDir::new().unwrap();
        write_catalog(tmp.path(), true);
        let catalog = Catalog::load_registry(tmp.path()).unwrap();
        let store = LocalStore::new(tmp.path().join("store"));

        let report = publish_feeds(&catalog, &store, &key()).unwrap();
        assert!(report.failed.is_empty());
        assert_eq!(report.published.len(), 2);
        assert!(!report.published[0].is_stale());
        assert!(report.published[1].is_stale());
        for published in &report.published {
            assert!(store.contains(&published.hash));
        }
    }

    #[test]
    fn test_publish_continues_past_failures() {
        let tmp = TempDir::new().unwrap();
        write_catalog(tmp.path(), false);
        let catalog = Catalog::load_registry(tmp.path()).unwrap();
        let store = LocalStore::new(tmp.path().join("store"));

        let report = publish_feeds(&catalog, &store, &key()).unwrap();
        assert_eq!(report.published.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].feed_id, "second");
    }

    #[test]
    fn test_publish_rejects_placeholder_credential() {
        let tmp = TempDir::new().unwrap();
        write_catalog(tmp.path(), true);
        let catalog = Catalog::load_registry(tmp.path()).unwrap();
        let store = LocalStore::new(tmp.path().join("store"));

        let placeholder = SecretString::from(crate::client::PLACEHOLDER_CREDENTIAL.to_string());
        let err = publish_feeds(&catalog, &store, &placeholder).unwrap_err();
        assert!(matches!(err, StorageError::MissingCredential));
    }
}
