use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::CoreError;
use crate::model::{FeedDescriptor, Record};

/// Name of the feed registry inside the data directory.
pub const REGISTRY_FILE: &str = "registry.json";

/// The feed registry plus a load-once cache of each feed's records.
#[derive(Debug)]
pub struct Catalog {
    data_dir: PathBuf,
    feeds: Vec<FeedDescriptor>,
    cache: RwLock<HashMap<String, Arc<[Record]>>>,
}

impl Catalog {
    /// Read the registry from `data_dir` and pre-load every feed's records.
    ///
    /// A feed whose records cannot be loaded is logged and skipped; it stays in
    /// the registry and loading is retried the next time it is queried.
    pub fn open(data_dir: &Path) -> Result<Self, CoreError> {
        let catalog = Self::load_registry(data_dir)?;
        for feed in &catalog.feeds {
            if let Err(e) = catalog.records(feed) {
                tracing::warn!(feed = %feed.feed_id, "Could not load feed data: {e}");
            }
        }
        Ok(catalog)
    }

    /// Read the registry only; records load lazily on first use.
    pub fn load_registry(data_dir: &Path) -> Result<Self, CoreError> {
        let path = data_dir.join(REGISTRY_FILE);
        let raw = std::fs::read_to_string(&path).map_err(|source| CoreError::Read {
            path: path.clone(),
            source,
        })?;
        let feeds: Vec<FeedDescriptor> =
            serde_json::from_str(&raw).map_err(|source| CoreError::Parse { path, source })?;

        tracing::info!("Loaded {} feeds from registry", feeds.len());
        for feed in &feeds {
            tracing::debug!(
                feed = %feed.feed_id,
                network = %feed.storage_network,
                hash = %feed.storage_hash,
                "Registered feed"
            );
        }

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            feeds,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// All feeds, or those in `category` (case-insensitive), in registry order.
    pub fn feeds(&self, category: Option<&str>) -> Vec<&FeedDescriptor> {
        self.feeds
            .iter()
            .filter(|f| match category {
                Some(c) => f.category.eq_ignore_ascii_case(c),
                None => true,
            })
            .collect()
    }

    pub fn feed(&self, feed_id: &str) -> Option<&FeedDescriptor> {
        self.feeds.iter().find(|f| f.feed_id == feed_id)
    }

    /// Like [`Catalog::feed`], for callers that treat an unknown id as an error.
    pub fn require(&self, feed_id: &str) -> Result<&FeedDescriptor, CoreError> {
        self.feed(feed_id).ok_or_else(|| CoreError::FeedNotFound {
            id: feed_id.to_string(),
        })
    }

    /// Absolute path of a feed's record file.
    pub fn data_path(&self, feed: &FeedDescriptor) -> PathBuf {
        self.data_dir.join(&feed.data_file)
    }

    /// Records for a feed, read from disk on first use and cached afterwards.
    pub fn records(&self, feed: &FeedDescriptor) -> Result<Arc<[Record]>, CoreError> {
        if let Some(records) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&feed.feed_id)
        {
            return Ok(Arc::clone(records));
        }

        let path = self.data_path(feed);
        let raw = std::fs::read_to_string(&path).map_err(|source| CoreError::Read {
            path: path.clone(),
            source,
        })?;
        let records: Arc<[Record]> = Record::parse_list(feed.query_pattern, &raw)
            .map_err(|source| CoreError::Parse { path, source })?
            .into();
        tracing::info!(feed = %feed.feed_id, "Loaded {} records", records.len());

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let cached = cache
            .entry(feed.feed_id.clone())
            .or_insert_with(|| Arc::clone(&records));
        Ok(Arc::clone(cached))
    }
}
