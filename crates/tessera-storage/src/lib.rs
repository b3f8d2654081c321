pub mod client;
pub mod error;
pub mod local;
pub mod publish;

pub use client::{check_credential, ContentHash, StorageClient, PLACEHOLDER_CREDENTIAL};
pub use error::StorageError;
pub use local::{LocalStore, Provenance};
pub use publish::{publish_feeds, FailedFeed, PublishReport, PublishedFeed};
