pub mod feed;
pub mod filters;
pub mod record;
pub mod usage;

pub use feed::{FeedDescriptor, FeedSchema, Provider, QueryPattern, SchemaField};
pub use filters::{FilterSet, TextKey, DEFAULT_LIMIT};
pub use record::{AlertRecord, BenchmarkRecord, Record, TrendRecord};
pub use usage::{Charge, ProviderEarnings, UsageLogEntry};

/// Synthetic credit amount. Signed: an unchecked debit can overdraw an account.
pub type Credits = i64;
