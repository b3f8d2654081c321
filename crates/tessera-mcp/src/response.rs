use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tessera_core::error::CoreError;
use tessera_core::model::{
    Credits, FeedDescriptor, FeedSchema, FilterSet, Provider, ProviderEarnings, QueryPattern,
    Record, UsageLogEntry,
};
use tessera_core::Catalog;

/// Either a tool's normal payload or a structured domain error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Ok(T),
    Err(ToolError),
}

impl<T> Outcome<T> {
    pub fn error(&self) -> Option<&ToolError> {
        match self {
            Self::Ok(_) => None,
            Self::Err(e) => Some(e),
        }
    }
}

/// Domain errors reported to the agent as payloads rather than tool failures.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ToolError {
    FeedNotFound {
        message: String,
    },
    InsufficientCredits {
        message: String,
        query_cost: Credits,
        credits_remaining: Credits,
    },
}

impl ToolError {
    pub fn feed_not_found(feed_id: &str) -> Self {
        Self::FeedNotFound {
            message: format!("No feed with ID '{feed_id}' in the registry."),
        }
    }

    pub fn insufficient_credits(cost: Credits, balance: Credits) -> Self {
        Self::InsufficientCredits {
            message: format!(
                "Query costs {cost} credits but you only have {balance} remaining."
            ),
            query_cost: cost,
            credits_remaining: balance,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::FeedNotFound { message } | Self::InsufficientCredits { message, .. } => message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedList<'a> {
    pub feeds: Vec<FeedSummary<'a>>,
    pub total_feeds: usize,
}

impl<'a> FeedList<'a> {
    /// Feeds in `category` (or all), with their live record counts.
    pub fn from_catalog(catalog: &'a Catalog, category: Option<&str>) -> Result<Self, CoreError> {
        let mut feeds = Vec::new();
        for feed in catalog.feeds(category) {
            let record_count = catalog.records(feed)?.len();
            feeds.push(FeedSummary::new(feed, record_count));
        }
        Ok(Self {
            total_feeds: feeds.len(),
            feeds,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct FeedSummary<'a> {
    pub feed_id: &'a str,
    pub name: &'a str,
    pub category: &'a str,
    pub query_pattern: QueryPattern,
    pub provider: String,
    pub query_cost_credits: Credits,
    pub description: &'a str,
    pub last_updated: &'a str,
    pub storage_network: &'a str,
    pub record_count: usize,
}

impl<'a> FeedSummary<'a> {
    pub fn new(feed: &'a FeedDescriptor, record_count: usize) -> Self {
        Self {
            feed_id: &feed.feed_id,
            name: &feed.name,
            category: &feed.category,
            query_pattern: feed.query_pattern,
            provider: feed.provider_label(),
            query_cost_credits: feed.query_cost_credits,
            description: &feed.description,
            last_updated: &feed.last_updated,
            storage_network: &feed.storage_network,
            record_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedMetadata<'a> {
    pub feed_id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub query_pattern: QueryPattern,
    pub storage_hash: &'a str,
    pub storage_network: &'a str,
    pub provider: &'a Provider,
    pub query_cost_credits: Credits,
    pub last_updated: &'a str,
    pub update_frequency: &'a str,
    pub record_count: usize,
    pub schema: &'a FeedSchema,
    pub sample_queries: &'a [String],
}

impl<'a> FeedMetadata<'a> {
    pub fn new(feed: &'a FeedDescriptor, record_count: usize) -> Self {
        Self {
            feed_id: &feed.feed_id,
            name: &feed.name,
            description: &feed.description,
            category: &feed.category,
            query_pattern: feed.query_pattern,
            storage_hash: &feed.storage_hash,
            storage_network: &feed.storage_network,
            provider: &feed.provider,
            query_cost_credits: feed.query_cost_credits,
            last_updated: &feed.last_updated,
            update_frequency: &feed.update_frequency,
            record_count,
            schema: &feed.schema,
            sample_queries: &feed.sample_queries,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query_metadata: QueryMetadata,
    pub results: Vec<Record>,
    pub explain: String,
}

#[derive(Debug, Serialize)]
pub struct QueryMetadata {
    pub feed_id: String,
    pub feed_name: String,
    pub query_cost: Credits,
    pub credits_remaining: Credits,
    pub timestamp: DateTime<Utc>,
    pub storage_hash: String,
    pub storage_network: String,
    pub filters_applied: FilterSet,
    pub results_returned: usize,
    pub total_matching: usize,
}

#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub account: AccountSummary,
    pub provider_earnings: BTreeMap<String, ProviderEarnings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_log: Option<Vec<UsageLogEntry>>,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub agent_id: String,
    pub credits_remaining: Credits,
    pub credits_used: Credits,
    pub total_queries: usize,
}
