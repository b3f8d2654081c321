use serde::{Deserialize, Serialize};

use super::Credits;

/// One entry of `registry.json`: everything the catalog knows about a feed
/// apart from its records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedDescriptor {
    pub feed_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub query_pattern: QueryPattern,
    pub provider: Provider,
    pub query_cost_credits: Credits,
    /// Path of the record file, relative to the data directory.
    pub data_file: String,
    pub storage_hash: String,
    pub storage_network: String,
    pub last_updated: String,
    pub update_frequency: String,
    #[serde(default)]
    pub schema: FeedSchema,
    #[serde(default)]
    pub sample_queries: Vec<String>,
}

impl FeedDescriptor {
    /// `"Name (id)"`, the form shown in feed listings.
    pub fn provider_label(&self) -> String {
        format!("{} ({})", self.provider.name, self.provider.id)
    }
}

/// Record shape served by a feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryPattern {
    Alert,
    Comparative,
    Trend,
}

impl QueryPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Comparative => "comparative",
            Self::Trend => "trend",
        }
    }
}

impl std::fmt::Display for QueryPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub name: String,
    pub id: String,
    pub reputation_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeedSchema {
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"{
        "feed_id": "defi-risk-signals",
        "name": "DeFi Risk Signals",
        "description": "Protocol risk alerts",
        "category": "defi",
        "query_pattern": "alert",
        "provider": { "name": "ChainWatch Labs", "id": "chainwatch", "reputation_score": 0.94 },
        "query_cost_credits": 3,
        "data_file": "feeds/defi-risk-signals.json",
        "storage_hash": "0xabc",
        "storage_network": "0G",
        "last_updated": "2026-02-01T00:00:00Z",
        "update_frequency": "hourly"
    }"#;

    #[test]
    fn test_parse_registry_entry_without_optional_sections() {
        let feed: FeedDescriptor = serde_json::from_str(ENTRY).unwrap();
        assert_eq!(feed.query_pattern, QueryPattern::Alert);
        assert_eq!(feed.query_cost_credits, 3);
        assert!(feed.schema.fields.is_empty());
        assert!(feed.sample_queries.is_empty());
    }

    #[test]
    fn test_provider_label() {
        let feed: FeedDescriptor = serde_json::from_str(ENTRY).unwrap();
        assert_eq!(feed.provider_label(), "ChainWatch Labs (chainwatch)");
    }

    #[test]
    fn test_unknown_query_pattern_rejected() {
        let bad = ENTRY.replace("\"alert\"", "\"forecast\"");
        assert!(serde_json::from_str::<FeedDescriptor>(&bad).is_err());
    }
}
