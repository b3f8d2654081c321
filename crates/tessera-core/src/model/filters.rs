use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Results returned by a query when the filter-set carries no `limit`.
pub const DEFAULT_LIMIT: usize = 10;

/// String-valued filter keys, matched case-insensitively against the
/// same-named record field. `ALL` is the evaluation order, which is also the
/// order they appear in a query's explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    Severity,
    Industry,
    Metric,
    CompanySizeTier,
    RoleCategory,
    Region,
    TrendDirection,
    SignalType,
    Protocol,
    Chain,
    TrendType,
}

impl TextKey {
    pub const ALL: [TextKey; 11] = [
        TextKey::Severity,
        TextKey::Industry,
        TextKey::Metric,
        TextKey::CompanySizeTier,
        TextKey::RoleCategory,
        TextKey::Region,
        TextKey::TrendDirection,
        TextKey::SignalType,
        TextKey::Protocol,
        TextKey::Chain,
        TextKey::TrendType,
    ];

    /// Field name, shared by the filter-set and the records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Severity => "severity",
            Self::Industry => "industry",
            Self::Metric => "metric",
            Self::CompanySizeTier => "company_size_tier",
            Self::RoleCategory => "role_category",
            Self::Region => "region",
            Self::TrendDirection => "trend_direction",
            Self::SignalType => "signal_type",
            Self::Protocol => "protocol",
            Self::Chain => "chain",
            Self::TrendType => "trend_type",
        }
    }
}

impl std::str::FromStr for TextKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown filter key '{s}'"))
    }
}

impl std::fmt::Display for TextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query filters. Every field is optional; keys outside this set are dropped
/// when the filter-set is parsed from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterSet {
    /// Filter by severity: low, medium, high, critical
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Minimum confidence score (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_min: Option<f64>,
    /// Filter by tags (OR match, returns records matching ANY tag)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Max results to return (default 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// ISO 8601 timestamp, only results at or after this time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Filter by industry (comparative feeds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Filter by metric key (comparative feeds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    /// Filter by size tier: 1-25, 25-100, 100-500
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size_tier: Option<String>,
    /// Filter by role category (trend feeds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_category: Option<String>,
    /// Filter by region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Filter: increasing, decreasing, stable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_direction: Option<String>,
    /// Filter by signal type (alert feeds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_type: Option<String>,
    /// Filter by protocol name (alert feeds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Filter by blockchain (alert feeds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    /// Filter by trend type (trend feeds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_type: Option<String>,
}

impl FilterSet {
    pub fn text(&self, key: TextKey) -> Option<&str> {
        let value = match key {
            TextKey::Severity => &self.severity,
            TextKey::Industry => &self.industry,
            TextKey::Metric => &self.metric,
            TextKey::CompanySizeTier => &self.company_size_tier,
            TextKey::RoleCategory => &self.role_category,
            TextKey::Region => &self.region,
            TextKey::TrendDirection => &self.trend_direction,
            TextKey::SignalType => &self.signal_type,
            TextKey::Protocol => &self.protocol,
            TextKey::Chain => &self.chain,
            TextKey::TrendType => &self.trend_type,
        };
        value.as_deref()
    }

    /// Builder-style setter for a string key.
    pub fn with_text(mut self, key: TextKey, value: impl Into<String>) -> Self {
        let slot = match key {
            TextKey::Severity => &mut self.severity,
            TextKey::Industry => &mut self.industry,
            TextKey::Metric => &mut self.metric,
            TextKey::CompanySizeTier => &mut self.company_size_tier,
            TextKey::RoleCategory => &mut self.role_category,
            TextKey::Region => &mut self.region,
            TextKey::TrendDirection => &mut self.trend_direction,
            TextKey::SignalType => &mut self.signal_type,
            TextKey::Protocol => &mut self.protocol,
            TextKey::Chain => &mut self.chain,
            TextKey::TrendType => &mut self.trend_type,
        };
        *slot = Some(value.into());
        self
    }

    /// Tag filter, if one is in effect. An empty list means no tag filter.
    pub fn tag_filter(&self) -> Option<&[String]> {
        self.tags.as_deref().filter(|tags| !tags.is_empty())
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_ignored() {
        let filters: FilterSet =
            serde_json::from_str(r#"{"severity":"high","colour":"blue","limit":3}"#).unwrap();
        assert_eq!(filters.severity.as_deref(), Some("high"));
        assert_eq!(filters.limit, Some(3));
        assert_eq!(
            filters,
            FilterSet {
                severity: Some("high".into()),
                limit: Some(3),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_text_accessor_covers_every_key() {
        for key in TextKey::ALL {
            let filters = FilterSet::default().with_text(key, key.as_str());
            assert_eq!(filters.text(key), Some(key.as_str()));
            let others = TextKey::ALL.iter().filter(|k| **k != key);
            for other in others {
                assert_eq!(filters.text(*other), None, "{other} leaked from {key}");
            }
        }
    }

    #[test]
    fn test_text_key_from_str() {
        assert_eq!("company_size_tier".parse(), Ok(TextKey::CompanySizeTier));
        assert!("confidence_min".parse::<TextKey>().is_err());
    }

    #[test]
    fn test_text_key_names_match_serde_fields() {
        for key in TextKey::ALL {
            let filters = FilterSet::default().with_text(key, "x");
            let json = serde_json::to_value(&filters).unwrap();
            assert_eq!(json[key.as_str()], "x");
        }
    }

    #[test]
    fn test_empty_tags_is_no_tag_filter() {
        let filters = FilterSet {
            tags: Some(vec![]),
            ..Default::default()
        };
        assert!(filters.tag_filter().is_none());
    }

    #[test]
    fn test_snapshot_omits_unset_keys() {
        let filters = FilterSet {
            confidence_min: Some(0.8),
            ..Default::default()
        };
        let json = serde_json::to_string(&filters).unwrap();
        assert_eq!(json, r#"{"confidence_min":0.8}"#);
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(FilterSet::default().effective_limit(), DEFAULT_LIMIT);
        let capped = FilterSet {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(capped.effective_limit(), 0);
    }
}
