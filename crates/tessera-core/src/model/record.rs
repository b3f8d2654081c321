use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::feed::QueryPattern;
use super::filters::TextKey;

/// A single feed record. The variant follows the feed's `query_pattern`.
///
/// Every variant answers the same accessor contract (`confidence`,
/// `timestamp`, `tags`, `text_field`); `None` means the record does not carry
/// the field and therefore never matches a filter on it. Fields a variant does
/// not model, and modeled fields holding a value of the wrong JSON type, are
/// kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Alert(AlertRecord),
    Comparative(BenchmarkRecord),
    Trend(TrendRecord),
}

/// Point-in-time signal, e.g. a protocol risk alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Percentile benchmark for one metric within a peer group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p25: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p75: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p90: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Directional movement over a period, e.g. hiring demand for a role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Parse a feed file's JSON array into records of the given pattern.
    pub fn parse_list(pattern: QueryPattern, raw: &str) -> Result<Vec<Record>, serde_json::Error> {
        let items: Vec<Value> = serde_json::from_str(raw)?;
        let records = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let record = match pattern {
                    QueryPattern::Alert => parse_lenient(item).map(Record::Alert),
                    QueryPattern::Comparative => parse_lenient(item).map(Record::Comparative),
                    QueryPattern::Trend => parse_lenient(item).map(Record::Trend),
                };
                if record.is_none() {
                    tracing::warn!(index, "Skipping feed entry that is not a JSON object");
                }
                record
            })
            .collect();
        Ok(records)
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            Self::Alert(r) => r.confidence,
            Self::Comparative(r) => r.confidence,
            Self::Trend(r) => r.confidence,
        }
    }

    pub fn timestamp(&self) -> Option<&str> {
        match self {
            Self::Alert(r) => r.timestamp.as_deref(),
            Self::Comparative(r) => r.timestamp.as_deref(),
            Self::Trend(r) => r.timestamp.as_deref(),
        }
    }

    pub fn tags(&self) -> Option<&[String]> {
        match self {
            Self::Alert(r) => r.tags.as_deref(),
            Self::Comparative(r) => r.tags.as_deref(),
            Self::Trend(r) => r.tags.as_deref(),
        }
    }

    /// Value of a string filter field. Keys the variant does not model, or
    /// whose value had the wrong type, are looked up in `extra`, where numbers
    /// and booleans compare by their JSON text.
    pub fn text_field(&self, key: TextKey) -> Option<Cow<'_, str>> {
        let modeled = match (self, key) {
            (Self::Alert(r), TextKey::Severity) => &r.severity,
            (Self::Alert(r), TextKey::SignalType) => &r.signal_type,
            (Self::Alert(r), TextKey::Protocol) => &r.protocol,
            (Self::Alert(r), TextKey::Chain) => &r.chain,
            (Self::Comparative(r), TextKey::Industry) => &r.industry,
            (Self::Comparative(r), TextKey::Metric) => &r.metric,
            (Self::Comparative(r), TextKey::CompanySizeTier) => &r.company_size_tier,
            (Self::Comparative(r), TextKey::Region) => &r.region,
            (Self::Trend(r), TextKey::RoleCategory) => &r.role_category,
            (Self::Trend(r), TextKey::Region) => &r.region,
            (Self::Trend(r), TextKey::TrendType) => &r.trend_type,
            (Self::Trend(r), TextKey::TrendDirection) => &r.trend_direction,
            _ => &None,
        };
        if let Some(value) = modeled {
            return Some(Cow::Borrowed(value));
        }
        match self.extra().get(key.as_str())? {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    pub fn extra(&self) -> &Map<String, Value> {
        match self {
            Self::Alert(r) => &r.extra,
            Self::Comparative(r) => &r.extra,
            Self::Trend(r) => &r.extra,
        }
    }
}

/// Record types that can be parsed field by field.
trait Lenient: DeserializeOwned {
    /// JSON keys of the typed fields.
    const FIELDS: &'static [&'static str];

    fn extra_mut(&mut self) -> &mut Map<String, Value>;
}

impl Lenient for AlertRecord {
    const FIELDS: &'static [&'static str] = &[
        "signal_type",
        "protocol",
        "chain",
        "severity",
        "confidence",
        "timestamp",
        "tags",
    ];

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

impl Lenient for BenchmarkRecord {
    const FIELDS: &'static [&'static str] = &[
        "industry",
        "metric",
        "company_size_tier",
        "region",
        "p25",
        "p50",
        "p75",
        "p90",
        "sample_size",
        "unit",
        "confidence",
        "timestamp",
        "tags",
    ];

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

impl Lenient for TrendRecord {
    const FIELDS: &'static [&'static str] = &[
        "role_category",
        "region",
        "trend_type",
        "trend_direction",
        "magnitude_pct",
        "confidence",
        "timestamp",
        "tags",
    ];

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

/// Build a record from one JSON object. A typed field whose value does not
/// fit is moved to `extra` instead of failing the record, so it reads as
/// absent. `None` when the item is not an object.
fn parse_lenient<T: Lenient>(item: Value) -> Option<T> {
    let Value::Object(mut fields) = item else {
        return None;
    };

    let mut mistyped = Map::new();
    for key in T::FIELDS {
        let Some(value) = fields.get(*key) else {
            continue;
        };
        let single = Map::from_iter([(key.to_string(), value.clone())]);
        if serde_json::from_value::<T>(Value::Object(single)).is_err() {
            if let Some(value) = fields.remove(*key) {
                mistyped.insert(key.to_string(), value);
            }
        }
    }

    let mut record: T = serde_json::from_value(Value::Object(fields)).ok()?;
    record.extra_mut().extend(mistyped);
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alert_keeps_unmodeled_fields() {
        let raw = r#"[{
            "id": "sig-001",
            "signal_type": "oracle_deviation",
            "protocol": "Aave",
            "severity": "high",
            "confidence": 0.91,
            "timestamp": "2026-02-10T08:00:00Z",
            "tags": ["oracle", "lending"],
            "description": "Price feed drift"
        }]"#;
        let records = Record::parse_list(QueryPattern::Alert, raw).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!(matches!(record, Record::Alert(_)));
        assert_eq!(record.confidence(), Some(0.91));
        assert_eq!(record.text_field(TextKey::Protocol).as_deref(), Some("Aave"));
        assert_eq!(record.extra()["id"], "sig-001");

        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["description"], "Price feed drift");
        assert_eq!(json["severity"], "high");
        assert!(json.get("chain").is_none());
    }

    #[test]
    fn test_missing_fields_are_none() {
        let records = Record::parse_list(QueryPattern::Trend, r#"[{"region": "emea"}]"#).unwrap();
        let record = &records[0];
        assert_eq!(record.confidence(), None);
        assert_eq!(record.timestamp(), None);
        assert_eq!(record.tags(), None);
        assert_eq!(record.text_field(TextKey::RoleCategory), None);
        assert_eq!(record.text_field(TextKey::Region).as_deref(), Some("emea"));
    }

    #[test]
    fn test_unmodeled_key_falls_back_to_extra() {
        let raw = r#"[{"industry": "retail", "severity": "low", "chain": 7, "protocol": {"a": 1}}]"#;
        let records = Record::parse_list(QueryPattern::Comparative, raw).unwrap();
        let record = &records[0];
        assert_eq!(record.text_field(TextKey::Severity).as_deref(), Some("low"));
        // Scalars compare by their JSON text; objects never match.
        assert_eq!(record.text_field(TextKey::Chain).as_deref(), Some("7"));
        assert_eq!(record.text_field(TextKey::Protocol), None);
    }

    #[test]
    fn test_mistyped_field_reads_as_absent() {
        let raw = r#"[
            {"role_category": "engineering", "confidence": 0.9, "tags": ["ai"]},
            {"role_category": "sales", "confidence": "0.9", "tags": "remote", "magnitude_pct": 4.5}
        ]"#;
        let records = Record::parse_list(QueryPattern::Trend, raw).unwrap();
        assert_eq!(records.len(), 2);

        let good = &records[0];
        assert_eq!(good.confidence(), Some(0.9));
        assert_eq!(good.tags(), Some(&["ai".to_string()][..]));

        let bad = &records[1];
        assert_eq!(bad.confidence(), None);
        assert_eq!(bad.tags(), None);
        assert_eq!(bad.text_field(TextKey::RoleCategory).as_deref(), Some("sales"));
        let Record::Trend(trend) = bad else {
            panic!("expected a trend record");
        };
        assert_eq!(trend.magnitude_pct, Some(4.5));

        // The raw values survive serialization.
        let json = serde_json::to_value(bad).unwrap();
        assert_eq!(json["tags"], "remote");
        assert_eq!(json["confidence"], "0.9");
    }

    #[test]
    fn test_mistyped_string_field_matches_by_text() {
        let raw = r#"[{"region": 5, "trend_direction": null}]"#;
        let records = Record::parse_list(QueryPattern::Trend, raw).unwrap();
        assert_eq!(records[0].text_field(TextKey::Region).as_deref(), Some("5"));
        assert_eq!(records[0].text_field(TextKey::TrendDirection), None);
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let raw = r#"[{"severity": "high"}, 42, "text"]"#;
        let records = Record::parse_list(QueryPattern::Alert, raw).unwrap();
        assert_eq!(records.len(), 1);
        assert!(Record::parse_list(QueryPattern::Alert, r#"{"severity": "high"}"#).is_err());
    }

    #[test]
    fn test_benchmark_percentiles() {
        let raw = r#"[{"industry": "manufacturing", "p50": 5.2, "p75": 7.1, "p90": 9.4, "sample_size": 212}]"#;
        let records = Record::parse_list(QueryPattern::Comparative, raw).unwrap();
        match &records[0] {
            Record::Comparative(b) => {
                assert_eq!(b.p50, Some(5.2));
                assert_eq!(b.sample_size, Some(212));
            }
            other => panic!("expected benchmark, got {other:?}"),
        }
    }
}
