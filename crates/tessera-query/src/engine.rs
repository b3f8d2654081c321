use serde::Serialize;

use tessera_core::model::{FilterSet, Record, TextKey};

use crate::explain::explain;

/// Outcome of running a filter-set over a feed's records.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<'a> {
    /// Matching records, ranked and capped at the filter-set's limit.
    pub results: Vec<&'a Record>,
    /// Matches before the limit was applied.
    pub total_matching: usize,
    pub explain: String,
}

/// Filter, rank and cap `records`.
///
/// All predicates are conjunctive; a record missing a filtered field never
/// matches. Tags match when any filter tag is among the record's tags. When at
/// least one match carries `confidence`, matches are stably sorted by it,
/// highest first, with a missing value ranking as 0. Otherwise the input order
/// is kept.
pub fn query_feed<'a>(records: &'a [Record], filters: &FilterSet) -> QueryResult<'a> {
    let mut matches: Vec<&Record> = records.iter().collect();
    let mut applied: Vec<String> = Vec::new();

    for key in TextKey::ALL {
        if let Some(wanted) = filters.text(key) {
            let wanted_lower = wanted.to_lowercase();
            matches.retain(|r| {
                r.text_field(key)
                    .is_some_and(|value| value.to_lowercase() == wanted_lower)
            });
            applied.push(format!("{key}={wanted}"));
        }
    }

    if let Some(min) = filters.confidence_min {
        matches.retain(|r| r.confidence().is_some_and(|c| c >= min));
        applied.push(format!("confidence>={min}"));
    }

    if let Some(since) = filters.since.as_deref() {
        // ISO-8601 timestamps order correctly as plain strings.
        matches.retain(|r| r.timestamp().is_some_and(|ts| ts >= since));
        applied.push(format!("since={since}"));
    }

    if let Some(tags) = filters.tag_filter() {
        let wanted: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        matches.retain(|r| {
            r.tags().is_some_and(|have| {
                have.iter()
                    .any(|tag| wanted.contains(&tag.to_lowercase()))
            })
        });
        applied.push(format!("tags=[{}]", tags.join(",")));
    }

    let total_matching = matches.len();

    if matches.iter().any(|r| r.confidence().is_some()) {
        matches.sort_by(|a, b| rank(b).total_cmp(&rank(a)));
    }

    matches.truncate(filters.effective_limit());

    let explain = explain(&applied, total_matching, matches.len());
    tracing::debug!("{explain}");

    QueryResult {
        results: matches,
        total_matching,
        explain,
    }
}

fn rank(record: &Record) -> f64 {
    record.confidence().unwrap_or(0.0)
}
