use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::filters::FilterSet;
use super::Credits;

/// One paid query in the audit trail. Never modified after it is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageLogEntry {
    pub timestamp: DateTime<Utc>,
    pub feed_id: String,
    pub feed_name: String,
    pub cost: Credits,
    /// The filter-set the query ran with.
    pub filters: FilterSet,
    pub results_returned: usize,
    pub balance_after: Credits,
}

/// Running totals for a single provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderEarnings {
    pub total_earned: Credits,
    pub queries_served: u64,
}

/// Everything a debit needs to know about the query being paid for.
#[derive(Debug, Clone)]
pub struct Charge {
    pub feed_id: String,
    pub feed_name: String,
    pub cost: Credits,
    pub provider_id: String,
    pub provider_name: String,
    pub filters: FilterSet,
    pub results_returned: usize,
}
