use std::collections::BTreeMap;

use chrono::Utc;

use crate::model::{Charge, Credits, ProviderEarnings, UsageLogEntry};

/// Credit account for one agent, alive for one process.
///
/// The ledger is the only thing allowed to change the balance or provider
/// earnings. At all times
/// `starting_balance - balance() == sum(usage_log().cost) == sum(total_earned)`.
#[derive(Debug, Clone)]
pub struct Ledger {
    agent_id: String,
    starting_balance: Credits,
    current_balance: Credits,
    usage_log: Vec<UsageLogEntry>,
    provider_earnings: BTreeMap<String, ProviderEarnings>,
}

impl Ledger {
    pub fn new(agent_id: impl Into<String>, starting_balance: Credits) -> Self {
        Self {
            agent_id: agent_id.into(),
            starting_balance,
            current_balance: starting_balance,
            usage_log: Vec::new(),
            provider_earnings: BTreeMap::new(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn starting_balance(&self) -> Credits {
        self.starting_balance
    }

    pub fn balance(&self) -> Credits {
        self.current_balance
    }

    pub fn can_afford(&self, cost: Credits) -> bool {
        cost <= self.current_balance
    }

    /// Charge for a completed query and return the new balance.
    ///
    /// The balance is not checked here: callers gate on [`Ledger::can_afford`]
    /// first, and a debit without that check can leave the account overdrawn.
    pub fn debit(&mut self, charge: Charge) -> Credits {
        let Charge {
            feed_id,
            feed_name,
            cost,
            provider_id,
            provider_name,
            filters,
            results_returned,
        } = charge;

        self.current_balance -= cost;

        tracing::info!(
            feed = %feed_id,
            cost,
            balance = self.current_balance,
            "Query charged"
        );
        if self.current_balance < 0 {
            tracing::warn!(
                balance = self.current_balance,
                "Account overdrawn by an unchecked debit"
            );
        }

        self.usage_log.push(UsageLogEntry {
            timestamp: Utc::now(),
            feed_id,
            feed_name,
            cost,
            filters,
            results_returned,
            balance_after: self.current_balance,
        });

        let earnings = self.provider_earnings.entry(provider_id).or_default();
        earnings.total_earned += cost;
        earnings.queries_served += 1;
        tracing::info!(provider = %provider_name, earned = cost, "Provider credited");

        self.current_balance
    }

    pub fn usage_log(&self) -> &[UsageLogEntry] {
        &self.usage_log
    }

    pub fn provider_earnings(&self) -> &BTreeMap<String, ProviderEarnings> {
        &self.provider_earnings
    }

    pub fn credits_used(&self) -> Credits {
        self.starting_balance - self.current_balance
    }

    pub fn total_queries(&self) -> usize {
        self.usage_log.len()
    }
}
