use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use tessera_core::model::{FilterSet, TextKey};
use tessera_core::Ledger;
use tessera_mcp::response::Outcome;
use tessera_mcp::TesseraMcpServer;

use super::{load_config, open_catalog, starting_balance};
use crate::output::format::format_query_response;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct QueryArgs {
    /// Feed ID to query
    pub feed_id: String,

    /// Filter-set as a JSON object, e.g. '{"severity":"high"}'
    #[arg(long)]
    pub filters: Option<String>,

    /// String filter as key=value (repeatable), e.g. --where chain=ethereum
    #[arg(long = "where", value_name = "KEY=VALUE", value_parser = parse_text_filter)]
    pub text: Vec<(TextKey, String)>,

    /// Minimum confidence score (0.0-1.0)
    #[arg(long)]
    pub confidence_min: Option<f64>,

    /// Match records carrying any of these tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Only records at or after this ISO 8601 timestamp
    #[arg(long)]
    pub since: Option<String>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Starting credit balance (overrides tessera.toml)
    #[arg(long)]
    pub balance: Option<i64>,
}

fn parse_text_filter(s: &str) -> Result<(TextKey, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    Ok((key.trim().parse()?, value.to_string()))
}

impl QueryArgs {
    /// Flags are applied on top of `--filters`.
    fn filter_set(&self) -> Result<FilterSet> {
        let mut filters = match &self.filters {
            Some(raw) => {
                serde_json::from_str(raw).context("--filters is not a valid filter object")?
            }
            None => FilterSet::default(),
        };
        for (key, value) in &self.text {
            filters = filters.with_text(*key, value.clone());
        }
        if self.confidence_min.is_some() {
            filters.confidence_min = self.confidence_min;
        }
        if !self.tags.is_empty() {
            filters.tags = Some(self.tags.clone());
        }
        if self.since.is_some() {
            filters.since = self.since.clone();
        }
        if self.limit.is_some() {
            filters.limit = self.limit;
        }
        Ok(filters)
    }
}

pub fn run(args: &QueryArgs, data_dir: &Path, format: OutputFormat) -> Result<()> {
    let filters = args.filter_set()?;
    let config = load_config(data_dir)?;
    let catalog = open_catalog(data_dir)?;
    let balance = starting_balance(args.balance, &config)?;
    let ledger = Ledger::new(config.agent_id, balance);
    let server = TesseraMcpServer::new(Arc::new(catalog), ledger);

    let outcome = server
        .query(&args.feed_id, filters)
        .with_context(|| format!("Query against '{}' failed", args.feed_id))?;
    let response = match outcome {
        Outcome::Ok(response) => response,
        Outcome::Err(e) => anyhow::bail!("{}", e.message()),
    };

    println!("{}", format_query_response(&response, format));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> QueryArgs {
        QueryArgs {
            feed_id: "defi-risk-signals".into(),
            filters: None,
            text: Vec::new(),
            confidence_min: None,
            tags: Vec::new(),
            since: None,
            limit: None,
            balance: None,
        }
    }

    #[test]
    fn test_parse_text_filter() {
        assert_eq!(
            parse_text_filter("chain=ethereum").unwrap(),
            (TextKey::Chain, "ethereum".to_string())
        );
        assert!(parse_text_filter("chain").is_err());
        assert!(parse_text_filter("colour=blue").is_err());
    }

    #[test]
    fn test_flags_override_json_filters() {
        let args = QueryArgs {
            filters: Some(r#"{"severity":"low","limit":5,"colour":"blue"}"#.into()),
            text: vec![(TextKey::Severity, "critical".into())],
            limit: Some(2),
            ..base_args()
        };
        let filters = args.filter_set().unwrap();
        assert_eq!(filters.severity.as_deref(), Some("critical"));
        assert_eq!(filters.limit, Some(2));
    }

    #[test]
    fn test_no_flags_is_empty_filter_set() {
        assert_eq!(base_args().filter_set().unwrap(), FilterSet::default());
    }

    #[test]
    fn test_invalid_filters_json() {
        let args = QueryArgs {
            filters: Some("not json".into()),
            ..base_args()
        };
        assert!(args.filter_set().is_err());
    }
}
