use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    tool, tool_handler, tool_router, ServerHandler,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use tessera_core::error::CoreError;
use tessera_core::model::{Charge, FilterSet};
use tessera_core::{Catalog, Ledger};
use tessera_query::query_feed;

pub mod response;

use response::{
    AccountSummary, FeedList, FeedMetadata, Outcome, QueryMetadata, QueryResponse,
    ToolError, UsageReport,
};

/// MCP server exposing the feed catalog and the agent's credit account.
///
/// rmcp requires `ServerHandler: Clone + Send + Sync + 'static`, so the catalog
/// and ledger are shared behind `Arc`. The ledger lock is held for the whole
/// check-query-debit sequence of a request, so debits never interleave.
#[derive(Debug, Clone)]
pub struct TesseraMcpServer {
    catalog: Arc<Catalog>,
    ledger: Arc<Mutex<Ledger>>,
    tool_router: ToolRouter<Self>,
}

impl TesseraMcpServer {
    pub fn new(catalog: Arc<Catalog>, ledger: Ledger) -> Self {
        Self {
            catalog,
            ledger: Arc::new(Mutex::new(ledger)),
            tool_router: Self::tool_router(),
        }
    }

    /// Feeds in `category` (or all), with their live record counts.
    pub fn list_feeds(&self, category: Option<&str>) -> Result<FeedList<'_>, CoreError> {
        FeedList::from_catalog(&self.catalog, category)
    }

    pub fn feed_metadata(&self, feed_id: &str) -> Result<Outcome<FeedMetadata<'_>>, CoreError> {
        let Some(feed) = self.catalog.feed(feed_id) else {
            return Ok(Outcome::Err(ToolError::feed_not_found(feed_id)));
        };
        let record_count = self.catalog.records(feed)?.len();
        Ok(Outcome::Ok(FeedMetadata::new(feed, record_count)))
    }

    /// Run a paid query. Nothing is charged unless the feed exists, the
    /// account can afford it and the feed's records load.
    pub fn query(
        &self,
        feed_id: &str,
        filters: FilterSet,
    ) -> Result<Outcome<QueryResponse>, CoreError> {
        let Some(feed) = self.catalog.feed(feed_id) else {
            return Ok(Outcome::Err(ToolError::feed_not_found(feed_id)));
        };

        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        let cost = feed.query_cost_credits;
        if !ledger.can_afford(cost) {
            return Ok(Outcome::Err(ToolError::insufficient_credits(
                cost,
                ledger.balance(),
            )));
        }

        let records = self.catalog.records(feed)?;
        let result = query_feed(&records, &filters);
        let results: Vec<_> = result.results.into_iter().cloned().collect();

        let credits_remaining = ledger.debit(Charge {
            feed_id: feed.feed_id.clone(),
            feed_name: feed.name.clone(),
            cost,
            provider_id: feed.provider.id.clone(),
            provider_name: feed.provider.name.clone(),
            filters: filters.clone(),
            results_returned: results.len(),
        });

        Ok(Outcome::Ok(QueryResponse {
            query_metadata: QueryMetadata {
                feed_id: feed.feed_id.clone(),
                feed_name: feed.name.clone(),
                query_cost: cost,
                credits_remaining,
                timestamp: Utc::now(),
                storage_hash: feed.storage_hash.clone(),
                storage_network: feed.storage_network.clone(),
                filters_applied: filters,
                results_returned: results.len(),
                total_matching: result.total_matching,
            },
            results,
            explain: result.explain,
        }))
    }

    pub fn usage(&self, include_log: bool) -> UsageReport {
        let ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        UsageReport {
            account: AccountSummary {
                agent_id: ledger.agent_id().to_string(),
                credits_remaining: ledger.balance(),
                credits_used: ledger.credits_used(),
                total_queries: ledger.total_queries(),
            },
            provider_earnings: ledger.provider_earnings().clone(),
            usage_log: include_log.then(|| ledger.usage_log().to_vec()),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to encode response: {e}"))
}

// -- Tool parameter structs --

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListFeedsParams {
    /// Filter by category (e.g., 'defi', 'business-operations', 'workforce')
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FeedMetadataParams {
    /// The feed ID to get metadata for (e.g., 'defi-risk-signals')
    pub feed_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryFeedParams {
    /// The feed ID to query
    pub feed_id: String,
    /// Query filters (all optional)
    pub filters: Option<FilterSet>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CheckUsageParams {
    /// Include detailed usage log (default true)
    pub include_log: Option<bool>,
}

// -- Tool implementations --

#[tool_router]
impl TesseraMcpServer {
    #[tool(
        description = "Discover available intelligence feeds on the Tessera protocol. Returns feed names, categories, pricing, and storage network info."
    )]
    fn tessera_list_feeds(
        &self,
        Parameters(params): Parameters<ListFeedsParams>,
    ) -> Result<String, String> {
        let list = self
            .list_feeds(params.category.as_deref())
            .map_err(|e| format!("Failed to list feeds: {e}"))?;
        to_json(&list)
    }

    #[tool(
        description = "Get detailed metadata for a specific feed including schema, pricing, storage hash, and sample queries."
    )]
    fn tessera_get_feed_metadata(
        &self,
        Parameters(params): Parameters<FeedMetadataParams>,
    ) -> Result<String, String> {
        let metadata = self
            .feed_metadata(&params.feed_id)
            .map_err(|e| format!("Failed to read feed '{}': {e}", params.feed_id))?;
        to_json(&metadata)
    }

    #[tool(
        description = "Query an intelligence feed with filters. Deducts credits from your balance. Returns structured results with storage provenance."
    )]
    fn tessera_query_feed(
        &self,
        Parameters(params): Parameters<QueryFeedParams>,
    ) -> Result<String, String> {
        let outcome = self
            .query(&params.feed_id, params.filters.unwrap_or_default())
            .map_err(|e| format!("Query failed: {e}"))?;
        to_json(&outcome)
    }

    #[tool(
        description = "Check your credit balance, usage history, and provider earnings. Full audit trail of all queries."
    )]
    fn tessera_check_usage(
        &self,
        Parameters(params): Parameters<CheckUsageParams>,
    ) -> Result<String, String> {
        to_json(&self.usage(params.include_log.unwrap_or(true)))
    }
}

#[tool_handler]
impl ServerHandler for TesseraMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tessera MCP Server - Discover and query paid intelligence feeds. \
                 Every query is charged in credits and recorded in an auditable usage log."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Start the MCP server on stdio transport.
pub async fn run_stdio(catalog: Catalog, ledger: Ledger) -> Result<(), Box<dyn std::error::Error>> {
    use rmcp::transport::stdio;
    use rmcp::ServiceExt;

    tracing::info!(
        agent = ledger.agent_id(),
        balance = ledger.balance(),
        "Starting Tessera MCP server"
    );
    let server = TesseraMcpServer::new(Arc::new(catalog), ledger);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
