use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use tessera_core::Ledger;

use super::{load_config, open_catalog, starting_balance};

#[derive(Args)]
pub struct ServeArgs {
    /// Starting credit balance (overrides tessera.toml)
    #[arg(long)]
    pub balance: Option<i64>,

    /// Agent account ID (overrides tessera.toml)
    #[arg(long)]
    pub agent_id: Option<String>,
}

pub fn run(args: &ServeArgs, data_dir: &Path) -> Result<()> {
    let config = load_config(data_dir)?;
    let balance = starting_balance(args.balance, &config)?;
    let agent_id = args.agent_id.clone().unwrap_or(config.agent_id);

    let catalog = open_catalog(data_dir)?;
    let ledger = Ledger::new(agent_id, balance);

    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    rt.block_on(async {
        tessera_mcp::run_stdio(catalog, ledger)
            .await
            .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))
    })
}
