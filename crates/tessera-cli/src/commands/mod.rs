pub mod download;
pub mod feeds;
pub mod publish;
pub mod query;
pub mod serve;
pub mod show;
pub mod version;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use tessera_core::config::TesseraConfig;
use tessera_core::Catalog;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server on stdio
    Serve(serve::ServeArgs),
    /// List feeds in the registry
    Feeds(feeds::FeedsArgs),
    /// Show full metadata for one feed
    Show(show::ShowArgs),
    /// Run a paid query against a feed with a fresh account
    Query(query::QueryArgs),
    /// Upload every feed's data file to the content store
    Publish(publish::PublishArgs),
    /// Fetch a stored feed file by content hash
    Download(download::DownloadArgs),
    /// Print version information
    Version,
}

pub(crate) fn load_config(data_dir: &Path) -> Result<TesseraConfig> {
    TesseraConfig::load(data_dir)
        .with_context(|| format!("Failed to load config from {}", data_dir.display()))
}

/// `--balance` if given, else the configured starting balance.
pub(crate) fn starting_balance(requested: Option<i64>, config: &TesseraConfig) -> Result<i64> {
    let balance = requested.unwrap_or(config.starting_balance);
    if balance < 0 {
        anyhow::bail!("Starting balance must not be negative, got {balance}");
    }
    Ok(balance)
}

pub(crate) fn open_catalog(data_dir: &Path) -> Result<Catalog> {
    Catalog::open(data_dir)
        .with_context(|| format!("Failed to open feed registry in {}", data_dir.display()))
}
