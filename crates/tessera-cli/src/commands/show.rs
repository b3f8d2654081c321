use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use tessera_mcp::response::FeedMetadata;

use super::open_catalog;
use crate::output::format::format_feed_metadata;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ShowArgs {
    /// Feed ID (e.g. defi-risk-signals)
    pub feed_id: String,
}

pub fn run(args: &ShowArgs, data_dir: &Path, format: OutputFormat) -> Result<()> {
    let catalog = open_catalog(data_dir)?;
    let feed = catalog.require(&args.feed_id)?;
    let records = catalog
        .records(feed)
        .with_context(|| format!("Failed to load feed '{}'", feed.feed_id))?;

    let metadata = FeedMetadata::new(feed, records.len());
    println!("{}", format_feed_metadata(&metadata, format));
    Ok(())
}
