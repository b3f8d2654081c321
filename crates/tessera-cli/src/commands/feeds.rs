use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use tessera_mcp::response::FeedList;

use super::open_catalog;
use crate::output::format::format_feed_list;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct FeedsArgs {
    /// Only feeds in this category (case-insensitive)
    #[arg(long)]
    pub category: Option<String>,
}

pub fn run(args: &FeedsArgs, data_dir: &Path, format: OutputFormat) -> Result<()> {
    let catalog = open_catalog(data_dir)?;
    let list = FeedList::from_catalog(&catalog, args.category.as_deref())
        .context("Failed to load feed data")?;

    println!("{}", format_feed_list(&list, format));
    Ok(())
}
