use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use secrecy::SecretString;

use tessera_storage::{publish_feeds, LocalStore};

use super::{load_config, open_catalog};
use crate::output::format::format_publish_report;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct PublishArgs {
    /// Credential used to sign uploads
    #[arg(long, env = "TESSERA_STORAGE_KEY", hide_env_values = true)]
    pub key: Option<String>,
}

pub fn run(args: &PublishArgs, data_dir: &Path, format: OutputFormat) -> Result<()> {
    let Some(key) = args.key.clone() else {
        anyhow::bail!("TESSERA_STORAGE_KEY is not set. Add it to your environment or .env file.");
    };
    let credential = SecretString::from(key);

    let config = load_config(data_dir)?;
    let catalog = open_catalog(data_dir)?;
    let store = LocalStore::new(config.store_path(data_dir));

    let report =
        publish_feeds(&catalog, &store, &credential).context("Failed to publish feeds")?;
    println!("{}", format_publish_report(&report, format));

    if !report.failed.is_empty() {
        anyhow::bail!("{} feed(s) failed to upload", report.failed.len());
    }
    Ok(())
}
