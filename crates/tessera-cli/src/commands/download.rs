use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use tessera_storage::{ContentHash, LocalStore, StorageClient};

use super::load_config;

#[derive(Args)]
pub struct DownloadArgs {
    /// Content hash (0x-prefixed SHA-256)
    pub hash: String,

    /// Where to write the file
    pub output: PathBuf,
}

pub fn run(args: &DownloadArgs, data_dir: &Path) -> Result<()> {
    let hash = ContentHash::parse(&args.hash)?;
    let config = load_config(data_dir)?;
    let store = LocalStore::new(config.store_path(data_dir));

    store
        .download(&hash, &args.output)
        .with_context(|| format!("Failed to download {hash}"))?;
    eprintln!("Downloaded {hash} to {}", args.output.display());
    Ok(())
}
