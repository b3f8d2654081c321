use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "tessera",
    version,
    about = "Discover, query and pay for intelligence feeds"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    /// Directory holding registry.json and the feed files
    #[arg(long, global = true, env = "TESSERA_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Values from .env only fill variables the environment does not already set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data_dir = cli.data_dir.as_path();
    match &cli.command {
        commands::Commands::Serve(args) => commands::serve::run(args, data_dir),
        commands::Commands::Feeds(args) => commands::feeds::run(args, data_dir, cli.format),
        commands::Commands::Show(args) => commands::show::run(args, data_dir, cli.format),
        commands::Commands::Query(args) => commands::query::run(args, data_dir, cli.format),
        commands::Commands::Publish(args) => commands::publish::run(args, data_dir, cli.format),
        commands::Commands::Download(args) => commands::download::run(args, data_dir),
        commands::Commands::Version => commands::version::run(),
    }
}
