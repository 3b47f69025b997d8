mod commands;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schoolscout_lib::scorecard_api::Client;
use schoolscout_lib::{ApiKey, CachedClient, DiskCache, Settings};

#[derive(Parser)]
#[command(name = "schoolscout")]
#[command(about = "Search College Scorecard data for computer science programs")]
struct Cli {
    /// Settings file (defaults to ./schoolscout.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for cached query results
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// File holding the bare API key (defaults to $SCORECARD_API_KEY)
    #[arg(long, global = true)]
    api_key_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search all operating schools and write those passing the filters
    Search(commands::search::SearchArgs),
    /// Look up a ranked list of schools by name
    Rank(commands::rank::RankArgs),
    /// Delete cached query results
    ClearCache,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("schoolscout=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = cli.cache_dir {
        settings.cache_dir = dir;
    }
    let cache = DiskCache::new(settings.cache_dir.clone());

    match &cli.command {
        Commands::Search(args) => {
            let client = connect(&settings, cache, cli.api_key_file.as_deref())?;
            commands::search::run(args, &client, &settings).await?
        }
        Commands::Rank(args) => {
            let client = connect(&settings, cache, cli.api_key_file.as_deref())?;
            commands::rank::run(args, &client).await?
        }
        Commands::ClearCache => commands::clear_cache::run(&cache)?,
    }

    Ok(())
}

fn connect(
    settings: &Settings,
    cache: DiskCache,
    api_key_file: Option<&Path>,
) -> Result<CachedClient> {
    let api_key = load_api_key(api_key_file)?;
    let api = Client::with_base_url(&settings.base_url, api_key.expose())
        .context("failed to build API client")?
        .with_per_page(settings.per_page);
    Ok(CachedClient::new(api, cache))
}

fn load_api_key(path: Option<&Path>) -> Result<ApiKey> {
    let key = match path {
        Some(path) => ApiKey::from_file(path)?,
        None => ApiKey::from_env()?,
    };
    Ok(key)
}
