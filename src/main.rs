//! bluey-shop - Region-aware Bluey toy listing for the terminal
//!
//! Fetches the product list for a market from the product API and renders it.

use anyhow::Result;
use bluey_shop::api::Region;
use bluey_shop::commands::{BrowseCommand, ShowCommand};
use bluey_shop::config::{Config, OutputFormat};
use bluey_shop::view::StalePolicy;
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bluey-shop",
    version,
    about = "Region-aware Bluey toy listing",
    long_about = "Lists Bluey toys from the product API for a chosen market, with prices, ratings and Amazon links."
)]
struct Cli {
    /// Market region (US, UK, AU, CA, NZ)
    #[arg(short, long, global = true)]
    region: Option<Region>,

    /// Base URL of the product API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Search keywords forwarded to the API
    #[arg(long, global = true)]
    keywords: Option<String>,

    /// Number of items to request
    #[arg(long, global = true)]
    item_count: Option<u32>,

    /// Request timeout in seconds (default: none)
    #[arg(long, global = true, env = "BLUEY_TIMEOUT")]
    timeout: Option<u64>,

    /// How to treat responses for regions no longer selected: `discard`
    /// (default) shows only the latest selection; `last-settled-wins` is the
    /// original behaviour, where whichever response arrives last is shown
    #[arg(long, global = true)]
    stale_policy: Option<StalePolicy>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the listing for one region and exit
    #[command(alias = "s")]
    Show,

    /// Browse interactively; type a region code to switch markets
    #[command(alias = "b")]
    Browse,

    /// List supported regions
    Regions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    // Diagnostics go to stderr; stdout carries the listing.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(keywords) = cli.keywords {
        config.keywords = Some(keywords);
    }
    if let Some(count) = cli.item_count {
        config.item_count = Some(count);
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = Some(timeout);
    }
    if let Some(policy) = cli.stale_policy {
        config.stale_policy = policy;
    }

    match cli.command {
        Commands::Show => {
            let cmd = ShowCommand::new(config);
            let output = cmd.execute(&mut std::io::stderr()).await?;
            println!("{}", output);
        }

        Commands::Browse => {
            let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

            // Blocking stdin reader on its own thread so it never holds up
            // runtime shutdown.
            std::thread::spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });

            let cmd = BrowseCommand::new(config);
            cmd.execute(rx, &mut std::io::stdout()).await?;
        }

        Commands::Regions => {
            println!("Supported regions:\n");
            println!("{:<6} {:<16} {:<10}", "Code", "Storefront", "Currency");
            println!("{:-<6} {:-<16} {:-<10}", "", "", "");

            for region in Region::all() {
                println!("{:<6} {:<16} {:<10}", region.code(), region.domain(), region.currency());
            }
        }
    }

    Ok(())
}
