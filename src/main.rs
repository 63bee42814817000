//! shop-scraper - Product search scraping API and CLI for Indian e-commerce sites

use anyhow::Result;
use clap::{Parser, Subcommand};
use shop_scraper::commands::{SearchCommand, ServeCommand};
use shop_scraper::config::{Config, OutputFormat};
use shop_scraper::retailers::Retailer;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shop-scraper",
    version,
    about = "Product search scraper for Amazon India, Flipkart and Myntra",
    long_about = "Scrapes search results from Amazon India, Flipkart and Myntra and serves them as JSON over HTTP."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SHOP_SCRAPER_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Save raw pages to this directory when extraction fails
    #[arg(long, global = true)]
    debug_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search one retailer and print the results
    #[command(alias = "s")]
    Search {
        /// Retailer to search (amazon, flipkart, myntra)
        retailer: Retailer,

        /// Search query
        query: String,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum price filter
        #[arg(long)]
        min_price: Option<f64>,

        /// Maximum price filter
        #[arg(long)]
        max_price: Option<f64>,
    },

    /// List supported retailers
    Retailers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(dir) = cli.debug_dir {
        config.debug_dir = Some(dir);
    }

    match cli.command {
        Commands::Serve { bind, port } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }

            ServeCommand::new(config).execute().await?;
        }

        Commands::Search { retailer, query, format, output, min_price, max_price } => {
            if let Some(format) = format {
                config.format = format;
            }

            let cmd = SearchCommand::new(config).with_price_range(min_price, max_price).with_output(output);
            let output = cmd.execute(retailer, &query).await?;
            println!("{}", output);
        }

        Commands::Retailers => {
            println!("Supported retailers:\n");
            println!("{:<10} {:<28} {:<8}", "Code", "Origin", "Fetch");
            println!("{:-<10} {:-<28} {:-<8}", "", "", "");

            for retailer in Retailer::all() {
                println!(
                    "{:<10} {:<28} {:<8}",
                    retailer.to_string(),
                    retailer.base_url(),
                    retailer.fetch_mode().to_string()
                );
            }
        }
    }

    Ok(())
}
