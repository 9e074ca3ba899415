//! Post-Hydrator main entry point
//!
//! This is the command-line interface for hydrating a single post.

use clap::{Parser, ValueEnum};
use post_hydrator::config::{load_config, Config};
use post_hydrator::{Hydrator, Post};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Post-Hydrator: fetch a post by id and print its fields
///
/// The page is requested directly first; if that fails and a proxy is
/// configured, the request is retried once through the proxy.
#[derive(Parser, Debug)]
#[command(name = "post-hydrator")]
#[command(version = "1.0.0")]
#[command(about = "Fetch a post by id and extract its fields", long_about = None)]
struct Cli {
    /// Numeric id of the post
    #[arg(value_name = "POST_ID")]
    post_id: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One labelled line per field
    Text,
    /// A TOML table
    Toml,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).map_err(|e| {
                tracing::error!("Failed to load configuration: {}", e);
                e
            })?
        }
        None => Config::default(),
    };

    let hydrator = Hydrator::from_config(&config)?;
    tracing::debug!(tiers = ?hydrator.fetcher().tier_names(), "Fetcher ready");

    match hydrator.hydrate(&cli.post_id).await {
        Ok(Some(post)) => print_post(&post, cli.format)?,
        Ok(None) => println!("No post found for id {}", cli.post_id),
        Err(e) => {
            tracing::error!("Hydration failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("post_hydrator=warn,warn"),
            1 => EnvFilter::new("post_hydrator=info,warn"),
            2 => EnvFilter::new("post_hydrator=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_post(post: &Post, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Text => {
            println!("Handle:    {}", post.author_handle);
            println!("Name:      {}", post.display_name);
            println!("Posted at: {}", post.posted_at.format("%Y-%m-%d %H:%M"));
            println!("Body:      {}", post.body);
        }
        OutputFormat::Toml => print!("{}", toml::to_string(post)?),
    }
    Ok(())
}
