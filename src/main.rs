use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use newswire::{aggregate_all_with_report, AggregateOptions, Config};

#[derive(Parser, Debug)]
#[command(
    name = "newswire",
    about = "Aggregate configured feeds into one normalized article stream"
)]
struct Args {
    /// Path to the TOML config file
    #[arg(long, short, value_name = "FILE", default_value = "newswire.toml")]
    config: PathBuf,

    /// Print articles as JSON instead of a text listing
    #[arg(long)]
    json: bool,

    /// Print at most N articles
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;

    let sources = config.sources();
    if sources.is_empty() {
        eprintln!(
            "No feed sources configured. Add a `feeds` list to {}.",
            args.config.display()
        );
    }

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .build()
        .context("failed to build HTTP client")?;

    let options = AggregateOptions {
        timeout: config.timeout(),
        max_concurrent: config.max_concurrent_fetches,
    };

    let (articles, outcomes) = aggregate_all_with_report(&client, &sources, &options).await;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    eprintln!(
        "{} articles from {} sources ({} failed)",
        articles.len(),
        outcomes.len(),
        failed
    );

    let limit = args.limit.unwrap_or(usize::MAX);

    if args.json {
        let shown: Vec<_> = articles.iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        for article in articles.iter().take(limit) {
            println!(
                "{}  [{}] {} ({}, by {})",
                article.published_at.format("%Y-%m-%d %H:%M"),
                article.category,
                article.title,
                article.source,
                article.author
            );
        }
    }

    Ok(())
}
