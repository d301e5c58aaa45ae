use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{error, info};

use beacon::config::Config;
use beacon::filter::decide::{decide, Decision, DropReason};
use beacon::notify::telegram::TelegramNotifier;
use beacon::pipeline::driver::StreamDriver;
use beacon::pipeline::process::Pipeline;
use beacon::telegram::client::TelegramClient;
use beacon::twitter::client::TwitterClient;
use beacon::twitter::stream::FilteredStream;
use beacon::twitter::types::Tweet;

/// Beacon: relay tracked tweets to a Telegram channel.
///
/// Follows the Twitter filtered stream for the configured handles and
/// cashtags, drops retweets, spam and blacklisted content, and posts the
/// rest to one Telegram channel.
#[derive(Parser)]
#[command(name = "beacon", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the stream and relay matching tweets until it fails
    Run,

    /// Show the rule set and the stream track expression
    Track,

    /// Evaluate a single tweet against the rules without sending anything
    Check {
        /// Path to a tweet JSON file (reads stdin when omitted or "-")
        path: Option<PathBuf>,

        /// Fetch the tweet by id in extended mode instead of reading JSON
        #[arg(long, conflicts_with = "path")]
        id: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("beacon=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let config = Config::load()?;
            config.require_twitter()?;
            config.require_telegram()?;
            config.require_tracking()?;

            let rules = Arc::new(config.rules.clone());
            let lookup = TwitterClient::new(&config.twitter_api_url, config.twitter.clone())?;
            let telegram = TelegramClient::new(&config.telegram_api_url, &config.telegram_token)?;
            let notifier = TelegramNotifier::new(telegram, config.telegram_channel.clone());
            let source = FilteredStream::new(&config.twitter_stream_url, config.twitter.clone())?;

            let pipeline = Arc::new(Pipeline::new(rules, Arc::new(lookup), Arc::new(notifier)));
            let mut driver = StreamDriver::new(Arc::new(source), pipeline);

            info!(
                channel = %config.telegram_channel,
                track = %config.rules.track_expression(),
                "Starting relay"
            );

            let termination = driver.run().await;
            error!(
                reason = %termination.reason,
                dispatched = termination.dispatched,
                "Stream terminated, exiting"
            );
            std::process::exit(1);
        }

        Commands::Track => {
            let config = Config::load()?;
            beacon::output::terminal::display_rules(&config.rules);
        }

        Commands::Check { path, id } => {
            let config = Config::load()?;

            let tweet = match id {
                Some(id) => {
                    config.require_twitter()?;
                    let client = TwitterClient::new(&config.twitter_api_url, config.twitter.clone())?;
                    client.show_extended(&id).await?
                }
                None => read_tweet(path.as_ref())?,
            };

            let decision = decide(&tweet, &config.rules);
            beacon::output::terminal::display_decision(&tweet, &decision);

            if decision == Decision::Drop(DropReason::NoReference) && tweet.is_truncated() {
                println!(
                    "\n{}",
                    "Tweet is truncated: the relay would fetch the extended form and check again."
                        .yellow()
                );
                println!(
                    "{}",
                    format!("To check it, run: beacon check --id {}", tweet.id_str).dimmed()
                );
            }
        }
    }

    Ok(())
}

/// Read one tweet as JSON from a file, or from stdin for `None` / `-`.
fn read_tweet(path: Option<&PathBuf>) -> Result<Tweet> {
    let json = match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read tweet JSON from stdin")?;
            buf
        }
    };

    serde_json::from_str(&json).context("Input is not a tweet JSON object")
}
