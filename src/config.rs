use std::env;

use anyhow::{Context, Result};

use crate::filter::rules::RuleSet;

pub const DEFAULT_TWITTER_API_URL: &str = "https://api.twitter.com";
pub const DEFAULT_TWITTER_STREAM_URL: &str = "https://stream.twitter.com";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

const DEFAULT_TRACKED_USERS: &str = "getprotocol,bloemersmaarten";
const DEFAULT_TRACKED_SYMBOLS: &str = "get";
const DEFAULT_BLACKLIST: &str = "huobi";
const DEFAULT_MAXIMUM_SYMBOLS_COUNT: usize = 4;

/// The four OAuth 1.0a values for the Twitter app and account.
#[derive(Debug, Clone, Default)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token_key: String,
    pub access_token_secret: String,
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    pub twitter: TwitterCredentials,
    pub twitter_api_url: String,
    /// Host serving `statuses/filter` (separate from the REST host on v1.1).
    pub twitter_stream_url: String,
    pub telegram_token: String,
    /// Destination chat: numeric id or `@channelusername`.
    pub telegram_channel: String,
    pub telegram_api_url: String,
    /// Filter rules, fixed for the life of the process.
    pub rules: RuleSet,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Credentials default to empty and are checked by the `require_*`
    /// guards, so `track` and offline `check` work without them. Only a
    /// malformed symbol limit fails here.
    pub fn load() -> Result<Self> {
        let max_symbols = match env::var("MAXIMUM_SYMBOLS_COUNT") {
            Ok(raw) => parse_max_symbols(&raw)?,
            Err(_) => Some(DEFAULT_MAXIMUM_SYMBOLS_COUNT),
        };

        let rules = RuleSet::new(
            split_list(&env_or("TRACKED_USERS", DEFAULT_TRACKED_USERS)),
            split_list(&env_or("TRACKED_SYMBOLS", DEFAULT_TRACKED_SYMBOLS)),
            split_list(&env_or("TWITTER_BLACKLIST", DEFAULT_BLACKLIST)),
            max_symbols,
        );

        Ok(Self {
            twitter: TwitterCredentials {
                consumer_key: env::var("TWITTER_CONSUMER_KEY").unwrap_or_default(),
                consumer_secret: env::var("TWITTER_CONSUMER_SECRET").unwrap_or_default(),
                access_token_key: env::var("TWITTER_ACCESS_TOKEN_KEY").unwrap_or_default(),
                access_token_secret: env::var("TWITTER_ACCESS_TOKEN_SECRET").unwrap_or_default(),
            },
            twitter_api_url: env_or("TWITTER_API_URL", DEFAULT_TWITTER_API_URL),
            twitter_stream_url: env_or("TWITTER_STREAM_URL", DEFAULT_TWITTER_STREAM_URL),
            telegram_token: env::var("TELEGRAM_TOKEN").unwrap_or_default(),
            telegram_channel: env::var("TELEGRAM_CHANNEL").unwrap_or_default(),
            telegram_api_url: env_or("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL),
            rules,
        })
    }

    /// Check that all four Twitter credentials are configured.
    /// Call this before opening the stream or looking up a tweet.
    pub fn require_twitter(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("TWITTER_CONSUMER_KEY", &self.twitter.consumer_key),
            ("TWITTER_CONSUMER_SECRET", &self.twitter.consumer_secret),
            ("TWITTER_ACCESS_TOKEN_KEY", &self.twitter.access_token_key),
            ("TWITTER_ACCESS_TOKEN_SECRET", &self.twitter.access_token_secret),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "{} not set. Add to your .env file.\n\
                 See .env.example for the required variables.",
                missing.join(", ")
            );
        }
        Ok(())
    }

    /// Check that the Telegram bot token and destination channel are configured.
    pub fn require_telegram(&self) -> Result<()> {
        if self.telegram_token.is_empty() {
            anyhow::bail!(
                "TELEGRAM_TOKEN not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        if self.telegram_channel.is_empty() {
            anyhow::bail!(
                "TELEGRAM_CHANNEL not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check that there is something to subscribe to. An empty track
    /// expression is rejected by the stream endpoint.
    pub fn require_tracking(&self) -> Result<()> {
        if self.rules.tracked_users().is_empty() && self.rules.tracked_symbols().is_empty() {
            anyhow::bail!(
                "TRACKED_USERS and TRACKED_SYMBOLS are both empty. \
                 Set at least one handle or cashtag to follow."
            );
        }
        Ok(())
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated env value, dropping blanks and surrounding whitespace.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// `none` (any case) or an empty value means no symbol limit.
pub fn parse_max_symbols(raw: &str) -> Result<Option<usize>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    raw.parse::<usize>()
        .map(Some)
        .with_context(|| format!("MAXIMUM_SYMBOLS_COUNT must be a whole number or \"none\", got {raw:?}"))
}
