// Escalation: one lookup of the extended form of a truncated tweet.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::twitter::types::Tweet;

/// Point lookup of a status in its extended (untruncated) representation.
#[async_trait]
pub trait TweetLookup: Send + Sync {
    async fn fetch_extended(&self, id: &str) -> Result<Tweet>;
}

/// Fetch the extended form of `tweet`. Single hop: the result is returned
/// as-is even if it still reports itself truncated.
pub async fn escalate(lookup: &dyn TweetLookup, tweet: &Tweet) -> Result<Tweet> {
    info!(tweet_id = %tweet.id_str, "Fetching extended tweet");

    lookup
        .fetch_extended(&tweet.id_str)
        .await
        .with_context(|| format!("Escalation lookup failed for tweet {}", tweet.id_str))
}
