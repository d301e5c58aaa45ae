use anyhow::Result;
use async_trait::async_trait;

use crate::twitter::types::Tweet;

/// Delivers an accepted tweet to its destination.
///
/// Implementations must not retry: an error is reported once to the
/// caller, which logs it and moves on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, tweet: &Tweet) -> Result<()>;
}
