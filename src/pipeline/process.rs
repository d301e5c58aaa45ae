// Per-tweet pipeline: decide, escalate when truncated, decide again, notify.
//
// Everything that can go wrong for one tweet ends at `Pipeline::handle`,
// which logs and discards. Nothing here can stop the stream.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::escalate::{escalate, TweetLookup};
use crate::filter::decide::{decide, Decision, DropReason, MatchReason};
use crate::filter::extract;
use crate::filter::rules::RuleSet;
use crate::notify::traits::Notifier;
use crate::twitter::types::Tweet;

/// What happened to one tweet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Relayed. `escalated` is true when the extended form was fetched first.
    Forwarded { reason: MatchReason, escalated: bool },
    /// Dropped. `escalated` is true when the drop came from the re-check
    /// of the extended form.
    Dropped { reason: DropReason, escalated: bool },
}

/// The filter pipeline with its collaborators, built once at startup.
pub struct Pipeline {
    rules: Arc<RuleSet>,
    lookup: Arc<dyn TweetLookup>,
    notifier: Arc<dyn Notifier>,
}

impl Pipeline {
    pub fn new(rules: Arc<RuleSet>, lookup: Arc<dyn TweetLookup>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            rules,
            lookup,
            notifier,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run one tweet through the pipeline.
    ///
    /// Escalates only when the tweet is truncated and its stream form has no
    /// tracked reference; a retweet, blacklist or symbol-count drop is final.
    pub async fn process(&self, tweet: &Tweet) -> Result<Outcome> {
        let id = tweet.id_str.as_str();
        info!(tweet_id = %id, "Received tweet");

        match decide(tweet, &self.rules) {
            Decision::Forward(reason) => {
                info!(tweet_id = %id, reason = %reason, "Tweet complete from stream, pushing to Telegram");
                self.notifier.notify(tweet).await?;
                return Ok(Outcome::Forwarded {
                    reason,
                    escalated: false,
                });
            }
            Decision::Drop(DropReason::NoReference) if tweet.is_truncated() => {}
            Decision::Drop(reason) => {
                info!(tweet_id = %id, reason = %reason, "Skipping tweet");
                return Ok(Outcome::Dropped {
                    reason,
                    escalated: false,
                });
            }
        }

        let extended = escalate(self.lookup.as_ref(), tweet).await?;

        match decide(&extended, &self.rules) {
            Decision::Forward(reason) => {
                info!(tweet_id = %id, reason = %reason, "Pushing extended tweet to Telegram");
                self.notifier.notify(&extended).await?;
                Ok(Outcome::Forwarded {
                    reason,
                    escalated: true,
                })
            }
            Decision::Drop(reason) => {
                info!(tweet_id = %id, reason = %reason, "Skipping extended tweet");
                Ok(Outcome::Dropped {
                    reason,
                    escalated: true,
                })
            }
        }
    }

    /// Failure boundary for one tweet: errors are logged with the tweet id
    /// and discarded.
    pub async fn handle(&self, tweet: Tweet) {
        if let Err(e) = self.process(&tweet).await {
            let error = format!("{e:#}");
            warn!(
                tweet_id = %tweet.id_str,
                author = extract::author(&tweet),
                error = %error,
                "Failed to process tweet"
            );
        }
    }
}
