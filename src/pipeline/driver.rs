// Stream driver: subscribe, fan tweets out to tasks, stop on the first
// transport failure.
//
// States: Connecting -> Streaming -> Terminated. Terminated is final; the
// binary exits non-zero and relies on an external supervisor to restart it.
// There is no reconnection and no backoff.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::process::Pipeline;
use crate::twitter::stream::StreamEvent;

/// A live feed filtered by a track expression.
#[async_trait]
pub trait TweetSource: Send + Sync {
    /// Open the subscription. Success means the feed is streaming.
    async fn subscribe(&self, track: &str) -> Result<mpsc::Receiver<StreamEvent>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Connecting,
    Streaming,
    Terminated,
}

/// Why the driver stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
    pub reason: String,
    /// Number of tweets dispatched before termination.
    pub dispatched: u64,
}

pub struct StreamDriver {
    source: Arc<dyn TweetSource>,
    pipeline: Arc<Pipeline>,
    state: DriverState,
}

impl StreamDriver {
    pub fn new(source: Arc<dyn TweetSource>, pipeline: Arc<Pipeline>) -> Self {
        Self {
            source,
            pipeline,
            state: DriverState::Connecting,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Run until the stream fails or ends.
    ///
    /// Each tweet is handed to its own spawned task and never joined, so
    /// completions are unordered. Always returns in `Terminated`.
    pub async fn run(&mut self) -> Termination {
        let track = self.pipeline.rules().track_expression();
        let mut dispatched = 0u64;

        let mut events = match self.source.subscribe(&track).await {
            Ok(events) => events,
            Err(e) => return self.terminate(format!("subscription failed: {e:#}"), dispatched),
        };
        self.state = DriverState::Streaming;
        info!(track = %track, "Streaming");

        loop {
            match events.recv().await {
                Some(StreamEvent::Tweet(tweet)) => {
                    dispatched += 1;
                    let pipeline = Arc::clone(&self.pipeline);
                    tokio::spawn(async move { pipeline.handle(*tweet).await });
                }
                Some(StreamEvent::Notice(kind)) => {
                    if kind == "disconnect" || kind == "warning" {
                        warn!(notice = %kind, "Stream notice");
                    } else {
                        debug!(notice = %kind, "Stream notice");
                    }
                }
                Some(StreamEvent::Error(message)) => {
                    return self.terminate(format!("stream error: {message}"), dispatched)
                }
                Some(StreamEvent::End) | None => {
                    return self.terminate("stream ended".to_string(), dispatched)
                }
            }
        }
    }

    fn terminate(&mut self, reason: String, dispatched: u64) -> Termination {
        self.state = DriverState::Terminated;
        Termination { reason, dispatched }
    }
}
