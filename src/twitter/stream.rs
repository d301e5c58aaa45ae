// Filtered stream connection (`statuses/filter`).
//
// The body is newline-delimited JSON: statuses, control messages such as
// `limit` or `delete`, and blank keep-alive lines. A reader task turns it
// into `StreamEvent`s. There is no reconnection here: a read error, a stall
// or the end of the body is reported once and the reader stops.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::oauth::OAuthSigner;
use super::types::Tweet;
use crate::config::TwitterCredentials;
use crate::pipeline::driver::TweetSource;
use crate::USER_AGENT;

/// Twitter sends a keep-alive at least every 30 seconds; three missed
/// keep-alives means the connection is dead.
const STALL_TIMEOUT: Duration = Duration::from_secs(90);

/// One item read from the stream.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A status matching the track expression.
    Tweet(Box<Tweet>),
    /// A control message (`limit`, `delete`, `warning`, `disconnect`, ...),
    /// carried as its top-level key.
    Notice(String),
    /// Transport failure while reading the body.
    Error(String),
    /// The server closed the stream.
    End,
}

/// Classify one line of the stream body.
///
/// Returns `None` for keep-alives and for lines that are not JSON objects.
pub fn parse_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, data = %line, "Failed to parse stream data");
            return None;
        }
    };

    let object = value.as_object()?;
    if let Some(id) = object.get("id_str") {
        let tweet_id = id.as_str().unwrap_or_default().to_string();
        return match serde_json::from_value::<Tweet>(value) {
            Ok(tweet) => Some(StreamEvent::Tweet(Box::new(tweet))),
            Err(e) => {
                warn!(tweet_id = %tweet_id, error = %e, "Failed to decode stream status");
                None
            }
        };
    }

    let kind = object
        .keys()
        .next()
        .cloned()
        .unwrap_or_else(|| "unknown".to_string());
    Some(StreamEvent::Notice(kind))
}

/// Statuses/filter subscription over a long-lived POST.
pub struct FilteredStream {
    client: reqwest::Client,
    base_url: String,
    signer: OAuthSigner,
}

impl FilteredStream {
    /// `base_url` is the stream host, normally `https://stream.twitter.com`.
    pub fn new(base_url: &str, credentials: TwitterCredentials) -> Result<Self> {
        // No overall timeout: the response body never completes on its own.
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer: OAuthSigner::new(credentials),
        })
    }
}

#[async_trait]
impl TweetSource for FilteredStream {
    async fn subscribe(&self, track: &str) -> Result<mpsc::Receiver<StreamEvent>> {
        let url = format!("{}/1.1/statuses/filter.json", self.base_url);
        let form = [("track", track)];
        let authorization = self.signer.authorization("POST", &url, &form)?;

        info!(track = track, "Connecting to Twitter filtered stream");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .form(&form)
            .send()
            .await
            .context("Failed to connect to filtered stream")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Filtered stream returned {status}: {body}");
        }

        let (event_tx, event_rx) = mpsc::channel(256);
        tokio::spawn(read_stream(response, event_tx));
        Ok(event_rx)
    }
}

/// Read the response body until it ends, fails or stalls.
async fn read_stream(response: reqwest::Response, event_tx: mpsc::Sender<StreamEvent>) {
    let mut body = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    let last = loop {
        let chunk = match tokio::time::timeout(STALL_TIMEOUT, body.next()).await {
            Ok(Some(Ok(chunk))) => chunk,
            Ok(Some(Err(e))) => break StreamEvent::Error(e.to_string()),
            Ok(None) => break StreamEvent::End,
            Err(_) => {
                break StreamEvent::Error(format!(
                    "no data for {}s, connection stalled",
                    STALL_TIMEOUT.as_secs()
                ))
            }
        };

        buffer.extend_from_slice(&chunk);

        while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if line.trim().is_empty() {
                debug!("Received keep-alive");
                continue;
            }
            if let Some(event) = parse_line(&line) {
                if event_tx.send(event).await.is_err() {
                    debug!("Event receiver dropped, stopping stream reader");
                    return;
                }
            }
        }
    };

    // A trailing record without a newline still counts.
    if let Some(event) = parse_line(&String::from_utf8_lossy(&buffer)) {
        let _ = event_tx.send(event).await;
    }
    let _ = event_tx.send(last).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn keep_alive_lines_are_ignored() {
        assert!(parse_line("").is_none());
        assert!(parse_line("\r\n").is_none());
        assert!(parse_line("   ").is_none());
    }

    #[test]
    fn status_lines_become_tweets() {
        let event = parse_line(r#"{"id_str":"42","text":"hi $GET","user":{"screen_name":"a"}}"#);
        match event {
            Some(StreamEvent::Tweet(tweet)) => {
                assert_eq!(tweet.id_str, "42");
                assert_eq!(tweet.text.as_deref(), Some("hi $GET"));
            }
            other => panic!("expected tweet, got {other:?}"),
        }
    }

    #[test]
    fn status_with_null_entities_is_kept() {
        let event = parse_line(
            r#"{"id_str":"43","text":"gm","user":{"screen_name":"getprotocol"},"entities":{"symbols":null}}"#,
        );
        match event {
            Some(StreamEvent::Tweet(tweet)) => {
                assert_eq!(tweet.id_str, "43");
                assert!(tweet.entities.as_ref().is_some_and(|e| e.symbols.is_empty()));
            }
            other => panic!("expected tweet, got {other:?}"),
        }
    }

    #[test]
    fn control_messages_become_notices() {
        match parse_line(r#"{"limit":{"track":12,"timestamp_ms":"1"}}"#) {
            Some(StreamEvent::Notice(kind)) => assert_eq!(kind, "limit"),
            other => panic!("expected notice, got {other:?}"),
        }
        match parse_line(r#"{"delete":{"status":{"id_str":"1"}}}"#) {
            Some(StreamEvent::Notice(kind)) => assert_eq!(kind, "delete"),
            other => panic!("expected notice, got {other:?}"),
        }
    }

    #[test]
    fn garbage_and_non_objects_are_skipped() {
        assert!(parse_line("{not json").is_none());
        assert!(parse_line("[1,2,3]").is_none());
    }

    #[tokio::test]
    async fn subscribe_reads_until_end() {
        let server = MockServer::start().await;
        let body = concat!(
            "{\"id_str\":\"1\",\"text\":\"first\"}\r\n",
            "\r\n",
            "{\"limit\":{\"track\":3}}\r\n",
            "{\"id_str\":\"2\",\"text\":\"second\"}"
        );
        Mock::given(method("POST"))
            .and(path("/1.1/statuses/filter.json"))
            .and(header_exists("authorization"))
            .and(body_string_contains("track=%40getprotocol%2C%24get"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let stream = FilteredStream::new(&server.uri(), TwitterCredentials::default()).unwrap();
        let mut rx = stream.subscribe("@getprotocol,$get").await.unwrap();

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push(event);
        }

        assert_eq!(seen.len(), 4, "{seen:?}");
        assert!(matches!(&seen[0], StreamEvent::Tweet(t) if t.id_str == "1"));
        assert!(matches!(&seen[1], StreamEvent::Notice(kind) if kind == "limit"));
        assert!(matches!(&seen[2], StreamEvent::Tweet(t) if t.id_str == "2"));
        assert!(matches!(seen[3], StreamEvent::End));
    }

    #[tokio::test]
    async fn rejected_subscription_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1.1/statuses/filter.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let stream = FilteredStream::new(&server.uri(), TwitterCredentials::default()).unwrap();
        let err = stream.subscribe("@getprotocol").await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}
