// Twitter REST client — OAuth-signed GET requests against the v1.1 API.
//
// The relay needs a single REST call: `statuses/show` in extended mode,
// used to escalate a truncated stream tweet to its full form.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::oauth::OAuthSigner;
use super::types::Tweet;
use crate::config::TwitterCredentials;
use crate::pipeline::escalate::TweetLookup;
use crate::USER_AGENT;

/// Authenticated client for the Twitter REST endpoints.
pub struct TwitterClient {
    client: reqwest::Client,
    base_url: String,
    signer: OAuthSigner,
}

impl TwitterClient {
    /// Create a client against `base_url` (normally `https://api.twitter.com`).
    pub fn new(base_url: &str, credentials: TwitterCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer: OAuthSigner::new(credentials),
        })
    }

    /// Signed GET to a v1.1 endpoint, deserializing the JSON response.
    ///
    /// `path` is relative to the API root, e.g. `/1.1/statuses/show.json`.
    pub async fn signed_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let authorization = self.signer.authorization("GET", &url, params)?;

        debug!(path = path, "Twitter GET request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .with_context(|| format!("Twitter request failed: {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Twitter {path} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {path} response"))
    }

    /// Fetch one status by id with `tweet_mode=extended`, so `full_text`
    /// and complete entities are populated.
    pub async fn show_extended(&self, id: &str) -> Result<Tweet> {
        self.signed_get(
            "/1.1/statuses/show.json",
            &[("id", id), ("tweet_mode", "extended")],
        )
        .await
        .with_context(|| format!("Failed to fetch extended tweet {id}"))
    }
}

#[async_trait]
impl TweetLookup for TwitterClient {
    async fn fetch_extended(&self, id: &str) -> Result<Tweet> {
        self.show_extended(id).await
    }
}
