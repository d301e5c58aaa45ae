// Telegram Bot API client.
//
// One method: `sendMessage`. Failures are returned to the caller untouched;
// there is no retry and no fallback to plain text.

use anyhow::{Context, Result};
use tracing::debug;

use super::types::{InlineKeyboardMarkup, Message, SendMessageRequest, TelegramResponse};
use crate::USER_AGENT;

/// Optional `sendMessage` parameters.
#[derive(Debug, Clone, Default)]
pub struct SendMessageOptions {
    pub parse_mode: Option<String>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendMessageOptions {
    /// Render the text as Telegram HTML.
    pub fn html(mut self) -> Self {
        self.parse_mode = Some("HTML".into());
        self
    }

    pub fn with_keyboard(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }
}

/// Bot API client bound to one bot token.
pub struct TelegramClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl TelegramClient {
    /// Create a client for `token` against `base_url` (normally
    /// `https://api.telegram.org`).
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Send a text message to `chat_id`.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        options: &SendMessageOptions,
    ) -> Result<Message> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: options.parse_mode.as_deref(),
            reply_markup: options.reply_markup.as_ref(),
        };

        debug!(chat_id = chat_id, "Telegram sendMessage");

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&request)
            .send()
            .await
            .context("Telegram sendMessage request failed")?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Error responses normally carry the JSON envelope; fall back to the
        // raw body when they don't.
        let envelope: TelegramResponse<Message> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                anyhow::bail!("Telegram sendMessage returned {status}: {body}")
            }
            Err(e) => {
                return Err(e).context("Failed to deserialize sendMessage response");
            }
        };

        if !envelope.ok {
            anyhow::bail!(
                "Telegram sendMessage failed ({}): {}",
                envelope.error_code.unwrap_or_else(|| i32::from(status.as_u16())),
                envelope.description.unwrap_or_default()
            );
        }

        envelope
            .result
            .context("Telegram sendMessage returned ok without a result")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::types::InlineKeyboardButton;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, TelegramClient) {
        let server = MockServer::start().await;
        let client = TelegramClient::new(&server.uri(), "test_token_12345").unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn send_message_posts_html_with_keyboard() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/bottest_token_12345/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "@channel",
                "text": "<b>hello</b>",
                "parse_mode": "HTML",
                "reply_markup": {
                    "inline_keyboard": [[{ "text": "Open", "url": "https://example.com" }]]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 42, "chat": { "id": -100123, "type": "channel" }, "date": 0 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = SendMessageOptions::default()
            .html()
            .with_keyboard(InlineKeyboardMarkup {
                inline_keyboard: vec![vec![InlineKeyboardButton {
                    text: "Open".into(),
                    url: "https://example.com".into(),
                }]],
            });

        let message = client
            .send_message("@channel", "<b>hello</b>", &options)
            .await
            .unwrap();

        assert_eq!(message.message_id, 42);
        assert_eq!(message.chat.id, -100123);
    }

    #[tokio::test]
    async fn plain_options_omit_parse_mode() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/bottest_token_12345/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 7, "chat": { "id": 1 } }
            })))
            .mount(&server)
            .await;

        client
            .send_message("1", "plain", &SendMessageOptions::default())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("parse_mode").is_none());
        assert!(body.get("reply_markup").is_none());
    }

    #[tokio::test]
    async fn api_error_is_returned() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/bottest_token_12345/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = client
            .send_message("@missing", "hi", &SendMessageOptions::default())
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("chat not found"));
    }

    #[tokio::test]
    async fn non_json_error_body_is_reported() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/bottest_token_12345/sendMessage"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client
            .send_message("1", "hi", &SendMessageOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("502"));
    }
}
