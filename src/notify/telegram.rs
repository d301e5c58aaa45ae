// Telegram channel notifier.
//
// Message layout: bold author handle linked to the profile, a colon, the
// tweet text, then one row with "Open Profile" and "Open Tweet" buttons.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::traits::Notifier;
use crate::filter::extract;
use crate::telegram::client::{SendMessageOptions, TelegramClient};
use crate::telegram::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::twitter::types::Tweet;

pub const TWITTER_WEB_URL: &str = "https://twitter.com";

/// A formatted message, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Telegram HTML body.
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

pub fn profile_url(author: &str) -> String {
    format!("{TWITTER_WEB_URL}/{author}")
}

pub fn tweet_url(author: &str, id: &str) -> String {
    format!("{TWITTER_WEB_URL}/{author}/status/{id}")
}

impl Notification {
    /// Build the message for a tweet.
    ///
    /// v1.1 text arrives with `&`, `<` and `>` already entity-encoded,
    /// so the content goes into the HTML body as-is.
    pub fn from_tweet(tweet: &Tweet) -> Self {
        let author = extract::author(tweet);
        let profile = profile_url(author);

        let text = format!(
            "<a href=\"{profile}\"><strong>@{author}</strong></a>: {}",
            extract::content(tweet)
        );

        let keyboard = InlineKeyboardMarkup {
            inline_keyboard: vec![vec![
                InlineKeyboardButton {
                    text: "Open Profile".into(),
                    url: profile,
                },
                InlineKeyboardButton {
                    text: "Open Tweet".into(),
                    url: tweet_url(author, &tweet.id_str),
                },
            ]],
        };

        Self { text, keyboard }
    }
}

/// Posts notifications to one fixed channel.
pub struct TelegramNotifier {
    client: TelegramClient,
    channel: String,
}

impl TelegramNotifier {
    pub fn new(client: TelegramClient, channel: impl Into<String>) -> Self {
        Self {
            client,
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, tweet: &Tweet) -> Result<()> {
        let notification = Notification::from_tweet(tweet);
        let options = SendMessageOptions::default()
            .html()
            .with_keyboard(notification.keyboard);

        let message = self
            .client
            .send_message(&self.channel, &notification.text, &options)
            .await
            .with_context(|| format!("Failed to deliver tweet {}", tweet.id_str))?;

        info!(
            tweet_id = %tweet.id_str,
            message_id = message.message_id,
            "Pushed tweet to Telegram"
        );
        Ok(())
    }
}
