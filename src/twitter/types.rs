// Twitter v1.1 status objects — just the fields the relay reads.
//
// Stream payloads are loosely shaped: control messages, partial entities and
// nulls all show up in practice. Every field is optional or defaulted so
// deserialization never fails on a missing key or an explicit `null`.

use serde::{Deserialize, Deserializer, Serialize};

/// Read `null` the same as an absent key: the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single status as delivered by the filtered stream or the lookup endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Tweet {
    /// Opaque identifier. Never parsed as a number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_str: String,
    /// Primary text (possibly truncated to 140 characters).
    #[serde(default)]
    pub text: Option<String>,
    /// Full text, present when fetched with `tweet_mode=extended`.
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub truncated: Option<bool>,
    /// Back-reference to the original status when this is a retweet.
    /// A JSON `null` deserializes to `None`.
    #[serde(default)]
    pub retweeted_status: Option<serde_json::Value>,
    /// Extended payload attached to truncated statuses on the stream.
    #[serde(default)]
    pub extended_tweet: Option<ExtendedTweet>,
    #[serde(default)]
    pub entities: Option<Entities>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Tweet {
    pub fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtendedTweet {
    #[serde(default)]
    pub full_text: Option<String>,
}

/// Structured metadata the platform extracted from the text.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Entities {
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbols: Vec<Symbol>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_mentions: Vec<UserMention>,
}

/// A cashtag, e.g. `$GET` is `{"text": "GET"}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Symbol {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserMention {
    #[serde(default, deserialize_with = "null_as_default")]
    pub screen_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct User {
    #[serde(default)]
    pub screen_name: Option<String>,
}
