// Field extraction with fallbacks.
//
// None of these fail: a missing field degrades to an empty value or the
// "N/A" author sentinel. Case is left untouched; the filter normalizes.

use crate::twitter::types::Tweet;

/// Author placeholder when the status carries no user object.
pub const UNKNOWN_AUTHOR: &str = "N/A";

/// The most complete text available.
///
/// Precedence: `full_text` (lookup with `tweet_mode=extended`), then the
/// stream's `extended_tweet.full_text`, then the possibly truncated `text`.
/// An empty string counts as absent.
pub fn content(tweet: &Tweet) -> &str {
    let present = |s: &&str| !s.is_empty();
    tweet
        .full_text
        .as_deref()
        .filter(present)
        .or_else(|| {
            tweet
                .extended_tweet
                .as_ref()
                .and_then(|ext| ext.full_text.as_deref())
                .filter(present)
        })
        .or_else(|| tweet.text.as_deref().filter(present))
        .unwrap_or_default()
}

/// Cashtag texts as the platform reported them (e.g. `GET`).
pub fn symbols(tweet: &Tweet) -> Vec<&str> {
    tweet
        .entities
        .as_ref()
        .map(|e| e.symbols.iter().map(|s| s.text.as_str()).collect())
        .unwrap_or_default()
}

/// Screen names mentioned in the status.
pub fn user_mentions(tweet: &Tweet) -> Vec<&str> {
    tweet
        .entities
        .as_ref()
        .map(|e| e.user_mentions.iter().map(|m| m.screen_name.as_str()).collect())
        .unwrap_or_default()
}

pub fn author(tweet: &Tweet) -> &str {
    tweet
        .user
        .as_ref()
        .and_then(|u| u.screen_name.as_deref())
        .unwrap_or(UNKNOWN_AUTHOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::types::{Entities, ExtendedTweet, Symbol, User, UserMention};

    #[test]
    fn content_prefers_full_text() {
        let tweet = Tweet {
            text: Some("short".into()),
            full_text: Some("the full thing".into()),
            extended_tweet: Some(ExtendedTweet {
                full_text: Some("extended".into()),
            }),
            ..Default::default()
        };
        assert_eq!(content(&tweet), "the full thing");
    }

    #[test]
    fn content_uses_extended_tweet_before_text() {
        let tweet = Tweet {
            text: Some("short…".into()),
            extended_tweet: Some(ExtendedTweet {
                full_text: Some("short and then the rest".into()),
            }),
            ..Default::default()
        };
        assert_eq!(content(&tweet), "short and then the rest");
    }

    #[test]
    fn content_falls_back_to_text_then_empty() {
        let tweet = Tweet {
            text: Some("plain".into()),
            extended_tweet: Some(ExtendedTweet { full_text: None }),
            ..Default::default()
        };
        assert_eq!(content(&tweet), "plain");
        assert_eq!(content(&Tweet::default()), "");
    }

    #[test]
    fn empty_text_fields_fall_through() {
        let tweet = Tweet {
            text: Some("short".into()),
            full_text: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(content(&tweet), "short");

        let tweet = Tweet {
            text: Some("short".into()),
            full_text: Some(String::new()),
            extended_tweet: Some(ExtendedTweet {
                full_text: Some("short and then the rest".into()),
            }),
            ..Default::default()
        };
        assert_eq!(content(&tweet), "short and then the rest");
    }

    #[test]
    fn missing_entities_give_empty_lists() {
        let tweet = Tweet::default();
        assert!(symbols(&tweet).is_empty());
        assert!(user_mentions(&tweet).is_empty());
    }

    #[test]
    fn entities_are_returned_unnormalized() {
        let tweet = Tweet {
            entities: Some(Entities {
                symbols: vec![Symbol { text: "GET".into() }],
                user_mentions: vec![UserMention {
                    screen_name: "GetProtocol".into(),
                }],
            }),
            ..Default::default()
        };
        assert_eq!(symbols(&tweet), vec!["GET"]);
        assert_eq!(user_mentions(&tweet), vec!["GetProtocol"]);
    }

    #[test]
    fn author_defaults_to_sentinel() {
        assert_eq!(author(&Tweet::default()), UNKNOWN_AUTHOR);
        let nameless = Tweet {
            user: Some(User { screen_name: None }),
            ..Default::default()
        };
        assert_eq!(author(&nameless), "N/A");
        let named = Tweet {
            user: Some(User {
                screen_name: Some("GetProtocol".into()),
            }),
            ..Default::default()
        };
        assert_eq!(author(&named), "GetProtocol");
    }
}
