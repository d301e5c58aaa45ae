// Forward/drop decision for a single tweet.
//
// Rejections are checked first, in a fixed order, and the first one wins.
// Only a tweet that survives all of them is scanned for a tracked reference.

use std::fmt;

use super::extract;
use super::rules::RuleSet;
use crate::twitter::types::Tweet;

/// Why a tweet is relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    /// Posted by a tracked handle.
    TrackedAuthor,
    /// Carries a tracked cashtag.
    TrackedSymbol,
    /// Mentions a tracked handle.
    TrackedMention,
}

/// Why a tweet is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Retweet,
    TooManySymbols,
    Blacklisted,
    /// Nothing in the tweet refers to a tracked handle or symbol.
    NoReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Forward(MatchReason),
    Drop(DropReason),
}

impl Decision {
    pub fn is_forward(&self) -> bool {
        matches!(self, Decision::Forward(_))
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchReason::TrackedAuthor => "from tracked user",
            MatchReason::TrackedSymbol => "mentions tracked symbol",
            MatchReason::TrackedMention => "mentions tracked user",
        })
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DropReason::Retweet => "retweet",
            DropReason::TooManySymbols => "too many symbols",
            DropReason::Blacklisted => "blacklisted",
            DropReason::NoReference => "no tracked reference",
        })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Forward(reason) => write!(f, "forward ({reason})"),
            Decision::Drop(reason) => write!(f, "drop ({reason})"),
        }
    }
}

/// Apply the rule set to a tweet.
pub fn decide(tweet: &Tweet, rules: &RuleSet) -> Decision {
    if tweet.is_retweet() {
        return Decision::Drop(DropReason::Retweet);
    }

    if rules.exceeds_symbol_limit(extract::symbols(tweet).len()) {
        return Decision::Drop(DropReason::TooManySymbols);
    }

    if rules.blacklisted_term(extract::content(tweet)).is_some() {
        return Decision::Drop(DropReason::Blacklisted);
    }

    match find_reference(tweet, rules) {
        Some(reason) => Decision::Forward(reason),
        None => Decision::Drop(DropReason::NoReference),
    }
}

/// Boolean form of [`decide`].
pub fn should_forward(tweet: &Tweet, rules: &RuleSet) -> bool {
    decide(tweet, rules).is_forward()
}

fn find_reference(tweet: &Tweet, rules: &RuleSet) -> Option<MatchReason> {
    if rules.tracks_user(extract::author(tweet)) {
        return Some(MatchReason::TrackedAuthor);
    }
    if extract::symbols(tweet).iter().any(|s| rules.tracks_symbol(s)) {
        return Some(MatchReason::TrackedSymbol);
    }
    if extract::user_mentions(tweet)
        .iter()
        .any(|m| rules.tracks_user(m))
    {
        return Some(MatchReason::TrackedMention);
    }
    None
}
