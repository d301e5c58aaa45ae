// Beacon: relay tracked tweets to a Telegram channel.
//
// This is the library root. The stream driver feeds each tweet through the
// filter, escalates truncated ones, and hands accepted tweets to the notifier.

pub mod config;
pub mod filter;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod telegram;
pub mod twitter;

/// Sent on every outbound HTTP request.
pub const USER_AGENT: &str = concat!("beacon/", env!("CARGO_PKG_VERSION"));
