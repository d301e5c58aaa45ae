// Telegram Bot API — just enough to post a message to a channel.

pub mod client;
pub mod types;
