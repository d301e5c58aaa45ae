// Twitter API v1.1 — status types, OAuth signing, REST lookup, filtered stream.

pub mod client;
pub mod oauth;
pub mod stream;
pub mod types;
