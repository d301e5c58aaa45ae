// Notification delivery — the swap-ready abstraction.
//
// The pipeline only sees the Notifier trait. TelegramNotifier is the one
// production implementation; tests substitute recording fakes.

pub mod telegram;
pub mod traits;
