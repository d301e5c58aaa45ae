// Relay pipeline.
//
// `driver` owns the stream and spawns one task per tweet; `process` runs
// the filter/escalate/notify flow for that tweet; `escalate` is the
// extended-form lookup used for truncated tweets.

pub mod driver;
pub mod escalate;
pub mod process;
