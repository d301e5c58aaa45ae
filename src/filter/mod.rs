// Filter engine — decides which tweets get relayed.
//
// `extract` pulls normalized fields out of a raw tweet, `rules` holds the
// startup rule set, and `decide` applies the rejection/acceptance order.

pub mod decide;
pub mod extract;
pub mod rules;
