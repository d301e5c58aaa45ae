// Colored terminal output for `beacon check` and `beacon track`.

use colored::Colorize;

use crate::filter::decide::Decision;
use crate::filter::extract;
use crate::filter::rules::RuleSet;
use crate::twitter::types::Tweet;

use super::truncate_chars;

/// Print the active rule set and the resulting track expression.
pub fn display_rules(rules: &RuleSet) {
    println!("{}", "=== Rules ===".bold());
    println!("  Tracked users:   {}", rules.tracked_users().join(", "));
    println!("  Tracked symbols: {}", rules.tracked_symbols().join(", "));
    println!("  Blacklist:       {}", rules.blacklist().join(", "));
    match rules.max_symbols() {
        Some(max) => println!("  Max symbols:     {max}"),
        None => println!("  Max symbols:     {}", "unbounded".dimmed()),
    }
    println!("  Track:           {}", rules.track_expression().cyan());
}

/// Print what the filter sees in a tweet and the decision it reached.
pub fn display_decision(tweet: &Tweet, decision: &Decision) {
    let id = if tweet.id_str.is_empty() {
        "(no id)"
    } else {
        tweet.id_str.as_str()
    };

    println!("\n{}", format!("=== Tweet {id} ===").bold());
    println!("  Author:    @{}", extract::author(tweet));
    println!(
        "  Content:   {}",
        truncate_chars(extract::content(tweet), 200).dimmed()
    );
    println!("  Symbols:   {}", extract::symbols(tweet).join(", "));
    println!("  Mentions:  {}", extract::user_mentions(tweet).join(", "));
    println!(
        "  Flags:     retweet={} truncated={}",
        tweet.is_retweet(),
        tweet.is_truncated()
    );

    let verdict = decision.to_string();
    let verdict = if decision.is_forward() {
        verdict.green().bold()
    } else {
        verdict.red()
    };
    println!("  Decision:  {verdict}");
}
