// The rule set: who and what to track, what to refuse.
//
// Built once at startup and shared read-only. Entries are lower-cased on
// construction so matching only has to normalize the tweet side.

/// Tracked handles and symbols, blacklisted substrings and the cashtag cap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    tracked_users: Vec<String>,
    tracked_symbols: Vec<String>,
    blacklist: Vec<String>,
    /// Maximum symbol mentions a tweet may carry. `None` means unbounded.
    max_symbols: Option<usize>,
}

impl RuleSet {
    /// Build a rule set. A leading `@` on handles and `$` on symbols is
    /// stripped, entries are lower-cased, duplicates and blanks dropped.
    pub fn new<U, S, B>(users: U, symbols: S, blacklist: B, max_symbols: Option<usize>) -> Self
    where
        U: IntoIterator,
        U::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        Self {
            tracked_users: normalize(users, Some('@')),
            tracked_symbols: normalize(symbols, Some('$')),
            blacklist: normalize(blacklist, None),
            max_symbols,
        }
    }

    /// One handle and one symbol, no blacklist, no symbol cap.
    pub fn reduced(user: &str, symbol: &str) -> Self {
        Self::new([user], [symbol], Vec::<String>::new(), None)
    }

    pub fn tracked_users(&self) -> &[String] {
        &self.tracked_users
    }

    pub fn tracked_symbols(&self) -> &[String] {
        &self.tracked_symbols
    }

    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    pub fn max_symbols(&self) -> Option<usize> {
        self.max_symbols
    }

    /// Handle comparison; `handle` may be in any case.
    pub fn tracks_user(&self, handle: &str) -> bool {
        let handle = handle.to_lowercase();
        self.tracked_users.iter().any(|u| *u == handle)
    }

    pub fn tracks_symbol(&self, symbol: &str) -> bool {
        let symbol = symbol.to_lowercase();
        self.tracked_symbols.iter().any(|s| *s == symbol)
    }

    /// First blacklist entry found as a literal substring of `content`,
    /// compared case-insensitively.
    pub fn blacklisted_term(&self, content: &str) -> Option<&str> {
        let content = content.to_lowercase();
        self.blacklist
            .iter()
            .find(|term| content.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn exceeds_symbol_limit(&self, count: usize) -> bool {
        self.max_symbols.is_some_and(|max| count > max)
    }

    /// Filter expression for the stream subscription:
    /// `@user1,@user2,$symbol1`, handles first.
    pub fn track_expression(&self) -> String {
        self.tracked_users
            .iter()
            .map(|u| format!("@{u}"))
            .chain(self.tracked_symbols.iter().map(|s| format!("${s}")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn normalize<I>(entries: I, marker: Option<char>) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.as_ref().trim();
        let entry = marker
            .and_then(|m| entry.strip_prefix(m))
            .unwrap_or(entry)
            .to_lowercase();
        if !entry.is_empty() && !out.contains(&entry) {
            out.push(entry);
        }
    }
    out
}
