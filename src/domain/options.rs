/// Options controlling commit message parsing and reference scanning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    /// Tokens that introduce an issue id (e.g. `#`, `gh-`). Matched verbatim.
    pub issue_prefixes: Vec<String>,
    /// Verbs that attach an action to a reference. Matched case-insensitively.
    pub reference_actions: Vec<String>,
}

/// Returns the default issue prefixes.
pub fn default_issue_prefixes() -> Vec<String> {
    vec!["#".to_string()]
}

/// Returns the default reference action verbs.
pub fn default_reference_actions() -> Vec<String> {
    [
        "close", "closes", "closed", "fix", "fixes", "fixed", "resolve", "resolves", "resolved",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl ParseOptions {
    /// Create options with explicit prefixes and actions
    pub fn new(issue_prefixes: Vec<String>, reference_actions: Vec<String>) -> Self {
        ParseOptions {
            issue_prefixes,
            reference_actions,
        }
    }

    /// Replace the issue prefixes
    pub fn with_issue_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the reference actions
    pub fn with_reference_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_actions = actions.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            issue_prefixes: default_issue_prefixes(),
            reference_actions: default_reference_actions(),
        }
    }
}
