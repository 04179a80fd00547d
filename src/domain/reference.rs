//! Issue reference and mention extraction
//!
//! Recognises `#123`, `gh-45` (with a configured prefix) and `owner/repo#9`
//! style references, optionally preceded by an action verb such as `Closes`.

use crate::domain::options::ParseOptions;
use regex::Regex;
use std::sync::LazyLock;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([\w-]+)").expect("valid regex literal"));

/// An issue reference found in commit text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The matched text, action verb included
    pub raw: String,
    /// `scope + prefix + issue`
    pub r#ref: String,
    /// Verb governing this reference, as written (e.g. "Closes")
    pub action: Option<String>,
    /// Owner/repo-like token written directly before the prefix
    pub scope: Option<String>,
    pub prefix: String,
    pub issue: String,
}

/// Compiled reference matcher for one set of [`ParseOptions`]
///
/// Build once and reuse when scanning many commits with the same options.
#[derive(Debug, Clone)]
pub struct ReferenceScanner {
    regex: Option<Regex>,
}

impl ReferenceScanner {
    /// Compile a scanner for the given options
    ///
    /// With no issue prefixes nothing can ever match, and the scanner
    /// returns no references.
    pub fn new(options: &ParseOptions) -> Self {
        ReferenceScanner {
            regex: build_reference_regex(options),
        }
    }

    /// Find every reference in `text`, in order of appearance
    ///
    /// An action applies to the reference right after it and to any
    /// action-less references that follow on the same line, so
    /// `Closes #1, #2` attributes both issues to `Closes`.
    pub fn scan(&self, text: &str) -> Vec<Reference> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };

        let mut references = Vec::new();
        for line in text.lines() {
            let mut action: Option<String> = None;
            for captures in regex.captures_iter(line) {
                let (Some(whole), Some(prefix), Some(issue)) = (
                    captures.get(0),
                    captures.name("prefix"),
                    captures.name("issue"),
                ) else {
                    continue;
                };

                if let Some(verb) = captures.name("action") {
                    action = Some(verb.as_str().to_string());
                }
                let scope = captures.name("scope").map(|m| m.as_str().to_string());
                let prefix = prefix.as_str().to_string();
                let issue = issue.as_str().to_string();

                references.push(Reference {
                    raw: whole.as_str().to_string(),
                    r#ref: format!("{}{}{}", scope.as_deref().unwrap_or(""), prefix, issue),
                    action: action.clone(),
                    scope,
                    prefix,
                    issue,
                });
            }
        }
        references
    }
}

fn build_reference_regex(options: &ParseOptions) -> Option<Regex> {
    let prefixes = join_escaped(&options.issue_prefixes);
    if prefixes.is_empty() {
        return None;
    }
    let actions = join_escaped(&options.reference_actions);
    let action = if actions.is_empty() {
        String::new()
    } else {
        format!(r"(?:\b(?i:(?P<action>{}))\s+)?", actions)
    };

    let pattern = format!(
        r"{}(?P<scope>[\w./-]+)?(?P<prefix>{})(?P<issue>[\w-]*\d+)\b",
        action, prefixes
    );
    Regex::new(&pattern).ok()
}

fn join_escaped(items: &[String]) -> String {
    items
        .iter()
        .filter(|item| !item.is_empty())
        .map(|item| regex::escape(item))
        .collect::<Vec<_>>()
        .join("|")
}

/// Scan `text` for issue references
pub fn scan(text: &str, options: &ParseOptions) -> Vec<Reference> {
    ReferenceScanner::new(options).scan(text)
}

/// Extract `@name` mentions from `text`, without the leading `@`
pub fn mentions(text: &str) -> Vec<String> {
    MENTION
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
