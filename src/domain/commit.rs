use crate::domain::options::ParseOptions;
use crate::domain::reference::{self, Reference};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid regex literal"));

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(?:\((.*)\))?(!?): (.+)$").expect("valid regex literal")
});

// `Token: value` or `Token #ref`. The `#` is captured so the value can
// start on it rather than after it.
static FOOTER_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t*]*(BREAKING CHANGE|[\w-]+)(?::\s|[ \t]+(#))").expect("valid regex literal")
});

static FOOTER_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t*]*(BREAKING CHANGE|[\w-]+)(?::\s|[ \t]+(#))")
        .expect("valid regex literal")
});

static REVERT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^(?:Revert|revert:)\s(?:""|"?([\s\S]+?)"?)\s*This reverts commit (\w+)\."#)
        .expect("valid regex literal")
});

/// Footer tokens that declare a breaking change
pub const BREAKING_TOKENS: [&str; 2] = ["BREAKING CHANGE", "BREAKING-CHANGE"];

/// A single commit: opaque hash plus its parsed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub message: CommitMessage,
}

impl Commit {
    /// Parse `raw` and pair it with `hash`
    pub fn new(hash: impl Into<String>, raw: &str) -> Self {
        Commit {
            hash: hash.into(),
            message: CommitMessage::parse(raw),
        }
    }
}

/// One `Token: value` (or `Token #ref`) field from a commit footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterEntry {
    pub token: String,
    pub value: String,
}

impl FooterEntry {
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        FooterEntry {
            token: token.into(),
            value: value.into(),
        }
    }
}

/// The commit a revert commit undoes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revert {
    pub hash: String,
    pub header: String,
}

/// Structured view of a raw commit message
///
/// Parsing never fails: a message that follows no convention keeps its
/// whole header as `subject`, with no type, scope, footer or breaking note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub raw: String,
    pub header: String,
    pub body: String,
    pub footer: Vec<FooterEntry>,
    pub r#type: Option<String>,
    pub scope: Option<String>,
    pub subject: String,
    pub breaking: Option<String>,
    pub revert: Option<Revert>,
}

impl CommitMessage {
    /// Parse a raw commit message
    ///
    /// Supports formats:
    /// - type(scope)!: subject
    /// - type(scope): subject
    /// - type!: subject
    /// - type: subject
    /// - non-conventional text
    ///
    /// A `BREAKING CHANGE:` footer always wins over the `!` marker; the
    /// marker only supplies a note (body, else subject) when no footer did.
    pub fn parse(raw: &str) -> Self {
        let paragraphs = split_paragraphs(raw);
        let header = paragraphs
            .first()
            .map(|p| normalize_whitespace(p))
            .unwrap_or_default();

        let rest = paragraphs.get(1..).unwrap_or_default();
        let footer_start = rest
            .iter()
            .position(|p| FOOTER_START.is_match(p))
            .unwrap_or(rest.len());
        let (body_paragraphs, footer_paragraphs) = rest.split_at(footer_start);

        let body = body_paragraphs.join("\n\n").trim().to_string();
        let footer = if footer_paragraphs.is_empty() {
            Vec::new()
        } else {
            trace!(paragraph = footer_start + 1, "footer boundary found");
            parse_footer(&footer_paragraphs.join("\n\n"))
        };

        let mut breaking = footer
            .iter()
            .find(|entry| BREAKING_TOKENS.contains(&entry.token.as_str()))
            .map(|entry| entry.value.clone());

        let (r#type, scope, subject) = match HEADER.captures(&header) {
            Some(captures) => {
                let subject = captures
                    .get(4)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                let has_exclamation = captures.get(3).map(|m| m.as_str()) == Some("!");
                if has_exclamation && breaking.is_none() {
                    breaking = Some(if body.is_empty() {
                        subject.clone()
                    } else {
                        body.clone()
                    });
                }
                (
                    captures.get(1).map(|m| m.as_str().to_string()),
                    captures.get(2).map(|m| m.as_str().to_string()),
                    subject,
                )
            }
            None => (None, None, header.clone()),
        };

        CommitMessage {
            raw: raw.to_string(),
            header,
            body,
            footer,
            r#type,
            scope,
            subject,
            breaking,
            revert: parse_revert(raw),
        }
    }

    /// Whether this message carries a breaking change note
    pub fn is_breaking(&self) -> bool {
        self.breaking.is_some()
    }

    /// Issue references in the raw message, recomputed on every call
    pub fn references(&self, options: &ParseOptions) -> Vec<Reference> {
        reference::scan(&self.raw, options)
    }

    /// `@name` mentions in the raw message, recomputed on every call
    pub fn mentions(&self) -> Vec<String> {
        reference::mentions(&self.raw)
    }
}

/// Parse a raw commit message
pub fn parse(raw: &str) -> CommitMessage {
    CommitMessage::parse(raw)
}

fn split_paragraphs(raw: &str) -> Vec<String> {
    let trimmed = raw
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed = trimmed.trim_matches('\n');
    if trimmed.is_empty() {
        return Vec::new();
    }
    PARAGRAPH_BREAK
        .split(trimmed)
        .map(|p| p.to_string())
        .collect()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split footer text into consecutive token/value pairs.
///
/// Lines that do not start a new field extend the previous value.
fn parse_footer(text: &str) -> Vec<FooterEntry> {
    let mut entries = Vec::new();
    let mut open: Option<(String, usize)> = None;

    for captures in FOOTER_FIELD.captures_iter(text) {
        let (Some(whole), Some(token)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if let Some((token, start)) = open.take() {
            entries.push(FooterEntry::new(token, text[start..whole.start()].trim()));
        }
        let value_start = captures.get(2).map_or(whole.end(), |hash| hash.start());
        open = Some((token.as_str().to_string(), value_start));
    }

    if let Some((token, start)) = open {
        entries.push(FooterEntry::new(token, text[start..].trim()));
    }
    entries
}

fn parse_revert(raw: &str) -> Option<Revert> {
    let captures = REVERT.captures(raw)?;
    let header = captures.get(1)?.as_str().to_string();
    let hash = captures.get(2)?.as_str().to_string();
    Some(Revert { hash, header })
}
