//! Pre-release version handling for semantic versioning
//!
//! Covers the caller's prerelease policy ([`PrereleaseDirective`]) and the
//! counter arithmetic on dot-separated prerelease identifiers.
//! According to semver.org: https://semver.org/#spec-item-9

use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller policy for whether the next version carries a prerelease suffix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<DirectiveSetting>", into = "Option<DirectiveSetting>")]
pub enum PrereleaseDirective {
    /// Keep the previous version's prerelease-ness
    #[default]
    Preserve,
    /// Always produce a prerelease
    Force,
    /// Always produce a plain release, promoting out of any prerelease
    Promote,
    /// Produce a prerelease with this identifier (e.g. "beta")
    Identifier(String),
}

/// TOML form of the directive: `true`, `false` or an identifier string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DirectiveSetting {
    Flag(bool),
    Identifier(String),
}

impl From<Option<DirectiveSetting>> for PrereleaseDirective {
    fn from(setting: Option<DirectiveSetting>) -> Self {
        match setting {
            None => PrereleaseDirective::Preserve,
            Some(DirectiveSetting::Flag(true)) => PrereleaseDirective::Force,
            Some(DirectiveSetting::Flag(false)) => PrereleaseDirective::Promote,
            Some(DirectiveSetting::Identifier(id)) => PrereleaseDirective::Identifier(id),
        }
    }
}

impl From<PrereleaseDirective> for Option<DirectiveSetting> {
    fn from(directive: PrereleaseDirective) -> Self {
        match directive {
            PrereleaseDirective::Preserve => None,
            PrereleaseDirective::Force => Some(DirectiveSetting::Flag(true)),
            PrereleaseDirective::Promote => Some(DirectiveSetting::Flag(false)),
            PrereleaseDirective::Identifier(id) => Some(DirectiveSetting::Identifier(id)),
        }
    }
}

impl PrereleaseDirective {
    /// Whether the next version should be a prerelease
    ///
    /// # Arguments
    /// * `previous_is_prerelease` - whether the previous version has a suffix
    pub fn wants_prerelease(&self, previous_is_prerelease: bool) -> bool {
        match self {
            PrereleaseDirective::Preserve => previous_is_prerelease,
            PrereleaseDirective::Force | PrereleaseDirective::Identifier(_) => true,
            PrereleaseDirective::Promote => false,
        }
    }

    /// The explicit identifier, if any
    pub fn identifier(&self) -> Option<&str> {
        match self {
            PrereleaseDirective::Identifier(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

/// One dot-separated prerelease identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Numeric(u64),
    AlphaNumeric(String),
}

impl Identifier {
    fn parse(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                Identifier::Numeric(n)
            }
            _ => Identifier::AlphaNumeric(s.to_string()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::AlphaNumeric(s) => write!(f, "{}", s),
        }
    }
}

/// Pre-release suffix split into identifiers
///
/// # Examples
/// - "" -> PreRelease { identifiers: [] }
/// - "4" -> PreRelease { identifiers: [Numeric(4)] }
/// - "beta.1" -> PreRelease { identifiers: [AlphaNumeric("beta"), Numeric(1)] }
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreRelease {
    pub identifiers: Vec<Identifier>,
}

impl PreRelease {
    /// Split a prerelease suffix (without the leading `-`)
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return PreRelease::default();
        }
        PreRelease {
            identifiers: s.split('.').map(Identifier::parse).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// The leading identifier when it is a name rather than a counter
    pub fn name(&self) -> Option<&str> {
        match self.identifiers.first() {
            Some(Identifier::AlphaNumeric(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Advance the prerelease counter
    ///
    /// - empty -> `0`
    /// - bumps the last numeric identifier, or appends `0` when there is none
    /// - with an `identifier` that differs from the current name, restarts
    ///   at `identifier.0`
    ///
    /// # Examples
    /// ```ignore
    /// let pr = PreRelease::parse("beta.1").increment(None)?;
    /// assert_eq!(pr.to_string(), "beta.2");
    /// let pr = PreRelease::parse("alpha.3").increment(Some("beta"))?;
    /// assert_eq!(pr.to_string(), "beta.0");
    /// ```
    pub fn increment(&self, identifier: Option<&str>) -> Result<Self> {
        let mut identifiers = self.identifiers.clone();

        if identifiers.is_empty() {
            identifiers.push(Identifier::Numeric(0));
        } else {
            let last_numeric = identifiers
                .iter_mut()
                .rev()
                .find_map(|id| match id {
                    Identifier::Numeric(n) => Some(n),
                    Identifier::AlphaNumeric(_) => None,
                });
            match last_numeric {
                Some(n) => {
                    *n = n.checked_add(1).ok_or_else(|| {
                        ReleaseError::invalid_bump("prerelease counter overflow")
                    })?;
                }
                None => identifiers.push(Identifier::Numeric(0)),
            }
        }

        if let Some(id) = identifier {
            validate_identifier(id)?;
            let restart = vec![Identifier::AlphaNumeric(id.to_string()), Identifier::Numeric(0)];
            let same_name = identifiers.first().map(|first| first.to_string()).as_deref() == Some(id);
            if !same_name || !matches!(identifiers.get(1), Some(Identifier::Numeric(_))) {
                identifiers = restart;
            }
        }

        Ok(PreRelease { identifiers })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.identifiers.iter().map(|id| id.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

fn validate_identifier(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(ReleaseError::invalid_bump(
            "prerelease identifier must not be empty",
        ));
    }
    semver::Prerelease::new(id)
        .map(|_| ())
        .map_err(|e| ReleaseError::invalid_bump(format!("prerelease identifier '{}': {}", id, e)))
}
