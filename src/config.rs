use crate::domain::options::{default_issue_prefixes, default_reference_actions, ParseOptions};
use crate::domain::prerelease::PrereleaseDirective;
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Represents the complete configuration for conventional-release.
///
/// Contains commit parser settings and the release policy used when
/// recommending and applying version bumps.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

/// Configuration for commit message parsing.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ParserConfig {
    #[serde(default = "default_issue_prefixes")]
    pub issue_prefixes: Vec<String>,

    #[serde(default = "default_reference_actions")]
    pub reference_actions: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            issue_prefixes: default_issue_prefixes(),
            reference_actions: default_reference_actions(),
        }
    }
}

impl ParserConfig {
    /// Options for the commit parser and reference scanner
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.issue_prefixes.clone(), self.reference_actions.clone())
    }
}

/// Returns the default commit types that appear in the changelog.
fn default_changelog_sections() -> BTreeSet<String> {
    ["feat", "fix", "perf", "revert"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Configuration for release decisions.
///
/// Commits whose type is listed in `changelog_sections` (or every commit,
/// with `bump_all_changes`) warrant at least a patch release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_changelog_sections")]
    pub changelog_sections: BTreeSet<String>,

    #[serde(default)]
    pub bump_all_changes: bool,

    #[serde(default)]
    pub prerelease: PrereleaseDirective,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            changelog_sections: default_changelog_sections(),
            bump_all_changes: false,
            prerelease: PrereleaseDirective::default(),
        }
    }
}

impl ReleaseConfig {
    pub fn prerelease_directive(&self) -> &PrereleaseDirective {
        &self.prerelease
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Config> {
        toml::from_str(text).map_err(|e| ReleaseError::config(e.to_string()))
    }
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `config_path` - Optional path to a TOML configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If the file cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::from_toml_str(&fs::read_to_string(path)?),
        None => Ok(Config::default()),
    }
}
