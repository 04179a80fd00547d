use crate::config::ReleaseConfig;
use crate::domain::{Bump, Commit};
use crate::domain::version;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Commit type assumed for messages without a conventional header
pub const DEFAULT_COMMIT_TYPE: &str = "other";

/// Version bump category decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpCategory {
    Major,
    Minor,
    Patch,
    None,
}

impl BumpCategory {
    /// The bump to apply, if any
    pub fn as_bump(&self) -> Option<Bump> {
        match self {
            BumpCategory::Major => Some(Bump::Major),
            BumpCategory::Minor => Some(Bump::Minor),
            BumpCategory::Patch => Some(Bump::Patch),
            BumpCategory::None => None,
        }
    }
}

impl fmt::Display for BumpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpCategory::Major => write!(f, "major"),
            BumpCategory::Minor => write!(f, "minor"),
            BumpCategory::Patch => write!(f, "patch"),
            BumpCategory::None => write!(f, "none"),
        }
    }
}

/// Fold commits into a single bump category
///
/// A breaking change anywhere wins immediately. Otherwise any `feat` means
/// minor, and any commit whose type (or "other") is a changelog section,
/// or any commit at all with `bump_all_changes`, means patch.
pub fn recommend(
    commits: &[Commit],
    changelog_sections: &BTreeSet<String>,
    bump_all_changes: bool,
) -> BumpCategory {
    let mut has_features = false;
    let mut has_releasable = false;

    for commit in commits {
        let message = &commit.message;

        // Breaking changes have the highest priority
        if message.is_breaking() {
            debug!(hash = %commit.hash, "breaking change found");
            return BumpCategory::Major;
        }

        let commit_type = message.r#type.as_deref().unwrap_or(DEFAULT_COMMIT_TYPE);
        if commit_type == "feat" {
            has_features = true;
        }
        if bump_all_changes || changelog_sections.contains(commit_type) {
            has_releasable = true;
        }
    }

    let category = if has_features {
        BumpCategory::Minor
    } else if has_releasable {
        BumpCategory::Patch
    } else {
        BumpCategory::None
    };
    debug!(commits = commits.len(), %category, "recommended bump");
    category
}

/// Outcome of a full scan over a commit range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub category: BumpCategory,
    pub breaking: usize,
    pub features: usize,
    pub releasable: usize,
}

impl Recommendation {
    /// Human readable justification for the category
    pub fn reason(&self) -> String {
        format!(
            "There {} {} BREAKING CHANGE{} and {} feature{}",
            if self.breaking == 1 { "is" } else { "are" },
            self.breaking,
            if self.breaking == 1 { "" } else { "S" },
            self.features,
            if self.features == 1 { "" } else { "s" },
        )
    }
}

/// Analyzes commits to determine version bump type
pub struct VersionAnalyzer {
    config: ReleaseConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(config: ReleaseConfig) -> Self {
        VersionAnalyzer { config }
    }

    /// Analyze parsed commits and determine the bump category
    pub fn analyze(&self, commits: &[Commit]) -> BumpCategory {
        recommend(
            commits,
            &self.config.changelog_sections,
            self.config.bump_all_changes,
        )
    }

    /// Analyze raw commit messages and determine the bump category
    pub fn analyze_messages(&self, messages: &[String]) -> BumpCategory {
        let commits: Vec<Commit> = messages
            .iter()
            .map(|message| Commit::new("", message))
            .collect();
        self.analyze(&commits)
    }

    /// Count breaking changes, features and releasable commits
    pub fn recommendation(&self, commits: &[Commit]) -> Recommendation {
        let mut breaking = 0;
        let mut features = 0;
        let mut releasable = 0;

        for commit in commits {
            let message = &commit.message;
            let commit_type = message.r#type.as_deref().unwrap_or(DEFAULT_COMMIT_TYPE);
            if message.is_breaking() {
                breaking += 1;
            }
            if commit_type == "feat" {
                features += 1;
            }
            if self.config.bump_all_changes || self.config.changelog_sections.contains(commit_type)
            {
                releasable += 1;
            }
        }

        Recommendation {
            category: self.analyze(commits),
            breaking,
            features,
            releasable,
        }
    }

    /// Recommend a bump for `commits` and apply it to `previous`
    ///
    /// # Returns
    /// * `Ok(Some(version))` - the next version
    /// * `Ok(None)` - nothing in `commits` warrants a release
    /// * `Err` - `previous` is not a valid version or the bump is illegal
    pub fn next_version(&self, previous: &str, commits: &[Commit]) -> Result<Option<String>> {
        match self.analyze(commits).as_bump() {
            Some(bump) => version::apply(previous, bump, &self.config.prerelease).map(Some),
            None => Ok(None),
        }
    }
}
