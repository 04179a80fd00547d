pub mod analyzer;
pub mod config;
pub mod domain;
pub mod error;

pub use analyzer::{recommend, BumpCategory, VersionAnalyzer};
pub use config::{load_config, Config};
pub use domain::version::apply;
pub use domain::{Bump, Commit, CommitMessage, ParseOptions, PrereleaseDirective};
pub use error::{ReleaseError, Result};
