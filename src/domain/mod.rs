//! Domain logic - pure parsing and versioning rules with no I/O

pub mod commit;
pub mod options;
pub mod prerelease;
pub mod reference;
pub mod version;

pub use commit::{Commit, CommitMessage, FooterEntry, Revert};
pub use options::ParseOptions;
pub use prerelease::{PreRelease, PrereleaseDirective};
pub use reference::{Reference, ReferenceScanner};
pub use version::{Bump, ReleaseType};
