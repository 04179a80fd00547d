use crate::domain::prerelease::{PreRelease, PrereleaseDirective};
use crate::error::{ReleaseError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Requested version bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
    Patch,
    /// Leave 0.x for 1.0.0; only legal on a 0.x version
    V1,
}

impl FromStr for Bump {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(Bump::Major),
            "minor" => Ok(Bump::Minor),
            "patch" => Ok(Bump::Patch),
            "v1" => Ok(Bump::V1),
            other => Err(ReleaseError::invalid_bump(format!(
                "unknown bump keyword '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bump::Major => write!(f, "major"),
            Bump::Minor => write!(f, "minor"),
            Bump::Patch => write!(f, "patch"),
            Bump::V1 => write!(f, "v1"),
        }
    }
}

/// Increment applied to a version after pre-1.0 and prerelease rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
    PreMajor,
    PreMinor,
    PrePatch,
    Prerelease,
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseType::Major => "major",
            ReleaseType::Minor => "minor",
            ReleaseType::Patch => "patch",
            ReleaseType::PreMajor => "premajor",
            ReleaseType::PreMinor => "preminor",
            ReleaseType::PrePatch => "prepatch",
            ReleaseType::Prerelease => "prerelease",
        };
        write!(f, "{}", name)
    }
}

/// Parse a version string, tolerating a leading `v` or `V`
pub fn parse_version(s: &str) -> Result<Version> {
    let trimmed = s.trim();
    let clean = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    Version::parse(clean)
        .map_err(|e| ReleaseError::invalid_version(format!("'{}': {}", s, e)))
}

/// Decide which increment a bump becomes for `previous`
///
/// On 0.x, `major` lands on the minor digit, `minor` and `patch` on the
/// patch digit, and only `v1` reaches 1.0.0. When a prerelease is wanted,
/// a version already sitting on the target boundary just advances its
/// prerelease counter (`2.0.0-0` + major -> `2.0.0-1`).
pub fn resolve_release_type(
    previous: &Version,
    bump: Bump,
    prerelease: &PrereleaseDirective,
) -> Result<ReleaseType> {
    let base = match (previous.major, bump) {
        (0, Bump::V1) => ReleaseType::Major,
        (0, Bump::Major) => ReleaseType::Minor,
        (0, Bump::Minor | Bump::Patch) => ReleaseType::Patch,
        (_, Bump::V1) => {
            return Err(ReleaseError::invalid_bump(format!(
                "'v1' only applies to 0.x versions, got {}",
                previous
            )))
        }
        (_, Bump::Major) => ReleaseType::Major,
        (_, Bump::Minor) => ReleaseType::Minor,
        (_, Bump::Patch) => ReleaseType::Patch,
    };

    let is_prerelease = !previous.pre.is_empty();
    if !prerelease.wants_prerelease(is_prerelease) {
        return Ok(base);
    }

    let release_type = match base {
        ReleaseType::Major if is_prerelease && previous.minor == 0 && previous.patch == 0 => {
            ReleaseType::Prerelease
        }
        ReleaseType::Major => ReleaseType::PreMajor,
        ReleaseType::Minor if is_prerelease && previous.patch == 0 => ReleaseType::Prerelease,
        ReleaseType::Minor => ReleaseType::PreMinor,
        ReleaseType::Patch if is_prerelease => ReleaseType::Prerelease,
        ReleaseType::Patch => ReleaseType::PrePatch,
        other => other,
    };
    Ok(release_type)
}

/// Increment `version` by `release_type` using standard semver rules
///
/// - **Major**: promotes `X.0.0-pre` to `X.0.0`, otherwise major += 1
/// - **Minor**: promotes `X.Y.0-pre` to `X.Y.0`, otherwise minor += 1
/// - **Patch**: promotes `X.Y.Z-pre` to `X.Y.Z`, otherwise patch += 1
/// - **Pre\***: the matching plain bump, then a fresh prerelease counter
/// - **Prerelease**: advances the counter (patch += 1 first on a release)
///
/// Build metadata is always dropped.
pub fn increment(
    version: &Version,
    release_type: ReleaseType,
    identifier: Option<&str>,
) -> Result<Version> {
    let mut major = version.major;
    let mut minor = version.minor;
    let mut patch = version.patch;
    let mut pre = PreRelease::parse(version.pre.as_str());

    match release_type {
        ReleaseType::Major => {
            if minor != 0 || patch != 0 || pre.is_empty() {
                major = bump_component(major)?;
            }
            minor = 0;
            patch = 0;
            pre = PreRelease::default();
        }
        ReleaseType::Minor => {
            if patch != 0 || pre.is_empty() {
                minor = bump_component(minor)?;
            }
            patch = 0;
            pre = PreRelease::default();
        }
        ReleaseType::Patch => {
            if pre.is_empty() {
                patch = bump_component(patch)?;
            }
            pre = PreRelease::default();
        }
        ReleaseType::PreMajor => {
            major = bump_component(major)?;
            minor = 0;
            patch = 0;
            pre = PreRelease::default().increment(identifier)?;
        }
        ReleaseType::PreMinor => {
            minor = bump_component(minor)?;
            patch = 0;
            pre = PreRelease::default().increment(identifier)?;
        }
        ReleaseType::PrePatch => {
            patch = bump_component(patch)?;
            pre = PreRelease::default().increment(identifier)?;
        }
        ReleaseType::Prerelease => {
            if pre.is_empty() {
                patch = bump_component(patch)?;
            }
            pre = pre.increment(identifier)?;
        }
    }

    let pre = if pre.is_empty() {
        Prerelease::EMPTY
    } else {
        Prerelease::new(&pre.to_string())
            .map_err(|e| ReleaseError::invalid_bump(format!("prerelease '{}': {}", pre, e)))?
    };

    Ok(Version {
        major,
        minor,
        patch,
        pre,
        build: BuildMetadata::EMPTY,
    })
}

fn bump_component(n: u64) -> Result<u64> {
    n.checked_add(1)
        .ok_or_else(|| ReleaseError::invalid_bump("version component overflow"))
}

/// Compute the next version string from `previous`
///
/// # Arguments
/// * `previous` - current version, e.g. "1.2.3" or "v0.4.0-beta.2"
/// * `bump` - requested bump
/// * `prerelease` - prerelease policy for the result
///
/// # Returns
/// * `Ok(String)` - the next version, without a `v` prefix
/// * `Err(InvalidVersion)` - `previous` is not a semantic version
/// * `Err(InvalidBump)` - the bump cannot be applied to `previous`
///
/// # Example
/// ```ignore
/// assert_eq!(apply("1.2.3", Bump::Patch, &PrereleaseDirective::Preserve)?, "1.2.4");
/// assert_eq!(apply("0.2.3", Bump::V1, &PrereleaseDirective::Preserve)?, "1.0.0");
/// ```
#[instrument(level = "debug", skip(prerelease))]
pub fn apply(previous: &str, bump: Bump, prerelease: &PrereleaseDirective) -> Result<String> {
    let version = parse_version(previous)?;
    let release_type = resolve_release_type(&version, bump, prerelease)?;

    // Pre* types start a fresh suffix, so they keep the previous name;
    // `Prerelease` already continues it.
    let inherited = match release_type {
        ReleaseType::PreMajor | ReleaseType::PreMinor | ReleaseType::PrePatch => {
            PreRelease::parse(version.pre.as_str()).name().map(str::to_string)
        }
        _ => None,
    };
    let identifier = prerelease.identifier().or(inherited.as_deref());

    let next = increment(&version, release_type, identifier)?;
    debug!(%version, %next, %release_type, "computed next version");
    Ok(next.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next(previous: &str, bump: Bump, prerelease: PrereleaseDirective) -> Result<String> {
        apply(previous, bump, &prerelease)
    }

    #[test]
    fn test_bump_from_str() {
        assert_eq!("major".parse::<Bump>().unwrap(), Bump::Major);
        assert_eq!("v1".parse::<Bump>().unwrap(), Bump::V1);
        assert!(matches!(
            "foo".parse::<Bump>(),
            Err(ReleaseError::InvalidBump(_))
        ));
    }

    #[test]
    fn test_bump_display_round_trips_keywords() {
        for keyword in ["major", "minor", "patch", "v1"] {
            assert_eq!(keyword.parse::<Bump>().unwrap().to_string(), keyword);
        }
    }

    #[test]
    fn test_parse_version_prefix() {
        assert_eq!(parse_version("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(parse_version("V1.2.3").unwrap(), Version::new(1, 2, 3));
        assert!(matches!(
            parse_version("1.2"),
            Err(ReleaseError::InvalidVersion(_))
        ));
        assert!(matches!(
            parse_version("vv1.2.3"),
            Err(ReleaseError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_empty_identifier_is_rejected() {
        let err = next("1.2.3", Bump::Major, PrereleaseDirective::Identifier(String::new()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid bump: prerelease identifier must not be empty"
        );
    }

    #[test]
    fn test_version_bump_patch() {
        assert_eq!(
            next("1.2.3", Bump::Patch, PrereleaseDirective::Preserve).unwrap(),
            "1.2.4"
        );
    }

    #[test]
    fn test_version_bump_minor() {
        assert_eq!(
            next("1.2.3", Bump::Minor, PrereleaseDirective::Preserve).unwrap(),
            "1.3.0"
        );
    }

    #[test]
    fn test_version_bump_major() {
        assert_eq!(
            next("1.2.3", Bump::Major, PrereleaseDirective::Preserve).unwrap(),
            "2.0.0"
        );
    }

    #[test]
    fn test_major_with_identifier() {
        assert_eq!(
            next("1.2.3", Bump::Major, PrereleaseDirective::Identifier("foo".into())).unwrap(),
            "2.0.0-foo.0"
        );
    }

    #[test]
    fn test_minor_continues_prerelease() {
        assert_eq!(
            next("1.2.3-4", Bump::Minor, PrereleaseDirective::Preserve).unwrap(),
            "1.3.0-0"
        );
        assert_eq!(
            next("1.2.0-4", Bump::Minor, PrereleaseDirective::Preserve).unwrap(),
            "1.2.0-5"
        );
    }

    #[test]
    fn test_pre_one_zero() {
        assert_eq!(
            next("0.2.3", Bump::Major, PrereleaseDirective::Preserve).unwrap(),
            "0.3.0"
        );
        assert_eq!(
            next("0.2.3", Bump::Minor, PrereleaseDirective::Preserve).unwrap(),
            "0.2.4"
        );
        assert_eq!(
            next("0.2.3", Bump::V1, PrereleaseDirective::Preserve).unwrap(),
            "1.0.0"
        );
    }

    #[test]
    fn test_v1_on_stable_fails() {
        assert!(matches!(
            next("1.2.3", Bump::V1, PrereleaseDirective::Preserve),
            Err(ReleaseError::InvalidBump(_))
        ));
    }

    #[test]
    fn test_invalid_previous_version() {
        assert!(matches!(
            next("1.2", Bump::Patch, PrereleaseDirective::Preserve),
            Err(ReleaseError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_promote_out_of_prerelease() {
        assert_eq!(
            next("1.2.0-4", Bump::Minor, PrereleaseDirective::Promote).unwrap(),
            "1.2.0"
        );
        assert_eq!(
            next("2.0.0-rc.1", Bump::Major, PrereleaseDirective::Promote).unwrap(),
            "2.0.0"
        );
        assert_eq!(
            next("1.2.3-4", Bump::Minor, PrereleaseDirective::Promote).unwrap(),
            "1.3.0"
        );
    }

    #[test]
    fn test_force_prerelease_from_release() {
        assert_eq!(
            next("1.2.3", Bump::Patch, PrereleaseDirective::Force).unwrap(),
            "1.2.4-0"
        );
        assert_eq!(
            next("1.2.3", Bump::Minor, PrereleaseDirective::Force).unwrap(),
            "1.3.0-0"
        );
    }

    #[test]
    fn test_major_on_major_boundary_prerelease() {
        assert_eq!(
            next("2.0.0-0", Bump::Major, PrereleaseDirective::Preserve).unwrap(),
            "2.0.0-1"
        );
        assert_eq!(
            next("2.1.0-0", Bump::Major, PrereleaseDirective::Preserve).unwrap(),
            "3.0.0-0"
        );
    }

    #[test]
    fn test_named_prerelease_keeps_its_name() {
        assert_eq!(
            next("1.2.3-beta.1", Bump::Patch, PrereleaseDirective::Preserve).unwrap(),
            "1.2.3-beta.2"
        );
        assert_eq!(
            next("1.2.3-beta.1", Bump::Minor, PrereleaseDirective::Preserve).unwrap(),
            "1.3.0-beta.0"
        );
    }

    #[test]
    fn test_identifier_switch() {
        assert_eq!(
            next("2.0.0-alpha.3", Bump::Major, PrereleaseDirective::Identifier("beta".into()))
                .unwrap(),
            "2.0.0-beta.0"
        );
    }

    #[test]
    fn test_build_metadata_dropped() {
        assert_eq!(
            next("1.2.3+build.7", Bump::Patch, PrereleaseDirective::Preserve).unwrap(),
            "1.2.4"
        );
    }

    #[test]
    fn test_resolve_release_type_table() {
        let v = |s: &str| parse_version(s).unwrap();
        let preserve = PrereleaseDirective::Preserve;
        assert_eq!(
            resolve_release_type(&v("1.2.3"), Bump::Major, &preserve).unwrap(),
            ReleaseType::Major
        );
        assert_eq!(
            resolve_release_type(&v("1.2.3-1"), Bump::Patch, &preserve).unwrap(),
            ReleaseType::Prerelease
        );
        assert_eq!(
            resolve_release_type(&v("0.5.0"), Bump::V1, &PrereleaseDirective::Force).unwrap(),
            ReleaseType::PreMajor
        );
        assert_eq!(
            resolve_release_type(&v("0.5.0"), Bump::Minor, &preserve).unwrap(),
            ReleaseType::Patch
        );
    }

    #[test]
    fn test_increment_overflow() {
        let version = Version::new(u64::MAX, 0, 0);
        assert!(matches!(
            increment(&version, ReleaseType::Major, None),
            Err(ReleaseError::InvalidBump(_))
        ));
    }
}
