use semver::Version;

use crate::error::{BuoyError, Result};

const RELEASE_BRANCH_PREFIX: &str = "release-";

/// Parse a loosely written release such as `v0.15`, `0.15` or `V1.2.3`.
///
/// A leading `v`/`V` is dropped and missing minor/patch components are
/// filled with zero before handing the string to `semver`.
pub fn parse_tolerant(release: &str) -> Result<Version> {
    let trimmed = release.trim();
    let clean = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    // Split off pre-release/build before counting numeric components
    let split_at = clean.find(['-', '+']).unwrap_or(clean.len());
    let (core, rest) = clean.split_at(split_at);
    let padded = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, rest),
        2 => format!("{}.0{}", core, rest),
        _ => clean.to_string(),
    };

    Version::parse(&padded)
        .map_err(|e| BuoyError::version(format!("Invalid release '{}': {}", release, e)))
}

/// `v{major}.{minor}.{patch}`
pub fn release_version(v: &Version) -> String {
    format!("v{}.{}.{}", v.major, v.minor, v.patch)
}

/// `release-{major}.{minor}`
pub fn release_branch_version(v: &Version) -> String {
    format!("{}{}.{}", RELEASE_BRANCH_PREFIX, v.major, v.minor)
}

/// Interpret a tag as a release version.
///
/// Only `v`-prefixed tags that are plain `MAJOR.MINOR.PATCH` qualify; tags
/// with pre-release or build metadata cannot be addressed by a floating
/// release and are rejected.
pub fn tag_release(tag: &str) -> Option<Version> {
    let v = Version::parse(tag.strip_prefix('v')?).ok()?;
    if !v.pre.is_empty() || !v.build.is_empty() {
        return None;
    }
    Some(v)
}

/// Interpret a `release-MAJOR.MINOR` branch as version `MAJOR.MINOR.0`.
pub fn branch_release(branch: &str) -> Option<Version> {
    let rest = branch.strip_prefix(RELEASE_BRANCH_PREFIX)?;
    Version::parse(&format!("{}.0", rest)).ok()
}

/// Whether two versions are on the same `major.minor` release line.
pub fn same_release_line(a: &Version, b: &Version) -> bool {
    a.major == b.major && a.minor == b.minor
}
