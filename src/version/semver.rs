//! Version comparator shared by every resolver
//!
//! Catalog keys look like `8.0.19-10.1`, `4.2.8-8` or, for the pg family,
//! plain `16.4`. They are parsed with the `semver` crate after normalizing
//! partial versions, and ordered by precedence: numeric MAJOR.MINOR.PATCH,
//! prerelease below release, build metadata ignored.

use std::cmp::Ordering;
use std::fmt;

use semver::Version;

use crate::version::error::InvalidVersion;

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles a leading `v` and partial versions like "1" or "1.2-rc1" by padding
/// the numeric core with zeros before any prerelease or build suffix.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "v1.2" -> Version(1, 2, 0)
/// - "16.4-1" -> Version(16, 4, 0, pre: "1")
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);

    let suffix_at = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(suffix_at);

    let normalized = match core.split('.').count() {
        1 => format!("{core}.0.0{suffix}"),
        2 => format!("{core}.0{suffix}"),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// A catalog key together with its parsed form.
///
/// The original string is the identity used for map lookups and pruning;
/// the parsed value is only used for ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    pub original: String,
    pub version: Version,
}

impl ParsedVersion {
    pub fn parse(version: &str) -> Result<Self, InvalidVersion> {
        let parsed = parse_version(version).ok_or_else(|| InvalidVersion(version.to_string()))?;
        Ok(Self {
            original: version.to_string(),
            version: parsed,
        })
    }

    /// Normalized rendering, e.g. `14` and `14.0` both render as `14.0.0`
    pub fn canonical(&self) -> String {
        self.version.to_string()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Compare two parsed versions by precedence, ignoring build metadata
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Compare two version strings by precedence
pub fn compare(a: &str, b: &str) -> Result<Ordering, InvalidVersion> {
    let a = ParsedVersion::parse(a)?;
    let b = ParsedVersion::parse(b)?;
    Ok(cmp_precedence(&a.version, &b.version))
}

pub fn major(version: &str) -> Result<u64, InvalidVersion> {
    ParsedVersion::parse(version).map(|v| v.version.major)
}

pub fn minor(version: &str) -> Result<u64, InvalidVersion> {
    ParsedVersion::parse(version).map(|v| v.version.minor)
}

pub fn patch(version: &str) -> Result<u64, InvalidVersion> {
    ParsedVersion::parse(version).map(|v| v.version.patch)
}

/// Parse and sort versions from highest to lowest.
///
/// Versions with equal precedence (differing only in build metadata) are
/// ordered by their original string so the result is deterministic.
/// Fails on the first unparsable version.
pub fn sort_descending<I, S>(versions: I) -> Result<Vec<ParsedVersion>, InvalidVersion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = versions
        .into_iter()
        .map(|v| ParsedVersion::parse(v.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    parsed.sort_by(|a, b| {
        cmp_precedence(&b.version, &a.version).then_with(|| a.original.cmp(&b.original))
    });

    Ok(parsed)
}
