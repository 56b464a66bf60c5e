//! Primary version resolver trait
//!
//! Narrows the primary component's version map (database engine) to a
//! single entry according to the apply policy.

use tracing::debug;

use crate::catalog::types::{Status, VersionMap};
use crate::version::error::ResolveError;
use crate::version::policy::{Policy, PolicyKind};
use crate::version::prune::prune_to;
use crate::version::semver::{ParsedVersion, cmp_precedence, sort_descending};

/// Depth at which two versions belong to the same release line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// `14.x` and `14.y` are the same line
    Major,
    /// `8.0.x` and `8.0.y` are the same line, `8.0` and `8.4` are not
    MajorMinor,
}

impl Granularity {
    pub fn same_line(self, a: &semver::Version, b: &semver::Version) -> bool {
        match self {
            Granularity::Major => a.major == b.major,
            Granularity::MajorMinor => a.major == b.major && a.minor == b.minor,
        }
    }
}

/// When the walk over candidates, from highest to lowest, stops looking
/// for an upgrade of the current version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// Stop at the current version or at anything below it
    AtOrBelow,
    /// Stop at the current version or at a lower version of the same line;
    /// lower versions of other lines are skipped over
    AtOrBelowInLine,
}

impl StopRule {
    pub fn should_stop(
        self,
        candidate: &semver::Version,
        current: &semver::Version,
        granularity: Granularity,
    ) -> bool {
        let ordering = cmp_precedence(candidate, current);
        match self {
            StopRule::AtOrBelow => ordering.is_le(),
            StopRule::AtOrBelowInLine => {
                ordering.is_eq() || (ordering.is_lt() && granularity.same_line(candidate, current))
            }
        }
    }
}

/// Trait for product-family-specific primary version resolution
///
/// Every family runs the same algorithm; they differ only in how release
/// lines are compared and when the upgrade walk stops:
/// - pxc / psmdb: major.minor lines, stop within the line
/// - ps: major.minor lines, stop at anything not above the current version
/// - pg: major lines, stop at anything not above the current version
pub trait PrimaryVersionResolver: Send + Sync {
    fn granularity(&self) -> Granularity;

    fn stop_rule(&self) -> StopRule {
        StopRule::AtOrBelow
    }

    /// Prune `versions` to the one entry selected by `policy` and return its key.
    ///
    /// - `latest` / `recommended` without a pin: the highest eligible version
    /// - `latest` with a pin: the nearest upgrade in the pin's line
    /// - `recommended` with a pin: the smallest upgrade in the pin's line
    /// - exact version: that version, whatever its status
    fn resolve(&self, versions: &mut VersionMap, policy: &Policy) -> Result<String, ResolveError> {
        if versions.is_empty() {
            return Err(ResolveError::Internal("no versions to filter".to_string()));
        }

        let desired = match (&policy.kind, &policy.pin) {
            (PolicyKind::Exact(version), _) => version.clone(),
            (PolicyKind::Latest | PolicyKind::Recommended, pin) => {
                let sorted = eligible_versions(versions, &policy.kind)?;
                match pin {
                    None => sorted
                        .first()
                        .map(|v| v.original.clone())
                        .ok_or_else(|| {
                            ResolveError::NotFound("no eligible version to apply".to_string())
                        })?,
                    Some(pin) => upgrade_target(
                        self.granularity(),
                        self.stop_rule(),
                        versions,
                        &sorted,
                        &policy.kind,
                        pin,
                    )?,
                }
            }
            (PolicyKind::Disabled, _) => {
                return Err(ResolveError::InvalidArgument(
                    "version resolution is disabled".to_string(),
                ));
            }
        };

        debug!("desired version {} for policy {:?}", desired, policy);

        prune_to(versions, &desired)?;
        match versions.keys().next() {
            Some(key) => Ok(key.clone()),
            None => Err(ResolveError::NotFound(format!(
                "version {desired} does not exist"
            ))),
        }
    }
}

/// Walk `sorted` from the highest version down, looking for an upgrade of
/// `pin` within its release line.
fn upgrade_target(
    granularity: Granularity,
    stop_rule: StopRule,
    versions: &VersionMap,
    sorted: &[ParsedVersion],
    kind: &PolicyKind,
    pin: &str,
) -> Result<String, ResolveError> {
    let current = ParsedVersion::parse(pin)
        .map_err(|_| ResolveError::InvalidArgument(format!("invalid current version: {pin}")))?;

    let in_line = |candidate: &ParsedVersion| {
        !is_disabled(versions, &candidate.original)
            && granularity.same_line(&candidate.version, &current.version)
    };

    let mut desired = None;
    for candidate in sorted {
        if stop_rule.should_stop(&candidate.version, &current.version, granularity) {
            break;
        }
        if in_line(candidate) {
            desired = Some(candidate.original.clone());
            if *kind == PolicyKind::Latest {
                break;
            }
        }
    }

    if let Some(desired) = desired {
        return Ok(desired);
    }

    // A client may run a prerelease build newer than every version of its
    // line the catalog knows, disabled ones included. Nothing is above it,
    // so hand back the newest enabled version of that line instead of
    // failing.
    if current.is_prerelease()
        && ahead_of_line(versions, &current, granularity)
        && let Some(newest) = sorted.iter().find(|v| in_line(*v))
    {
        debug!(
            "current version {} is ahead of the catalog, using {}",
            pin, newest
        );
        return Ok(newest.original.clone());
    }

    Ok(pin.to_string())
}

/// Whether `current` is above every key of its release line in `versions`.
///
/// Keys that do not parse were rejected when the catalog was loaded and are
/// not considered here.
fn ahead_of_line(
    versions: &VersionMap,
    current: &ParsedVersion,
    granularity: Granularity,
) -> bool {
    versions
        .keys()
        .filter_map(|key| ParsedVersion::parse(key).ok())
        .filter(|key| granularity.same_line(&key.version, &current.version))
        .all(|key| cmp_precedence(&key.version, &current.version).is_lt())
}

fn is_disabled(versions: &VersionMap, key: &str) -> bool {
    versions
        .get(key)
        .is_some_and(|entry| entry.status == Status::Disabled)
}

/// Candidate versions for `latest` / `recommended`, highest first.
///
/// `recommended` only considers versions flagged as recommended, falling
/// back to every enabled version when none is. Disabled versions are never
/// candidates.
fn eligible_versions(
    versions: &VersionMap,
    kind: &PolicyKind,
) -> Result<Vec<ParsedVersion>, ResolveError> {
    let mut keys: Vec<&String> = Vec::new();
    if *kind == PolicyKind::Recommended {
        keys.extend(
            versions
                .iter()
                .filter(|(_, entry)| entry.status == Status::Recommended)
                .map(|(key, _)| key),
        );
    }
    if keys.is_empty() {
        keys.extend(
            versions
                .iter()
                .filter(|(_, entry)| entry.status != Status::Disabled)
                .map(|(key, _)| key),
        );
    }

    sort_descending(keys)
        .map_err(|e| ResolveError::Internal(format!("failed to sort versions: {e}")))
}
