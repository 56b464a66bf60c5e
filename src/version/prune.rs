//! Collapsing a version map down to one entry

use tracing::debug;

use crate::catalog::types::VersionMap;
use crate::version::error::ResolveError;
use crate::version::semver::{ParsedVersion, sort_descending};

/// Remove every entry of `versions` except the one identified by `target`.
///
/// Keys are first compared on MAJOR.MINOR.PATCH only, so `8.0.19` keeps
/// `8.0.19-10.1` when that is the only build at that patch. When several
/// builds share the patch, only the key spelled exactly like `target`
/// survives.
///
/// The map may end up empty; callers decide whether that is an error.
pub fn prune_to(versions: &mut VersionMap, target: &str) -> Result<(), ResolveError> {
    let wanted = ParsedVersion::parse(target)
        .map_err(|_| ResolveError::Internal(format!("failed to parse version: {target}")))?;

    let mut kept = Vec::with_capacity(1);
    for key in versions.keys() {
        let parsed = ParsedVersion::parse(key)
            .map_err(|_| ResolveError::Internal(format!("failed to parse version: {key}")))?;
        let same_patch = parsed.version.major == wanted.version.major
            && parsed.version.minor == wanted.version.minor
            && parsed.version.patch == wanted.version.patch;
        if same_patch {
            kept.push(key.clone());
        }
    }

    versions.retain(|key, _| kept.contains(key));

    if versions.len() > 1 {
        debug!(
            "{} builds share the patch of {}, keeping the exact key",
            versions.len(),
            target
        );
        versions.retain(|key, _| key == target);
    }

    Ok(())
}

/// Resolve a component that follows the primary one.
///
/// - An empty map means the component does not apply and stays empty.
/// - Without a desired version the map's highest key is chosen.
/// - If pruning empties the map, that is `NotFound` only for a required
///   component.
pub fn resolve_dependent(
    versions: &mut VersionMap,
    desired: Option<&str>,
    required: bool,
    component: &str,
) -> Result<(), ResolveError> {
    if versions.is_empty() {
        return Ok(());
    }

    let desired = match desired {
        Some(desired) => desired.to_string(),
        None => sort_descending(versions.keys())
            .map_err(|e| ResolveError::Internal(format!("failed to sort versions: {e}")))?
            .swap_remove(0)
            .original,
    };

    prune_to(versions, &desired)?;

    if versions.is_empty() && required {
        return Err(ResolveError::NotFound(format!(
            "{component} version {desired} does not exist"
        )));
    }

    Ok(())
}
