//! Apply-policy parsing
//!
//! A raw policy is one of:
//! - `latest` / `recommended`
//! - `<pin>-latest` / `<pin>-recommended` (e.g. `8.0-latest`), where the pin
//!   replaces any separately supplied current version
//! - `disabled` / `never`, which turn version resolution off
//! - anything else, taken as an exact version

use crate::version::error::ResolveError;
use crate::version::semver::ParsedVersion;

const LATEST: &str = "latest";
const RECOMMENDED: &str = "recommended";
const DISABLED: &str = "disabled";
const NEVER: &str = "never";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    /// Resolve to exactly this version
    Exact(String),
    Latest,
    Recommended,
    /// Resolution is turned off; the response is empty
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub kind: PolicyKind,
    /// Version the client currently runs, bounding the upgrade
    pub pin: Option<String>,
}

impl Policy {
    /// Normalize a raw policy and optional current version.
    ///
    /// Keywords are matched case-insensitively; an exact version keeps its
    /// original spelling. An empty current version is treated as absent.
    pub fn parse(raw: &str, current_version: Option<&str>) -> Result<Self, ResolveError> {
        let raw = raw.trim();
        let lowered = raw.to_ascii_lowercase();
        let mut pin = current_version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let keyword = if lowered.ends_with(&format!("-{LATEST}"))
            || lowered.ends_with(&format!("-{RECOMMENDED}"))
        {
            let parts: Vec<&str> = lowered.split('-').collect();
            let [version, keyword] = parts.as_slice() else {
                return Err(ResolveError::InvalidArgument(format!(
                    "invalid apply option: {raw}"
                )));
            };
            if version.is_empty() {
                return Err(ResolveError::InvalidArgument(format!(
                    "invalid apply option: {raw}"
                )));
            }
            // the pin keeps the caller's spelling, only the keyword is lowered
            pin = Some(raw[..version.len()].to_string());
            keyword.to_string()
        } else {
            lowered
        };

        let kind = match keyword.as_str() {
            LATEST => PolicyKind::Latest,
            RECOMMENDED => PolicyKind::Recommended,
            DISABLED | NEVER => PolicyKind::Disabled,
            _ => {
                ParsedVersion::parse(raw).map_err(|_| {
                    ResolveError::InvalidArgument(format!("invalid apply option: {raw}"))
                })?;
                PolicyKind::Exact(raw.to_string())
            }
        };

        Ok(Self { kind, pin })
    }
}
