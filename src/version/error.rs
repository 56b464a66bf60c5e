use std::path::PathBuf;

use thiserror::Error;

use crate::rules::RuleError;

/// A version string that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version: {0}")]
pub struct InvalidVersion(pub String);

/// Errors surfaced by version resolution.
///
/// Every variant is a deterministic function of the request and the catalog
/// state, so none of them is retried inside the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// The operation exists but is not offered for this product
    #[error("unimplemented: {0}")]
    Unimplemented(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no release in {path:?}")]
    EmptyRelease { path: PathBuf },

    #[error("invalid version key '{version}' in {path:?}")]
    InvalidVersion { path: PathBuf, version: String },

    #[error("invalid rule for '{version}' in {path:?}: {source}")]
    InvalidRule {
        path: PathBuf,
        version: String,
        #[source]
        source: RuleError,
    },

    #[error("catalog lock poisoned")]
    LockPoisoned,
}
