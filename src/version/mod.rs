//! Version resolution layer
//!
//! Turns an apply policy and a catalog version map into exactly one version.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Policy    │────▶│  Resolver   │────▶│   Prune     │
//! │  (parse)    │     │ (walk/pick) │     │ (one entry) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │  Resolvers  │
//!                     │(pxc,ps,pg..)│
//!                     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: version parsing, precedence and sorting
//! - [`policy`]: apply policy parsing
//! - [`resolver`]: shared primary version algorithm
//! - [`resolvers`]: per-family line granularity and stop rules
//! - [`prune`]: reduction of a version map to a single entry
//! - [`error`]: error types for resolution and catalog loading

pub mod error;
pub mod policy;
pub mod prune;
pub mod resolver;
pub mod resolvers;
pub mod semver;
