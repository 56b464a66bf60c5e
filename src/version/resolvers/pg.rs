//! PostgreSQL primary version resolver

use crate::version::resolver::{Granularity, PrimaryVersionResolver};

/// PostgreSQL resolver; each major version is its own release line
pub struct PgResolver;

impl PrimaryVersionResolver for PgResolver {
    fn granularity(&self) -> Granularity {
        Granularity::Major
    }
}
