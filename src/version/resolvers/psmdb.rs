//! Percona Server for MongoDB primary version resolver

use crate::version::resolver::{Granularity, PrimaryVersionResolver, StopRule};

/// Server for MongoDB resolver, with the same line semantics as XtraDB Cluster
pub struct PsmdbResolver;

impl PrimaryVersionResolver for PsmdbResolver {
    fn granularity(&self) -> Granularity {
        Granularity::MajorMinor
    }

    fn stop_rule(&self) -> StopRule {
        StopRule::AtOrBelowInLine
    }
}
