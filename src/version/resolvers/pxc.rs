//! Percona XtraDB Cluster primary version resolver

use crate::version::resolver::{Granularity, PrimaryVersionResolver, StopRule};

/// XtraDB Cluster resolver
///
/// Release lines are `major.minor`. Older lines are skipped while looking
/// for an upgrade, so a `5.7` pin still finds `5.7.x` below `8.0.x`.
pub struct PxcResolver;

impl PrimaryVersionResolver for PxcResolver {
    fn granularity(&self) -> Granularity {
        Granularity::MajorMinor
    }

    fn stop_rule(&self) -> StopRule {
        StopRule::AtOrBelowInLine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::Status::Available;
    use crate::version::policy::Policy;
    use crate::version::resolvers::test_support::catalog;

    #[test]
    fn pin_on_minor_line_does_not_jump_to_newer_minor() {
        let mut versions = catalog(&[("8.4.0", Available), ("8.0.36", Available)]);

        let resolved = PxcResolver
            .resolve(&mut versions, &Policy::parse("latest", Some("8.0")).unwrap())
            .unwrap();

        assert_eq!(resolved, "8.0.36");
    }

    #[test]
    fn walk_continues_past_lower_versions_of_other_lines() {
        let current = semver::Version::new(5, 7, 20);

        assert!(!StopRule::AtOrBelowInLine.should_stop(
            &semver::Version::new(5, 6, 40),
            &current,
            Granularity::MajorMinor
        ));
        assert!(StopRule::AtOrBelowInLine.should_stop(
            &semver::Version::new(5, 7, 19),
            &current,
            Granularity::MajorMinor
        ));
        assert!(StopRule::AtOrBelowInLine.should_stop(&current, &current, Granularity::MajorMinor));
    }
}
