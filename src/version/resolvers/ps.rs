//! Percona Server for MySQL primary version resolver

use crate::version::resolver::{Granularity, PrimaryVersionResolver};

/// Server for MySQL resolver
///
/// Release lines are `major.minor`, and the upgrade walk stops at the
/// first version not above the current one.
pub struct PsResolver;

impl PrimaryVersionResolver for PsResolver {
    fn granularity(&self) -> Granularity {
        Granularity::MajorMinor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::Status::Available;
    use crate::version::error::ResolveError;
    use crate::version::policy::Policy;
    use crate::version::resolver::StopRule;
    use crate::version::resolvers::test_support::catalog;

    #[test]
    fn latest_with_pin_picks_newest_of_line() {
        let mut versions = catalog(&[
            ("8.0.36-28", Available),
            ("8.0.35-27", Available),
            ("8.0.33-25", Available),
        ]);

        let resolved = PsResolver
            .resolve(&mut versions, &Policy::parse("latest", Some("8.0.33-25")).unwrap())
            .unwrap();

        assert_eq!(resolved, "8.0.36-28");
    }

    #[test]
    fn walk_stops_below_current_version_of_any_line() {
        assert!(StopRule::AtOrBelow.should_stop(
            &semver::Version::new(5, 6, 40),
            &semver::Version::new(5, 7, 20),
            Granularity::MajorMinor
        ));
    }

    #[test]
    fn pin_for_missing_line_is_not_found() {
        let mut versions = catalog(&[("8.0.36-28", Available), ("5.7.44-48", Available)]);

        assert!(matches!(
            PsResolver.resolve(&mut versions, &Policy::parse("latest", Some("5.6")).unwrap()),
            Err(ResolveError::NotFound(_))
        ));
    }
}
