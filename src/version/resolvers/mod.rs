//! Product-family-specific primary version resolvers

mod pg;
mod ps;
mod psmdb;
mod pxc;

pub use pg::PgResolver;
pub use ps::PsResolver;
pub use psmdb::PsmdbResolver;
pub use pxc::PxcResolver;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::catalog::types::{Status, VersionEntry, VersionMap};

    pub fn catalog(entries: &[(&str, Status)]) -> VersionMap {
        entries
            .iter()
            .map(|(version, status)| {
                (
                    version.to_string(),
                    VersionEntry {
                        status: *status,
                        image_reference: format!("percona/image:{version}"),
                        ..VersionEntry::default()
                    },
                )
            })
            .collect()
    }

    pub fn keys(versions: &VersionMap) -> Vec<&str> {
        versions.keys().map(String::as_str).collect()
    }
}
