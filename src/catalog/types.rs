//! Catalog data model
//!
//! These shapes match the JSON source files the service has always read, so
//! a catalog file and a response share one representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rules::RuleTable;

/// Lifecycle status of a catalog version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Available,
    Recommended,
    Disabled,
}

/// One deployable version of a component
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionEntry {
    pub status: Status,
    /// Image reference, e.g. `percona/percona-xtradb-cluster:8.0.19-10.1`
    #[serde(rename = "imagePath", skip_serializing_if = "String::is_empty")]
    pub image_reference: String,
    /// Digest of the image for the primary architecture (amd64)
    #[serde(rename = "imageHash", skip_serializing_if = "String::is_empty")]
    pub image_digest: String,
    #[serde(rename = "imageHashArm64", skip_serializing_if = "String::is_empty")]
    pub image_digest_arm64: String,
}

impl VersionEntry {
    pub fn with_status(status: Status) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Version string -> entry, for one component
pub type VersionMap = BTreeMap<String, VersionEntry>;

/// Kind of component in a version matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Component {
    Pxc,
    Mongod,
    Mysql,
    Postgresql,
    Backup,
    Pmm,
    #[serde(alias = "proxy_sql")]
    Proxysql,
    Haproxy,
    Operator,
    #[serde(alias = "log_collector")]
    LogCollector,
    Pgbackrest,
    #[serde(alias = "pgbackrest_repo")]
    PgbackrestRepo,
    Pgbadger,
    Pgbouncer,
    Postgis,
    Orchestrator,
    Router,
    Toolkit,
}

impl Component {
    /// Returns the string representation used in catalog files
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Pxc => "pxc",
            Component::Mongod => "mongod",
            Component::Mysql => "mysql",
            Component::Postgresql => "postgresql",
            Component::Backup => "backup",
            Component::Pmm => "pmm",
            Component::Proxysql => "proxysql",
            Component::Haproxy => "haproxy",
            Component::Operator => "operator",
            Component::LogCollector => "logCollector",
            Component::Pgbackrest => "pgbackrest",
            Component::PgbackrestRepo => "pgbackrestRepo",
            Component::Pgbadger => "pgbadger",
            Component::Pgbouncer => "pgbouncer",
            Component::Postgis => "postgis",
            Component::Orchestrator => "orchestrator",
            Component::Router => "router",
            Component::Toolkit => "toolkit",
        }
    }
}

/// All version maps of one operator release
pub type VersionMatrix = BTreeMap<Component, VersionMap>;

/// Versions shipped with one release of an operator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorRelease {
    pub product: String,
    pub operator: String,
    pub matrix: VersionMatrix,
}

/// Body of a catalog release file and of every service response
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionResponse {
    pub versions: Vec<OperatorRelease>,
}

/// Rule tables of every dependent component of one release
pub type DependencyRules = BTreeMap<Component, RuleTable>;
