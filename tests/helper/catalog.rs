//! Catalog fixtures written to a temporary source directory

use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

use version_service::catalog::SharedCatalog;
use version_service::catalog::types::{Component, VersionResponse};
use version_service::service::{ApplyRequest, VersionService};

/// Temporary catalog source directory
pub struct CatalogDir {
    dir: TempDir,
}

impl CatalogDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_release(&self, product: &str, operator: &str, matrix: Value) {
        let content = json!({
            "versions": [{
                "product": product,
                "operator": operator,
                "matrix": matrix
            }]
        });
        self.write(&format!("operator.{operator}.{product}.json"), &content);
    }

    pub fn write_dependencies(&self, product: &str, operator: &str, rules: Value) {
        self.write(&format!("operator.{operator}.{product}.dep.json"), &rules);
    }

    pub fn write(&self, name: &str, content: &Value) {
        std::fs::write(self.path().join(name), content.to_string()).unwrap();
    }

    pub fn service(&self) -> VersionService<SharedCatalog> {
        VersionService::new(SharedCatalog::load(self.path()).unwrap())
    }
}

pub fn image(repository: &str, version: &str, status: &str) -> Value {
    json!({
        "imagePath": format!("percona/{repository}:{version}"),
        "imageHash": format!("sha256:{repository}-{version}"),
        "status": status
    })
}

/// XtraDB Cluster operator 1.5.0
pub fn write_pxc_release(catalog: &CatalogDir) {
    catalog.write_release(
        "pxc-operator",
        "1.5.0",
        json!({
            "pxc": {
                "8.0.19-10.1": image("percona-xtradb-cluster", "8.0.19-10.1", "recommended"),
                "8.0.18-9.3": image("percona-xtradb-cluster", "8.0.18-9.3", "available"),
                "5.7.30-31.43": image("percona-xtradb-cluster", "5.7.30-31.43", "recommended"),
                "5.7.29-31.43": image("percona-xtradb-cluster", "5.7.29-31.43", "available"),
                "5.7.28-31.41.2": image("percona-xtradb-cluster", "5.7.28-31.41.2", "available")
            },
            "backup": {
                "8.0.14": image("percona-xtrabackup", "8.0.14", "recommended"),
                "2.4.20": image("percona-xtrabackup", "2.4.20", "recommended")
            },
            "pmm": {
                "2.9.0": image("pmm-client", "2.9.0", "recommended"),
                "2.8.0": image("pmm-client", "2.8.0", "available")
            },
            "proxysql": {
                "2.0.12": image("proxysql", "2.0.12", "recommended")
            },
            "haproxy": {
                "2.1.7": image("haproxy", "2.1.7", "recommended")
            },
            "logCollector": {
                "1.5.0": image("fluentbit", "1.5.0", "recommended")
            },
            "operator": {
                "1.5.0": image("percona-xtradb-cluster-operator", "1.5.0", "recommended")
            }
        }),
    );
    catalog.write_dependencies(
        "pxc-operator",
        "1.5.0",
        json!({
            "backup": {
                "8.0.14": {">=": [{"var": "productVersion"}, "8.0"]},
                "2.4.20": {"<": [{"var": "productVersion"}, "8.0"]}
            },
            "pmm": {
                "2.9.0": true,
                "2.8.0": true
            },
            "proxy_sql": {
                "2.0.12": {">=": [{"var": "productVersion"}, "5.7"]}
            },
            "haproxy": {
                "2.1.7": "productVersion >= 8.0 || productVersion < 8.0"
            }
        }),
    );
}

/// PostgreSQL operator 2.4.1
pub fn write_pg_release(catalog: &CatalogDir) {
    catalog.write_release(
        "pg-operator",
        "2.4.1",
        json!({
            "postgresql": {
                "16.4": image("percona-postgresql", "16.4", "recommended"),
                "16.2": image("percona-postgresql", "16.2", "available"),
                "15.8": image("percona-postgresql", "15.8", "recommended"),
                "15.7": image("percona-postgresql", "15.7", "available"),
                "14.13": image("percona-postgresql", "14.13", "available")
            },
            "pgbackrest": {
                "2.53": image("pgbackrest", "2.53", "recommended"),
                "2.51": image("pgbackrest", "2.51", "available")
            },
            "pgbackrestRepo": {
                "2.53": image("pgbackrest-repo", "2.53", "recommended")
            },
            "pgbouncer": {
                "1.23.1": image("pgbouncer", "1.23.1", "recommended"),
                "1.22.1": image("pgbouncer", "1.22.1", "available")
            },
            "postgis": {
                "3.4": image("postgis", "3.4", "recommended"),
                "3.3": image("postgis", "3.3", "available")
            }
        }),
    );
    catalog.write_dependencies(
        "pg-operator",
        "2.4.1",
        json!({
            "pgbackrest": {
                "2.53": {">=": [{"var": "productVersion"}, "15"]},
                "2.51": {"<": [{"var": "productVersion"}, "15"]}
            },
            "pgbackrest_repo": {
                "2.53": true
            },
            "postgis": {
                "3.4.0": "productVersion >= 16",
                "3.3.0": "productVersion < 16"
            }
        }),
    );
}

/// PMM server release, published under the pmm source family
pub fn write_pmm_server_release(catalog: &CatalogDir, release: &str) {
    catalog.write(
        &format!("pmm.{release}.pmm-server.json"),
        &json!({
            "versions": [{
                "product": "pmm-server",
                "operator": release,
                "matrix": {
                    "pmm": {
                        release: image("pmm-server", release, "recommended")
                    }
                }
            }]
        }),
    );
}

pub fn request(
    product: &str,
    operator: &str,
    policy: &str,
    current_version: Option<&str>,
) -> ApplyRequest {
    ApplyRequest {
        product: product.to_string(),
        operator_version: operator.to_string(),
        policy: policy.to_string(),
        current_version: current_version.map(str::to_string),
    }
}

/// The single version left for `component`, asserting at most one remains
pub fn selected(response: &VersionResponse, component: Component) -> Option<String> {
    let versions = response.versions[0].matrix.get(&component)?;
    assert!(
        versions.len() <= 1,
        "{} kept {} versions",
        component.as_str(),
        versions.len()
    );
    versions.keys().next().cloned()
}
