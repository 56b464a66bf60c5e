use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::types::{
    Component, DependencyRules, OperatorRelease, VersionMatrix, VersionResponse,
};
use crate::rules::{Rule, RuleTable};
use crate::version::error::CatalogError;
use crate::version::semver::parse_version;

/// File name prefix of operator product source files
const OPERATOR_PREFIX: &str = "operator.";
/// File name prefix of the pmm source family
const PMM_PREFIX: &str = "pmm.";
/// The only product served from the pmm source family
const PMM_SERVER: &str = "pmm-server";
const RELEASE_SUFFIX: &str = ".json";
const DEPENDENCY_SUFFIX: &str = ".dep";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseKey {
    pub product: String,
    pub operator: String,
}

impl ReleaseKey {
    pub fn new(product: &str, operator: &str) -> Self {
        Self {
            product: product.to_string(),
            operator: operator.to_string(),
        }
    }

    /// Name of the release source file, e.g. `operator.1.5.0.pxc-operator.json`
    pub fn release_file(&self) -> String {
        format!(
            "{}{}.{}{RELEASE_SUFFIX}",
            source_prefix(&self.product),
            self.operator,
            self.product
        )
    }

    /// Name of the dependency source file, e.g. `operator.1.5.0.pxc-operator.dep.json`
    pub fn dependency_file(&self) -> String {
        format!(
            "{}{}.{}{DEPENDENCY_SUFFIX}{RELEASE_SUFFIX}",
            source_prefix(&self.product),
            self.operator,
            self.product
        )
    }
}

/// Source family prefix of `product`: `pmm-server` is published as `pmm.*`,
/// everything else as `operator.*`
fn source_prefix(product: &str) -> &'static str {
    if product == PMM_SERVER {
        PMM_PREFIX
    } else {
        OPERATOR_PREFIX
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceKind {
    Release,
    Dependencies,
}

/// Classify a source file by name. Returns `None` for files that do not
/// follow the `<family>.<release>.<product>[.dep].json` layout, or whose
/// family is not the one `product` is published under.
fn classify(file_name: &str) -> Option<(SourceKind, ReleaseKey)> {
    let (prefix, rest) = [OPERATOR_PREFIX, PMM_PREFIX]
        .into_iter()
        .find_map(|prefix| file_name.strip_prefix(prefix).map(|rest| (prefix, rest)))?;
    let stem = rest.strip_suffix(RELEASE_SUFFIX)?;
    let (stem, kind) = match stem.strip_suffix(DEPENDENCY_SUFFIX) {
        Some(stem) => (stem, SourceKind::Dependencies),
        None => (stem, SourceKind::Release),
    };
    let (operator, product) = stem.rsplit_once('.')?;
    if operator.is_empty() || product.is_empty() || source_prefix(product) != prefix {
        return None;
    }
    Some((kind, ReleaseKey::new(product, operator)))
}

/// Immutable, validated catalog of operator releases and their dependency rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    releases: BTreeMap<ReleaseKey, OperatorRelease>,
    dependencies: BTreeMap<ReleaseKey, DependencyRules>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every source file in `dir`.
    ///
    /// Files whose name does not follow the source layout are skipped. Any
    /// malformed file fails the whole load, so a catalog is either fully
    /// valid or not built at all.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        info!("Loading catalog from {:?}", dir);

        let entries = fs::read_dir(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Self::new();
        for path in paths {
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                warn!("Skipping source file with non UTF-8 name: {:?}", path);
                continue;
            };
            let Some((kind, key)) = classify(file_name) else {
                warn!("Skipping unrecognized source file: {:?}", path);
                continue;
            };

            debug!("Reading {:?} as {:?} for {:?}", path, kind, key);
            let content = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: path.clone(),
                source,
            })?;
            match kind {
                SourceKind::Release => {
                    let release = parse_release(&path, &content, &key)?;
                    catalog.releases.insert(key, release);
                }
                SourceKind::Dependencies => {
                    let rules = parse_dependencies(&path, &content)?;
                    catalog.dependencies.insert(key, rules);
                }
            }
        }

        info!(
            "Catalog loaded: {} releases, {} dependency files",
            catalog.releases.len(),
            catalog.dependencies.len()
        );
        Ok(catalog)
    }

    pub fn insert_release(&mut self, release: OperatorRelease) {
        let key = ReleaseKey::new(&release.product, &release.operator);
        self.releases.insert(key, release);
    }

    pub fn insert_dependencies(&mut self, product: &str, operator: &str, rules: DependencyRules) {
        self.dependencies
            .insert(ReleaseKey::new(product, operator), rules);
    }

    pub fn release(&self, product: &str, operator: &str) -> Option<&OperatorRelease> {
        self.releases.get(&ReleaseKey::new(product, operator))
    }

    pub fn dependency_rules(&self, product: &str, operator: &str) -> Option<&DependencyRules> {
        self.dependencies.get(&ReleaseKey::new(product, operator))
    }

    /// Every release of `product`, in key order
    pub fn releases<'a>(&'a self, product: &'a str) -> impl Iterator<Item = &'a OperatorRelease> {
        self.releases
            .iter()
            .filter(move |(key, _)| key.product == product)
            .map(|(_, release)| release)
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

fn parse_release(
    path: &Path,
    content: &str,
    key: &ReleaseKey,
) -> Result<OperatorRelease, CatalogError> {
    let response: VersionResponse =
        serde_json::from_str(content).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let mut releases = response.versions.into_iter();
    let Some(mut release) = releases.next() else {
        return Err(CatalogError::EmptyRelease {
            path: path.to_path_buf(),
        });
    };
    if releases.next().is_some() {
        warn!("{:?} holds more than one release, using the first", path);
    }

    validate_matrix(path, &release.matrix)?;

    // The file name is the lookup identity
    if release.product.is_empty() {
        release.product = key.product.clone();
    }
    if release.operator.is_empty() {
        release.operator = key.operator.clone();
    }
    if release.product != key.product || release.operator != key.operator {
        warn!(
            "{:?} describes {} {}, indexing it as {} {}",
            path, release.product, release.operator, key.product, key.operator
        );
        release.product = key.product.clone();
        release.operator = key.operator.clone();
    }

    Ok(release)
}

fn validate_matrix(path: &Path, matrix: &VersionMatrix) -> Result<(), CatalogError> {
    for version in matrix.values().flat_map(|versions| versions.keys()) {
        check_version_key(path, version)?;
    }
    Ok(())
}

fn check_version_key(path: &Path, version: &str) -> Result<(), CatalogError> {
    match parse_version(version) {
        Some(_) => Ok(()),
        None => Err(CatalogError::InvalidVersion {
            path: path.to_path_buf(),
            version: version.to_string(),
        }),
    }
}

fn parse_dependencies(path: &Path, content: &str) -> Result<DependencyRules, CatalogError> {
    let raw: BTreeMap<Component, BTreeMap<String, Value>> =
        serde_json::from_str(content).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rules = DependencyRules::new();
    for (component, candidates) in raw {
        let mut table = RuleTable::new();
        for (version, rule) in candidates {
            check_version_key(path, &version)?;
            let rule = Rule::from_json(&rule).map_err(|source| CatalogError::InvalidRule {
                path: path.to_path_buf(),
                version: version.clone(),
                source,
            })?;
            table.insert(version, rule);
        }
        rules.insert(component, table);
    }
    Ok(rules)
}
