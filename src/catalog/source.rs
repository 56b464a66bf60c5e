//! Read access to the catalog for request handling

use std::path::Path;
use std::sync::{Arc, RwLock};

#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::catalog::store::{Catalog, ReleaseKey};
use crate::catalog::types::{DependencyRules, OperatorRelease};
use crate::version::error::{CatalogError, ResolveError};

/// Source of catalog data for the version service
///
/// Every method returns an owned copy, so callers may prune the result
/// without affecting other requests.
#[cfg_attr(test, automock)]
pub trait CatalogSource: Send + Sync {
    /// The release of `product` at operator version `operator`
    fn release(&self, product: &str, operator: &str) -> Result<OperatorRelease, ResolveError>;

    /// Dependency rules shipped with that release
    fn dependency_rules(
        &self,
        product: &str,
        operator: &str,
    ) -> Result<DependencyRules, ResolveError>;

    /// Every release of `product`; empty when the product is unknown
    fn releases(&self, product: &str) -> Result<Vec<OperatorRelease>, ResolveError>;
}

/// Process-wide catalog handle
///
/// Readers take a cheap snapshot of the current catalog; a reload swaps the
/// whole catalog at once, so a request never sees a mix of two loads.
pub struct SharedCatalog {
    current: RwLock<Arc<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        Catalog::load(dir).map(Self::new)
    }

    /// Reload from `dir`. On failure the current catalog stays in place.
    pub fn reload(&self, dir: &Path) -> Result<(), CatalogError> {
        let catalog = Catalog::load(dir)?;
        self.replace(catalog)
    }

    pub fn replace(&self, catalog: Catalog) -> Result<(), CatalogError> {
        let mut current = self.current.write().map_err(|_| CatalogError::LockPoisoned)?;
        *current = Arc::new(catalog);
        info!("Catalog replaced: {} releases", current.len());
        Ok(())
    }

    pub fn snapshot(&self) -> Result<Arc<Catalog>, CatalogError> {
        self.current
            .read()
            .map(|current| Arc::clone(&current))
            .map_err(|_| CatalogError::LockPoisoned)
    }

    fn snapshot_for_request(&self) -> Result<Arc<Catalog>, ResolveError> {
        self.snapshot()
            .map_err(|e| ResolveError::Internal(e.to_string()))
    }
}

impl CatalogSource for SharedCatalog {
    fn release(&self, product: &str, operator: &str) -> Result<OperatorRelease, ResolveError> {
        let catalog = self.snapshot_for_request()?;
        catalog.release(product, operator).cloned().ok_or_else(|| {
            ResolveError::NotFound(format!(
                "no such source file: {}",
                ReleaseKey::new(product, operator).release_file()
            ))
        })
    }

    fn dependency_rules(
        &self,
        product: &str,
        operator: &str,
    ) -> Result<DependencyRules, ResolveError> {
        let catalog = self.snapshot_for_request()?;
        catalog
            .dependency_rules(product, operator)
            .cloned()
            .ok_or_else(|| {
                ResolveError::NotFound(format!(
                    "no such source file: {}",
                    ReleaseKey::new(product, operator).dependency_file()
                ))
            })
    }

    fn releases(&self, product: &str) -> Result<Vec<OperatorRelease>, ResolveError> {
        let catalog = self.snapshot_for_request()?;
        Ok(catalog.releases(product).cloned().collect())
    }
}
