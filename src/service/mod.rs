//! Request orchestration
//!
//! [`VersionService`] ties the pieces together for one request:
//!
//! ```text
//! product ─▶ plan ─▶ policy ─▶ primary resolver ─▶ dependency rules ─▶ prune
//! ```
//!
//! # Modules
//!
//! - [`product`]: supported products
//! - [`plan`]: primary component, resolver and dependents of each product

pub mod plan;
pub mod product;

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info};

use crate::catalog::source::CatalogSource;
use crate::catalog::types::{OperatorRelease, VersionResponse};
use crate::rules::select_version;
use crate::service::plan::{ProductPlan, create_default_plans};
use crate::service::product::Product;
use crate::version::error::ResolveError;
use crate::version::policy::{Policy, PolicyKind};
use crate::version::prune::resolve_dependent;
use crate::version::semver::{ParsedVersion, cmp_precedence};

/// Request to resolve the versions to deploy with one operator release
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplyRequest {
    pub product: String,
    pub operator_version: String,
    /// `latest`, `recommended`, `<pin>-latest`, `<pin>-recommended`,
    /// `disabled` or an exact version
    pub policy: String,
    /// Version the client currently runs, if any
    pub current_version: Option<String>,
}

pub struct VersionService<S> {
    catalog: S,
    plans: HashMap<Product, ProductPlan>,
}

impl<S: CatalogSource> VersionService<S> {
    pub fn new(catalog: S) -> Self {
        Self::with_plans(catalog, create_default_plans())
    }

    pub fn with_plans(catalog: S, plans: HashMap<Product, ProductPlan>) -> Self {
        Self { catalog, plans }
    }

    /// Resolve the single version of every component to deploy.
    ///
    /// Either every non-empty version map of the returned release holds
    /// exactly one entry, or an error is returned.
    pub fn apply(&self, request: &ApplyRequest) -> Result<VersionResponse, ResolveError> {
        info!(
            "apply: product={} operator={} policy={} current={:?}",
            request.product, request.operator_version, request.policy, request.current_version
        );

        let product = parse_product(&request.product)?;
        if product.is_read_only() {
            return Err(ResolveError::Unimplemented(format!(
                "apply is not implemented for {product}"
            )));
        }
        let plan = self.plan(product)?;
        let policy = Policy::parse(&request.policy, request.current_version.as_deref())?;
        if policy.kind == PolicyKind::Disabled {
            debug!("version resolution disabled by policy {}", request.policy);
            return Ok(VersionResponse::default());
        }

        let mut release = self
            .catalog
            .release(&request.product, &request.operator_version)?;
        let rules = self
            .catalog
            .dependency_rules(&request.product, &request.operator_version)?;

        let primary = plan.primary();
        let Some(primary_versions) = release.matrix.get_mut(&primary) else {
            return Err(ResolveError::Internal(format!(
                "release {} {} has no {} versions",
                request.product,
                request.operator_version,
                primary.as_str()
            )));
        };
        let resolved = plan.resolver().resolve(primary_versions, &policy)?;
        debug!("{} resolved to {}", primary.as_str(), resolved);

        for dependent in plan.dependents() {
            let Some(versions) = release.matrix.get_mut(&dependent.component) else {
                continue;
            };
            let desired = match rules.get(&dependent.component) {
                Some(table) => select_version(table, &resolved)?,
                None => None,
            };
            resolve_dependent(
                versions,
                desired.as_deref(),
                dependent.required,
                dependent.component.as_str(),
            )?;
        }

        info!(
            "apply: {} {} resolved {} {}",
            request.product,
            request.operator_version,
            primary.as_str(),
            resolved
        );
        Ok(VersionResponse {
            versions: vec![release],
        })
    }

    /// The full, unpruned release of `product` at `operator`
    pub fn operator(&self, product: &str, operator: &str) -> Result<VersionResponse, ResolveError> {
        parse_product(product)?;
        let release = self.catalog.release(product, operator)?;
        Ok(VersionResponse {
            versions: vec![release],
        })
    }

    /// Every release of `product`, newest operator version first
    pub fn product(&self, product: &str) -> Result<VersionResponse, ResolveError> {
        parse_product(product)?;
        let releases = self.catalog.releases(product)?;
        if releases.is_empty() {
            return Err(ResolveError::NotFound(format!(
                "no releases for product {product}"
            )));
        }

        Ok(VersionResponse {
            versions: newest_first(releases)?,
        })
    }

    fn plan(&self, product: Product) -> Result<&ProductPlan, ResolveError> {
        self.plans
            .get(&product)
            .ok_or_else(|| ResolveError::InvalidArgument(format!("unknown product: {product}")))
    }
}

fn parse_product(product: &str) -> Result<Product, ResolveError> {
    product
        .parse()
        .map_err(|_| ResolveError::InvalidArgument(format!("unknown product: {product}")))
}

fn newest_first(releases: Vec<OperatorRelease>) -> Result<Vec<OperatorRelease>, ResolveError> {
    let mut keyed = releases
        .into_iter()
        .map(|release| {
            ParsedVersion::parse(&release.operator)
                .map(|version| (version, release))
                .map_err(|e| ResolveError::Internal(format!("failed to sort releases: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|(a, _), (b, _)| {
        cmp_precedence(&b.version, &a.version).then_with(|| a.original.cmp(&b.original))
    });
    Ok(keyed.into_iter().map(|(_, release)| release).collect())
}
