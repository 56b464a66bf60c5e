//! Per-product resolution plans
//!
//! A plan names the primary component of a product, the resolver that
//! narrows it, and the dependents resolved from its dependency rules.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::types::Component;
use crate::service::product::Product;
use crate::version::resolver::PrimaryVersionResolver;
use crate::version::resolvers::{PgResolver, PsResolver, PsmdbResolver, PxcResolver};

/// A component resolved after the primary one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    pub component: Component,
    /// Whether a dependent whose map is emptied by pruning fails the request
    pub required: bool,
}

impl Dependent {
    pub const fn required(component: Component) -> Self {
        Self {
            component,
            required: true,
        }
    }

    pub const fn optional(component: Component) -> Self {
        Self {
            component,
            required: false,
        }
    }
}

pub struct ProductPlan {
    primary: Component,
    resolver: Arc<dyn PrimaryVersionResolver>,
    dependents: Vec<Dependent>,
}

impl ProductPlan {
    pub fn new(
        primary: Component,
        resolver: Arc<dyn PrimaryVersionResolver>,
        dependents: Vec<Dependent>,
    ) -> Self {
        Self {
            primary,
            resolver,
            dependents,
        }
    }

    pub fn primary(&self) -> Component {
        self.primary
    }

    pub fn resolver(&self) -> &Arc<dyn PrimaryVersionResolver> {
        &self.resolver
    }

    /// Dependents in resolution order
    pub fn dependents(&self) -> &[Dependent] {
        &self.dependents
    }
}

/// Create the plans of every product that can be applied
pub fn create_default_plans() -> HashMap<Product, ProductPlan> {
    let mut plans = HashMap::new();

    plans.insert(
        Product::Pxc,
        ProductPlan::new(
            Component::Pxc,
            Arc::new(PxcResolver),
            vec![
                Dependent::required(Component::Backup),
                Dependent::required(Component::Pmm),
                Dependent::optional(Component::Proxysql),
                Dependent::required(Component::Haproxy),
                Dependent::optional(Component::LogCollector),
            ],
        ),
    );

    plans.insert(
        Product::Psmdb,
        ProductPlan::new(
            Component::Mongod,
            Arc::new(PsmdbResolver),
            vec![
                Dependent::required(Component::Backup),
                Dependent::required(Component::Pmm),
            ],
        ),
    );

    plans.insert(
        Product::Ps,
        ProductPlan::new(
            Component::Mysql,
            Arc::new(PsResolver),
            vec![
                Dependent::required(Component::Backup),
                Dependent::required(Component::Pmm),
                Dependent::required(Component::Orchestrator),
                Dependent::required(Component::Router),
                Dependent::required(Component::Haproxy),
                Dependent::required(Component::Toolkit),
            ],
        ),
    );

    plans.insert(
        Product::Pg,
        ProductPlan::new(
            Component::Postgresql,
            Arc::new(PgResolver),
            vec![
                Dependent::required(Component::Pgbackrest),
                Dependent::required(Component::PgbackrestRepo),
                Dependent::required(Component::Pgbadger),
                Dependent::required(Component::Pgbouncer),
                Dependent::required(Component::Postgis),
            ],
        ),
    );

    plans
}
