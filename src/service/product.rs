/// Product family served by the version service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Product {
    /// Percona XtraDB Cluster operator
    Pxc,
    /// Percona Server for MongoDB operator
    Psmdb,
    /// Percona Server for MySQL operator
    Ps,
    /// Percona PostgreSQL operator
    Pg,
    /// Percona Monitoring and Management server, listed but never resolved
    PmmServer,
}

impl Product {
    pub const ALL: [Product; 5] = [
        Product::Pxc,
        Product::Psmdb,
        Product::Ps,
        Product::Pg,
        Product::PmmServer,
    ];

    /// Returns the product name used in requests and catalog file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Pxc => "pxc-operator",
            Product::Psmdb => "psmdb-operator",
            Product::Ps => "ps-operator",
            Product::Pg => "pg-operator",
            Product::PmmServer => "pmm-server",
        }
    }

    /// Products whose releases can be read but not applied
    pub fn is_read_only(&self) -> bool {
        matches!(self, Product::PmmServer)
    }
}

impl std::str::FromStr for Product {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pxc-operator" => Ok(Product::Pxc),
            "psmdb-operator" => Ok(Product::Psmdb),
            "ps-operator" => Ok(Product::Ps),
            "pg-operator" => Ok(Product::Pg),
            "pmm-server" => Ok(Product::PmmServer),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
