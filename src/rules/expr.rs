//! Rule expression tree and its evaluation

use std::cmp::Ordering;
use std::fmt;

use semver::Version;

use crate::version::semver::cmp_precedence;

/// Name of the only variable a rule can reference
pub const PRODUCT_VERSION: &str = "productVersion";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::Ne => ordering != Ordering::Equal,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// The resolved primary version
    ProductVersion,
    /// A version literal, parsed when the rule is built
    Literal { text: String, version: Version },
}

impl Operand {
    fn value<'a>(&'a self, product_version: &'a Version) -> &'a Version {
        match self {
            Operand::ProductVersion => product_version,
            Operand::Literal { version, .. } => version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Const(bool),
    Compare {
        lhs: Operand,
        op: CmpOp,
        rhs: Operand,
    },
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    /// Evaluate against the resolved primary version.
    ///
    /// Comparisons use version precedence, so `8.0.19-10.1 >= 8.0` holds.
    pub fn eval(&self, product_version: &Version) -> bool {
        match self {
            Expr::Const(value) => *value,
            Expr::Compare { lhs, op, rhs } => op.holds(cmp_precedence(
                lhs.value(product_version),
                rhs.value(product_version),
            )),
            Expr::Not(inner) => !inner.eval(product_version),
            Expr::And(items) => items.iter().all(|e| e.eval(product_version)),
            Expr::Or(items) => items.iter().any(|e| e.eval(product_version)),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::ProductVersion => f.write_str(PRODUCT_VERSION),
            Operand::Literal { text, .. } => write!(f, "\"{text}\""),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{value}"),
            Expr::Compare { lhs, op, rhs } => write!(f, "{lhs} {} {rhs}", op.symbol()),
            Expr::Not(inner) => write!(f, "!({inner})"),
            Expr::And(items) => write_joined(f, items, "&&"),
            Expr::Or(items) => write_joined(f, items, "||"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::semver::parse_version;
    use rstest::rstest;

    fn literal(text: &str) -> Operand {
        Operand::Literal {
            text: text.to_string(),
            version: parse_version(text).unwrap(),
        }
    }

    fn compare(op: CmpOp, text: &str) -> Expr {
        Expr::Compare {
            lhs: Operand::ProductVersion,
            op,
            rhs: literal(text),
        }
    }

    #[rstest]
    #[case(CmpOp::Ge, "5.0", "4.9", false)]
    #[case(CmpOp::Lt, "5.0", "4.9", true)]
    #[case(CmpOp::Eq, "8.0", "8.0.0", true)]
    #[case(CmpOp::Ne, "8.0", "8.0.1", true)]
    #[case(CmpOp::Le, "8.0.19", "8.0.19-10.1", true)]
    #[case(CmpOp::Gt, "8.0", "8.0.19-10.1", true)]
    fn compare_uses_version_precedence(
        #[case] op: CmpOp,
        #[case] literal: &str,
        #[case] product: &str,
        #[case] expected: bool,
    ) {
        let product = parse_version(product).unwrap();
        assert_eq!(compare(op, literal).eval(&product), expected);
    }

    #[test]
    fn boolean_connectives_combine_comparisons() {
        let between = Expr::And(vec![compare(CmpOp::Ge, "8.0"), compare(CmpOp::Lt, "8.1")]);
        let outside = Expr::Not(Box::new(between.clone()));
        let either = Expr::Or(vec![Expr::Const(false), compare(CmpOp::Eq, "5.7.30")]);

        let v80 = parse_version("8.0.25").unwrap();
        let v57 = parse_version("5.7.30").unwrap();

        assert!(between.eval(&v80));
        assert!(!between.eval(&v57));
        assert!(outside.eval(&v57));
        assert!(either.eval(&v57));
        assert!(!either.eval(&v80));
    }

    #[test]
    fn display_renders_readable_expression() {
        let expr = Expr::And(vec![
            compare(CmpOp::Ge, "8.0"),
            Expr::Not(Box::new(Expr::Const(false))),
        ]);

        assert_eq!(
            expr.to_string(),
            "(productVersion >= \"8.0\" && !(false))"
        );
    }
}
