//! Dependency rules
//!
//! Each dependent component (backup tool, proxy, monitoring agent, ...) of a
//! release carries a [`RuleTable`]: candidate version -> boolean rule over the
//! resolved primary version. [`select_version`] picks the highest candidate
//! whose rule holds.
//!
//! # Modules
//!
//! - [`expr`]: expression tree and evaluation
//! - [`parser`]: textual rule grammar
//! - [`json_logic`]: JSON-logic subset used by catalog dependency files

pub mod expr;
pub mod json_logic;
pub mod parser;

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::rules::expr::Expr;
use crate::version::error::ResolveError;
use crate::version::semver::{ParsedVersion, sort_descending};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("empty rule")]
    Empty,

    #[error("expected {0}")]
    Expected(&'static str),

    #[error("unexpected input after the end of the rule")]
    TrailingInput,

    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),

    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("invalid version literal: {0}")]
    InvalidLiteral(String),

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("invalid rule: {0}")]
    InvalidJsonLogic(String),
}

/// A boolean rule bound to one candidate version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    expr: Expr,
}

impl Rule {
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        parser::parse_expr(text).map(|expr| Self { expr })
    }

    /// Build a rule from either notation found in dependency files
    pub fn from_json(value: &Value) -> Result<Self, RuleError> {
        json_logic::lower(value).map(|expr| Self { expr })
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

/// Candidate version -> rule, for one dependent component
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleTable {
    rules: BTreeMap<String, Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: impl Into<String>, rule: Rule) {
        self.rules.insert(version.into(), rule);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn versions(&self) -> impl Iterator<Item = &String> {
        self.rules.keys()
    }

    /// Look up the rule of a version, retrying with trailing `.0` segments
    /// removed (`14.0.0` -> `14.0` -> `14`).
    pub fn rule_for(&self, version: &str) -> Option<&Rule> {
        let mut key = version;
        loop {
            if let Some(rule) = self.rules.get(key) {
                return Some(rule);
            }
            key = key.strip_suffix(".0")?;
        }
    }

    /// The candidate's own key wins over any key that only matches it
    /// after normalization.
    fn rule_for_candidate(&self, candidate: &ParsedVersion) -> Option<&Rule> {
        self.rules
            .get(&candidate.original)
            .or_else(|| self.rule_for(&candidate.canonical()))
    }
}

impl FromIterator<(String, Rule)> for RuleTable {
    fn from_iter<T: IntoIterator<Item = (String, Rule)>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Select the dependent version to deploy next to `product_version`.
///
/// Candidates are tried from highest to lowest and the first one whose rule
/// holds wins. When no rule holds the highest candidate is used, so a
/// dependent is never left unresolved. An empty table yields `None`.
pub fn select_version(
    table: &RuleTable,
    product_version: &str,
) -> Result<Option<String>, ResolveError> {
    if table.is_empty() {
        return Ok(None);
    }

    let product = ParsedVersion::parse(product_version).map_err(|_| {
        ResolveError::Internal(format!("failed to parse product version: {product_version}"))
    })?;
    let sorted = sort_descending(table.versions())
        .map_err(|e| ResolveError::Internal(format!("failed to sort versions: {e}")))?;

    for candidate in &sorted {
        let Some(rule) = table.rule_for_candidate(candidate) else {
            continue;
        };
        if rule.expr().eval(&product.version) {
            debug!(
                "rule {} holds for {}, selecting {}",
                rule.expr(),
                product_version,
                candidate
            );
            return Ok(Some(candidate.original.clone()));
        }
    }

    let fallback = sorted[0].original.clone();
    debug!(
        "no rule holds for {}, falling back to {}",
        product_version, fallback
    );
    Ok(Some(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(rules: &[(&str, &str)]) -> RuleTable {
        rules
            .iter()
            .map(|(version, rule)| (version.to_string(), Rule::parse(rule).unwrap()))
            .collect()
    }

    #[test]
    fn select_version_picks_candidate_whose_rule_holds() {
        let table = table(&[
            ("2.0.0", "productVersion >= 5.0"),
            ("1.0.0", "productVersion < 5.0"),
        ]);

        assert_eq!(select_version(&table, "4.9").unwrap(), Some("1.0.0".to_string()));
        assert_eq!(select_version(&table, "5.1").unwrap(), Some("2.0.0".to_string()));
    }

    #[test]
    fn select_version_prefers_highest_matching_candidate() {
        let table = table(&[
            ("8.0.14", "productVersion >= 8.0"),
            ("8.0.22", "productVersion >= 8.0"),
            ("2.4.20", "productVersion < 8.0"),
        ]);

        assert_eq!(
            select_version(&table, "8.0.19-10.1").unwrap(),
            Some("8.0.22".to_string())
        );
    }

    #[test]
    fn select_version_falls_back_to_highest_candidate() {
        let table = table(&[("1.0.0", "false"), ("1.1.0", "productVersion > 99")]);

        assert_eq!(select_version(&table, "5.7").unwrap(), Some("1.1.0".to_string()));
    }

    #[test]
    fn select_version_returns_none_for_empty_table() {
        assert_eq!(select_version(&RuleTable::new(), "5.7").unwrap(), None);
    }

    #[test]
    fn select_version_is_deterministic() {
        let table = table(&[
            ("3.0.0", "productVersion >= 5.0"),
            ("2.0.0", "productVersion >= 4.0"),
            ("1.0.0", "true"),
        ]);

        let first = select_version(&table, "4.5").unwrap();
        for _ in 0..10 {
            assert_eq!(select_version(&table, "4.5").unwrap(), first);
        }
        assert_eq!(first, Some("2.0.0".to_string()));
    }

    #[test]
    fn select_version_fails_on_unparsable_product_version() {
        let table = table(&[("1.0.0", "true")]);

        assert!(matches!(
            select_version(&table, "not-a-version"),
            Err(ResolveError::Internal(_))
        ));
    }

    #[test]
    fn select_version_fails_on_unparsable_candidate() {
        let table = table(&[("1.0.0", "true"), ("latest", "true")]);

        assert!(matches!(
            select_version(&table, "1.0.0"),
            Err(ResolveError::Internal(_))
        ));
    }

    #[test]
    fn rule_for_strips_trailing_zero_segments() {
        let table = table(&[("14", "true"), ("15.0", "false")]);

        assert!(table.rule_for("14.0.0").is_some());
        assert!(table.rule_for("14.0").is_some());
        assert!(table.rule_for("15.0.0").is_some());
        assert!(table.rule_for("16.0.0").is_none());
        assert!(table.rule_for("1.10").is_none());
    }

    #[test]
    fn select_version_handles_major_only_keys() {
        let table = table(&[
            ("16", "productVersion >= 16"),
            ("15.0", "productVersion >= 15 && productVersion < 16"),
        ]);

        assert_eq!(select_version(&table, "15.8").unwrap(), Some("15.0".to_string()));
        assert_eq!(select_version(&table, "16.4").unwrap(), Some("16".to_string()));
    }

    #[test]
    fn candidate_binds_its_own_rule_before_normalized_ones() {
        let table = table(&[("14", "false"), ("14.0", "true")]);

        let fourteen = ParsedVersion::parse("14").unwrap();
        assert_eq!(
            table.rule_for_candidate(&fourteen),
            Some(&Rule::parse("false").unwrap())
        );
        assert_eq!(select_version(&table, "14.2").unwrap(), Some("14.0".to_string()));
    }

    #[test]
    fn rule_from_json_accepts_both_notations() {
        let logic = Rule::from_json(&json!({">=": [{"var": "productVersion"}, "8.0"]})).unwrap();
        let text = Rule::from_json(&json!("productVersion >= 8.0")).unwrap();

        assert_eq!(logic, text);
    }
}
