//! Version constraint model
//!
//! A constraint expression is a comma-separated conjunction of clauses like
//! `">=1.2,<2.0"`. Every clause must hold for a version to satisfy the
//! constraint. An empty expression parses to "no constraint", which is a
//! distinct state from a constraint that no published version satisfies:
//! an unconstrained dependency gives the search no upper bound to start
//! from, so callers skip it instead of accepting everything.

use crate::domain::Version;
use crate::error::ConstraintError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// Comparison operator of a single constraint clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOperator {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(ComparisonOperator::Eq),
            "!=" => Some(ComparisonOperator::Ne),
            "<" => Some(ComparisonOperator::Lt),
            "<=" => Some(ComparisonOperator::Le),
            ">" => Some(ComparisonOperator::Gt),
            ">=" => Some(ComparisonOperator::Ge),
            _ => None,
        }
    }

    /// Evaluate `candidate OP bound` under the loose version ordering
    pub fn holds(&self, candidate: &Version, bound: &Version) -> bool {
        let ordering = candidate.cmp(bound);
        match self {
            ComparisonOperator::Eq => ordering == Ordering::Equal,
            ComparisonOperator::Ne => ordering != Ordering::Equal,
            ComparisonOperator::Lt => ordering == Ordering::Less,
            ComparisonOperator::Le => ordering != Ordering::Greater,
            ComparisonOperator::Gt => ordering == Ordering::Greater,
            ComparisonOperator::Ge => ordering != Ordering::Less,
        }
    }

    /// The symbol as written in a constraint expression
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "==",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One `(operator, version)` pair of a constraint conjunction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintClause {
    pub operator: ComparisonOperator,
    pub bound: Version,
}

impl fmt::Display for ConstraintClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.bound)
    }
}

/// A conjunction of constraint clauses, all of which must hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConstraint {
    clauses: Vec<ConstraintClause>,
}

fn clause_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(==|!=|<=|>=|<|>)\s*([0-9.]*)$").unwrap())
}

impl VersionConstraint {
    /// Parse a constraint expression
    ///
    /// Returns `Ok(None)` for an empty or all-whitespace expression (no
    /// constraint declared). A clause that does not match the grammar is a
    /// `MalformedConstraint` error; callers recover by skipping the
    /// dependency.
    pub fn parse(expression: &str) -> Result<Option<Self>, ConstraintError> {
        if expression.trim().is_empty() {
            return Ok(None);
        }

        let mut clauses = Vec::new();
        for raw_clause in expression.split(',') {
            let raw_clause = raw_clause.trim();
            let captures = clause_regex().captures(raw_clause).ok_or_else(|| {
                ConstraintError::malformed(expression, raw_clause)
            })?;

            // The regex only admits the six known symbols
            let operator = ComparisonOperator::from_symbol(&captures[1]).unwrap();
            let bound = Version::parse(&captures[2]);
            clauses.push(ConstraintClause { operator, bound });
        }

        Ok(Some(Self { clauses }))
    }

    /// True iff every clause holds for `version`
    pub fn satisfies(&self, version: &Version) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.operator.holds(version, &clause.bound))
    }

    /// The parsed clauses, in expression order
    pub fn clauses(&self) -> &[ConstraintClause] {
        &self.clauses
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", rendered.join(","))
    }
}
