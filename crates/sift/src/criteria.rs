//! Criteria trees and their assembly from parsed query descriptions.
//!
//! A [`Criteria`] is a leaf [`Predicate`] or an AND/OR of two sub-trees.
//! Negation is expressed through operators (`NotEquals`, `NotIn`), never as
//! a tree node.
//!
//! # Assembly
//!
//! Query-method parsers hand over a flat list of [`Part`]s, each tagged
//! with the connector that joins it to the previous part. [`assemble`]
//! folds them left to right with AND binding tighter than OR:
//!
//! ```text
//! a AND b OR c AND d   =>   (a AND b) OR (c AND d)
//! ```

use std::fmt;

use crate::error::Result;
use crate::literal::Literal;
use crate::op::Operator;
use crate::path::PathRegistry;
use crate::predicate::{self, Predicate};
use crate::record::Record;

/// A predicate tree over records.
#[derive(Debug, Clone)]
pub enum Criteria {
    /// A single operator test.
    Leaf(Predicate),
    /// Both sub-trees must match.
    And(Box<Criteria>, Box<Criteria>),
    /// Either sub-tree must match.
    Or(Box<Criteria>, Box<Criteria>),
}

impl Criteria {
    /// Tests `record` against this tree.
    ///
    /// AND stops at the first false branch and OR at the first true one, so
    /// branches after the deciding one are never evaluated.
    pub fn matches(&self, record: &dyn Record) -> Result<bool> {
        match self {
            Criteria::Leaf(predicate) => predicate.test(record),
            Criteria::And(left, right) => Ok(left.matches(record)? && right.matches(record)?),
            Criteria::Or(left, right) => Ok(left.matches(record)? || right.matches(record)?),
        }
    }

    /// Joins two trees with AND.
    pub fn and(self, other: Criteria) -> Criteria {
        Criteria::And(Box::new(self), Box::new(other))
    }

    /// Joins two trees with OR.
    pub fn or(self, other: Criteria) -> Criteria {
        Criteria::Or(Box::new(self), Box::new(other))
    }

    /// The leaf predicates, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &Predicate> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves.into_iter()
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Predicate>) {
        match self {
            Criteria::Leaf(predicate) => leaves.push(predicate),
            Criteria::And(left, right) | Criteria::Or(left, right) => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criteria::Leaf(predicate) => write!(f, "{predicate}"),
            Criteria::And(left, right) => write!(f, "({left} AND {right})"),
            Criteria::Or(left, right) => write!(f, "({left} OR {right})"),
        }
    }
}

/// Tests `record` against an optional tree; no tree matches everything.
pub fn matches(criteria: Option<&Criteria>, record: &dyn Record) -> Result<bool> {
    criteria.map_or(Ok(true), |criteria| criteria.matches(record))
}

/// How a part joins the part before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connector {
    /// Same AND group as the previous part.
    #[default]
    And,
    /// Starts a new OR branch.
    Or,
}

/// One parsed condition: a property, an operator and its case handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// How this part joins the previous one. Ignored for the first part.
    pub connector: Connector,
    /// Dotted property path.
    pub property: String,
    /// The comparison.
    pub operator: Operator,
    /// Compare strings without regard to case.
    pub ignore_case: bool,
}

impl Part {
    /// Creates a case-sensitive part.
    pub fn new(connector: Connector, property: impl Into<String>, operator: Operator) -> Self {
        Part {
            connector,
            property: property.into(),
            operator,
            ignore_case: false,
        }
    }

    /// Marks this part as case-insensitive.
    pub fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

/// An ordered list of parts, as produced by a query-method parser.
///
/// # Example
///
/// ```
/// use sift::{Operator, QueryDescription};
///
/// // findByNameAndAgeGreaterThanOrActiveIsTrue
/// let description = QueryDescription::new()
///     .and("name", Operator::Equals)
///     .and("age", Operator::GreaterThan)
///     .or("active", Operator::IsTrue);
///
/// assert_eq!(description.arity(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDescription {
    parts: Vec<Part>,
}

impl QueryDescription {
    /// An empty description; assembles to no criteria.
    pub fn new() -> Self {
        QueryDescription::default()
    }

    /// Appends a part to the current AND group.
    pub fn and(self, property: impl Into<String>, operator: Operator) -> Self {
        self.part(Part::new(Connector::And, property, operator))
    }

    /// Appends a part that starts a new OR branch.
    pub fn or(self, property: impl Into<String>, operator: Operator) -> Self {
        self.part(Part::new(Connector::Or, property, operator))
    }

    /// Appends an arbitrary part.
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// The parts in order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Total number of arguments the parts consume.
    pub fn arity(&self) -> usize {
        self.parts.iter().map(|part| part.operator.arity()).sum()
    }

    /// Returns `true` if there are no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl FromIterator<Part> for QueryDescription {
    fn from_iter<I: IntoIterator<Item = Part>>(iter: I) -> Self {
        QueryDescription {
            parts: iter.into_iter().collect(),
        }
    }
}

/// Builds the criteria tree for `description`.
///
/// Arguments are consumed positionally, `operator.arity()` per part.
/// Arguments left over after the last part are ignored. Returns `Ok(None)`
/// for an empty description.
pub fn assemble(
    description: &QueryDescription,
    args: &[Literal],
    registry: &PathRegistry,
) -> Result<Option<Criteria>> {
    let mut branches: Option<Criteria> = None;
    let mut group: Option<Criteria> = None;
    let mut cursor = 0;

    for part in description.parts() {
        let path = registry.path(&part.property)?;
        let remaining = args.get(cursor..).unwrap_or(&[]);
        let leaf = predicate::build(path, part.operator, part.ignore_case, remaining)?;
        cursor += part.operator.arity();

        group = Some(match (group.take(), part.connector) {
            (Some(current), Connector::Or) => {
                branches = Some(join_or(branches, current));
                leaf
            }
            (Some(current), Connector::And) => current.and(leaf),
            (None, _) => leaf,
        });
    }

    Ok(match group {
        Some(current) => Some(join_or(branches, current)),
        None => branches,
    })
}

fn join_or(branches: Option<Criteria>, next: Criteria) -> Criteria {
    match branches {
        Some(branches) => branches.or(next),
        None => next,
    }
}
